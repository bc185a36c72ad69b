use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event on {date} falls outside the crop calendar window {start}..{end}")]
    EventOutOfWindow {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CropCalError>;
