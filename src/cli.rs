use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropcal",
    version,
    about = "Agromanagement calendars and crop rotations for WOFOST/PCSE"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a crop parameter defaults file (crops.yaml)
    #[arg(short, long)]
    pub crops: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose a rotation plan into an agromanagement calendar
    Generate {
        /// Rotation plan YAML file
        #[arg(short, long)]
        plan: PathBuf,

        /// Write the calendar here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rebase the calendar year of an existing single-rotation calendar
    Rebase {
        /// Agromanagement YAML file
        #[arg(short, long)]
        calendar: PathBuf,

        /// New base year
        #[arg(short, long)]
        year: i32,

        /// Write the rebased calendar here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Swap the crop variety of an existing single-rotation calendar
    Variety {
        /// Agromanagement YAML file
        #[arg(short, long)]
        calendar: PathBuf,

        /// Replacement variety name
        #[arg(short, long)]
        set: String,

        /// Write the updated calendar here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the configured per-crop defaults
    Crops,
}
