use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CropCalError, Result};
use crate::models::calendar::CropEndType;
use crate::models::crop::CropSpec;
use crate::models::event::EventSpec;

/// Per-crop default parameter table: calendar months and days, fertilization
/// and mowing defaults for each crop kind. An immutable value object; callers
/// overlay per-call overrides with [`CropSpec::merge`] instead of mutating a
/// shared table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropParameters {
    pub crops: BTreeMap<String, CropSpec>,
}

impl CropParameters {
    /// Load a parameter table from an explicit path, from the first standard
    /// location that exists, or fall back to the built-in defaults.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override {
            Some(p) => {
                if !p.exists() {
                    return Err(CropCalError::Config(format!(
                        "Crop parameter file not found at {p:?}"
                    )));
                }
                Some(p)
            }
            None => Self::find_config_path(),
        };

        match path {
            Some(p) => {
                let contents = std::fs::read_to_string(&p).map_err(|e| {
                    CropCalError::Config(format!("Failed to read crop parameters: {e}"))
                })?;
                serde_yaml::from_str(&contents).map_err(|e| {
                    CropCalError::Config(format!("Failed to parse crop parameters: {e}"))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Search for crops.yaml in the current directory, then the XDG config
    /// directory.
    fn find_config_path() -> Option<PathBuf> {
        let local = PathBuf::from("config/crops.yaml");
        if local.exists() {
            return Some(local);
        }
        let xdg = dirs::config_dir()?.join("cropcal").join("crops.yaml");
        xdg.exists().then_some(xdg)
    }

    /// Defaults for one crop kind; an empty spec when the kind is not in the
    /// table, so overrides alone can still define a crop (fallow has no
    /// table entry at all).
    pub fn defaults_for(&self, crop: &str) -> CropSpec {
        self.crops.get(crop).cloned().unwrap_or_default()
    }

    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }
}

fn npk(month: u32, day: u32, n: f64, p: f64, k: f64) -> EventSpec {
    EventSpec {
        month: Some(month),
        day: Some(day),
        n_amount: Some(n),
        p_amount: Some(p),
        k_amount: Some(k),
        ..Default::default()
    }
}

fn mow(month: u32, day: u32, biomass_remaining: f64) -> EventSpec {
    EventSpec {
        month: Some(month),
        day: Some(day),
        biomass_remaining: Some(biomass_remaining),
        ..Default::default()
    }
}

impl Default for CropParameters {
    fn default() -> Self {
        let mut crops = BTreeMap::new();

        crops.insert(
            "wheat".to_string(),
            CropSpec {
                crop_start_month: Some(11),
                crop_start_day: Some(5),
                crop_end_type: Some(CropEndType::Maturity),
                max_duration: Some(365),
                apply_npk: Some(vec![
                    npk(2, 20, 60.0, 3.0, 4.0),
                    npk(4, 1, 100.0, 13.0, 14.0),
                    npk(5, 1, 50.0, 23.0, 24.0),
                ]),
                ..Default::default()
            },
        );

        crops.insert(
            "potato".to_string(),
            CropSpec {
                crop_start_month: Some(4),
                crop_start_day: Some(15),
                crop_end_type: Some(CropEndType::Maturity),
                max_duration: Some(200),
                apply_npk: Some(vec![npk(5, 1, 100.0, 35.0, 150.0)]),
                ..Default::default()
            },
        );

        crops.insert(
            "maize".to_string(),
            CropSpec {
                crop_start_month: Some(4),
                crop_start_day: Some(20),
                crop_end_type: Some(CropEndType::Maturity),
                max_duration: Some(210),
                apply_npk: Some(vec![npk(5, 5, 120.0, 30.0, 60.0)]),
                ..Default::default()
            },
        );

        crops.insert(
            "ryegrass".to_string(),
            CropSpec {
                crop_start_month: Some(3),
                crop_start_day: Some(1),
                crop_end_type: Some(CropEndType::Maturity),
                max_duration: Some(730),
                apply_npk: Some(vec![npk(3, 15, 70.0, 35.0, 105.0)]),
                mowing: Some(vec![mow(6, 15, 320.0), mow(8, 10, 320.0)]),
                ..Default::default()
            },
        );

        Self { crops }
    }
}
