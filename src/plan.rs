use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::CropParameters;
use crate::error::Result;
use crate::logic::rotation::CropRotation;
use crate::models::crop::{Crop, CropSpec};

/// One line of a rotation plan: which crop to grow in which calendar year,
/// plus any overrides of the per-crop defaults (variety, sowing date,
/// fertilization events, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub year: i32,
    pub crop: String,
    #[serde(flatten)]
    pub overrides: CropSpec,
}

/// A declarative rotation plan, e.g.:
///
/// ```yaml
/// rotation:
/// - year: 2023
///   crop: wheat
///   variety: Winter_wheat_106
/// - year: 2024
///   crop: fallow
///   start_crop_calendar: 2024-09-01
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationPlan {
    pub rotation: Vec<PlanEntry>,
}

impl RotationPlan {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build every crop against the parameter table and compose them, in
    /// plan order.
    pub fn build(&self, params: &CropParameters) -> Result<CropRotation> {
        let mut crops = Vec::with_capacity(self.rotation.len());
        for entry in &self.rotation {
            let spec = params
                .defaults_for(&entry.crop)
                .merge(entry.overrides.clone());
            crops.push(Crop::new(entry.year, &entry.crop, spec)?);
        }
        CropRotation::new(crops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"
rotation:
- year: 2023
  crop: potato
  variety: Potato_701
- year: 2023
  crop: wheat
  variety: Winter_wheat_106
- year: 2024
  crop: fallow
  start_crop_calendar: 2024-09-01
- year: 2025
  crop: maize
  variety: Grain_maize_201
"#;

    #[test]
    fn plan_builds_a_rotation_in_order() {
        let plan = RotationPlan::from_yaml_str(PLAN).unwrap();
        let rotation = plan.build(&CropParameters::default()).unwrap();
        let list = rotation.crop_list();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].0, "potato");
        assert_eq!(list[1].1.as_deref(), Some("Winter_wheat_106"));
        assert_eq!(list[2], ("fallow".into(), None));
        assert_eq!(list[3].0, "maize");
    }

    #[test]
    fn plan_overrides_replace_table_defaults() {
        let yaml = r#"
rotation:
- year: 2023
  crop: wheat
  variety: Winter_wheat_106
  crop_start_month: 9
  crop_start_day: 1
"#;
        let plan = RotationPlan::from_yaml_str(yaml).unwrap();
        let rotation = plan.build(&CropParameters::default()).unwrap();
        let starts = rotation.find_value("crop_start_date");
        assert_eq!(starts[0].as_str(), Some("2023-09-01"));
    }

    #[test]
    fn plan_with_missing_variety_fails_fast() {
        let yaml = "rotation:\n- year: 2023\n  crop: wheat\n";
        let plan = RotationPlan::from_yaml_str(yaml).unwrap();
        assert!(plan.build(&CropParameters::default()).is_err());
    }
}
