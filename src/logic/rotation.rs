use serde_yaml::Value;

use crate::error::{CropCalError, Result};
use crate::logic::search;
use crate::models::calendar::AgroManagement;
use crate::models::crop::Crop;

/// An ordered sequence of crops cultivated successively on the same parcel,
/// composed into one agromanagement document.
///
/// Segments are concatenated in argument order. No check is made that one
/// crop's terminal boundary aligns with the next crop's start: gapped or
/// overlapping rotations pass through unchanged, exactly as the simulation
/// engine receives them.
///
/// Read-only after construction. `find_value` returns every match in
/// document order; the first-match variant lives on
/// [`SingleRotationCalendar`](crate::logic::single_rotation::SingleRotationCalendar)
/// because downstream callers depend on each contract separately.
#[derive(Debug, Clone)]
pub struct CropRotation {
    rotation: AgroManagement,
    crop_list: Vec<(String, Option<String>)>,
    document: Value,
}

impl CropRotation {
    pub fn new(crops: impl IntoIterator<Item = Crop>) -> Result<Self> {
        let mut campaigns = Vec::new();
        let mut crop_list = Vec::new();
        for crop in crops {
            campaigns.extend_from_slice(crop.campaigns());
            crop_list.push((
                crop.crop_name().to_string(),
                crop.variety().map(str::to_string),
            ));
        }
        if crop_list.is_empty() {
            return Err(CropCalError::Config(
                "a rotation needs at least one crop".into(),
            ));
        }

        let rotation = AgroManagement::new(campaigns);
        let document = serde_yaml::to_value(&rotation)?;
        Ok(Self {
            rotation,
            crop_list,
            document,
        })
    }

    /// The composed agromanagement document driving the simulation engine.
    pub fn rotation(&self) -> &AgroManagement {
        &self.rotation
    }

    /// One `(crop_name, variety)` pair per crop, in the order the crops were
    /// supplied. Fallow entries carry no variety.
    pub fn crop_list(&self) -> &[(String, Option<String>)] {
        &self.crop_list
    }

    /// Every value associated with `key` anywhere in the composed calendar,
    /// in document order. Used downstream to slice day-indexed simulation
    /// output by which crop was active when. A miss returns an empty vector.
    pub fn find_value(&self, key: &str) -> Vec<Value> {
        search::find_all(&self.document, key)
    }

    pub fn to_yaml(&self) -> Result<String> {
        self.rotation.to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::calendar::CropEndType;
    use crate::models::crop::CropSpec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn arable(year: i32, name: &str, variety: &str, month: u32, day: u32) -> Crop {
        Crop::new(
            year,
            name,
            CropSpec {
                variety: Some(variety.into()),
                crop_start_month: Some(month),
                crop_start_day: Some(day),
                crop_end_type: Some(CropEndType::Maturity),
                max_duration: Some(365),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn fallow(year: i32, start: NaiveDate) -> Crop {
        Crop::new(
            year,
            "fallow",
            CropSpec {
                start_crop_calendar: Some(start),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn four_crop_rotation() -> CropRotation {
        CropRotation::new([
            arable(2023, "potato", "Potato_701", 4, 15),
            arable(2023, "wheat", "Winter_wheat_106", 11, 5),
            fallow(2024, date(2024, 9, 1)),
            arable(2025, "maize", "Grain_maize_201", 4, 20),
        ])
        .unwrap()
    }

    #[test]
    fn crop_list_keeps_supplied_order_including_fallow() {
        let rotation = four_crop_rotation();
        let list = rotation.crop_list();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0], ("potato".into(), Some("Potato_701".into())));
        assert_eq!(list[1], ("wheat".into(), Some("Winter_wheat_106".into())));
        assert_eq!(list[2], ("fallow".into(), None));
        assert_eq!(list[3], ("maize".into(), Some("Grain_maize_201".into())));
    }

    #[test]
    fn find_value_returns_matches_in_composition_order() {
        let rotation = four_crop_rotation();
        let names = rotation.find_value("crop_name");
        // Fallow contributes no CropCalendar block, so three names appear.
        assert_eq!(names.len(), 3);
        assert_eq!(names[0].as_str(), Some("potato"));
        assert_eq!(names[1].as_str(), Some("wheat"));
        assert_eq!(names[2].as_str(), Some("maize"));

        let varieties = rotation.find_value("variety_name");
        assert_eq!(varieties[1].as_str(), Some("Winter_wheat_106"));
    }

    #[test]
    fn find_value_miss_is_empty() {
        assert!(four_crop_rotation().find_value("no_such_key").is_empty());
    }

    #[test]
    fn segments_concatenate_in_argument_order() {
        let rotation = four_crop_rotation();
        let campaigns = &rotation.rotation().campaigns;
        // Three two-entry segments plus one lone fallow boundary.
        assert_eq!(campaigns.len(), 7);
        assert_eq!(campaigns[0].start, date(2023, 4, 1));
        assert_eq!(campaigns[2].start, date(2023, 11, 1));
        assert_eq!(campaigns[4].start, date(2024, 9, 1));
        assert!(campaigns[4].is_boundary());
        assert_eq!(campaigns[5].start, date(2025, 4, 1));
        assert!(campaigns[6].is_boundary());
    }

    #[test]
    fn empty_rotation_is_rejected() {
        assert!(matches!(
            CropRotation::new(Vec::<Crop>::new()),
            Err(CropCalError::Config(_))
        ));
    }

    #[test]
    fn composed_document_round_trips_through_yaml() {
        let rotation = four_crop_rotation();
        let yaml = rotation.to_yaml().unwrap();
        let back = AgroManagement::from_yaml(&yaml).unwrap();
        assert_eq!(&back, rotation.rotation());
    }
}
