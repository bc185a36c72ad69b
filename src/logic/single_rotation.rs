use std::path::Path;

use chrono::Datelike;
use serde_yaml::Value;

use crate::error::{CropCalError, Result};
use crate::logic::calculations::shift_year;
use crate::logic::search;
use crate::models::calendar::AgroManagement;
use crate::models::crop::Crop;

/// Mutable view over one already-built single-crop calendar, loadable from a
/// YAML agromanagement file. Kept alongside [`CropRotation`] because batch
/// simulation drivers rely on its narrower, in-place contract: rebase the
/// calendar year or swap the variety without rebuilding the crop.
///
/// [`CropRotation`]: crate::logic::rotation::CropRotation
#[derive(Debug, Clone, PartialEq)]
pub struct SingleRotationCalendar {
    doc: AgroManagement,
}

impl SingleRotationCalendar {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(Self {
            doc: AgroManagement::from_yaml(s)?,
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_crop(crop: &Crop) -> Self {
        Self {
            doc: crop.agromanagement(),
        }
    }

    pub fn agromanagement(&self) -> &AgroManagement {
        &self.doc
    }

    pub fn to_yaml(&self) -> Result<String> {
        self.doc.to_yaml()
    }

    /// Year of the first date-keyed entry, the base year all shifts are
    /// computed against.
    pub fn retrieve_year(&self) -> Option<i32> {
        self.doc.campaigns.first().map(|c| c.start.year())
    }

    /// First non-null variety name, in document order.
    pub fn retrieve_variety(&self) -> Option<&str> {
        self.doc
            .campaigns
            .iter()
            .filter_map(|c| c.schedule.as_ref())
            .filter_map(|s| s.crop_calendar.as_ref())
            .map(|cal| cal.variety_name.as_str())
            .next()
    }

    /// Shift every date in the calendar so that the base year becomes
    /// `new_year`, in place. A shifted date that does not exist (Feb 29
    /// moved to a non-leap year) surfaces as an error and leaves the
    /// calendar untouched.
    pub fn change_year(&mut self, new_year: i32) -> Result<()> {
        *self = self.with_year(new_year)?;
        Ok(())
    }

    /// Value-semantics variant of [`change_year`](Self::change_year):
    /// returns the rebased calendar, leaving `self` as is.
    pub fn with_year(&self, new_year: i32) -> Result<Self> {
        let base_year = self.retrieve_year().ok_or_else(|| {
            CropCalError::NotFound("calendar has no campaign entries".into())
        })?;
        let increment = new_year - base_year;

        let mut doc = self.doc.clone();
        for campaign in &mut doc.campaigns {
            campaign.start = shift_year(campaign.start, increment)?;
            let Some(schedule) = campaign.schedule.as_mut() else {
                continue;
            };
            if let Some(calendar) = schedule.crop_calendar.as_mut() {
                calendar.crop_start_date = shift_year(calendar.crop_start_date, increment)?;
                if let Some(end) = calendar.crop_end_date {
                    calendar.crop_end_date = Some(shift_year(end, increment)?);
                }
            }
            if let Some(tables) = schedule.timed_events.as_mut() {
                for table in tables {
                    for event in &mut table.events_table {
                        event.date = shift_year(event.date, increment)?;
                    }
                }
            }
            // State events are keyed by model state, not dates; untouched.
        }

        Ok(Self { doc })
    }

    /// Overwrite the variety in every non-null CropCalendar block, in place.
    /// No-op on placeholder entries.
    pub fn change_variety(&mut self, new_variety: &str) {
        for campaign in &mut self.doc.campaigns {
            if let Some(schedule) = campaign.schedule.as_mut() {
                if let Some(calendar) = schedule.crop_calendar.as_mut() {
                    calendar.variety_name = new_variety.to_string();
                }
            }
        }
    }

    /// First value associated with `key` anywhere in the calendar, in
    /// document order. First match only, unlike
    /// [`CropRotation::find_value`](crate::logic::rotation::CropRotation::find_value).
    pub fn find_first(&self, key: &str) -> Result<Option<Value>> {
        let document = serde_yaml::to_value(&self.doc)?;
        Ok(search::find_first(&document, key))
    }
}
