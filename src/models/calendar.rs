use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::event::{StateEventTable, TimedEventTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStartType {
    Sowing,
    Emergence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropEndType {
    /// The simulation runs until the crop matures naturally.
    Maturity,
    /// The crop is cut on `crop_end_date` regardless of development stage.
    Harvest,
    /// Whichever of maturity or `crop_end_date` comes first.
    Earliest,
}

/// The `CropCalendar` block of one campaign. Field names and nesting are the
/// simulation engine's fixed external schema and are reproduced losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCalendar {
    pub crop_name: String,
    pub variety_name: String,
    pub crop_start_date: NaiveDate,
    pub crop_start_type: CropStartType,
    #[serde(default)]
    pub crop_end_date: Option<NaiveDate>,
    pub crop_end_type: CropEndType,
    pub max_duration: u32,
}

/// Everything scheduled within one campaign. A campaign with no schedule at
/// all is represented by `Campaign { schedule: None }` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSchedule {
    #[serde(rename = "CropCalendar", default)]
    pub crop_calendar: Option<CropCalendar>,
    #[serde(rename = "TimedEvents", default)]
    pub timed_events: Option<Vec<TimedEventTable>>,
    #[serde(rename = "StateEvents", default)]
    pub state_events: Option<Vec<StateEventTable>>,
}

/// One entry of the agromanagement document: a campaign start date mapped to
/// the schedule active from that date. A null schedule is the terminal
/// sentinel ("nothing happening from here").
///
/// Serializes as a single-entry mapping, e.g.:
///
/// ```yaml
/// - 2023-11-01:
///     CropCalendar:
///         crop_name: wheat
///         ...
/// - 2024-11-01:
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub start: NaiveDate,
    pub schedule: Option<CampaignSchedule>,
}

impl Campaign {
    pub fn boundary(start: NaiveDate) -> Self {
        Self {
            start,
            schedule: None,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.schedule.is_none()
    }
}

impl Serialize for Campaign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.start, &self.schedule)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Campaign {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CampaignVisitor;

        impl<'de> Visitor<'de> for CampaignVisitor {
            type Value = Campaign;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-entry map of campaign start date to schedule")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (start, schedule): (NaiveDate, Option<CampaignSchedule>) = map
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::custom("empty campaign entry"))?;
                if map
                    .next_entry::<NaiveDate, Option<CampaignSchedule>>()?
                    .is_some()
                {
                    return Err(serde::de::Error::custom(
                        "campaign entry must contain exactly one date key",
                    ));
                }
                Ok(Campaign { start, schedule })
            }
        }

        deserializer.deserialize_map(CampaignVisitor)
    }
}

/// The complete agromanagement document handed to the simulation engine as
/// its driving input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgroManagement {
    #[serde(rename = "AgroManagement")]
    pub campaigns: Vec<Campaign>,
}

impl AgroManagement {
    pub fn new(campaigns: Vec<Campaign>) -> Self {
        Self { campaigns }
    }

    pub fn to_yaml(&self) -> crate::error::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(s: &str) -> crate::error::Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}
