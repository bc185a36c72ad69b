use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CropCalError, Result};
use crate::logic::calculations::{resolve_event_date, shift_year, start_of_month, window_years};
use crate::models::calendar::{
    AgroManagement, Campaign, CampaignSchedule, CropCalendar, CropEndType, CropStartType,
};
use crate::models::event::{EventSignal, EventSpec, TimedEvent, TimedEventTable};

/// Season classification of one cultivation instance, assigned exactly once
/// at construction and carried as a typed field thereafter.
///
/// Classification order matters: `fallow` is a literal match on the crop
/// kind, `grass` a substring match on the crop kind, and `winter` a
/// substring match on the variety name. All matches are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Grass,
    Fallow,
}

impl Season {
    pub fn classify(crop_name: &str, variety: Option<&str>) -> Self {
        if crop_name.eq_ignore_ascii_case("fallow") {
            return Season::Fallow;
        }
        if crop_name.to_lowercase().contains("grass") {
            return Season::Grass;
        }
        match variety {
            Some(v) if v.to_lowercase().contains("winter") => Season::Winter,
            _ => Season::Spring,
        }
    }
}

/// Declarative configuration for one crop: the recognized keyword arguments
/// of a cultivation instance. Used both for the per-crop default table and
/// for per-call overrides; `merge` combines the two field-wise so no shared
/// mutable default table is ever touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_start_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_start_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_start_type: Option<CropStartType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_end_type: Option<CropEndType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
    /// Start of the calendar window for fallow entries, which have no crop
    /// start date of their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_crop_calendar: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_npk: Option<Vec<EventSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mowing: Option<Vec<EventSpec>>,
}

impl CropSpec {
    /// Overlay `overrides` on `self`: any field set in `overrides` replaces
    /// the default.
    pub fn merge(mut self, overrides: CropSpec) -> CropSpec {
        if overrides.variety.is_some() {
            self.variety = overrides.variety;
        }
        if overrides.crop_start_date.is_some() {
            self.crop_start_date = overrides.crop_start_date;
        }
        if overrides.crop_start_month.is_some() {
            self.crop_start_month = overrides.crop_start_month;
        }
        if overrides.crop_start_day.is_some() {
            self.crop_start_day = overrides.crop_start_day;
        }
        if overrides.crop_start_type.is_some() {
            self.crop_start_type = overrides.crop_start_type;
        }
        if overrides.crop_end_date.is_some() {
            self.crop_end_date = overrides.crop_end_date;
        }
        if overrides.crop_end_type.is_some() {
            self.crop_end_type = overrides.crop_end_type;
        }
        if overrides.max_duration.is_some() {
            self.max_duration = overrides.max_duration;
        }
        if overrides.start_crop_calendar.is_some() {
            self.start_crop_calendar = overrides.start_crop_calendar;
        }
        if overrides.apply_npk.is_some() {
            self.apply_npk = overrides.apply_npk;
        }
        if overrides.mowing.is_some() {
            self.mowing = overrides.mowing;
        }
        self
    }
}

/// One cultivation instance: a crop kind grown in a given calendar year,
/// with its derived calendar segment.
///
/// For winter crops `year` is the year of establishment; harvest spills into
/// the following year. The calendar window opens on the first day of the
/// start month and closes one window-length later (whole years, so grassland
/// can span several). Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    crop_name: String,
    variety: Option<String>,
    year: i32,
    season: Season,
    crop_start_date: Option<NaiveDate>,
    start_calendar: NaiveDate,
    end_calendar: NaiveDate,
    segment: Vec<Campaign>,
}

impl Crop {
    pub fn new(year: i32, crop_name: &str, spec: CropSpec) -> Result<Self> {
        let season = Season::classify(crop_name, spec.variety.as_deref());

        if season == Season::Fallow {
            return Self::new_fallow(year, crop_name, &spec);
        }

        let variety = spec.variety.clone().ok_or_else(|| {
            CropCalError::Config(format!(
                "missing required argument 'variety' for crop '{crop_name}'"
            ))
        })?;

        let crop_start_date = match (spec.crop_start_date, spec.crop_start_month, spec.crop_start_day)
        {
            (Some(date), _, _) => date,
            (None, Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| {
                    CropCalError::InvalidDate(format!("{year}-{month:02}-{day:02}"))
                })?,
            _ => {
                return Err(CropCalError::Config(format!(
                    "missing required argument 'crop_start_date' (or 'crop_start_month' \
                     and 'crop_start_day') for crop '{crop_name}'"
                )))
            }
        };

        let crop_end_type = spec.crop_end_type.ok_or_else(|| {
            CropCalError::Config(format!(
                "missing required argument 'crop_end_type' for crop '{crop_name}'"
            ))
        })?;
        let max_duration = spec.max_duration.ok_or_else(|| {
            CropCalError::Config(format!(
                "missing required argument 'max_duration' for crop '{crop_name}'"
            ))
        })?;

        let start_calendar = start_of_month(crop_start_date);
        let end_calendar = shift_year(start_calendar, window_years(max_duration))?;

        let mut timed_events = Vec::new();
        if let Some(npk) = &spec.apply_npk {
            timed_events.push(Self::build_table(
                EventSignal::ApplyNpk,
                npk,
                season,
                crop_start_date,
                end_calendar,
            )?);
        }
        if let Some(mowing) = &spec.mowing {
            timed_events.push(Self::build_table(
                EventSignal::Mowing,
                mowing,
                season,
                crop_start_date,
                end_calendar,
            )?);
        }

        let calendar = CropCalendar {
            crop_name: crop_name.to_string(),
            variety_name: variety.clone(),
            crop_start_date,
            crop_start_type: spec.crop_start_type.unwrap_or(CropStartType::Sowing),
            crop_end_date: spec.crop_end_date,
            crop_end_type,
            max_duration,
        };

        let segment = vec![
            Campaign {
                start: start_calendar,
                schedule: Some(CampaignSchedule {
                    crop_calendar: Some(calendar),
                    timed_events: if timed_events.is_empty() {
                        None
                    } else {
                        Some(timed_events)
                    },
                    state_events: None,
                }),
            },
            Campaign::boundary(end_calendar),
        ];

        Ok(Self {
            crop_name: crop_name.to_string(),
            variety: Some(variety),
            year,
            season,
            crop_start_date: Some(crop_start_date),
            start_calendar,
            end_calendar,
            segment,
        })
    }

    /// Fallow entries carry no CropCalendar, TimedEvents or StateEvents:
    /// their segment is the placeholder boundary alone.
    fn new_fallow(year: i32, crop_name: &str, spec: &CropSpec) -> Result<Self> {
        let start_calendar = spec
            .start_crop_calendar
            .or(spec.crop_start_date)
            .ok_or_else(|| {
                CropCalError::Config(format!(
                    "missing required argument 'start_crop_calendar' for crop '{crop_name}'"
                ))
            })?;
        let end_calendar = shift_year(start_calendar, 1)?;

        Ok(Self {
            crop_name: crop_name.to_string(),
            variety: None,
            year,
            season: Season::Fallow,
            crop_start_date: None,
            start_calendar,
            end_calendar,
            segment: vec![Campaign::boundary(start_calendar)],
        })
    }

    fn build_table(
        signal: EventSignal,
        specs: &[EventSpec],
        season: Season,
        crop_start: NaiveDate,
        end_calendar: NaiveDate,
    ) -> Result<TimedEventTable> {
        let mut events = Vec::with_capacity(specs.len());
        for spec in specs {
            let date = resolve_event_date(season, crop_start, spec)?;
            if date < crop_start || date > end_calendar {
                return Err(CropCalError::EventOutOfWindow {
                    date,
                    start: crop_start,
                    end: end_calendar,
                });
            }
            let payload = match signal {
                EventSignal::ApplyNpk => spec.npk_payload(),
                EventSignal::Mowing => spec.mowing_payload(),
            };
            events.push(TimedEvent { date, payload });
        }
        Ok(TimedEventTable::new(signal, events))
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    pub fn variety(&self) -> Option<&str> {
        self.variety.as_deref()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn crop_start_date(&self) -> Option<NaiveDate> {
        self.crop_start_date
    }

    pub fn start_calendar(&self) -> NaiveDate {
        self.start_calendar
    }

    pub fn end_calendar(&self) -> NaiveDate {
        self.end_calendar
    }

    /// The crop's calendar segment: its campaign entry followed by the
    /// terminal boundary (the boundary alone for fallow).
    pub fn campaigns(&self) -> &[Campaign] {
        &self.segment
    }

    /// The segment wrapped as a standalone single-crop agromanagement
    /// document.
    pub fn agromanagement(&self) -> AgroManagement {
        AgroManagement::new(self.segment.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventPayload;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn winter_wheat_spec() -> CropSpec {
        CropSpec {
            variety: Some("Winter_wheat_106".into()),
            crop_start_month: Some(11),
            crop_start_day: Some(5),
            crop_end_type: Some(CropEndType::Maturity),
            max_duration: Some(365),
            apply_npk: Some(vec![EventSpec {
                month: Some(2),
                day: Some(20),
                n_amount: Some(60.0),
                p_amount: Some(3.0),
                k_amount: Some(4.0),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn season_classification_rules() {
        assert_eq!(Season::classify("fallow", None), Season::Fallow);
        assert_eq!(Season::classify("FALLOW", None), Season::Fallow);
        assert_eq!(
            Season::classify("rye_grass", Some("Northern_RyeGrass")),
            Season::Grass
        );
        assert_eq!(
            Season::classify("wheat", Some("Winter_wheat_106")),
            Season::Winter
        );
        assert_eq!(Season::classify("maize", Some("Grain_maize_201")), Season::Spring);
        // A grassy kind wins over a wintry variety: kind is checked first.
        assert_eq!(
            Season::classify("grass", Some("Winter_blend")),
            Season::Grass
        );
        // "fallow" is a literal match on the kind, not a substring one.
        assert_eq!(
            Season::classify("fallow_grass", Some("x")),
            Season::Grass
        );
    }

    #[test]
    fn winter_wheat_segment_matches_expected_window() {
        let crop = Crop::new(2023, "wheat", winter_wheat_spec()).unwrap();
        assert_eq!(crop.season(), Season::Winter);
        // Calendar window opens on the first day of the start month.
        assert_eq!(crop.start_calendar(), date(2023, 11, 1));
        assert_eq!(crop.crop_start_date(), Some(date(2023, 11, 5)));
        assert_eq!(crop.end_calendar(), date(2024, 11, 1));

        let campaigns = crop.campaigns();
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0].start, date(2023, 11, 1));
        assert!(campaigns[1].is_boundary());
        assert!(campaigns[1].start > campaigns[0].start);

        // Fertilization resolves to start_year + 1 under the winter rule.
        let schedule = campaigns[0].schedule.as_ref().unwrap();
        let events = schedule.timed_events.as_ref().unwrap();
        assert_eq!(events[0].events_table[0].date, date(2024, 2, 20));
        assert_eq!(
            events[0].events_table[0].payload,
            EventPayload::Npk {
                n_amount: 60.0,
                p_amount: 3.0,
                k_amount: 4.0,
            }
        );
    }

    #[test]
    fn missing_variety_fails_before_any_calendar_is_built() {
        let mut spec = winter_wheat_spec();
        spec.variety = None;
        let err = Crop::new(2023, "wheat", spec).unwrap_err();
        assert!(matches!(err, CropCalError::Config(_)));
        assert!(err.to_string().contains("variety"));
    }

    #[test]
    fn missing_start_date_information_is_a_config_error() {
        let mut spec = winter_wheat_spec();
        spec.crop_start_date = None;
        spec.crop_start_month = None;
        spec.crop_start_day = None;
        assert!(matches!(
            Crop::new(2023, "wheat", spec),
            Err(CropCalError::Config(_))
        ));
    }

    #[test]
    fn explicit_start_date_overrides_month_and_day() {
        let mut spec = winter_wheat_spec();
        spec.crop_start_date = Some(date(2023, 10, 20));
        let crop = Crop::new(2023, "wheat", spec).unwrap();
        assert_eq!(crop.crop_start_date(), Some(date(2023, 10, 20)));
        assert_eq!(crop.start_calendar(), date(2023, 10, 1));
    }

    #[test]
    fn event_outside_calendar_window_is_rejected() {
        let mut spec = winter_wheat_spec();
        spec.apply_npk = Some(vec![EventSpec {
            date: Some(date(2026, 2, 20)),
            n_amount: Some(60.0),
            ..Default::default()
        }]);
        let err = Crop::new(2023, "wheat", spec).unwrap_err();
        match err {
            CropCalError::EventOutOfWindow { date: d, start, end } => {
                assert_eq!(d, date(2026, 2, 20));
                assert_eq!(start, date(2023, 11, 5));
                assert_eq!(end, date(2024, 11, 1));
            }
            other => panic!("expected EventOutOfWindow, got {other:?}"),
        }
    }

    #[test]
    fn empty_event_list_yields_an_empty_table() {
        let mut spec = winter_wheat_spec();
        spec.apply_npk = Some(vec![]);
        let crop = Crop::new(2023, "wheat", spec).unwrap();
        let schedule = crop.campaigns()[0].schedule.as_ref().unwrap();
        let tables = schedule.timed_events.as_ref().unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].events_table.is_empty());
    }

    #[test]
    fn grassland_window_spans_multiple_years() {
        let spec = CropSpec {
            variety: Some("Northern_RyeGrass".into()),
            crop_start_month: Some(3),
            crop_start_day: Some(1),
            crop_end_type: Some(CropEndType::Maturity),
            max_duration: Some(730),
            mowing: Some(vec![EventSpec {
                month: Some(6),
                day: Some(30),
                biomass_remaining: Some(320.0),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let crop = Crop::new(2024, "rye_grass", spec).unwrap();
        assert_eq!(crop.season(), Season::Grass);
        assert_eq!(crop.start_calendar(), date(2024, 3, 1));
        assert_eq!(crop.end_calendar(), date(2026, 3, 1));
        let schedule = crop.campaigns()[0].schedule.as_ref().unwrap();
        let tables = schedule.timed_events.as_ref().unwrap();
        assert_eq!(tables[0].event_signal, EventSignal::Mowing);
        assert_eq!(tables[0].events_table[0].date, date(2024, 6, 30));
    }

    #[test]
    fn fallow_segment_is_a_lone_placeholder_boundary() {
        let spec = CropSpec {
            start_crop_calendar: Some(date(2024, 9, 1)),
            ..Default::default()
        };
        let crop = Crop::new(2024, "fallow", spec).unwrap();
        assert_eq!(crop.season(), Season::Fallow);
        assert_eq!(crop.variety(), None);
        let campaigns = crop.campaigns();
        assert_eq!(campaigns.len(), 1);
        assert!(campaigns[0].is_boundary());
        assert_eq!(campaigns[0].start, date(2024, 9, 1));
    }

    #[test]
    fn fallow_without_window_start_is_a_config_error() {
        assert!(matches!(
            Crop::new(2024, "fallow", CropSpec::default()),
            Err(CropCalError::Config(_))
        ));
    }

    #[test]
    fn merge_overlays_only_the_fields_that_are_set() {
        let defaults = winter_wheat_spec();
        let merged = defaults.clone().merge(CropSpec {
            variety: Some("Winter_wheat_107".into()),
            max_duration: Some(300),
            ..Default::default()
        });
        assert_eq!(merged.variety.as_deref(), Some("Winter_wheat_107"));
        assert_eq!(merged.max_duration, Some(300));
        assert_eq!(merged.crop_start_month, defaults.crop_start_month);
        assert_eq!(merged.apply_npk, defaults.apply_npk);
    }
}
