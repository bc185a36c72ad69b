use chrono::{Datelike, NaiveDate};

use crate::error::{CropCalError, Result};
use crate::models::crop::Season;
use crate::models::event::EventSpec;

/// First day of the month containing `date`. This is the campaign key for a
/// crop's calendar window.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by a whole number of years, surfacing the underlying
/// date-construction error when the shifted date does not exist (Feb 29
/// moved to a non-leap year). No silent clamping.
pub fn shift_year(date: NaiveDate, years: i32) -> Result<NaiveDate> {
    let target = date.year() + years;
    date.with_year(target).ok_or_else(|| {
        CropCalError::InvalidDate(format!(
            "{} does not exist in year {}",
            date.format("%m-%d"),
            target
        ))
    })
}

/// How many whole calendar years a crop occupies its window, derived from
/// the maximum cultivation duration. Grassland runs multiple years; arable
/// crops round up to one.
pub fn window_years(max_duration: u32) -> i32 {
    (max_duration.div_ceil(365)).max(1) as i32
}

/// Resolve one event specification to an absolute calendar date.
///
/// An explicit `date` is used verbatim and bypasses all year resolution.
/// Otherwise the year is derived from the crop's season: winter crops sow in
/// autumn and are fertilized after the year boundary, so `(month, day)`
/// resolves to the year after the crop start. Any other crop resolves to the
/// start year, bumped by one when the result would precede the crop start
/// (a window opening in autumn with events timed into the following spring).
pub fn resolve_event_date(
    season: Season,
    crop_start: NaiveDate,
    spec: &EventSpec,
) -> Result<NaiveDate> {
    if let Some(date) = spec.date {
        return Ok(date);
    }

    let (month, day) = match (spec.month, spec.day) {
        (Some(m), Some(d)) => (m, d),
        _ => {
            return Err(CropCalError::Config(
                "timed event needs either an explicit date or a month and a day".into(),
            ))
        }
    };

    let year = if season == Season::Winter {
        crop_start.year() + 1
    } else {
        crop_start.year()
    };

    let resolved = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CropCalError::InvalidDate(format!("{year}-{month:02}-{day:02}")))?;

    if season != Season::Winter && resolved < crop_start {
        return NaiveDate::from_ymd_opt(year + 1, month, day).ok_or_else(|| {
            CropCalError::InvalidDate(format!("{}-{month:02}-{day:02}", year + 1))
        });
    }

    Ok(resolved)
}
