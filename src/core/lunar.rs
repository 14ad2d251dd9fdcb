//! Approximate moon sign from lunar phase.
//!
//! The moon's zodiacal position is treated as its phase angle relative to a
//! reference new moon, scaled to 360 degrees, plus a linear half-degree per
//! hour correction. This is not an ephemeris and diverges from the real moon
//! sign; the formula is kept as-is so results match previously stored charts.

use crate::domain::model::{BirthRecord, ZodiacSign};
use crate::utils::error::{ChartError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.53059;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Synodic month in milliseconds.
pub const LUNAR_CYCLE_MS: f64 = SYNODIC_MONTH_DAYS * MS_PER_DAY;

/// Reference new moon: 2000-01-06 18:14 (wall clock, no timezone).
const REFERENCE_NEW_MOON: (i32, u32, u32, u32, u32) = (2000, 1, 6, 18, 14);

/// Degrees added per hour of the birth time.
const HOURLY_DRIFT_DEG: f64 = 0.5;

/// Intermediate values of the moon sign approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarEstimate {
    pub cycles_since_reference: f64,
    /// Fractional part of `cycles_since_reference`, in `[0, 1)`.
    pub phase: f64,
    pub degrees: f64,
    /// `degrees` plus the hourly correction, in `[0, 360)`.
    pub adjusted_degrees: f64,
    /// In `0..=11`.
    pub sign_index: usize,
    pub sign: ZodiacSign,
}

/// Builds the timestamp used by the lunar arithmetic.
///
/// The literal local date and time are used with no UTC or `tzone`
/// adjustment. Switching to UTC-normalized instants only needs a change here.
pub fn wall_clock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, 0))
        .ok_or_else(|| ChartError::FallbackComputation {
            message: format!(
                "cannot build timestamp for {:04}-{:02}-{:02} {:02}:{:02}",
                year, month, day, hour, min
            ),
        })
}

pub fn estimate(year: i32, month: u32, day: u32, hour: u32, min: u32) -> Result<LunarEstimate> {
    let birth = wall_clock_timestamp(year, month, day, hour, min)?;
    let (ry, rm, rd, rh, rmin) = REFERENCE_NEW_MOON;
    let reference = wall_clock_timestamp(ry, rm, rd, rh, rmin)?;

    let elapsed_ms = birth.signed_duration_since(reference).num_milliseconds() as f64;
    let cycles_since_reference = elapsed_ms / LUNAR_CYCLE_MS;
    let phase = cycles_since_reference - cycles_since_reference.floor();

    let degrees = (phase * 360.0).rem_euclid(360.0);
    let hour_adjustment = (hour as f64 + min as f64 / 60.0) * HOURLY_DRIFT_DEG;
    let mut adjusted_degrees = (degrees + hour_adjustment).rem_euclid(360.0);
    // rem_euclid 在極小負數時可能回傳 360.0
    if adjusted_degrees >= 360.0 {
        adjusted_degrees = 0.0;
    }

    let sign_index = ((adjusted_degrees / 30.0).floor() as usize).min(11);
    let sign = ZodiacSign::from_index(sign_index).ok_or_else(|| ChartError::FallbackComputation {
        message: format!("sign index {} out of range", sign_index),
    })?;

    Ok(LunarEstimate {
        cycles_since_reference,
        phase,
        degrees,
        adjusted_degrees,
        sign_index,
        sign,
    })
}

pub fn approximate_moon_sign(record: &BirthRecord) -> Result<ZodiacSign> {
    estimate(
        record.year(),
        record.month(),
        record.day(),
        record.hour(),
        record.min(),
    )
    .map(|e| e.sign)
}
