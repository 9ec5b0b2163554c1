use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

use crate::models::Coordinate;

/// Earth's axial tilt in degrees.
const AXIAL_TILT_DEG: f64 = 23.44;
/// Day of year of the March equinox in the declination approximation.
const EQUINOX_DAY: f64 = 81.0;
const SOLAR_NOON_HOUR: f64 = 12.0;

/// Returns `true` when the sun is below the horizon at `coord` at instant `now`.
///
/// Declination/hour-angle approximation without any timezone lookup. Solar
/// noon sits at `12 - lon/15` and the current hour is the whole UTC hour
/// shifted by `lon/15`, with no wrap at midnight. Polar day and polar night
/// are handled by clamping the hour-angle cosine; any numeric failure reports
/// daytime.
pub fn is_night(coord: Coordinate, now: DateTime<Utc>) -> bool {
    night_at(coord, now).unwrap_or(false)
}

fn night_at(coord: Coordinate, now: DateTime<Utc>) -> Option<bool> {
    let day_of_year = f64::from(now.ordinal());
    let declination =
        AXIAL_TILT_DEG * ((360.0 / 365.0) * (day_of_year - EQUINOX_DAY)).to_radians().sin();

    let cos_hour_angle = -coord.lat.to_radians().tan() * declination.to_radians().tan();
    if cos_hour_angle.is_nan() {
        return None;
    }
    let hour_angle = cos_hour_angle.clamp(-1.0, 1.0).acos();

    let daylight_hours = 2.0 * hour_angle * 24.0 / (2.0 * PI);
    let solar_noon = SOLAR_NOON_HOUR - coord.lon / 15.0;
    let sunrise = solar_noon - daylight_hours / 2.0;
    let sunset = solar_noon + daylight_hours / 2.0;

    let local_hour = f64::from(now.hour()) + coord.lon / 15.0;
    if !local_hour.is_finite() || !sunrise.is_finite() || !sunset.is_finite() {
        return None;
    }

    Some(local_hour < sunrise || local_hour > sunset)
}
