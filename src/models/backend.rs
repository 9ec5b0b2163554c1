use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::metrics::{AirQualityResult, UvSample};

/// Geographic point in decimal degrees.
///
/// Two coordinates are equal when they agree to two decimal places, which is
/// also the granularity of the UV cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `"lat,lon"` rounded to two decimals, on the same hundredths as `==`.
    pub fn cache_key(&self) -> String {
        let (lat, lon) = self.hundredths();
        format!("{},{}", two_decimals(lat), two_decimals(lon))
    }

    fn hundredths(&self) -> (i64, i64) {
        (
            (self.lat * 100.0).round() as i64,
            (self.lon * 100.0).round() as i64,
        )
    }
}

fn two_decimals(hundredths: i64) -> String {
    let sign = if hundredths < 0 { "-" } else { "" };
    let abs = hundredths.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.hundredths() == other.hundredths()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// What the caller asked about: a free-text place or an explicit point.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationTarget {
    Place(String),
    Coords(Coordinate),
}

impl std::fmt::Display for LocationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Place(name) => write!(f, "'{name}'"),
            Self::Coords(coord) => write!(f, "{coord}"),
        }
    }
}

/// Request body of `getCityInfo` and `getWeatherInfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinate>,
}

impl LocationPayload {
    /// A place name wins over coordinates when a sender supplies both.
    pub fn target(&self) -> Option<LocationTarget> {
        match (&self.location, self.coords) {
            (Some(name), _) if !name.trim().is_empty() => {
                Some(LocationTarget::Place(name.trim().to_string()))
            }
            (_, Some(coord)) => Some(LocationTarget::Coords(coord)),
            _ => None,
        }
    }
}

impl From<&LocationTarget> for LocationPayload {
    fn from(target: &LocationTarget) -> Self {
        match target {
            LocationTarget::Place(name) => Self {
                location: Some(name.clone()),
                coords: None,
            },
            LocationTarget::Coords(coord) => Self {
                location: None,
                coords: Some(*coord),
            },
        }
    }
}

/// Request body of `getWeatherMetrics`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoordsPayload {
    pub coords: Coordinate,
}

/// `getCityInfo` reply data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PlaceInfo {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Eight-point compass bucket of a wind bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const CLOCKWISE: [CompassPoint; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// 45° sectors centred on each point, so N covers [337.5, 22.5).
    pub fn from_degrees(deg: f64) -> Self {
        if !deg.is_finite() {
            return Self::N;
        }
        let sector = (deg.rem_euclid(360.0) / 45.0).round() as usize % 8;
        Self::CLOCKWISE[sector]
    }
}

/// `getWeatherInfo` reply data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInfo {
    pub name: String,
    pub temperature: f64,
    pub humidity: u8,
    pub condition: String,
    pub wind_speed: f64,
    pub wind_direction: CompassPoint,
    pub coords: Coordinate,
}

/// `getWeatherMetrics` reply data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherMetrics {
    pub iq_ar: AirQualityResult,
    pub description: String,
    pub uv_data: UvSample,
}
