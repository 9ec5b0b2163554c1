use serde::Serialize;
use utoipa::ToSchema;

use crate::metrics::iqar::{AirQualityCategory, Pollutant};
use crate::metrics::UvSample;
use crate::models::backend::{CompassPoint, Coordinate, WeatherInfo, WeatherMetrics};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AirQualitySummary {
    pub index: u32,
    pub description: String,
    pub main_pollutant: Pollutant,
    pub category: AirQualityCategory,
}

/// Weather, air quality and UV exposure for one place, as returned by `/locationData`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedWeatherRecord {
    pub city: String,
    pub coords: Coordinate,
    pub temperature: f64,
    pub humidity: u8,
    pub condition: String,
    pub wind_speed: f64,
    pub wind_direction: CompassPoint,
    pub air_quality: AirQualitySummary,
    pub uv_data: UvSample,
}

impl AggregatedWeatherRecord {
    pub fn merge(weather: WeatherInfo, metrics: WeatherMetrics) -> Self {
        Self {
            city: weather.name,
            coords: weather.coords,
            temperature: weather.temperature,
            humidity: weather.humidity,
            condition: weather.condition,
            wind_speed: weather.wind_speed,
            wind_direction: weather.wind_direction,
            air_quality: AirQualitySummary {
                index: metrics.iq_ar.index,
                description: metrics.description,
                main_pollutant: metrics.iq_ar.dominant_pollutant,
                category: metrics.iq_ar.category,
            },
            uv_data: metrics.uv_data,
        }
    }
}
