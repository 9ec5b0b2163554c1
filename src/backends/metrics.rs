use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use crate::bus::{ActionHandler, Reply};
use crate::metrics::{calculate_iqar, UvService};
use crate::models::{CoordsPayload, WeatherMetrics};
use crate::providers::AirPollutionSource;
use crate::validation::validate_coordinates;

/// `getWeatherMetrics`: air-quality index and UV reading for a coordinate.
pub struct MetricsBackend {
    air: Arc<dyn AirPollutionSource>,
    uv: Arc<UvService>,
}

impl MetricsBackend {
    pub fn new(air: Arc<dyn AirPollutionSource>, uv: Arc<UvService>) -> Self {
        Self { air, uv }
    }
}

#[async_trait]
impl ActionHandler for MetricsBackend {
    async fn handle(&self, data: Value) -> Reply {
        let CoordsPayload { coords } = match decode("getWeatherMetrics", data) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        if let Err(err) = validate_coordinates(coords.lat, coords.lon) {
            return Reply::error(err.to_string());
        }

        let sample = match self.air.components(coords).await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                log::warn!("No air pollution data for {coords}");
                return Reply::not_found();
            }
            Err(err) => {
                log::error!("Air pollution lookup for {coords} failed: {err}");
                return Reply::error(err.to_string());
            }
        };

        let iq_ar = match calculate_iqar(&sample) {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Cannot compute IQAr for {coords}: {err}");
                return Reply::error(err.to_string());
            }
        };

        let uv_data = match self.uv.lookup(coords).await {
            Ok(sample) => sample,
            Err(err) => {
                log::error!("UV lookup for {coords} failed: {err}");
                return Reply::error(err.to_string());
            }
        };

        Reply::data(&WeatherMetrics {
            description: iq_ar.category.description().to_string(),
            iq_ar,
            uv_data,
        })
    }
}
