use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use crate::bus::{ActionHandler, Reply};
use crate::models::LocationPayload;
use crate::providers::WeatherSource;

/// `getWeatherInfo`: current conditions for a place name or coordinate.
pub struct WeatherBackend {
    source: Arc<dyn WeatherSource>,
}

impl WeatherBackend {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ActionHandler for WeatherBackend {
    async fn handle(&self, data: Value) -> Reply {
        let payload: LocationPayload = match decode("getWeatherInfo", data) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        let Some(target) = payload.target() else {
            return Reply::error("Provide either a location or coords");
        };

        match self.source.current(&target).await {
            Ok(Some(weather)) => {
                log::debug!("Weather for {target}: {}", weather.condition);
                Reply::data(&weather)
            }
            Ok(None) => {
                log::warn!("No weather data for {target}");
                Reply::not_found()
            }
            Err(err) => {
                log::error!("Weather lookup for {target} failed: {err}");
                Reply::error(err.to_string())
            }
        }
    }
}
