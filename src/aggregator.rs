//! Gateway side of the bus: turns a validated location target into backend
//! requests and merges the replies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::bus::{
    Action, Bus, BusError, ServiceId, GEO_SERVICE, METRICS_SERVICE, WEATHER_SERVICE,
};
use crate::errors::AppError;
use crate::models::{
    AggregatedWeatherRecord, Coordinate, CoordsPayload, LocationPayload, LocationTarget,
    PlaceInfo, WeatherInfo, WeatherMetrics,
};

pub struct Gateway {
    bus: Arc<dyn Bus>,
    timeout: Duration,
}

impl Gateway {
    pub fn new(bus: Arc<dyn Bus>, timeout: Duration) -> Self {
        Self { bus, timeout }
    }

    /// One request/reply exchange bounded by the backend timeout.
    async fn call<P, T>(&self, target: ServiceId, action: Action, payload: &P) -> Result<T, AppError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let data = serde_json::to_value(payload)
            .map_err(BusError::from)
            .map_err(|e| AppError::Backend(format!("{action} on {target} failed: {e}")))?;

        let reply = tokio::time::timeout(self.timeout, self.bus.request(target, action, data))
            .await
            .map_err(|_| {
                AppError::Backend(format!(
                    "{action} on {target} timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| AppError::Backend(format!("{action} on {target} failed: {e}")))?;

        reply
            .into_result()
            .map_err(|failure| AppError::from_backend(action, failure))
    }

    pub async fn city_info(&self, target: &LocationTarget) -> Result<PlaceInfo, AppError> {
        self.call(GEO_SERVICE, Action::GetCityInfo, &LocationPayload::from(target))
            .await
    }

    async fn weather(&self, target: &LocationTarget) -> Result<WeatherInfo, AppError> {
        self.call(WEATHER_SERVICE, Action::GetWeatherInfo, &LocationPayload::from(target))
            .await
    }

    async fn metrics(&self, coords: Coordinate) -> Result<WeatherMetrics, AppError> {
        self.call(METRICS_SERVICE, Action::GetWeatherMetrics, &CoordsPayload { coords })
            .await
    }

    /// Weather, air quality and UV for one place.
    ///
    /// Coordinates fan out to both backends at once and the metrics outcome is
    /// checked before the weather outcome. A place name has to be resolved by
    /// the weather backend first, so its metrics call waits for the coordinate
    /// in that reply.
    pub async fn location_data(
        &self,
        target: &LocationTarget,
    ) -> Result<AggregatedWeatherRecord, AppError> {
        let stopped = |err: AppError| {
            log::warn!("Aggregation for {target} stopped: {err}");
            err
        };

        let (weather, metrics) = match target {
            LocationTarget::Coords(coords) => {
                let (weather, metrics) = tokio::join!(self.weather(target), self.metrics(*coords));
                let metrics = metrics.map_err(stopped)?;
                (weather.map_err(stopped)?, metrics)
            }
            LocationTarget::Place(_) => {
                let weather = self.weather(target).await.map_err(stopped)?;
                let metrics = self.metrics(weather.coords).await.map_err(stopped)?;
                (weather, metrics)
            }
        };

        log::debug!("Merged weather and metrics for {target}");
        Ok(AggregatedWeatherRecord::merge(weather, metrics))
    }
}
