//! Handlers for the three backend services reachable over the bus.

mod geo;
mod metrics;
mod weather;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bus::Reply;

pub(crate) use geo::GeoBackend;
pub(crate) use metrics::MetricsBackend;
pub(crate) use weather::WeatherBackend;

/// Decodes a request payload, or builds the error reply to send back instead.
fn decode<T: DeserializeOwned>(action: &str, data: Value) -> Result<T, Reply> {
    serde_json::from_value(data).map_err(|err| {
        log::warn!("Rejected {action} request: {err}");
        Reply::error(format!("Invalid {action} payload: {err}"))
    })
}
