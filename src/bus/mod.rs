//! Request/reply bus between the gateway and its backend services.
//!
//! Requests are addressed to a service and an action; every reply carries
//! either an `error` string or a `data` payload (possibly `null`).

pub(crate) mod router;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub(crate) use router::{ActionHandler, ActionRouter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(&'static str);

impl ServiceId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

pub const GEO_SERVICE: ServiceId = ServiceId::new("aps-final-geo-service");
pub const WEATHER_SERVICE: ServiceId = ServiceId::new("aps-final-weather-service");
pub const METRICS_SERVICE: ServiceId = ServiceId::new("aps-final-weather-metrics-service");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetCityInfo,
    GetWeatherInfo,
    GetWeatherMetrics,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetCityInfo => "getCityInfo",
            Self::GetWeatherInfo => "getWeatherInfo",
            Self::GetWeatherMetrics => "getWeatherMetrics",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus is not connected")]
    NotConnected,

    #[error("no handler for {action} on {service}")]
    NoHandler { service: ServiceId, action: Action },

    #[error("invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// How a reply failed once decoded.
#[derive(Debug, Error, PartialEq)]
pub enum BackendFailure {
    #[error("{0}")]
    Error(String),

    #[error("no data")]
    NotFound,

    #[error("malformed reply: {0}")]
    Malformed(String),
}

/// Reply content: `{error}` or `{data}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Reply {
    pub fn data<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => Self {
                error: None,
                data: Some(value),
            },
            Err(err) => Self::error(format!("failed to encode reply: {err}")),
        }
    }

    /// `{data: null}`
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: None,
        }
    }

    /// Explicit error first, then missing data, then the typed payload.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, BackendFailure> {
        if let Some(message) = self.error {
            return Err(BackendFailure::Error(message));
        }
        match self.data {
            None | Some(Value::Null) => Err(BackendFailure::NotFound),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| BackendFailure::Malformed(e.to_string()))
            }
        }
    }
}

/// Connection to the bus. Created once at startup and shared by all requests.
#[async_trait]
pub trait Bus: Send + Sync {
    async fn connect(&self) -> Result<(), BusError>;

    async fn close(&self);

    /// Sends one request and waits for its single reply.
    async fn request(
        &self,
        target: ServiceId,
        action: Action,
        data: Value,
    ) -> Result<Reply, BusError>;
}
