//! Third-party data sources behind the backend handlers.
//!
//! Each source is a trait so the handlers and the UV cache can be exercised
//! with in-memory fakes; the HTTP clients only map provider responses onto the
//! shared models.

pub(crate) mod openweather;
pub(crate) mod uv_index;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::metrics::PollutantSample;
use crate::models::{Coordinate, LocationTarget, PlaceInfo, WeatherInfo};

pub(crate) use openweather::{OpenWeatherClient, OpenWeatherSettings};
pub(crate) use uv_index::CurrentUvIndexClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} responded with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Forward and reverse geocoding.
#[async_trait]
pub trait GeoSource: Send + Sync {
    /// `Ok(None)` when the provider knows no such place.
    async fn lookup(&self, target: &LocationTarget) -> Result<Option<PlaceInfo>, ProviderError>;
}

/// Current conditions by place name or coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, target: &LocationTarget) -> Result<Option<WeatherInfo>, ProviderError>;
}

/// Latest pollutant concentrations at a coordinate.
#[async_trait]
pub trait AirPollutionSource: Send + Sync {
    async fn components(&self, coord: Coordinate) -> Result<Option<PollutantSample>, ProviderError>;
}

/// Current UV index at a coordinate.
#[async_trait]
pub trait UvSource: Send + Sync {
    /// `Ok(None)` when the provider answered without a UV reading.
    async fn current_uvi(&self, coord: Coordinate) -> Result<Option<f64>, ProviderError>;
}

/// Reads a successful JSON body, turning any other status into [`ProviderError::Status`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Http { provider, source })?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| ProviderError::Decode { provider, source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
