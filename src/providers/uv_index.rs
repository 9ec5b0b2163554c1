use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{read_json, ProviderError, UvSource};
use crate::models::Coordinate;

const PROVIDER: &str = "currentuvindex";

#[derive(Debug, Deserialize)]
struct UvNow {
    uvi: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UvIndexResponse {
    now: Option<UvNow>,
}

/// Client for a currentuvindex.com-style endpoint (`?latitude=&longitude=` → `{now: {uvi}}`).
#[derive(Debug, Clone)]
pub struct CurrentUvIndexClient {
    http: Client,
    endpoint: String,
}

impl CurrentUvIndexClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl UvSource for CurrentUvIndexClient {
    async fn current_uvi(&self, coord: Coordinate) -> Result<Option<f64>, ProviderError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("latitude", coord.lat), ("longitude", coord.lon)])
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let parsed: UvIndexResponse = read_json(PROVIDER, response).await?;
        Ok(parsed.now.and_then(|now| now.uvi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reads_current_uvi() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/uvi"))
            .and(query_param("latitude", "-23.55"))
            .and(query_param("longitude", "-46.63"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "latitude": -23.55,
                "longitude": -46.63,
                "now": { "time": "2024-01-15T15:00:00Z", "uvi": 9.4 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CurrentUvIndexClient::new(Client::new(), format!("{}/api/v1/uvi", server.uri()));
        let uvi = client.current_uvi(Coordinate::new(-23.55, -46.63)).await.unwrap();
        assert_eq!(uvi, Some(9.4));
    }

    #[tokio::test]
    async fn missing_reading_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = CurrentUvIndexClient::new(Client::new(), server.uri());
        assert_eq!(client.current_uvi(Coordinate::new(0.0, 0.0)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = CurrentUvIndexClient::new(Client::new(), server.uri());
        let err = client.current_uvi(Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
