use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use crate::bus::{ActionHandler, Reply};
use crate::models::LocationPayload;
use crate::providers::GeoSource;

/// `getCityInfo`: resolves a place name or coordinate to a [`PlaceInfo`](crate::models::PlaceInfo).
pub struct GeoBackend {
    source: Arc<dyn GeoSource>,
}

impl GeoBackend {
    pub fn new(source: Arc<dyn GeoSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ActionHandler for GeoBackend {
    async fn handle(&self, data: Value) -> Reply {
        let payload: LocationPayload = match decode("getCityInfo", data) {
            Ok(payload) => payload,
            Err(reply) => return reply,
        };
        let Some(target) = payload.target() else {
            return Reply::error("Provide either a location or coords");
        };

        match self.source.lookup(&target).await {
            Ok(Some(place)) => Reply::data(&place),
            Ok(None) => {
                log::warn!("No place found for {target}");
                Reply::not_found()
            }
            Err(err) => {
                log::error!("Geocoding {target} failed: {err}");
                Reply::error(err.to_string())
            }
        }
    }
}
