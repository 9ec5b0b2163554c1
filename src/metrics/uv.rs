//! UV exposure: WHO-scale classification behind a day/night gate and a
//! per-coordinate cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::metrics::solar;
use crate::models::Coordinate;
use crate::providers::{ProviderError, UvSource};

/// Freshness window of a cached UV sample.
pub const CACHE_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UvLevel {
    Baixo,
    Moderado,
    Alto,
    #[serde(rename = "Muito Alto")]
    MuitoAlto,
    Extremo,
}

impl UvLevel {
    pub fn from_uvi(uvi: f64) -> Self {
        if uvi < 3.0 {
            Self::Baixo
        } else if uvi < 6.0 {
            Self::Moderado
        } else if uvi < 8.0 {
            Self::Alto
        } else if uvi < 11.0 {
            Self::MuitoAlto
        } else {
            Self::Extremo
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            Self::Baixo => "Nível seguro. É possível ficar ao ar livre sem proteção.",
            Self::Moderado => "Use óculos de sol e protetor solar se for ficar muito tempo ao sol.",
            Self::Alto => "Evite exposição prolongada. Use chapéu, protetor solar e óculos de sol.",
            Self::MuitoAlto => "Reduza o tempo ao sol entre 10h e 16h. Proteção é essencial.",
            Self::Extremo => "Evite sair sem proteção. Fique em locais cobertos sempre que possível.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UvSample {
    pub uvi: f64,
    pub level: UvLevel,
    pub description: String,
}

pub fn classify_uv(uvi: f64) -> UvSample {
    let level = UvLevel::from_uvi(uvi);
    UvSample {
        uvi,
        level,
        description: level.guidance().to_string(),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: UvSample,
    created_at: DateTime<Utc>,
}

/// UV lookups cached per coordinate rounded to two decimals.
///
/// Stale entries are dropped when looked up; nothing sweeps the map, so it
/// grows with the number of distinct rounded coordinates served.
pub struct UvService {
    source: Arc<dyn UvSource>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl UvService {
    pub fn new(source: Arc<dyn UvSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(CACHE_TTL_MINUTES),
        }
    }

    pub async fn lookup(&self, coord: Coordinate) -> Result<UvSample, ProviderError> {
        self.lookup_at(coord, Utc::now()).await
    }

    /// Cache hit, else night short-circuit (UV 0), else one provider call.
    /// Provider failures are returned and leave the cache untouched.
    pub async fn lookup_at(
        &self,
        coord: Coordinate,
        now: DateTime<Utc>,
    ) -> Result<UvSample, ProviderError> {
        let key = coord.cache_key();

        let stale = match self.cache.read().await.get(&key) {
            Some(entry) if now - entry.created_at < self.ttl => {
                log::debug!("UV cache hit for {key}");
                return Ok(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if stale {
            self.cache.write().await.remove(&key);
        }

        let sample = if solar::is_night(coord, now) {
            log::debug!("Night at {key}, skipping UV provider");
            classify_uv(0.0)
        } else {
            let uvi = self.source.current_uvi(coord).await?;
            classify_uv(
                uvi.filter(|v| v.is_finite())
                    .map(|v| v.max(0.0))
                    .unwrap_or(0.0),
            )
        };

        self.cache.write().await.insert(
            key,
            CacheEntry {
                value: sample.clone(),
                created_at: now,
            },
        );

        Ok(sample)
    }

    #[cfg(test)]
    async fn cached_keys(&self) -> usize {
        self.cache.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeUv {
        readings: Mutex<Vec<Result<Option<f64>, StatusCode>>>,
        calls: AtomicUsize,
    }

    impl FakeUv {
        fn new(readings: Vec<Result<Option<f64>, StatusCode>>) -> Arc<Self> {
            Arc::new(Self {
                readings: Mutex::new(readings),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UvSource for FakeUv {
        async fn current_uvi(&self, _coord: Coordinate) -> Result<Option<f64>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.readings.lock().unwrap().remove(0);
            next.map_err(|status| ProviderError::Status {
                provider: "fake",
                status,
                body: String::new(),
            })
        }
    }

    // Equator, 0° longitude: noon UTC is daytime, midnight is night.
    fn equator() -> Coordinate {
        Coordinate::new(0.001, 0.002)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn classification_edges() {
        assert_eq!(classify_uv(0.0).level, UvLevel::Baixo);
        assert_eq!(classify_uv(2.99).level, UvLevel::Baixo);
        assert_eq!(classify_uv(3.0).level, UvLevel::Moderado);
        assert_eq!(classify_uv(5.99).level, UvLevel::Moderado);
        assert_eq!(classify_uv(6.0).level, UvLevel::Alto);
        assert_eq!(classify_uv(7.99).level, UvLevel::Alto);
        assert_eq!(classify_uv(8.0).level, UvLevel::MuitoAlto);
        assert_eq!(classify_uv(10.99).level, UvLevel::MuitoAlto);
        assert_eq!(classify_uv(11.0).level, UvLevel::Extremo);
    }

    #[test]
    fn guidance_text_and_wire_format() {
        let sample = classify_uv(9.0);
        assert_eq!(
            sample.description,
            "Reduza o tempo ao sol entre 10h e 16h. Proteção é essencial."
        );
        assert_eq!(
            serde_json::to_value(&sample).unwrap(),
            serde_json::json!({
                "uvi": 9.0,
                "level": "Muito Alto",
                "description": "Reduza o tempo ao sol entre 10h e 16h. Proteção é essencial."
            })
        );
        assert_eq!(
            classify_uv(0.0).description,
            "Nível seguro. É possível ficar ao ar livre sem proteção."
        );
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_hits_cache() {
        let source = FakeUv::new(vec![Ok(Some(7.2)), Ok(Some(1.0))]);
        let service = UvService::new(source.clone());

        let first = service.lookup_at(equator(), noon()).await.unwrap();
        let second = service
            .lookup_at(Coordinate::new(0.004, 0.0), noon() + Duration::minutes(29))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.level, UvLevel::Alto);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn lookup_after_ttl_refreshes() {
        let source = FakeUv::new(vec![Ok(Some(7.2)), Ok(Some(11.5))]);
        let service = UvService::new(source.clone());

        service.lookup_at(equator(), noon()).await.unwrap();
        let refreshed = service
            .lookup_at(equator(), noon() + Duration::minutes(CACHE_TTL_MINUTES))
            .await
            .unwrap();

        assert_eq!(refreshed.level, UvLevel::Extremo);
        assert_eq!(source.calls(), 2);
        assert_eq!(service.cached_keys().await, 1);
    }

    #[tokio::test]
    async fn night_skips_provider() {
        let source = FakeUv::new(vec![]);
        let service = UvService::new(source.clone());
        let midnight = Utc.with_ymd_and_hms(2024, 3, 21, 0, 0, 0).unwrap();

        let sample = service.lookup_at(equator(), midnight).await.unwrap();

        assert_eq!(sample.uvi, 0.0);
        assert_eq!(sample.level, UvLevel::Baixo);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_not_cached() {
        let source = FakeUv::new(vec![Err(StatusCode::BAD_GATEWAY), Ok(Some(4.0))]);
        let service = UvService::new(source.clone());

        assert!(service.lookup_at(equator(), noon()).await.is_err());
        assert_eq!(service.cached_keys().await, 0);

        let sample = service.lookup_at(equator(), noon()).await.unwrap();
        assert_eq!(sample.level, UvLevel::Moderado);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn missing_or_negative_reading_is_zero() {
        let source = FakeUv::new(vec![Ok(None), Ok(Some(-2.0))]);
        let service = UvService::new(source.clone());

        let sample = service.lookup_at(equator(), noon()).await.unwrap();
        assert_eq!(sample.uvi, 0.0);

        let other = Coordinate::new(0.5, 0.5);
        let sample = service.lookup_at(other, noon()).await.unwrap();
        assert_eq!(sample.uvi, 0.0);
    }
}
