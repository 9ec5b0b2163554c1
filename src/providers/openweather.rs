use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{read_json, AirPollutionSource, GeoSource, ProviderError, WeatherSource};
use crate::metrics::PollutantSample;
use crate::models::{CompassPoint, Coordinate, LocationTarget, PlaceInfo, WeatherInfo};

const PROVIDER: &str = "openweather";

/// Endpoints and credentials of an OpenWeather-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenWeatherSettings {
    /// Base of `/weather` and `/air_pollution`.
    pub weather_base_url: String,
    /// Base of `/direct` and `/reverse`.
    pub geo_base_url: String,
    pub api_key: String,
    pub geo_api_key: String,
    /// Country code appended to place-name queries (`q=Recife,br`).
    pub country_hint: Option<String>,
}

/// Weather, geocoding and air pollution over the OpenWeather HTTP API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    settings: OpenWeatherSettings,
}

impl OpenWeatherClient {
    pub fn new(http: Client, settings: OpenWeatherSettings) -> Self {
        Self { http, settings }
    }

    fn place_query(&self, name: &str) -> String {
        match self.settings.country_hint.as_deref() {
            Some(hint) if !hint.is_empty() => format!("{name},{hint}"),
            _ => name.to_string(),
        }
    }

    fn target_query(&self, target: &LocationTarget) -> Vec<(&'static str, String)> {
        match target {
            LocationTarget::Place(name) => vec![("q", self.place_query(name))],
            LocationTarget::Coords(coord) => {
                vec![("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
            }
        }
    }

    /// GET returning `Ok(None)` on 404, which the provider uses for unknown places.
    async fn get<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, ProviderError> {
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("OpenWeather returned 404 for {url}");
            return Ok(None);
        }

        read_json(PROVIDER, response).await.map(Some)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwCondition>,
    wind: OwWind,
}

impl From<OwCurrentResponse> for WeatherInfo {
    fn from(raw: OwCurrentResponse) -> Self {
        let condition = raw
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            name: raw.name,
            temperature: raw.main.temp,
            humidity: raw.main.humidity,
            condition,
            wind_speed: raw.wind.speed,
            wind_direction: CompassPoint::from_degrees(raw.wind.deg),
            coords: Coordinate::new(raw.coord.lat, raw.coord.lon),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwPollutionItem {
    components: PollutantSample,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    #[serde(default)]
    list: Vec<OwPollutionItem>,
}

/// Geocoding entry; `local_names` is dropped by not being declared.
#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

impl From<OwPlace> for PlaceInfo {
    fn from(raw: OwPlace) -> Self {
        Self {
            name: raw.name,
            lat: raw.lat,
            lon: raw.lon,
            country: raw.country,
            state: raw.state,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, target: &LocationTarget) -> Result<Option<WeatherInfo>, ProviderError> {
        let mut query = self.target_query(target);
        query.push(("appid", self.settings.api_key.clone()));
        query.push(("units", "metric".to_string()));

        let url = format!("{}/weather", self.settings.weather_base_url);
        let current: Option<OwCurrentResponse> = self.get(url, &query).await?;
        Ok(current.map(WeatherInfo::from))
    }
}

#[async_trait]
impl AirPollutionSource for OpenWeatherClient {
    async fn components(&self, coord: Coordinate) -> Result<Option<PollutantSample>, ProviderError> {
        let query = [
            ("lat", coord.lat.to_string()),
            ("lon", coord.lon.to_string()),
            ("appid", self.settings.api_key.clone()),
        ];

        let url = format!("{}/air_pollution", self.settings.weather_base_url);
        let pollution: Option<OwPollutionResponse> = self.get(url, &query).await?;
        // An empty list is an answer without readings, not an unknown location.
        Ok(pollution.map(|p| {
            p.list
                .into_iter()
                .next()
                .map(|item| item.components)
                .unwrap_or_default()
        }))
    }
}

#[async_trait]
impl GeoSource for OpenWeatherClient {
    async fn lookup(&self, target: &LocationTarget) -> Result<Option<PlaceInfo>, ProviderError> {
        let endpoint = match target {
            LocationTarget::Place(_) => "direct",
            LocationTarget::Coords(_) => "reverse",
        };
        let mut query = self.target_query(target);
        query.push(("limit", "1".to_string()));
        query.push(("appid", self.settings.geo_api_key.clone()));

        let url = format!("{}/{endpoint}", self.settings.geo_base_url);
        let places: Option<Vec<OwPlace>> = self.get(url, &query).await?;
        Ok(places.and_then(|p| p.into_iter().next()).map(PlaceInfo::from))
    }
}
