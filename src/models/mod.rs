pub(crate) mod backend;
pub(crate) mod requests;
pub(crate) mod responses;

pub(crate) use backend::{
    CompassPoint, Coordinate, CoordsPayload, LocationPayload, LocationTarget, PlaceInfo,
    WeatherInfo, WeatherMetrics,
};
pub(crate) use requests::LocationQuery;
pub(crate) use responses::{AggregatedWeatherRecord, AirQualitySummary};
