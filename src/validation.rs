use actix_web::error::QueryPayloadError;
use actix_web::HttpRequest;
use validator::ValidationError;

use crate::errors::AppError;
use crate::models::{Coordinate, LocationQuery, LocationTarget};

const MISSING_TARGET: &str = "Invalid parameters. Provide either 'location' or both 'lat' and 'lon'.";

pub fn validate_lat(lat: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::new("latitude"));
    }
    Ok(())
}

pub fn validate_lon(lon: f64) -> Result<(), ValidationError> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::new("longitude"));
    }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::Validation(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

/// Resolves the query to exactly one target: a place name or a full coordinate.
pub fn validate_location_query(query: &LocationQuery) -> Result<LocationTarget, AppError> {
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match (location, query.lat, query.lon) {
        (Some(name), None, None) => Ok(LocationTarget::Place(name.to_string())),
        (None, Some(lat), Some(lon)) => {
            validate_coordinates(lat, lon)?;
            Ok(LocationTarget::Coords(Coordinate::new(lat, lon)))
        }
        (Some(_), _, _) => Err(AppError::Validation(
            "Provide either 'location' or 'lat'/'lon', not both.".to_string(),
        )),
        _ => Err(AppError::Validation(MISSING_TARGET.to_string())),
    }
}

/// Turns unparsable query strings (e.g. `lat=abc`) into a 400 with a JSON body.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid query parameters: {err}")).into()
}
