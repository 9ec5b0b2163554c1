use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::aggregator::Gateway;
use crate::errors::AppError;
use crate::models::{AggregatedWeatherRecord, LocationQuery};
use crate::validation::validate_location_query;

#[utoipa::path(
    get,
    path = "/locationData",
    tag = "Location",
    summary = "Weather, air quality and UV for a place",
    description = "Pass either `location` or both `lat` and `lon`.\n\n\
        Coordinates are sent to the weather and metrics backends concurrently. \
        A place name is first resolved by the weather backend and its coordinate \
        is then used for the metrics lookup.",
    params(
        ("location" = Option<String>, Query, description = "Place name", example = "Manaus"),
        ("lat" = Option<f64>, Query, description = "Latitude in decimal degrees", minimum = -90, maximum = 90),
        ("lon" = Option<f64>, Query, description = "Longitude in decimal degrees", minimum = -180, maximum = 180)
    ),
    responses(
        (status = 200, description = "Merged weather record", body = AggregatedWeatherRecord),
        (status = 400, description = "Invalid query"),
        (status = 404, description = "Unknown place or no data"),
        (status = 500, description = "A backend failed or timed out")
    )
)]
pub async fn location_data(
    gateway: web::Data<Gateway>,
    query: web::Query<LocationQuery>,
) -> ActixResult<HttpResponse> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;
    let target = validate_location_query(&query)?;

    let record = gateway.location_data(&target).await?;
    Ok(HttpResponse::Ok().json(record))
}
