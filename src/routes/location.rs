use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::aggregator::Gateway;
use crate::errors::AppError;
use crate::models::{LocationQuery, PlaceInfo};
use crate::validation::validate_location_query;

/// Resolves a place name or coordinate to a named place.
#[utoipa::path(
    get,
    path = "/location",
    tag = "Location",
    params(
        ("location" = Option<String>, Query, description = "Place name, e.g. `Recife`", example = "Recife"),
        ("lat" = Option<f64>, Query, description = "Latitude in decimal degrees", minimum = -90, maximum = 90),
        ("lon" = Option<f64>, Query, description = "Longitude in decimal degrees", minimum = -180, maximum = 180)
    ),
    responses(
        (status = 200, description = "Place found", body = PlaceInfo),
        (status = 400, description = "Neither or both of `location` and `lat`/`lon` given"),
        (status = 404, description = "No such place"),
        (status = 500, description = "Geo backend failed or timed out")
    )
)]
pub async fn location(
    gateway: web::Data<Gateway>,
    query: web::Query<LocationQuery>,
) -> ActixResult<HttpResponse> {
    query
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {e}")))?;
    let target = validate_location_query(&query)?;

    let place = gateway.city_info(&target).await?;
    Ok(HttpResponse::Ok().json(place))
}
