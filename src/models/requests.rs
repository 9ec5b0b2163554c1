use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Query string of `/location` and `/locationData`: a place name, or `lat` and `lon`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LocationQuery {
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(custom(function = "crate::validation::validate_lat"))]
    pub lat: Option<f64>,
    #[validate(custom(function = "crate::validation::validate_lon"))]
    pub lon: Option<f64>,
}
