use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::bus::{Action, BackendFailure};

#[derive(Debug, PartialEq)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Backend(String),
}

impl AppError {
    /// Maps a failed backend reply onto the caller-visible outcome.
    pub fn from_backend(action: Action, failure: BackendFailure) -> Self {
        match failure {
            BackendFailure::Error(msg) => Self::Backend(msg),
            BackendFailure::NotFound => Self::NotFound(
                match action {
                    Action::GetCityInfo => "Location not found",
                    Action::GetWeatherInfo => "Weather data not found",
                    Action::GetWeatherMetrics => "Weather metrics not found",
                }
                .to_string(),
            ),
            BackendFailure::Malformed(msg) => {
                Self::Backend(format!("{action} returned an unexpected payload: {msg}"))
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(msg) => HttpResponse::BadRequest().json(ErrorBody {
                code: 400,
                error: msg,
            }),
            Self::NotFound(msg) => HttpResponse::NotFound().json(ErrorBody {
                code: 404,
                error: msg,
            }),
            Self::Backend(msg) => {
                log::error!("Backend error: {msg}");
                HttpResponse::InternalServerError().json(ErrorBody {
                    code: 500,
                    error: msg,
                })
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    error: &'a str,
}
