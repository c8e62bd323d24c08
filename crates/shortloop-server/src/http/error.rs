use crate::http::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortloop_core::ShortenError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    Engine(ShortenError),
}

impl From<ShortenError> for ApiError {
    fn from(value: ShortenError) -> Self {
        Self::Engine(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Engine(err) => {
                let status = match err {
                    ShortenError::AlreadyExists => StatusCode::CONFLICT,
                    ShortenError::NotFound => StatusCode::NOT_FOUND,
                    ShortenError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    ShortenError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorResponse { error, status: "Error" })).into_response()
    }
}
