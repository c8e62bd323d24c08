use crate::http::error::{ApiError, Result};
use crate::http::model::{
    HealthResponse, ResolveResponse, ShortenRequest, ShortenResponse,
};
use crate::http::AppState;
use crate::validate::validate_url;
use axum::extract::{Path, State};
use axum::Json;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(request): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>> {
    validate_url(&request.url).map_err(ApiError::InvalidRequest)?;

    let short_url = state.shortener().shorten(&request.url).await?;

    Ok(Json(ShortenResponse {
        short_url,
        status: "OK",
    }))
}

pub async fn resolve_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>> {
    let original_url = state.shortener().resolve(&short_url).await?;

    Ok(Json(ResolveResponse {
        original_url,
        status: "OK",
    }))
}
