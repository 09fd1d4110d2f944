//! Coordinate endpoint handlers.
//!
//! The ingest and identify endpoints are device-facing: microcontrollers
//! authenticate by MAC address only, so these routes sit outside the bearer
//! token layer and are rate limited per MAC instead.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::coordinate::{
    CoordinateHistoryResponse, GetCoordinateHistoryQuery, IdentifyResponse, IngestAck,
    IngestCoordinateRequest,
};
use shared::validation::canonicalize_mac;

/// POST /api/coordinates - accept one position report from a device.
pub async fn ingest_coordinate(
    State(state): State<AppState>,
    Json(request): Json<IngestCoordinateRequest>,
) -> Result<(StatusCode, Json<IngestAck>), ApiError> {
    request.validate()?;

    // Devices are throttled per MAC; users never hit this limiter.
    if let Some(ref rate_limiter) = state.rate_limiter {
        let mac = canonicalize_mac(&request.mac_address);
        if rate_limiter.check(&mac).is_err() {
            return Err(ApiError::RateLimited);
        }
    }

    let ack = state.ingestion.ingest(request).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

/// GET /api/devices/identify/:mac - resolve a MAC address to its device.
pub async fn identify_device(
    State(state): State<AppState>,
    Path(mac): Path<String>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    shared::validation::validate_mac_address(&mac)
        .map_err(|_| ApiError::Validation("Invalid MAC address format".into()))?;

    let identity = state.ingestion.identify(&mac).await?;
    Ok(Json(identity))
}

/// GET /api/devices/:id/coordinates - cursor-paginated history.
pub async fn coordinate_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<GetCoordinateHistoryQuery>,
) -> Result<Json<CoordinateHistoryResponse>, ApiError> {
    let history = state
        .ingestion
        .history(auth.user_id, auth.role, id, query)
        .await?;
    Ok(Json(history))
}
