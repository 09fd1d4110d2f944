//! Coordinate domain model and ingestion DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One timestamped position reading from a device.
///
/// Coordinates are append-only: never updated or deleted, and queries return
/// them newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub id: i64,
    pub device_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Request payload for coordinate ingestion, reported by the device itself.
///
/// Only the MAC shape is validated here. Latitude/longitude range checks
/// belong to the ingestion service, which rejects out-of-range values as
/// unprocessable rather than malformed.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngestCoordinateRequest {
    #[validate(custom(function = "shared::validation::validate_mac_address"))]
    pub mac_address: String,

    pub latitude: f64,

    pub longitude: f64,
}

/// Acknowledgment returned after a successful ingestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    pub device_id: Uuid,
    /// Absent only under the `orphan` missing-owner policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<Uuid>,
    pub coordinate: Coordinate,
}

/// Response for the device identification lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponse {
    pub device_id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub active: bool,
}

/// Sort order for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

/// Query parameters for coordinate history with cursor-based pagination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCoordinateHistoryQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub order: SortOrder,
}

impl GetCoordinateHistoryQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MIN_LIMIT: i64 = 1;
    pub const MAX_LIMIT: i64 = 100;

    /// Requested limit clamped to the valid range.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(Self::MIN_LIMIT, Self::MAX_LIMIT)
    }
}

/// Pagination metadata in history responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Response for the coordinate history endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateHistoryResponse {
    pub coordinates: Vec<Coordinate>,
    pub pagination: PaginationInfo,
}
