//! Coordinate entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Coordinate;

/// Database row mapping for the coordinates table.
#[derive(Debug, Clone, FromRow)]
pub struct CoordinateEntity {
    pub id: i64,
    pub device_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<CoordinateEntity> for Coordinate {
    fn from(entity: CoordinateEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            latitude: entity.latitude,
            longitude: entity.longitude,
            recorded_at: entity.recorded_at,
        }
    }
}
