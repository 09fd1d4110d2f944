//! Coordinate repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CoordinateEntity;

/// Fields persisted when appending a coordinate.
#[derive(Debug, Clone)]
pub struct CoordinateInput {
    pub device_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

/// Parameters for the cursor-paginated history query.
#[derive(Debug, Clone)]
pub struct CoordinateHistoryQuery {
    pub device_id: Uuid,
    /// Composite cursor from the previous page, if any.
    pub cursor: Option<(DateTime<Utc>, i64)>,
    pub limit: i64,
    pub ascending: bool,
}

/// Repository for coordinate-related database operations.
///
/// The coordinates table is append-only; there are no update or delete paths.
#[derive(Clone)]
pub struct CoordinateRepository {
    pool: PgPool,
}

impl CoordinateRepository {
    /// Creates a new CoordinateRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one coordinate row for a device.
    pub async fn insert(&self, input: CoordinateInput) -> Result<CoordinateEntity, sqlx::Error> {
        sqlx::query_as::<_, CoordinateEntity>(
            r#"
            INSERT INTO coordinates (device_id, latitude, longitude, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, device_id, latitude, longitude, recorded_at
            "#,
        )
        .bind(input.device_id)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Coordinate history for a device with keyset pagination.
    ///
    /// Fetches `limit + 1` rows to compute `has_more`; returns at most
    /// `limit` entities. The composite `(recorded_at, id)` key keeps paging
    /// stable across identical timestamps.
    pub async fn history(
        &self,
        query: CoordinateHistoryQuery,
    ) -> Result<(Vec<CoordinateEntity>, bool), sqlx::Error> {
        let sql = if query.ascending {
            r#"
            SELECT id, device_id, latitude, longitude, recorded_at
            FROM coordinates
            WHERE device_id = $1
              AND ($2::timestamptz IS NULL OR (recorded_at, id) > ($2, $3))
            ORDER BY recorded_at ASC, id ASC
            LIMIT $4
            "#
        } else {
            r#"
            SELECT id, device_id, latitude, longitude, recorded_at
            FROM coordinates
            WHERE device_id = $1
              AND ($2::timestamptz IS NULL OR (recorded_at, id) < ($2, $3))
            ORDER BY recorded_at DESC, id DESC
            LIMIT $4
            "#
        };

        let (cursor_ts, cursor_id) = match query.cursor {
            Some((ts, id)) => (Some(ts), id),
            None => (None, 0),
        };

        let mut entities = sqlx::query_as::<_, CoordinateEntity>(sql)
            .bind(query.device_id)
            .bind(cursor_ts)
            .bind(cursor_id)
            .bind(query.limit + 1)
            .fetch_all(&self.pool)
            .await?;

        let has_more = entities.len() as i64 > query.limit;
        entities.truncate(query.limit as usize);
        Ok((entities, has_more))
    }

}
