//! Device repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CoordinateEntity, DeviceEntity};

/// Fields persisted when registering a device.
///
/// Enum fields arrive as their canonical string form; `mac_address` must
/// already be canonicalized (uppercase).
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub mac_address: String,
    pub model: String,
    pub chip: String,
    pub plate: String,
    pub vehicle_type: String,
    pub owner_user_id: Uuid,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub mac_address: Option<String>,
    pub model: Option<String>,
    pub chip: Option<String>,
    pub plate: Option<String>,
    pub vehicle_type: Option<String>,
}

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a device. New devices start active.
    ///
    /// Uniqueness of MAC address and plate among live devices is enforced by
    /// partial unique indexes; a violation surfaces as a database error with
    /// code 23505, translated to `Conflict` upstream.
    pub async fn insert(&self, device: NewDevice) -> Result<DeviceEntity, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, DeviceEntity>(
            r#"
            INSERT INTO devices (id, name, mac_address, model, chip, plate, vehicle_type,
                                 active, owner_user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, true, $8, $9, $9)
            RETURNING id, name, mac_address, model, chip, plate, vehicle_type,
                      active, owner_user_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&device.name)
        .bind(&device.mac_address)
        .bind(&device.model)
        .bind(&device.chip)
        .bind(&device.plate)
        .bind(&device.vehicle_type)
        .bind(device.owner_user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a live device by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, name, mac_address, model, chip, plate, vehicle_type,
                   active, owner_user_id, created_at, updated_at, deleted_at
            FROM devices
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a device by id, including soft-deleted rows.
    ///
    /// Coordinate history outlives the device, so history reads must still
    /// resolve a deleted device and its stored owner.
    pub async fn find_by_id_any(&self, id: Uuid) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, name, mac_address, model, chip, plate, vehicle_type,
                   active, owner_user_id, created_at, updated_at, deleted_at
            FROM devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a live device by canonical MAC address (exact match).
    pub async fn find_by_mac_address(
        &self,
        mac_address: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, name, mac_address, model, chip, plate, vehicle_type,
                   active, owner_user_id, created_at, updated_at, deleted_at
            FROM devices
            WHERE mac_address = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(mac_address)
        .fetch_optional(&self.pool)
        .await
    }

    /// List live devices, newest first, optionally filtered by owner.
    pub async fn list(&self, owner_user_id: Option<Uuid>) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, name, mac_address, model, chip, plate, vehicle_type,
                   active, owner_user_id, created_at, updated_at, deleted_at
            FROM devices
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR owner_user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Apply a partial update to a live device.
    ///
    /// Returns the updated row, or `None` when the device is absent or
    /// soft-deleted. Conflicting MAC/plate values hit the same partial unique
    /// indexes as inserts.
    pub async fn update(
        &self,
        id: Uuid,
        patch: DevicePatch,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            UPDATE devices
            SET name = COALESCE($2, name),
                mac_address = COALESCE($3, mac_address),
                model = COALESCE($4, model),
                chip = COALESCE($5, chip),
                plate = COALESCE($6, plate),
                vehicle_type = COALESCE($7, vehicle_type),
                updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, mac_address, model, chip, plate, vehicle_type,
                      active, owner_user_id, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.mac_address)
        .bind(patch.model)
        .bind(patch.chip)
        .bind(patch.plate)
        .bind(patch.vehicle_type)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Toggle the active flag of a live device.
    /// Returns the number of rows affected (0 if device not found).
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET active = $2, updated_at = $3
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Soft-delete a device. Historical coordinates stay attributable.
    /// Returns the number of rows affected (0 if device not found).
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Latest `per_device` coordinates for each given device, newest first.
    pub async fn latest_coordinates(
        &self,
        device_ids: &[Uuid],
        per_device: i64,
    ) -> Result<Vec<CoordinateEntity>, sqlx::Error> {
        sqlx::query_as::<_, CoordinateEntity>(
            r#"
            SELECT id, device_id, latitude, longitude, recorded_at
            FROM (
                SELECT c.id, c.device_id, c.latitude, c.longitude, c.recorded_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY c.device_id
                           ORDER BY c.recorded_at DESC, c.id DESC
                       ) AS rn
                FROM coordinates c
                WHERE c.device_id = ANY($1)
            ) ranked
            WHERE rn <= $2
            ORDER BY device_id, recorded_at DESC, id DESC
            "#,
        )
        .bind(device_ids)
        .bind(per_device)
        .fetch_all(&self.pool)
        .await
    }
}
