//! Coordinate ingestion service.
//!
//! The single write path for positions: devices report by MAC address, the
//! service resolves the device and its owner, and appends the reading. Reads
//! (identify, history) live here too so every coordinate flow shares the same
//! resolution rules.

use uuid::Uuid;

use domain::models::coordinate::{
    CoordinateHistoryResponse, GetCoordinateHistoryQuery, IdentifyResponse, IngestAck,
    IngestCoordinateRequest, PaginationInfo, SortOrder,
};
use domain::models::device::Device;
use domain::models::user::Role;
use domain::models::Coordinate;
use domain::services::access::{self, AccessScope, Permission};
use domain::DomainError;
use persistence::repositories::{
    CoordinateHistoryQuery, CoordinateInput, CoordinateRepository, DeviceRepository,
    EnterpriseRepository, UserRepository,
};
use shared::pagination::{decode_cursor, encode_cursor};
use shared::validation::{canonicalize_mac, validate_latitude, validate_longitude};

use crate::middleware::metrics;

/// What to do with a report whose device owner account no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingOwnerPolicy {
    /// Reject the report with 404, as if the device were unknown.
    Reject,
    /// Store the coordinate anyway; the acknowledgment carries no owner.
    Orphan,
}

impl MissingOwnerPolicy {
    /// Parses the configured policy name. Unknown names are rejected at
    /// config validation time, so this only sees valid input in practice.
    pub fn from_config(value: &str) -> Self {
        match value {
            "orphan" => MissingOwnerPolicy::Orphan,
            _ => MissingOwnerPolicy::Reject,
        }
    }
}

#[derive(Clone)]
pub struct CoordinateIngestion {
    devices: DeviceRepository,
    coordinates: CoordinateRepository,
    users: UserRepository,
    enterprises: EnterpriseRepository,
    missing_owner_policy: MissingOwnerPolicy,
}

impl CoordinateIngestion {
    pub fn new(
        devices: DeviceRepository,
        coordinates: CoordinateRepository,
        users: UserRepository,
        enterprises: EnterpriseRepository,
        missing_owner_policy: MissingOwnerPolicy,
    ) -> Self {
        Self {
            devices,
            coordinates,
            users,
            enterprises,
            missing_owner_policy,
        }
    }

    /// Accepts one position report from a device.
    ///
    /// The MAC address is canonicalized before lookup; unknown and inactive
    /// devices are rejected without storing anything.
    pub async fn ingest(&self, request: IngestCoordinateRequest) -> Result<IngestAck, DomainError> {
        let mac = canonicalize_mac(&request.mac_address);

        let device: Device = match self
            .devices
            .find_by_mac_address(&mac)
            .await
            .map_err(DomainError::from)?
        {
            Some(entity) => entity.try_into()?,
            None => {
                metrics::record_coordinate_rejected("unknown_mac");
                return Err(DomainError::NotFound("Unknown device".into()));
            }
        };

        // Range failures are domain errors (422), not request-shape errors:
        // the payload parsed fine, the values are just not on the globe.
        if validate_latitude(request.latitude).is_err()
            || validate_longitude(request.longitude).is_err()
        {
            metrics::record_coordinate_rejected("out_of_range");
            return Err(DomainError::Unprocessable(
                "Coordinates are outside the valid geographic range".into(),
            ));
        }

        if !device.active {
            metrics::record_coordinate_rejected("inactive_device");
            return Err(DomainError::Unprocessable(
                "Device is deactivated and cannot report coordinates".into(),
            ));
        }

        let owner = self
            .users
            .find_by_id(device.owner_user_id)
            .await
            .map_err(DomainError::from)?;

        let owner_user_id = match owner {
            Some(_) => Some(device.owner_user_id),
            None => match self.missing_owner_policy {
                MissingOwnerPolicy::Reject => {
                    metrics::record_coordinate_rejected("missing_owner");
                    return Err(DomainError::NotFound("Device owner not found".into()));
                }
                MissingOwnerPolicy::Orphan => {
                    tracing::warn!(
                        device_id = %device.id,
                        "Storing coordinate for device with deleted owner"
                    );
                    None
                }
            },
        };

        let entity = self
            .coordinates
            .insert(CoordinateInput {
                device_id: device.id,
                latitude: request.latitude,
                longitude: request.longitude,
            })
            .await
            .map_err(DomainError::from)?;

        metrics::record_coordinate_ingested();

        Ok(IngestAck {
            device_id: device.id,
            owner_user_id,
            coordinate: entity.into(),
        })
    }

    /// Resolves a MAC address to the device identity, for provisioning checks.
    pub async fn identify(&self, mac_address: &str) -> Result<IdentifyResponse, DomainError> {
        let mac = canonicalize_mac(mac_address);

        let device: Device = self
            .devices
            .find_by_mac_address(&mac)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Unknown device".into()))?
            .try_into()?;

        Ok(IdentifyResponse {
            device_id: device.id,
            owner_user_id: device.owner_user_id,
            name: device.name,
            active: device.active,
        })
    }

    /// Cursor-paginated coordinate history for one device.
    ///
    /// The lookup deliberately includes soft-deleted devices: deletion hides
    /// the device from the registry but its stored readings stay readable to
    /// whoever could read them before.
    pub async fn history(
        &self,
        actor_id: Uuid,
        role: Role,
        device_id: Uuid,
        query: GetCoordinateHistoryQuery,
    ) -> Result<CoordinateHistoryResponse, DomainError> {
        let device: Device = self
            .devices
            .find_by_id_any(device_id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Device not found".into()))?
            .try_into()?;

        self.authorize_read(actor_id, role, &device).await?;

        let cursor = match &query.cursor {
            Some(raw) => Some(
                decode_cursor(raw)
                    .map_err(|_| DomainError::Unprocessable("Invalid pagination cursor".into()))?,
            ),
            None => None,
        };

        let limit = query.effective_limit();
        let ascending = query.order == SortOrder::Asc;

        let (entities, has_more) = self
            .coordinates
            .history(CoordinateHistoryQuery {
                device_id,
                cursor,
                limit,
                ascending,
            })
            .await
            .map_err(DomainError::from)?;

        let coordinates: Vec<Coordinate> = entities.into_iter().map(Coordinate::from).collect();

        let next_cursor = if has_more {
            coordinates
                .last()
                .map(|c| encode_cursor(c.recorded_at, c.id))
        } else {
            None
        };

        Ok(CoordinateHistoryResponse {
            coordinates,
            pagination: PaginationInfo {
                next_cursor,
                has_more,
            },
        })
    }

    async fn authorize_read(
        &self,
        actor_id: Uuid,
        role: Role,
        device: &Device,
    ) -> Result<(), DomainError> {
        if actor_id == device.owner_user_id
            || access::has_permission(role, Permission::ManageAnyDevice)
        {
            return Ok(());
        }

        let scope = AccessScope::new(actor_id, role).with_admin_enterprises(
            self.enterprises
                .admin_enterprise_ids(actor_id)
                .await
                .map_err(DomainError::from)?,
        );
        let owner_enterprises = self
            .enterprises
            .enterprise_ids_of(device.owner_user_id)
            .await
            .map_err(DomainError::from)?;

        if access::can_access_device(&scope, device.owner_user_id, &owner_enterprises) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "You do not have access to this device".into(),
            ))
        }
    }
}
