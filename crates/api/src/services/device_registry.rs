//! Device registry service.
//!
//! All device CRUD flows pass through here: requests are validated at the
//! route boundary, ownership and role checks happen here, and the repository
//! only ever sees canonical values.

use std::collections::HashMap;

use uuid::Uuid;

use domain::models::device::{CreateDeviceRequest, Device, DeviceWithCoordinates, UpdateDeviceRequest};
use domain::models::user::Role;
use domain::models::Coordinate;
use domain::services::access::{self, AccessScope, Permission};
use domain::DomainError;
use persistence::repositories::{DevicePatch, DeviceRepository, EnterpriseRepository, NewDevice};
use shared::validation::canonicalize_mac;

/// Number of recent coordinates attached per device in the fleet listing.
pub const LIST_COORDINATES_PER_DEVICE: i64 = 1;
/// Number of recent coordinates attached in the single-device view.
pub const DETAIL_COORDINATES_PER_DEVICE: i64 = 10;

#[derive(Clone)]
pub struct DeviceRegistry {
    devices: DeviceRepository,
    enterprises: EnterpriseRepository,
}

impl DeviceRegistry {
    pub fn new(devices: DeviceRepository, enterprises: EnterpriseRepository) -> Self {
        Self {
            devices,
            enterprises,
        }
    }

    /// Registers a device owned by the acting user. New devices start active.
    pub async fn create(
        &self,
        owner_user_id: Uuid,
        request: CreateDeviceRequest,
    ) -> Result<Device, DomainError> {
        let new_device = NewDevice {
            name: request.name,
            mac_address: canonicalize_mac(&request.mac_address),
            model: request.model.as_str().to_string(),
            chip: request.chip.as_str().to_string(),
            plate: request.plate,
            vehicle_type: request.vehicle_type.as_str().to_string(),
            owner_user_id,
        };

        // Uniqueness of MAC and plate is decided by the database constraint,
        // not a pre-check, so concurrent registrations cannot both win.
        let entity = self.devices.insert(new_device).await.map_err(|e| {
            let err = DomainError::from(e);
            match err {
                DomainError::Conflict(_) => {
                    DomainError::Conflict("MAC address or plate already registered".into())
                }
                other => other,
            }
        })?;

        crate::middleware::metrics::record_device_registered();
        entity.try_into()
    }

    /// Fetches a device the actor is allowed to see.
    pub async fn get(&self, actor_id: Uuid, role: Role, id: Uuid) -> Result<Device, DomainError> {
        let device = self.find_live(id).await?;
        self.authorize(actor_id, role, &device).await?;
        Ok(device)
    }

    /// Fetches a device together with its most recent coordinates.
    pub async fn get_with_coordinates(
        &self,
        actor_id: Uuid,
        role: Role,
        id: Uuid,
    ) -> Result<DeviceWithCoordinates, DomainError> {
        let device = self.get(actor_id, role, id).await?;

        let coordinates = self
            .devices
            .latest_coordinates(&[device.id], DETAIL_COORDINATES_PER_DEVICE)
            .await
            .map_err(DomainError::from)?
            .into_iter()
            .map(Coordinate::from)
            .collect();

        Ok(DeviceWithCoordinates {
            device,
            coordinates,
        })
    }

    /// Lists devices visible to the actor, each with its latest coordinate.
    ///
    /// Roles with `ViewAllDevices` see the whole fleet; everyone else sees
    /// only devices they own.
    pub async fn list_with_latest(
        &self,
        actor_id: Uuid,
        role: Role,
    ) -> Result<Vec<DeviceWithCoordinates>, DomainError> {
        let owner_filter = if access::has_permission(role, Permission::ViewAllDevices) {
            None
        } else {
            Some(actor_id)
        };

        let entities = self
            .devices
            .list(owner_filter)
            .await
            .map_err(DomainError::from)?;

        let devices: Vec<Device> = entities
            .into_iter()
            .map(Device::try_from)
            .collect::<Result<_, _>>()?;

        if devices.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = devices.iter().map(|d| d.id).collect();
        let mut by_device: HashMap<Uuid, Vec<Coordinate>> = HashMap::new();
        for entity in self
            .devices
            .latest_coordinates(&ids, LIST_COORDINATES_PER_DEVICE)
            .await
            .map_err(DomainError::from)?
        {
            by_device
                .entry(entity.device_id)
                .or_default()
                .push(entity.into());
        }

        Ok(devices
            .into_iter()
            .map(|device| {
                let coordinates = by_device.remove(&device.id).unwrap_or_default();
                DeviceWithCoordinates {
                    device,
                    coordinates,
                }
            })
            .collect())
    }

    /// Applies a partial update after an ownership check.
    pub async fn update(
        &self,
        actor_id: Uuid,
        role: Role,
        id: Uuid,
        request: UpdateDeviceRequest,
    ) -> Result<Device, DomainError> {
        if request.is_empty() {
            return Err(DomainError::Unprocessable(
                "Update request contains no fields".into(),
            ));
        }

        let device = self.find_live(id).await?;
        self.authorize(actor_id, role, &device).await?;

        let patch = DevicePatch {
            name: request.name,
            mac_address: request.mac_address.as_deref().map(canonicalize_mac),
            model: request.model.map(|m| m.as_str().to_string()),
            chip: request.chip.map(|c| c.as_str().to_string()),
            plate: request.plate,
            vehicle_type: request.vehicle_type.map(|v| v.as_str().to_string()),
        };

        let entity = self
            .devices
            .update(id, patch)
            .await
            .map_err(|e| {
                let err = DomainError::from(e);
                match err {
                    DomainError::Conflict(_) => {
                        DomainError::Conflict("MAC address or plate already registered".into())
                    }
                    other => other,
                }
            })?
            .ok_or_else(|| DomainError::NotFound("Device not found".into()))?;

        entity.try_into()
    }

    /// Toggles the active flag.
    pub async fn set_active(
        &self,
        actor_id: Uuid,
        role: Role,
        id: Uuid,
        active: bool,
    ) -> Result<Device, DomainError> {
        let device = self.find_live(id).await?;
        self.authorize(actor_id, role, &device).await?;

        let affected = self
            .devices
            .set_active(id, active)
            .await
            .map_err(DomainError::from)?;
        if affected == 0 {
            return Err(DomainError::NotFound("Device not found".into()));
        }

        self.find_live(id).await
    }

    /// Soft-deletes a device. Historical coordinates remain queryable.
    pub async fn delete(&self, actor_id: Uuid, role: Role, id: Uuid) -> Result<(), DomainError> {
        let device = self.find_live(id).await?;
        self.authorize(actor_id, role, &device).await?;

        let affected = self
            .devices
            .soft_delete(id)
            .await
            .map_err(DomainError::from)?;
        if affected == 0 {
            return Err(DomainError::NotFound("Device not found".into()));
        }
        Ok(())
    }

    async fn find_live(&self, id: Uuid) -> Result<Device, DomainError> {
        self.devices
            .find_by_id(id)
            .await
            .map_err(DomainError::from)?
            .ok_or_else(|| DomainError::NotFound("Device not found".into()))?
            .try_into()
    }

    /// Loads the actor's enterprise-admin scope and checks device access.
    async fn authorize(
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
