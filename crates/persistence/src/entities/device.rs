//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::device::{ChipCarrier, Device, DeviceModel, VehicleType};
use domain::DomainError;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub name: String,
    pub mac_address: String,
    pub model: String,
    pub chip: String,
    pub plate: String,
    pub vehicle_type: String,
    pub active: bool,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DeviceEntity> for Device {
    type Error = DomainError;

    fn try_from(entity: DeviceEntity) -> Result<Self, Self::Error> {
        Ok(Device {
            id: entity.id,
            name: entity.name,
            mac_address: entity.mac_address,
            model: entity
                .model
                .parse::<DeviceModel>()
                .map_err(|e| DomainError::Internal(format!("Corrupt device row: {}", e)))?,
            chip: entity
                .chip
                .parse::<ChipCarrier>()
                .map_err(|e| DomainError::Internal(format!("Corrupt device row: {}", e)))?,
            plate: entity.plate,
            vehicle_type: entity
                .vehicle_type
                .parse::<VehicleType>()
                .map_err(|e| DomainError::Internal(format!("Corrupt device row: {}", e)))?,
            active: entity.active,
            owner_user_id: entity.owner_user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entity() -> DeviceEntity {
        DeviceEntity {
            id: Uuid::new_v4(),
            name: "Truck 12".to_string(),
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            model: "TTGO_T_CALL".to_string(),
            chip: "VIVO".to_string(),
            plate: "ABC1D23".to_string(),
            vehicle_type: "TRUCK".to_string(),
            active: true,
            owner_user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let entity = test_entity();
        let device: Device = entity.clone().try_into().unwrap();
        assert_eq!(device.id, entity.id);
        assert_eq!(device.model, DeviceModel::TtgoTCall);
        assert_eq!(device.chip, ChipCarrier::Vivo);
        assert_eq!(device.vehicle_type, VehicleType::Truck);
        assert!(device.is_live());
    }

    #[test]
    fn test_corrupt_enum_column_fails() {
        let mut entity = test_entity();
        entity.vehicle_type = "HOVERCRAFT".to_string();
        let result: Result<Device, _> = entity.try_into();
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
