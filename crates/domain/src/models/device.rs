//! Device (microcontroller) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::coordinate::Coordinate;

/// Vendor-specific microcontroller model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceModel {
    TtgoTCall,
    Esp32Sim800l,
    A9g,
}

impl DeviceModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceModel::TtgoTCall => "TTGO_T_CALL",
            DeviceModel::Esp32Sim800l => "ESP32_SIM800L",
            DeviceModel::A9g => "A9G",
        }
    }
}

impl FromStr for DeviceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TTGO_T_CALL" => Ok(DeviceModel::TtgoTCall),
            "ESP32_SIM800L" => Ok(DeviceModel::Esp32Sim800l),
            "A9G" => Ok(DeviceModel::A9g),
            _ => Err(format!("Invalid device model: {}", s)),
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// SIM carrier the device chip is provisioned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChipCarrier {
    Vivo,
    Claro,
    Tim,
    Oi,
}

impl ChipCarrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChipCarrier::Vivo => "VIVO",
            ChipCarrier::Claro => "CLARO",
            ChipCarrier::Tim => "TIM",
            ChipCarrier::Oi => "OI",
        }
    }
}

impl FromStr for ChipCarrier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIVO" => Ok(ChipCarrier::Vivo),
            "CLARO" => Ok(ChipCarrier::Claro),
            "TIM" => Ok(ChipCarrier::Tim),
            "OI" => Ok(ChipCarrier::Oi),
            _ => Err(format!("Invalid chip carrier: {}", s)),
        }
    }
}

impl fmt::Display for ChipCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of vehicle the device is installed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Motorcycle,
    Truck,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Truck => "TRUCK",
        }
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(VehicleType::Car),
            "MOTORCYCLE" => Ok(VehicleType::Motorcycle),
            "TRUCK" => Ok(VehicleType::Truck),
            _ => Err(format!("Invalid vehicle type: {}", s)),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered GPS-reporting microcontroller.
///
/// MAC address and plate are unique among non-deleted devices; a device always
/// has exactly one owning user. Soft deletion is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    /// Canonical uppercase `XX:XX:XX:XX:XX:XX`.
    pub mac_address: String,
    pub model: DeviceModel,
    pub chip: ChipCarrier,
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub active: bool,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Device {
    /// True when the device has not been soft-deleted.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Request payload for device registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_mac_address"))]
    pub mac_address: String,

    pub model: DeviceModel,

    pub chip: ChipCarrier,

    #[validate(custom(function = "shared::validation::validate_plate"))]
    pub plate: String,

    pub vehicle_type: VehicleType,
}

/// Partial update payload for a device. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_mac_address"))]
    pub mac_address: Option<String>,

    pub model: Option<DeviceModel>,

    pub chip: Option<ChipCarrier>,

    #[validate(custom(function = "shared::validation::validate_plate"))]
    pub plate: Option<String>,

    pub vehicle_type: Option<VehicleType>,
}

impl UpdateDeviceRequest {
    /// True when no field is set; such a patch is rejected upstream.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mac_address.is_none()
            && self.model.is_none()
            && self.chip.is_none()
            && self.plate.is_none()
            && self.vehicle_type.is_none()
    }
}

/// A device joined with its most recent coordinates, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceWithCoordinates {
    #[serde(flatten)]
    pub device: Device,
    pub coordinates: Vec<Coordinate>,
}
