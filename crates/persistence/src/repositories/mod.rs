//! Repository implementations for database operations.

pub mod coordinate;
pub mod device;
pub mod enterprise;
pub mod notification;
pub mod user;

pub use coordinate::{CoordinateHistoryQuery, CoordinateInput, CoordinateRepository};
pub use device::{DevicePatch, DeviceRepository, NewDevice};
pub use enterprise::EnterpriseRepository;
pub use notification::NotificationRepository;
pub use user::{UserPatch, UserRepository};
