//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Enum-valued columns are
//! stored as TEXT and parsed into domain enums at this boundary.

pub mod coordinate;
pub mod device;
pub mod enterprise;
pub mod notification;
pub mod user;

pub use coordinate::CoordinateEntity;
pub use device::DeviceEntity;
pub use enterprise::{EnterpriseEntity, EnterpriseMemberEntity};
pub use notification::NotificationEntity;
pub use user::UserEntity;
