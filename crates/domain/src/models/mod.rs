//! Domain models for FleetTrack.

pub mod coordinate;
pub mod device;
pub mod enterprise;
pub mod notification;
pub mod user;

pub use coordinate::Coordinate;
pub use device::Device;
pub use enterprise::{Enterprise, EnterpriseMember};
pub use notification::Notification;
pub use user::User;
