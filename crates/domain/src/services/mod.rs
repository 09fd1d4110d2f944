//! Domain services for FleetTrack.
//!
//! Services contain business logic that operates on domain models without
//! performing I/O themselves.

pub mod access;
pub mod confirmation;

pub use access::{can_access_device, can_edit_user, has_permission, AccessScope, Permission};
pub use confirmation::{ConfirmationDispatcher, ConfirmationEffect};
