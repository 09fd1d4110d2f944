//! Application services orchestrating repositories and domain rules.

pub mod device_registry;
pub mod enterprise;
pub mod ingestion;
pub mod notifications;

#[allow(unused_imports)] // Used in routes
pub use device_registry::DeviceRegistry;
#[allow(unused_imports)] // Used in routes
pub use enterprise::{EnterpriseInvitationEffect, EnterpriseService};
#[allow(unused_imports)] // Used in routes
pub use ingestion::{CoordinateIngestion, MissingOwnerPolicy};
#[allow(unused_imports)] // Used in routes
pub use notifications::NotificationCenter;
