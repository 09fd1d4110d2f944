//! HTTP route handlers.

pub mod auth;
pub mod coordinates;
pub mod devices;
pub mod enterprises;
pub mod health;
pub mod notifications;
pub mod users;
