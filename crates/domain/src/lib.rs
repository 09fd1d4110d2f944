//! Domain layer for the FleetTrack backend.
//!
//! This crate contains:
//! - Domain models (Device, Coordinate, User, Enterprise, Notification)
//! - Pure business-logic services (access control, confirmation effects)
//! - The domain error taxonomy

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
