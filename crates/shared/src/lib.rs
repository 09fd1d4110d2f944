//! Shared utilities and common types for the FleetTrack backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Field validation logic (MAC addresses, plates, coordinates)
//! - Password hashing with Argon2id
//! - JWT access-token utilities
//! - Cursor-based pagination helpers

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
