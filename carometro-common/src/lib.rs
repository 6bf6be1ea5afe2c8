//! # Carômetro Common Library
//!
//! Shared code for the Carômetro roster/photo-capture service:
//! - Student records and the in-memory roster
//! - CSV roster import
//! - Roster search
//! - Photo file naming and persistence
//! - Roster event types and broadcast bus
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod photo;
pub mod roster;

pub use error::{Error, Result};
pub use roster::{Roster, Student};
