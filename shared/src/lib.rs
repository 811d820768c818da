//! Shared types and agronomic models for the AgroSense platform
//!
//! This crate contains the domain models and every pure calculation used by
//! the backend decision engine and the offline (WASM) field toolkit:
//! sensor calibration, soil water balance, irrigation urgency, thermal time
//! and crop suitability.

pub mod agronomy;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use agronomy::*;
pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
