//! Shared types and calculations for the Nutrient Management Planning tool
//!
//! This crate contains the data model, the immutable reference-table snapshot
//! and the nutrient calculators shared between the backend, the browser (via
//! WASM) and report generation.

pub mod calculations;
pub mod error;
pub mod models;
pub mod reference;
pub mod types;
pub mod validation;

pub use calculations::*;
pub use error::*;
pub use models::*;
pub use reference::*;
pub use types::*;
pub use validation::*;
