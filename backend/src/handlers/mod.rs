//! HTTP handlers for the nutrient calculation server

mod crops;
mod fertigation;
mod health;
mod manure;
mod material_remaining;
mod soil_tests;

pub use crops::*;
pub use fertigation::*;
pub use health::*;
pub use manure::*;
pub use material_remaining::*;
pub use soil_tests::*;
