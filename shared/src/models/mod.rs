//! Domain models for nutrient management planning

mod crop;
mod fertilizer;
mod manure;
mod planning;
mod region;

pub use crop::*;
pub use fertilizer::*;
pub use manure::*;
pub use planning::*;
pub use region::*;
pub use soil_test::*;
