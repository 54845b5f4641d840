//! Business logic services for the nutrient calculation server

pub mod calculation;
pub mod reference;

pub use calculation::CalculationService;
pub use reference::load_reference_tables;
