pub mod constants;
pub mod temp_utils;
pub mod math_utils;
pub mod error;
pub mod config;
pub mod parameters;
pub mod composition;
pub mod phase_boundary;
pub mod melt_fraction;
pub mod depletion_strengthening;
pub mod composition_averaging;
pub mod heating_model;
pub mod evaluator;

pub use error::{ConfigError, ConfigResult};
pub use evaluator::{PointInput, PointProperties, PropertyEvaluator};
