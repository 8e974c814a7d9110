//! Utilities for converting between the Celsius scale the melting
//! parameterization is published in and the Kelvin scale the solver carries.

use crate::constants::TO_KELVIN;

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}
