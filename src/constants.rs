pub const TO_KELVIN: f64 = 273.15;

/// Compositional field tracking the maximum melt fraction a parcel has experienced.
pub const DEFAULT_DEPLETION_FIELD_NAME: &str = "maximum_melt_fraction";

// Anhydrous peridotite melting, Katz et al. (2003), table 2.
// Temperatures in °C, pressures in Pa.

// Solidus
pub const KATZ_A1_C: f64 = 1085.7;
pub const KATZ_A2_C_PER_PA: f64 = 1.329e-7;
pub const KATZ_A3_C_PER_PA2: f64 = -5.1e-18;

// Lherzolite liquidus
pub const KATZ_B1_C: f64 = 1475.0;
pub const KATZ_B2_C_PER_PA: f64 = 8.0e-8;
pub const KATZ_B3_C_PER_PA2: f64 = -3.2e-18;

// Liquidus
pub const KATZ_C1_C: f64 = 1780.0;
pub const KATZ_C2_C_PER_PA: f64 = 4.50e-8;
pub const KATZ_C3_C_PER_PA2: f64 = -2.0e-18;

// Clinopyroxene reaction coefficient R = r1 + r2 * P
pub const KATZ_R1: f64 = 0.5;
pub const KATZ_R2_PER_PA: f64 = 8e-11;

pub const KATZ_BETA: f64 = 1.5;
pub const KATZ_MASS_FRACTION_CPX: f64 = 0.15;

// Depletion strengthening. Hirth & Kohlstedt (1996) report 100-1000x
// wet/dry viscosity contrasts; the exponent defaults to "off".
pub const DEFAULT_ALPHA_DEPLETION: f64 = 0.0;
pub const DEFAULT_DELTA_ETA_DEPLETION_MAX: f64 = 1.0e3;

pub const COMPOSITIONAL_HEATING: &str = "compositional heating";
pub const CONSTANT_HEATING: &str = "constant heating";
