//! Peridotite phase boundaries as quadratic functions of pressure.
//!
//! Katz et al. (2003) fit the solidus, the lherzolite liquidus and the true
//! liquidus each as `X1 + X2·P + X3·P²` with P in Pa and the result in °C.

use crate::math_utils::quadratic;
use crate::temp_utils::celsius_to_kelvin;
use serde::{Deserialize, Serialize};

/// One `X1 + X2·P + X3·P²` curve in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCurve {
    /// °C
    pub x1: f64,
    /// °C/Pa
    pub x2: f64,
    /// °C/Pa²
    pub x3: f64,
}

impl QuadraticCurve {
    pub const fn new(x1: f64, x2: f64, x3: f64) -> Self {
        Self { x1, x2, x3 }
    }

    #[inline]
    pub fn celsius_at(&self, pressure_pa: f64) -> f64 {
        quadratic(self.x1, self.x2, self.x3, pressure_pa)
    }

    fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.x2.is_finite() && self.x3.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBoundaryCoefficients {
    /// A1..A3
    pub solidus: QuadraticCurve,
    /// B1..B3
    pub lherzolite_liquidus: QuadraticCurve,
    /// C1..C3
    pub liquidus: QuadraticCurve,
}

impl PhaseBoundaryCoefficients {
    pub fn is_finite(&self) -> bool {
        self.solidus.is_finite()
            && self.lherzolite_liquidus.is_finite()
            && self.liquidus.is_finite()
    }
}

/// Solidus, lherzolite liquidus and liquidus at a given pressure.
///
/// Total over every real pressure; no clamping happens here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseBoundaryModel {
    coefficients: PhaseBoundaryCoefficients,
}

impl PhaseBoundaryModel {
    pub fn new(coefficients: PhaseBoundaryCoefficients) -> Self {
        debug_assert!(coefficients.is_finite());
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &PhaseBoundaryCoefficients {
        &self.coefficients
    }

    /// Solidus in °C
    #[inline]
    pub fn solidus(&self, pressure_pa: f64) -> f64 {
        self.coefficients.solidus.celsius_at(pressure_pa)
    }

    /// Lherzolite liquidus in °C
    #[inline]
    pub fn liquidus_lherzolite(&self, pressure_pa: f64) -> f64 {
        self.coefficients.lherzolite_liquidus.celsius_at(pressure_pa)
    }

    /// Liquidus in °C
    #[inline]
    pub fn liquidus(&self, pressure_pa: f64) -> f64 {
        self.coefficients.liquidus.celsius_at(pressure_pa)
    }

    #[inline]
    pub fn solidus_kelvin(&self, pressure_pa: f64) -> f64 {
        celsius_to_kelvin(self.solidus(pressure_pa))
    }

    #[inline]
    pub fn liquidus_lherzolite_kelvin(&self, pressure_pa: f64) -> f64 {
        celsius_to_kelvin(self.liquidus_lherzolite(pressure_pa))
    }

    #[inline]
    pub fn liquidus_kelvin(&self, pressure_pa: f64) -> f64 {
        celsius_to_kelvin(self.liquidus(pressure_pa))
    }
}

impl Default for PhaseBoundaryModel {
    fn default() -> Self {
        use crate::constants::*;
        Self::new(PhaseBoundaryCoefficients {
            solidus: QuadraticCurve::new(KATZ_A1_C, KATZ_A2_C_PER_PA, KATZ_A3_C_PER_PA2),
            lherzolite_liquidus: QuadraticCurve::new(
                KATZ_B1_C,
                KATZ_B2_C_PER_PA,
                KATZ_B3_C_PER_PA2,
            ),
            liquidus: QuadraticCurve::new(KATZ_C1_C, KATZ_C2_C_PER_PA, KATZ_C3_C_PER_PA2),
        })
    }
}
