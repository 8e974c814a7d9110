//! Equilibrium melt fraction of anhydrous peridotite (Katz et al., 2003).
//!
//! Melting starts at the solidus and proceeds as `T'^β` against the
//! lherzolite liquidus until clinopyroxene is used up at `F_cpx = M_cpx / R`.
//! Past that point the remaining harzburgite melts against the true liquidus:
//!
//! ```text
//! T_cpx = F_cpx^(1/β) · (T_lherz − T_s) + T_s
//! F     = F_cpx + (1 − F_cpx) · ((T − T_cpx) / (T_l − T_cpx))^β
//! ```
//!
//! which equals `F_cpx` at `T_cpx` and reaches 1 at the liquidus, so the
//! melt fraction is continuous and non-decreasing in temperature.

use crate::math_utils::{clamp_unit, unit_ratio};
use crate::phase_boundary::PhaseBoundaryModel;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Clinopyroxene reaction coefficient `R = r1 + r2·P`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionCoefficients {
    pub r1: f64,
    /// 1/Pa
    pub r2: f64,
}

impl ReactionCoefficients {
    /// Negative pressures (solver overshoot near the surface) count as zero.
    #[inline]
    pub fn at(&self, pressure_pa: f64) -> f64 {
        self.r1 + self.r2 * pressure_pa.max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeltParameters {
    /// Exponent of the normalized temperature, β > 0.
    pub beta: f64,
    /// Mass fraction of clinopyroxene in the source, in [0, 1].
    pub mass_fraction_cpx: f64,
}

/// Which branch of the parameterization applies at a (T, P) point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeltRegime {
    SubSolidus,
    CpxPresent,
    CpxExhausted,
    SuperLiquidus,
}

/// A parameterization of equilibrium melt fraction.
pub trait MeltFractionModel {
    /// Melt fraction in [0, 1] for temperature in K and pressure in Pa.
    fn melt_fraction(
        &self,
        temperature_k: f64,
        pressure_pa: f64,
        composition: &[f64],
        position: DVec3,
    ) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeltFractionEngine {
    boundaries: PhaseBoundaryModel,
    reaction: ReactionCoefficients,
    melt: MeltParameters,
}

impl MeltFractionEngine {
    pub fn new(
        boundaries: PhaseBoundaryModel,
        reaction: ReactionCoefficients,
        melt: MeltParameters,
    ) -> Self {
        Self {
            boundaries,
            reaction,
            melt,
        }
    }

    pub fn boundaries(&self) -> &PhaseBoundaryModel {
        &self.boundaries
    }

    /// Melt fraction at which clinopyroxene is exhausted, `M_cpx / R(P)`.
    #[inline]
    pub fn cpx_exhaustion_fraction(&self, pressure_pa: f64) -> f64 {
        self.melt.mass_fraction_cpx / self.reaction.at(pressure_pa)
    }

    /// Temperature (K) at which the cpx-present branch reaches `F_cpx`.
    pub fn cpx_exhaustion_temperature(&self, pressure_pa: f64) -> f64 {
        let t_solidus = self.boundaries.solidus_kelvin(pressure_pa);
        let t_lherz = self.boundaries.liquidus_lherzolite_kelvin(pressure_pa);
        self.cpx_exhaustion_fraction(pressure_pa).powf(1.0 / self.melt.beta) * (t_lherz - t_solidus)
            + t_solidus
    }

    /// Melt fraction in [0, 1] for temperature in K and pressure in Pa.
    ///
    /// The composition does not enter the anhydrous parameterization.
    #[inline]
    pub fn melt_fraction(&self, temperature_k: f64, pressure_pa: f64, _composition: &[f64]) -> f64 {
        self.melt_fraction_with_regime(temperature_k, pressure_pa).0
    }

    pub fn regime(&self, temperature_k: f64, pressure_pa: f64) -> MeltRegime {
        self.melt_fraction_with_regime(temperature_k, pressure_pa).1
    }

    pub fn melt_fraction_with_regime(
        &self,
        temperature_k: f64,
        pressure_pa: f64,
    ) -> (f64, MeltRegime) {
        let t_solidus = self.boundaries.solidus_kelvin(pressure_pa);
        if temperature_k <= t_solidus {
            return (0.0, MeltRegime::SubSolidus);
        }
        let t_liquidus = self.boundaries.liquidus_kelvin(pressure_pa);
        if temperature_k >= t_liquidus {
            return (1.0, MeltRegime::SuperLiquidus);
        }

        let beta = self.melt.beta;
        let t_lherz = self.boundaries.liquidus_lherzolite_kelvin(pressure_pa);
        let f_cpx = self.cpx_exhaustion_fraction(pressure_pa);

        let f_lherz = unit_ratio(t_solidus, t_lherz, temperature_k).powf(beta);
        if f_lherz <= f_cpx {
            return (clamp_unit(f_lherz), MeltRegime::CpxPresent);
        }

        let t_cpx = f_cpx.powf(1.0 / beta) * (t_lherz - t_solidus) + t_solidus;
        let f = f_cpx + (1.0 - f_cpx) * unit_ratio(t_cpx, t_liquidus, temperature_k).powf(beta);
        (clamp_unit(f), MeltRegime::CpxExhausted)
    }

    /// Fill `out` with the melt fraction of each (T, P) pair.
    pub fn melt_fractions(&self, temperatures_k: &[f64], pressures_pa: &[f64], out: &mut [f64]) {
        assert_eq!(temperatures_k.len(), pressures_pa.len());
        assert_eq!(temperatures_k.len(), out.len());
        for ((f, &t), &p) in out.iter_mut().zip(temperatures_k).zip(pressures_pa) {
            *f = self.melt_fraction_with_regime(t, p).0;
        }
    }
}

impl MeltFractionModel for MeltFractionEngine {
    fn melt_fraction(
        &self,
        temperature_k: f64,
        pressure_pa: f64,
        composition: &[f64],
        _position: DVec3,
    ) -> f64 {
        MeltFractionEngine::melt_fraction(self, temperature_k, pressure_pa, composition)
    }
}

impl Default for MeltFractionEngine {
    fn default() -> Self {
        use crate::constants::*;
        Self::new(
            PhaseBoundaryModel::default(),
            ReactionCoefficients {
                r1: KATZ_R1,
                r2: KATZ_R2_PER_PA,
            },
            MeltParameters {
                beta: KATZ_BETA,
                mass_fraction_cpx: KATZ_MASS_FRACTION_CPX,
            },
        )
    }
}
