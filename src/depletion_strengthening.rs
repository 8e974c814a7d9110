//! Viscosity increase from melt depletion.
//!
//! Melting strips volatiles from the residue and leaves it stiffer. The
//! depletion field records the largest melt fraction a parcel has seen; the
//! viscosity multiplier is `min(exp(α·F), Δη_max)`, with F clamped into
//! [0, 1]. Models without a depletion field are left unchanged.

use crate::composition::CompositionAccessor;
use crate::constants::{
    DEFAULT_ALPHA_DEPLETION, DEFAULT_DELTA_ETA_DEPLETION_MAX, DEFAULT_DEPLETION_FIELD_NAME,
};
use crate::error::{ConfigError, ConfigResult};
use crate::math_utils::clamp_unit;

#[derive(Debug, Clone, PartialEq)]
pub struct DepletionParameters {
    alpha_depletion: f64,
    delta_eta_depletion_max: f64,
    field_name: String,
}

impl DepletionParameters {
    /// Validated parameters: `alpha_depletion >= 0`, `delta_eta_depletion_max >= 1`.
    pub fn new(alpha_depletion: f64, delta_eta_depletion_max: f64) -> ConfigResult<Self> {
        Self::with_field_name(
            alpha_depletion,
            delta_eta_depletion_max,
            DEFAULT_DEPLETION_FIELD_NAME,
        )
    }

    pub fn with_field_name(
        alpha_depletion: f64,
        delta_eta_depletion_max: f64,
        field_name: impl Into<String>,
    ) -> ConfigResult<Self> {
        if !alpha_depletion.is_finite() {
            return Err(ConfigError::NonFinite {
                key: "alpha_depletion",
            });
        }
        if alpha_depletion < 0.0 {
            return Err(ConfigError::OutOfBounds {
                key: "alpha_depletion",
                value: alpha_depletion,
                requirement: ">= 0",
            });
        }
        // An infinite cap means "no cap" and is allowed.
        if delta_eta_depletion_max.is_nan() || delta_eta_depletion_max < 1.0 {
            return Err(ConfigError::OutOfBounds {
                key: "delta_eta_depletion_max",
                value: delta_eta_depletion_max,
                requirement: ">= 1",
            });
        }
        Ok(Self {
            alpha_depletion,
            delta_eta_depletion_max,
            field_name: field_name.into(),
        })
    }

    pub fn alpha_depletion(&self) -> f64 {
        self.alpha_depletion
    }

    pub fn delta_eta_depletion_max(&self) -> f64 {
        self.delta_eta_depletion_max
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_enabled(&self) -> bool {
        self.alpha_depletion > 0.0 && self.delta_eta_depletion_max > 1.0
    }
}

impl Default for DepletionParameters {
    fn default() -> Self {
        Self {
            alpha_depletion: DEFAULT_ALPHA_DEPLETION,
            delta_eta_depletion_max: DEFAULT_DELTA_ETA_DEPLETION_MAX,
            field_name: DEFAULT_DEPLETION_FIELD_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepletionStrengtheningModel {
    parameters: DepletionParameters,
}

impl DepletionStrengtheningModel {
    pub fn new(parameters: DepletionParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &DepletionParameters {
        &self.parameters
    }

    /// Viscosity multiplier in `[1, delta_eta_depletion_max]`.
    ///
    /// Pressure and temperature are accepted for interface parity with the
    /// other rheology terms and do not enter the result. Returns exactly 1.0
    /// when the depletion field is not configured.
    pub fn compute_strengthening<C>(
        &self,
        _pressure_pa: f64,
        _temperature_k: f64,
        composition: &C,
    ) -> f64
    where
        C: CompositionAccessor + ?Sized,
    {
        match composition.value_for_name(&self.parameters.field_name) {
            Some(depletion) => self.strengthening_for_depletion(depletion),
            None => 1.0,
        }
    }

    /// Multiplier for a raw depletion value; values outside [0, 1] are clamped.
    #[inline]
    pub fn strengthening_for_depletion(&self, depletion: f64) -> f64 {
        let depletion = clamp_unit(depletion);
        (self.parameters.alpha_depletion * depletion)
            .exp()
            .min(self.parameters.delta_eta_depletion_max)
    }
}
