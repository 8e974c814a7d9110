//! Validated, immutable parameters for every model.
//!
//! A `ParameterSet` is built once from a [`PropertyConfig`] and never
//! mutated. All bounds and per-field list lengths are checked here, so
//! evaluation code can assume a consistent configuration.

use crate::composition::CompositionalFields;
use crate::composition_averaging::FieldSelectionMask;
use crate::config::{MaskEntry, PropertyConfig, ScalarOrList, extend_from_one_to_n};
use crate::depletion_strengthening::DepletionParameters;
use crate::error::{ConfigError, ConfigResult};
use crate::melt_fraction::{MeltParameters, ReactionCoefficients};
use crate::phase_boundary::{PhaseBoundaryCoefficients, QuadraticCurve};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct HeatingParameters {
    model_name: String,
    heating_values: Vec<f64>,
    averaging_mask: FieldSelectionMask,
    constant_heating_value: f64,
}

impl HeatingParameters {
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// W/m³, background first (N+1 entries).
    pub fn heating_values(&self) -> &[f64] {
        &self.heating_values
    }

    pub fn averaging_mask(&self) -> &FieldSelectionMask {
        &self.averaging_mask
    }

    /// W/m³
    pub fn constant_heating_value(&self) -> f64 {
        self.constant_heating_value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    phase_boundaries: PhaseBoundaryCoefficients,
    reaction: ReactionCoefficients,
    melt: MeltParameters,
    depletion: DepletionParameters,
    heating: HeatingParameters,
    fields: CompositionalFields,
}

fn finite(key: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { key })
    }
}

fn out_of_bounds(key: &'static str, value: f64, requirement: &'static str) -> ConfigError {
    ConfigError::OutOfBounds {
        key,
        value,
        requirement,
    }
}

impl ParameterSet {
    pub fn from_config(config: &PropertyConfig) -> ConfigResult<Self> {
        let phase_boundaries = PhaseBoundaryCoefficients {
            solidus: QuadraticCurve::new(
                finite("A1", config.a1)?,
                finite("A2", config.a2)?,
                finite("A3", config.a3)?,
            ),
            lherzolite_liquidus: QuadraticCurve::new(
                finite("B1", config.b1)?,
                finite("B2", config.b2)?,
                finite("B3", config.b3)?,
            ),
            liquidus: QuadraticCurve::new(
                finite("C1", config.c1)?,
                finite("C2", config.c2)?,
                finite("C3", config.c3)?,
            ),
        };

        let r1 = finite("r1", config.r1)?;
        let r2 = finite("r2", config.r2)?;
        if r1 <= 0.0 {
            return Err(out_of_bounds("r1", r1, "> 0"));
        }
        if r2 < 0.0 {
            return Err(out_of_bounds("r2", r2, ">= 0"));
        }

        let beta = finite("beta", config.beta)?;
        if beta <= 0.0 {
            return Err(out_of_bounds("beta", beta, "> 0"));
        }
        let m_cpx = finite("M_cpx", config.m_cpx)?;
        if !(0.0..=1.0).contains(&m_cpx) {
            return Err(out_of_bounds("M_cpx", m_cpx, "within [0, 1]"));
        }

        let depletion = DepletionParameters::with_field_name(
            config.alpha_depletion,
            config.delta_eta_depletion_max,
            config.depletion_field_name.clone(),
        )?;

        for (i, name) in config.compositional_field_names.iter().enumerate() {
            if config.compositional_field_names[..i].contains(name) {
                return Err(ConfigError::DuplicateField(name.clone()));
            }
        }
        let fields = CompositionalFields::new(config.compositional_field_names.iter().cloned());
        let n_with_background = config.n_fields_with_background();

        let heating_values = extend_from_one_to_n(
            config.heating_values.clone().into_vec(),
            n_with_background,
            "heating_values",
        )?;
        for &value in &heating_values {
            finite("heating_values", value)?;
            if value < 0.0 {
                return Err(out_of_bounds("heating_values", value, ">= 0"));
            }
        }

        let mask = config
            .averaging_mask
            .clone()
            .into_vec()
            .into_iter()
            .map(|entry| entry.to_bool("averaging_mask"))
            .collect::<ConfigResult<Vec<bool>>>()?;
        let mask = extend_from_one_to_n(mask, n_with_background, "averaging_mask")?;

        let constant_heating_value =
            finite("constant_heating_value", config.constant_heating_value)?;
        if constant_heating_value < 0.0 {
            return Err(out_of_bounds(
                "constant_heating_value",
                constant_heating_value,
                ">= 0",
            ));
        }

        if depletion.is_enabled() && !fields.name_exists(depletion.field_name()) {
            warn!(
                field = depletion.field_name(),
                "depletion strengthening is enabled but no such compositional field is configured; \
                 viscosity will not be strengthened"
            );
        }

        let params = Self {
            phase_boundaries,
            reaction: ReactionCoefficients { r1, r2 },
            melt: MeltParameters {
                beta,
                mass_fraction_cpx: m_cpx,
            },
            depletion,
            heating: HeatingParameters {
                model_name: config.heating_model.clone(),
                heating_values,
                averaging_mask: FieldSelectionMask::new(mask),
                constant_heating_value,
            },
            fields,
        };

        info!(
            n_fields = params.fields.len(),
            beta,
            m_cpx,
            alpha_depletion = params.depletion.alpha_depletion(),
            delta_eta_depletion_max = params.depletion.delta_eta_depletion_max(),
            heating_model = %params.heating.model_name,
            "parameter set configured"
        );
        Ok(params)
    }

    pub fn from_json_str(json_str: &str) -> ConfigResult<Self> {
        Self::from_config(&PropertyConfig::from_json_str(json_str)?)
    }

    pub fn load<P: AsRef<Path>>(file_path: P) -> ConfigResult<Self> {
        Self::from_config(&PropertyConfig::load(file_path)?)
    }

    /// Re-emit as a configuration; per-field lists come out fully expanded.
    pub fn to_config(&self) -> PropertyConfig {
        let pb = &self.phase_boundaries;
        PropertyConfig {
            a1: pb.solidus.x1,
            a2: pb.solidus.x2,
            a3: pb.solidus.x3,
            b1: pb.lherzolite_liquidus.x1,
            b2: pb.lherzolite_liquidus.x2,
            b3: pb.lherzolite_liquidus.x3,
            c1: pb.liquidus.x1,
            c2: pb.liquidus.x2,
            c3: pb.liquidus.x3,
            r1: self.reaction.r1,
            r2: self.reaction.r2,
            beta: self.melt.beta,
            m_cpx: self.melt.mass_fraction_cpx,
            alpha_depletion: self.depletion.alpha_depletion(),
            delta_eta_depletion_max: self.depletion.delta_eta_depletion_max(),
            depletion_field_name: self.depletion.field_name().to_string(),
            compositional_field_names: self.fields.names().to_vec(),
            heating_model: self.heating.model_name.clone(),
            heating_values: ScalarOrList::List(self.heating.heating_values.clone()),
            averaging_mask: ScalarOrList::List(
                self.heating
                    .averaging_mask
                    .as_slice()
                    .iter()
                    .map(|&flag| MaskEntry::Flag(flag))
                    .collect(),
            ),
            constant_heating_value: self.heating.constant_heating_value,
        }
    }

    pub fn phase_boundaries(&self) -> &PhaseBoundaryCoefficients {
        &self.phase_boundaries
    }

    pub fn reaction(&self) -> &ReactionCoefficients {
        &self.reaction
    }

    pub fn melt(&self) -> &MeltParameters {
        &self.melt
    }

    pub fn depletion(&self) -> &DepletionParameters {
        &self.depletion
    }

    pub fn heating(&self) -> &HeatingParameters {
        &self.heating
    }

    pub fn fields(&self) -> &CompositionalFields {
        &self.fields
    }
}
