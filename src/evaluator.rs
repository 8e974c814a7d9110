//! Per-point material properties for the surrounding solver.
//!
//! A `PropertyEvaluator` is built once from a validated [`ParameterSet`]
//! and then shared read-only between worker threads. Each call is a pure
//! function of its inputs: no allocation, no logging, no failure.

use crate::composition::CompositionalFields;
use crate::config::PropertyConfig;
use crate::depletion_strengthening::DepletionStrengtheningModel;
use crate::error::ConfigResult;
use crate::heating_model::{HeatingModel, HeatingModelRegistry};
use crate::melt_fraction::MeltFractionEngine;
use crate::parameters::ParameterSet;
use crate::phase_boundary::PhaseBoundaryModel;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Local state at one discretization point.
#[derive(Debug, Clone, Copy)]
pub struct PointInput<'a> {
    pub temperature_k: f64,
    pub pressure_pa: f64,
    /// N compositional values in configured field order.
    pub composition: &'a [f64],
    pub position: DVec3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    /// Equilibrium melt fraction in [0, 1].
    pub melt_fraction: f64,
    /// Depletion strengthening, >= 1.
    pub viscosity_multiplier: f64,
    /// W/m³
    pub heat_source_term: f64,
    pub latent_heat_term: f64,
}

#[derive(Debug, Clone)]
pub struct PropertyEvaluator {
    fields: CompositionalFields,
    melt: MeltFractionEngine,
    depletion: DepletionStrengtheningModel,
    heating: HeatingModel,
}

impl PropertyEvaluator {
    pub fn new(params: &ParameterSet, heating: HeatingModel) -> Self {
        let melt = MeltFractionEngine::new(
            PhaseBoundaryModel::new(*params.phase_boundaries()),
            *params.reaction(),
            *params.melt(),
        );
        info!(
            n_fields = params.fields().len(),
            heating_model = heating.name(),
            depletion_field_present = params.fields().name_exists(params.depletion().field_name()),
            "property evaluator ready"
        );
        Self {
            fields: params.fields().clone(),
            melt,
            depletion: DepletionStrengtheningModel::new(params.depletion().clone()),
            heating,
        }
    }

    /// Validate the configuration and build the configured heating model.
    pub fn from_config(
        config: &PropertyConfig,
        registry: &HeatingModelRegistry,
    ) -> ConfigResult<Self> {
        let params = ParameterSet::from_config(config)?;
        let heating = registry.create_configured(&params)?;
        Ok(Self::new(&params, heating))
    }

    pub fn fields(&self) -> &CompositionalFields {
        &self.fields
    }

    pub fn melt_fraction_engine(&self) -> &MeltFractionEngine {
        &self.melt
    }

    pub fn depletion_model(&self) -> &DepletionStrengtheningModel {
        &self.depletion
    }

    pub fn heating_model(&self) -> &HeatingModel {
        &self.heating
    }

    pub fn evaluate_point(&self, input: &PointInput<'_>) -> PointProperties {
        let composition = self.fields.view(input.composition);
        let heating = self.heating.evaluate(input.composition);
        PointProperties {
            melt_fraction: self
                .melt
                .melt_fraction(input.temperature_k, input.pressure_pa, input.composition),
            viscosity_multiplier: self.depletion.compute_strengthening(
                input.pressure_pa,
                input.temperature_k,
                &composition,
            ),
            heat_source_term: heating.heating_source_term,
            latent_heat_term: heating.latent_heat_term,
        }
    }

    /// Evaluate `inputs[i]` into `outputs[i]`.
    pub fn evaluate(&self, inputs: &[PointInput<'_>], outputs: &mut [PointProperties]) {
        assert_eq!(inputs.len(), outputs.len());
        for (out, input) in outputs.iter_mut().zip(inputs) {
            *out = self.evaluate_point(input);
        }
    }
}
