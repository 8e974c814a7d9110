//! Internal heat production.
//!
//! Heating models are a closed set of variants behind one `evaluate` call.
//! They are looked up by name in a [`HeatingModelRegistry`] that is filled
//! once, in a fixed order, during start-up. Latent heat of melting belongs
//! to a separate melting/freezing term, so every model reports a zero
//! latent heat contribution.

use crate::composition_averaging::{FieldSelectionMask, raw_weights, weighted_average};
use crate::constants::{COMPOSITIONAL_HEATING, CONSTANT_HEATING};
use crate::error::{ConfigError, ConfigResult};
use crate::parameters::ParameterSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatingModelOutputs {
    /// W/m³
    pub heating_source_term: f64,
    pub latent_heat_term: f64,
}

/// Inner product of volume fractions with per-field heat production.
///
/// Both slices have N+1 entries, background first.
pub fn heat_source(volume_fractions: &[f64], heating_values: &[f64]) -> f64 {
    debug_assert_eq!(volume_fractions.len(), heating_values.len());
    volume_fractions
        .iter()
        .zip(heating_values)
        .map(|(fraction, value)| fraction * value)
        .sum()
}

/// Heat production as the volume-fraction weighted average of fixed
/// per-field values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionalHeating {
    heating_values: Vec<f64>,
    averaging_mask: FieldSelectionMask,
}

impl CompositionalHeating {
    pub fn new(heating_values: Vec<f64>, averaging_mask: FieldSelectionMask) -> ConfigResult<Self> {
        if heating_values.len() != averaging_mask.len() {
            return Err(ConfigError::LengthMismatch {
                key: "averaging_mask",
                expected: heating_values.len(),
                actual: averaging_mask.len(),
            });
        }
        Ok(Self {
            heating_values,
            averaging_mask,
        })
    }

    pub fn from_parameters(params: &ParameterSet) -> ConfigResult<Self> {
        Self::new(
            params.heating().heating_values().to_vec(),
            params.heating().averaging_mask().clone(),
        )
    }

    pub fn heating_values(&self) -> &[f64] {
        &self.heating_values
    }

    pub fn averaging_mask(&self) -> &FieldSelectionMask {
        &self.averaging_mask
    }

    /// Heat production for N compositional values.
    #[inline]
    pub fn heat_production(&self, composition: &[f64]) -> f64 {
        debug_assert_eq!(composition.len() + 1, self.heating_values.len());
        weighted_average(raw_weights(composition), &self.averaging_mask, &self.heating_values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeatingModel {
    Compositional(CompositionalHeating),
    /// Uniform heat production in W/m³.
    Constant { heating_value: f64 },
}

impl HeatingModel {
    pub fn name(&self) -> &'static str {
        match self {
            HeatingModel::Compositional(_) => COMPOSITIONAL_HEATING,
            HeatingModel::Constant { .. } => CONSTANT_HEATING,
        }
    }

    #[inline]
    pub fn evaluate(&self, composition: &[f64]) -> HeatingModelOutputs {
        let heating_source_term = match self {
            HeatingModel::Compositional(model) => model.heat_production(composition),
            HeatingModel::Constant { heating_value } => *heating_value,
        };
        HeatingModelOutputs {
            heating_source_term,
            latent_heat_term: 0.0,
        }
    }

    /// Evaluate every point's composition into `outputs`.
    pub fn evaluate_all<'a, I>(&self, compositions: I, outputs: &mut [HeatingModelOutputs])
    where
        I: IntoIterator<Item = &'a [f64]>,
        I::IntoIter: ExactSizeIterator,
    {
        let compositions = compositions.into_iter();
        assert_eq!(compositions.len(), outputs.len());
        for (out, composition) in outputs.iter_mut().zip(compositions) {
            *out = self.evaluate(composition);
        }
    }
}

pub type HeatingModelConstructor = fn(&ParameterSet) -> ConfigResult<HeatingModel>;

#[derive(Debug, Clone)]
struct RegistryEntry {
    name: &'static str,
    description: &'static str,
    constructor: HeatingModelConstructor,
}

/// Name → constructor table for heating models.
#[derive(Debug, Clone, Default)]
pub struct HeatingModelRegistry {
    entries: Vec<RegistryEntry>,
}

impl HeatingModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in model, registered in a fixed order.
    pub fn with_builtin_models() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_models();
        registry
    }

    fn register_builtin_models(&mut self) {
        let builtins: [(&'static str, &'static str, HeatingModelConstructor); 2] = [
            (
                COMPOSITIONAL_HEATING,
                "Internal heat production determined from fixed values assigned to the \
                 background and each compositional field, in W/m³.",
                |params| {
                    let model = CompositionalHeating::from_parameters(params)?;
                    Ok(HeatingModel::Compositional(model))
                },
            ),
            (
                CONSTANT_HEATING,
                "Uniform internal heat production, in W/m³.",
                |params| {
                    Ok(HeatingModel::Constant {
                        heating_value: params.heating().constant_heating_value(),
                    })
                },
            ),
        ];
        for (name, description, constructor) in builtins {
            debug!(name, "registering heating model");
            self.entries.push(RegistryEntry {
                name,
                description,
                constructor,
            });
        }
    }

    pub fn register(
        &mut self,
        name: &'static str,
        description: &'static str,
        constructor: HeatingModelConstructor,
    ) -> ConfigResult<()> {
        if self.contains(name) {
            return Err(ConfigError::DuplicateModel(name.to_string()));
        }
        debug!(name, "registering heating model");
        self.entries.push(RegistryEntry {
            name,
            description,
            constructor,
        });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn description(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.description)
    }

    pub fn create(&self, name: &str, params: &ParameterSet) -> ConfigResult<HeatingModel> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))?;
        (entry.constructor)(params)
    }

    /// Build the model named in the parameter set.
    pub fn create_configured(&self, params: &ParameterSet) -> ConfigResult<HeatingModel> {
        self.create(params.heating().model_name(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PropertyConfig, ScalarOrList};
    use approx::assert_abs_diff_eq;

    fn params_with_fields(names: &[&str], heating_values: Vec<f64>) -> ParameterSet {
        let config = PropertyConfig {
            compositional_field_names: names.iter().map(|n| n.to_string()).collect(),
            heating_values: ScalarOrList::List(heating_values),
            constant_heating_value: 3e-8,
            ..PropertyConfig::default()
        };
        ParameterSet::from_config(&config).unwrap()
    }

    #[test]
    fn test_heat_source_inner_product() {
        let h = heat_source(&[0.5, 0.3, 0.2], &[0.0, 1e-6, 2e-6]);
        assert_abs_diff_eq!(h, 7e-7, epsilon = 1e-20);
    }

    #[test]
    fn test_compositional_heating_weights_fields() {
        let model =
            CompositionalHeating::new(vec![0.0, 1e-6, 2e-6], FieldSelectionMask::all(3)).unwrap();
        // background 0.5, fields 0.3 and 0.2
        assert_abs_diff_eq!(model.heat_production(&[0.3, 0.2]), 7e-7, epsilon = 1e-20);
        // pure background
        assert_eq!(model.heat_production(&[0.0, 0.0]), 0.0);
        // negative field values count as absent
        assert_abs_diff_eq!(model.heat_production(&[-0.5, 1.0]), 2e-6, epsilon = 1e-20);
    }

    #[test]
    fn test_overshooting_field_does_not_inflate_heating() {
        let model =
            CompositionalHeating::new(vec![0.0, 0.0, 3e-6], FieldSelectionMask::all(3)).unwrap();
        // 1.5 counts as 1.0, so the second field holds a third of the volume
        assert_abs_diff_eq!(model.heat_production(&[1.5, 0.5]), 1e-6, epsilon = 1e-20);
    }

    #[test]
    fn test_latent_heat_is_always_zero() {
        let model = HeatingModel::Compositional(
            CompositionalHeating::new(vec![1e-6, 1e-6], FieldSelectionMask::all(2)).unwrap(),
        );
        for composition in [[0.0], [0.5], [1.0], [-3.0]] {
            assert_eq!(model.evaluate(&composition).latent_heat_term, 0.0);
        }
        let constant = HeatingModel::Constant { heating_value: 1e-7 };
        assert_eq!(constant.evaluate(&[0.2]).latent_heat_term, 0.0);
        assert_eq!(constant.evaluate(&[0.2]).heating_source_term, 1e-7);
    }

    #[test]
    fn test_mismatched_mask_is_rejected() {
        let result = CompositionalHeating::new(vec![0.0, 1e-6, 2e-6], FieldSelectionMask::all(2));
        assert!(matches!(result, Err(ConfigError::LengthMismatch { .. })));
    }

    #[test]
    fn test_registry_builtin_order() {
        let registry = HeatingModelRegistry::with_builtin_models();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["compositional heating", "constant heating"]);
        assert!(registry.description("constant heating").is_some());
        assert!(registry.description("adiabatic heating").is_none());
    }

    #[test]
    fn test_registry_create() {
        let registry = HeatingModelRegistry::with_builtin_models();
        let params = params_with_fields(&["crust"], vec![0.0, 1e-6]);

        let model = registry.create_configured(&params).unwrap();
        assert_eq!(model.name(), "compositional heating");
        assert_abs_diff_eq!(model.evaluate(&[0.25]).heating_source_term, 2.5e-7, epsilon = 1e-20);

        let model = registry.create("constant heating", &params).unwrap();
        assert_eq!(model, HeatingModel::Constant { heating_value: 3e-8 });

        assert!(matches!(
            registry.create("radioactive decay", &params),
            Err(ConfigError::UnknownModel(name)) if name == "radioactive decay"
        ));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = HeatingModelRegistry::with_builtin_models();
        let result = registry.register("constant heating", "again", |_| {
            Ok(HeatingModel::Constant { heating_value: 0.0 })
        });
        assert!(matches!(result, Err(ConfigError::DuplicateModel(_))));

        registry
            .register("off", "No internal heating.", |_| {
                Ok(HeatingModel::Constant { heating_value: 0.0 })
            })
            .unwrap();
        assert_eq!(registry.names().last(), Some("off"));
    }

    #[test]
    fn test_evaluate_all() {
        let model = HeatingModel::Compositional(
            CompositionalHeating::new(vec![0.0, 4e-7], FieldSelectionMask::all(2)).unwrap(),
        );
        let points: [&[f64]; 3] = [&[0.0], &[0.5], &[1.0]];
        let mut outputs = [HeatingModelOutputs::default(); 3];
        model.evaluate_all(points, &mut outputs);

        assert_eq!(outputs[0].heating_source_term, 0.0);
        assert_abs_diff_eq!(outputs[1].heating_source_term, 2e-7, epsilon = 1e-20);
        assert_abs_diff_eq!(outputs[2].heating_source_term, 4e-7, epsilon = 1e-20);
    }
}
