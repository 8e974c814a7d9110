//! Configuration mapping for the property evaluator.
//!
//! A flat JSON object, one key per parameter. The long-form option names of
//! the original parameter files are accepted as aliases so existing input
//! decks can be reused. Every key is optional and falls back to the Katz
//! et al. (2003) defaults.

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A per-field option given either as one value for every field or as a full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarOrList<T> {
    Scalar(T),
    List(Vec<T>),
}

impl<T: Clone> ScalarOrList<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ScalarOrList::Scalar(value) => vec![value],
            ScalarOrList::List(values) => values,
        }
    }
}

/// Averaging-mask entries are written either as booleans or as 0/1 integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaskEntry {
    Flag(bool),
    Int(i64),
}

impl MaskEntry {
    pub fn to_bool(self, key: &'static str) -> ConfigResult<bool> {
        match self {
            MaskEntry::Flag(flag) => Ok(flag),
            MaskEntry::Int(0) => Ok(false),
            MaskEntry::Int(1) => Ok(true),
            MaskEntry::Int(value) => Err(ConfigError::InvalidMaskEntry { key, value }),
        }
    }
}

/// Broadcast a single entry to `n` entries, or accept exactly `n`.
///
/// Any other length is rejected rather than truncated or padded.
pub fn extend_from_one_to_n<T: Clone>(
    values: Vec<T>,
    n: usize,
    key: &'static str,
) -> ConfigResult<Vec<T>> {
    if values.len() == n {
        Ok(values)
    } else if values.len() == 1 {
        debug!(key, n, "broadcasting single value to every field");
        Ok(vec![values[0].clone(); n])
    } else {
        Err(ConfigError::LengthMismatch {
            key,
            expected: n,
            actual: values.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyConfig {
    #[serde(rename = "A1")]
    pub a1: f64,
    #[serde(rename = "A2")]
    pub a2: f64,
    #[serde(rename = "A3")]
    pub a3: f64,
    #[serde(rename = "B1")]
    pub b1: f64,
    #[serde(rename = "B2")]
    pub b2: f64,
    #[serde(rename = "B3")]
    pub b3: f64,
    #[serde(rename = "C1")]
    pub c1: f64,
    #[serde(rename = "C2")]
    pub c2: f64,
    #[serde(rename = "C3")]
    pub c3: f64,
    pub r1: f64,
    pub r2: f64,
    pub beta: f64,
    #[serde(rename = "M_cpx", alias = "Mass fraction cpx")]
    pub m_cpx: f64,
    #[serde(alias = "Exponential depletion strengthening factor")]
    pub alpha_depletion: f64,
    #[serde(alias = "Maximum Depletion viscosity change")]
    pub delta_eta_depletion_max: f64,
    pub depletion_field_name: String,
    /// Names of the N compositional fields, in solver order.
    pub compositional_field_names: Vec<String>,
    pub heating_model: String,
    /// W/m³ for the background and each compositional field (N+1).
    #[serde(alias = "Compositional heating values")]
    pub heating_values: ScalarOrList<f64>,
    #[serde(alias = "Use compositional field for heat production averaging")]
    pub averaging_mask: ScalarOrList<MaskEntry>,
    /// W/m³, used by the constant heating model.
    #[serde(alias = "constant heating value")]
    pub constant_heating_value: f64,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            a1: KATZ_A1_C,
            a2: KATZ_A2_C_PER_PA,
            a3: KATZ_A3_C_PER_PA2,
            b1: KATZ_B1_C,
            b2: KATZ_B2_C_PER_PA,
            b3: KATZ_B3_C_PER_PA2,
            c1: KATZ_C1_C,
            c2: KATZ_C2_C_PER_PA,
            c3: KATZ_C3_C_PER_PA2,
            r1: KATZ_R1,
            r2: KATZ_R2_PER_PA,
            beta: KATZ_BETA,
            m_cpx: KATZ_MASS_FRACTION_CPX,
            alpha_depletion: DEFAULT_ALPHA_DEPLETION,
            delta_eta_depletion_max: DEFAULT_DELTA_ETA_DEPLETION_MAX,
            depletion_field_name: DEFAULT_DEPLETION_FIELD_NAME.to_string(),
            compositional_field_names: Vec::new(),
            heating_model: COMPOSITIONAL_HEATING.to_string(),
            heating_values: ScalarOrList::Scalar(0.0),
            averaging_mask: ScalarOrList::Scalar(MaskEntry::Flag(true)),
            constant_heating_value: 0.0,
        }
    }
}

impl PropertyConfig {
    pub fn from_json_str(json_str: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load a configuration file from disk
    pub fn load<P: AsRef<Path>>(file_path: P) -> ConfigResult<Self> {
        let path = file_path.as_ref();
        let json_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json_str)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// N+1: the background plus every compositional field.
    pub fn n_fields_with_background(&self) -> usize {
        self.compositional_field_names.len() + 1
    }
}
