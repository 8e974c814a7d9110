//! Volume fractions of the background and compositional fields.
//!
//! Weights are ordered background first, then the N compositional fields.
//! Compositional values are clamped into [0, 1], fields left out of the mask
//! are zeroed, and the rest is normalized to sum to one. If nothing is left
//! the background takes the full weight.

use crate::math_utils::clamp_unit;

/// Per-field inclusion in averaging, background first (N+1 entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelectionMask {
    selected: Vec<bool>,
}

impl FieldSelectionMask {
    pub fn new(selected: Vec<bool>) -> Self {
        Self { selected }
    }

    /// Every one of `n_with_background` entries selected.
    pub fn all(n_with_background: usize) -> Self {
        Self::new(vec![true; n_with_background])
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.selected
    }
}

/// Background-first weights for N compositional values.
///
/// Each field is clamped into [0, 1] (solver overshoot, NaN as 0). The
/// background fills whatever the clamped fields leave of unity; fields
/// summing past one leave it nothing.
pub fn raw_weights(composition: &[f64]) -> impl Iterator<Item = f64> + Clone + '_ {
    let field_sum: f64 = composition.iter().map(|&c| clamp_unit(c)).sum();
    std::iter::once((1.0 - field_sum).max(0.0))
        .chain(composition.iter().map(|&c| clamp_unit(c)))
}

/// Normalize background-first weights into `out`.
///
/// `raw`, `mask` and `out` must all have N+1 entries.
pub fn volume_fractions_into(raw: &[f64], mask: &FieldSelectionMask, out: &mut [f64]) {
    normalize_into(raw.iter().copied(), mask, out);
}

/// Allocating form of [`volume_fractions_into`].
pub fn volume_fractions(raw: &[f64], mask: &FieldSelectionMask) -> Vec<f64> {
    let mut out = vec![0.0; raw.len()];
    volume_fractions_into(raw, mask, &mut out);
    out
}

/// Volume fractions straight from N compositional values.
pub fn composition_volume_fractions_into(
    composition: &[f64],
    mask: &FieldSelectionMask,
    out: &mut [f64],
) {
    normalize_into(raw_weights(composition), mask, out);
}

fn normalize_into<I>(weights: I, mask: &FieldSelectionMask, out: &mut [f64])
where
    I: Iterator<Item = f64>,
{
    debug_assert_eq!(mask.len(), out.len());

    let mut total = 0.0;
    for ((slot, w), &selected) in out.iter_mut().zip(weights).zip(mask.as_slice()) {
        *slot = if selected { w.max(0.0) } else { 0.0 };
        total += *slot;
    }

    if total > 0.0 {
        for slot in out.iter_mut() {
            *slot /= total;
        }
    } else {
        out.fill(0.0);
        if let Some(background) = out.first_mut() {
            *background = 1.0;
        }
    }
}

/// `Σ fraction_i · values_i` without materializing the fractions.
pub fn weighted_average<I>(weights: I, mask: &FieldSelectionMask, values: &[f64]) -> f64
where
    I: Iterator<Item = f64>,
{
    debug_assert_eq!(mask.len(), values.len());

    let mut total = 0.0;
    let mut weighted = 0.0;
    for ((w, &selected), &value) in weights.zip(mask.as_slice()).zip(values) {
        if selected {
            let w = w.max(0.0);
            total += w;
            weighted += w * value;
        }
    }

    if total > 0.0 {
        weighted / total
    } else {
        values.first().copied().unwrap_or(0.0)
    }
}
