//! Compositional field lookup.
//!
//! The solver hands each point a slice of N compositional values in a fixed
//! order. `CompositionalFields` is the name table for that order, resolved
//! once at configuration time; a `CompositionView` pairs it with one point's
//! values so models can ask for a field by name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionalFields {
    names: Vec<String>,
}

impl CompositionalFields {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of compositional fields, N (the background is not counted).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name_exists(&self, name: &str) -> bool {
        self.index_for_name(name).is_some()
    }

    /// Borrow one point's values under this name table.
    pub fn view<'a>(&'a self, values: &'a [f64]) -> CompositionView<'a> {
        CompositionView::new(self, values)
    }
}

/// Read access to the compositional values at one point.
pub trait CompositionAccessor {
    fn n_fields(&self) -> usize;

    /// Index of the named field, or `None` when the field is not configured.
    fn index_for_name(&self, name: &str) -> Option<usize>;

    fn value(&self, index: usize) -> f64;

    fn values(&self) -> &[f64];

    /// Value of the named field, or `None` when the field is not configured.
    fn value_for_name(&self, name: &str) -> Option<f64> {
        self.index_for_name(name).map(|index| self.value(index))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompositionView<'a> {
    fields: &'a CompositionalFields,
    values: &'a [f64],
}

impl<'a> CompositionView<'a> {
    pub fn new(fields: &'a CompositionalFields, values: &'a [f64]) -> Self {
        debug_assert_eq!(
            fields.len(),
            values.len(),
            "composition has {} values for {} configured fields",
            values.len(),
            fields.len()
        );
        Self { fields, values }
    }
}

impl CompositionAccessor for CompositionView<'_> {
    fn n_fields(&self) -> usize {
        self.values.len()
    }

    fn index_for_name(&self, name: &str) -> Option<usize> {
        self.fields.index_for_name(name)
    }

    fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    fn values(&self) -> &[f64] {
        self.values
    }
}
