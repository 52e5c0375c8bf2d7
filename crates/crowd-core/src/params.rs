//! Named scalar model parameters.
//!
//! The configuration collaborator hands each model a flat set of named
//! numbers (`infectionRate`, `searchRadius`, …).  Models seal them into a
//! typed config with `from_params`, rejecting unknown names and values out of
//! range before the first tick.

use std::collections::BTreeMap;

use crate::{CoreError, CoreResult};

/// A flat, ordered `name → value` parameter set for one model instance.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelParams {
    values: BTreeMap<String, f64>,
}

impl ModelParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail with `UnknownParameter` if any name is not in `known`.
    pub fn ensure_known(&self, model: &'static str, known: &[&str]) -> CoreResult<()> {
        match self.values.keys().find(|k| !known.contains(&k.as_str())) {
            Some(name) => Err(CoreError::UnknownParameter { model, name: name.clone() }),
            None => Ok(()),
        }
    }

    /// A finite value, or `default` when absent.
    pub fn finite_or(&self, name: &'static str, default: f64) -> CoreResult<f64> {
        match self.get(name) {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(invalid(name, v, "must be finite")),
        }
    }

    /// A probability-like rate in `[0, 1]`, or `default` when absent.
    pub fn rate_or(&self, name: &'static str, default: f64) -> CoreResult<f64> {
        let v = self.finite_or(name, default)?;
        if (0.0..=1.0).contains(&v) {
            Ok(v)
        } else {
            Err(invalid(name, v, "must lie in [0, 1]"))
        }
    }

    /// A strictly positive value, or `default` when absent.
    pub fn positive_or(&self, name: &'static str, default: f64) -> CoreResult<f64> {
        let v = self.finite_or(name, default)?;
        if v > 0.0 {
            Ok(v)
        } else {
            Err(invalid(name, v, "must be > 0"))
        }
    }

    /// A non-negative whole number (e.g. a count), or `default` when absent.
    pub fn count_or(&self, name: &'static str, default: u32) -> CoreResult<u32> {
        let v = self.finite_or(name, default as f64)?;
        if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
            Ok(v as u32)
        } else {
            Err(invalid(name, v, "must be a non-negative integer"))
        }
    }
}

fn invalid(name: &str, value: f64, reason: &'static str) -> CoreError {
    CoreError::InvalidParameter { name: name.to_owned(), value, reason }
}
