use serde::{Deserialize, Serialize};

/// A flexibly-shaped list of numeric parameters for a feature operation.
///
/// The distribution policy is inferred from the length when the set is bound
/// against the N eligible target elements: a single value applies uniformly,
/// N values are index-aligned per element, and 2N values form per-element
/// pairs (a linearly varying value, e.g. a variable fillet radius). Any other
/// length is a configuration error reported at bind time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet(Vec<f64>);

impl ParameterSet {
    /// One scalar applied to every element.
    pub fn uniform(value: f64) -> Self {
        Self(vec![value])
    }

    /// One value per element, index-aligned.
    pub fn per_element(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Two values per element, index-aligned as (v[2i], v[2i+1]).
    pub fn paired(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<f64> for ParameterSet {
    fn from(value: f64) -> Self {
        Self::uniform(value)
    }
}

impl From<Vec<f64>> for ParameterSet {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// A parameter value resolved for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResolvedParam {
    /// The same value along the whole element.
    Constant(f64),
    /// A value varying linearly from one end of the element to the other.
    Linear { start: f64, end: f64 },
}
