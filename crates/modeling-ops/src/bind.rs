use brep_types::{ParameterSet, ResolvedParam};
use kernel_api::{ElementId, KernelIntrospect, ShapeHandle};

use crate::types::OpError;

/// An edge accepted for a feature operation, with the incident face used to
/// orient the kernel's surface construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleEdge {
    pub edge: ElementId,
    pub face: ElementId,
}

/// Filter a list of edges down to those a feature operation may target.
///
/// Degenerate edges, seam edges, and edges that bound no face are skipped
/// entirely: they do not consume a parameter slot and they receive no kernel
/// call. Order of the survivors follows the input order.
pub fn eligible_edges(
    introspect: &dyn KernelIntrospect,
    shape: &ShapeHandle,
    edges: &[ElementId],
) -> Result<Vec<EligibleEdge>, OpError> {
    let mut out = Vec::with_capacity(edges.len());
    for &edge in edges {
        if introspect.is_degenerate(shape, edge)? {
            continue;
        }
        let face = match introspect.edge_faces(shape, edge)?.first() {
            Some(&f) => f,
            None => continue,
        };
        if introspect.is_seam(shape, edge, face)? {
            continue;
        }
        out.push(EligibleEdge { edge, face });
    }
    Ok(out)
}

/// Resolve a parameter set against `count` eligible elements.
///
/// A single value applies uniformly; `count` values are index-aligned; `2 *
/// count` values form per-element `(start, end)` pairs for a linearly varying
/// parameter. Any other length fails before any kernel call is made.
pub fn bind(count: usize, params: &ParameterSet) -> Result<Vec<ResolvedParam>, OpError> {
    let values = params.values();
    if values.len() == 1 {
        return Ok(vec![ResolvedParam::Constant(values[0]); count]);
    }
    if values.len() == count {
        return Ok(values.iter().map(|&v| ResolvedParam::Constant(v)).collect());
    }
    if values.len() == 2 * count {
        return Ok((0..count)
            .map(|i| ResolvedParam::Linear {
                start: values[2 * i],
                end: values[2 * i + 1],
            })
            .collect());
    }
    Err(OpError::ParameterCountMismatch {
        supplied: values.len(),
        eligible: count,
    })
}

/// Resolve a parameter set where pairing is not allowed (chamfer distances):
/// only the uniform and per-element policies are accepted.
pub fn bind_scalar(count: usize, params: &ParameterSet) -> Result<Vec<f64>, OpError> {
    let values = params.values();
    if values.len() == 1 {
        return Ok(vec![values[0]; count]);
    }
    if values.len() == count {
        return Ok(values.to_vec());
    }
    Err(OpError::ParameterCountMismatch {
        supplied: values.len(),
        eligible: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_applies_uniformly() {
        let bound = bind(5, &ParameterSet::uniform(0.25)).unwrap();
        assert_eq!(bound.len(), 5);
        assert!(bound.iter().all(|r| *r == ResolvedParam::Constant(0.25)));
    }

    #[test]
    fn per_element_values_are_index_aligned() {
        let bound = bind(5, &ParameterSet::per_element(vec![1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(bound[2], ResolvedParam::Constant(3.0));
        assert_eq!(bound[4], ResolvedParam::Constant(5.0));
    }

    #[test]
    fn doubled_length_forms_pairs() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let bound = bind(5, &ParameterSet::paired(values)).unwrap();
        assert_eq!(bound.len(), 5);
        assert_eq!(
            bound[0],
            ResolvedParam::Linear {
                start: 0.0,
                end: 1.0
            }
        );
        assert_eq!(
            bound[4],
            ResolvedParam::Linear {
                start: 8.0,
                end: 9.0
            }
        );
    }

    #[test]
    fn other_lengths_are_rejected() {
        let err = bind(5, &ParameterSet::per_element(vec![1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(
            err,
            OpError::ParameterCountMismatch {
                supplied: 3,
                eligible: 5
            }
        ));
    }

    #[test]
    fn scalar_binding_rejects_pairs() {
        let err = bind_scalar(2, &ParameterSet::paired(vec![1.0, 2.0, 3.0, 4.0])).unwrap_err();
        assert!(matches!(err, OpError::ParameterCountMismatch { .. }));
    }

    #[test]
    fn zero_eligible_elements_bind_empty() {
        assert!(bind(0, &ParameterSet::uniform(1.0)).unwrap().is_empty());
    }
}
