use brep_types::ParameterSet;
use kernel_api::{
    ChamferContribution, ElementId, FilletContribution, KernelBundle, ShapeHandle,
};
use tracing::debug;

use crate::bind::{bind, bind_scalar, eligible_edges};
use crate::classify::classify;
use crate::gate::validate;
use crate::types::OpError;

/// Fillet the given edges of a solid, distributing the radii per the
/// parameter-set policy: one radius for all edges, one per edge, or a
/// `(start, end)` pair per edge for a linearly varying radius.
///
/// Degenerate and seam edges are skipped before the radii are counted
/// against the remaining edges. The result replaces nothing here; the caller
/// commits the returned canonical shape.
pub fn execute_fillet(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    edges: &[ElementId],
    radii: &ParameterSet,
) -> Result<ShapeHandle, OpError> {
    let targets = eligible_edges(kb.as_introspect(), shape, edges)?;
    let resolved = bind(targets.len(), radii)?;
    debug!(
        requested = edges.len(),
        eligible = targets.len(),
        "fillet edges bound"
    );

    let contributions: Vec<FilletContribution> = targets
        .iter()
        .zip(resolved)
        .map(|(t, radius)| FilletContribution {
            edge: t.edge,
            face: t.face,
            radius,
        })
        .collect();
    let outcome = kb.build_fillet(shape, &contributions)?;
    let candidate = validate(kb.as_introspect(), outcome)?;
    classify(kb, &candidate)
}

/// Chamfer the given edges of a solid. Distances distribute uniformly or
/// per-edge; chamfers have no varying-width form, so paired parameters are a
/// count mismatch.
pub fn execute_chamfer(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    edges: &[ElementId],
    distances: &ParameterSet,
) -> Result<ShapeHandle, OpError> {
    let targets = eligible_edges(kb.as_introspect(), shape, edges)?;
    let resolved = bind_scalar(targets.len(), distances)?;

    let contributions: Vec<ChamferContribution> = targets
        .iter()
        .zip(resolved)
        .map(|(t, distance)| ChamferContribution {
            edge: t.edge,
            face: t.face,
            distance,
        })
        .collect();
    let outcome = kb.build_chamfer(shape, &contributions)?;
    let candidate = validate(kb.as_introspect(), outcome)?;
    classify(kb, &candidate)
}

/// Hollow a solid into a shell of the given wall offset, removing the listed
/// faces to open the interior.
pub fn execute_shell(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    open_faces: &[ElementId],
    offset: f64,
    tolerance: f64,
) -> Result<ShapeHandle, OpError> {
    let outcome = kb.build_thick_solid(shape, open_faces, offset, tolerance)?;
    let candidate = validate(kb.as_introspect(), outcome)?;
    classify(kb, &candidate)
}

/// Sew standalone faces into a connected shape within the tolerance. A null
/// sewing result is a failure; anything else is classified and returned.
pub fn execute_sew(
    kb: &mut dyn KernelBundle,
    faces: &[ShapeHandle],
    tolerance: f64,
) -> Result<ShapeHandle, OpError> {
    let sewn = kb.sew(faces, tolerance)?.ok_or(OpError::NullResult)?;
    classify(kb, &sewn)
}
