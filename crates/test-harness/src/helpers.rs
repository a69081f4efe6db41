//! Helper functions: error type and fixture builders over the mock kernel.

use brep_types::PrimitiveSpec;
use kernel_api::{ElementId, KernelIntrospect, MockKernel, ShapeHandle};
use modeling_ops::Solid;

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("operation error: {0}")]
    Op(#[from] modeling_ops::OpError),

    #[error("kernel error: {0}")]
    Kernel(#[from] kernel_api::KernelError),
}

/// Build a box-backed `Solid` entity between the origin and `p2`.
pub fn box_solid(kernel: &mut MockKernel, p2: [f64; 3]) -> Result<Solid, HarnessError> {
    let mut solid = Solid::new();
    solid.create_primitive(kernel, &PrimitiveSpec::Box { p1: [0.0; 3], p2 })?;
    Ok(solid)
}

/// Build a unit box entity.
pub fn unit_box_solid(kernel: &mut MockKernel) -> Result<Solid, HarnessError> {
    box_solid(kernel, [1.0, 1.0, 1.0])
}

/// Build a sphere-backed `Solid` entity.
pub fn sphere_solid(
    kernel: &mut MockKernel,
    center: [f64; 3],
    radius: f64,
) -> Result<Solid, HarnessError> {
    let mut solid = Solid::new();
    solid.create_primitive(kernel, &PrimitiveSpec::Sphere { center, radius })?;
    Ok(solid)
}

/// Enumerate a shape's sub-elements of a kind, for targeting features.
pub fn elements_of(
    kernel: &MockKernel,
    shape: &ShapeHandle,
    kind: brep_types::TopoKind,
) -> Result<Vec<ElementId>, HarnessError> {
    Ok(kernel.sub_shapes(shape, kind)?)
}

/// Relative/absolute float comparison used by the scenario assertions.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * 1.0_f64.max(a.abs().max(b.abs()))
}
