use std::path::Path;

use brep_types::{BooleanKind, FileFormat, PrimitiveSpec, TopoKind};

use crate::types::*;

/// Core geometry kernel contract: shape construction, repair, and
/// persistence. Implemented by `MockKernel` (deterministic test double) and
/// by any binding to a real boundary-representation kernel.
///
/// Every method may fail with a generic `KernelError` at any point; the
/// orchestration layer catches it at the boundary of each public operation.
pub trait Kernel {
    /// Build a primitive solid.
    fn build_primitive(&mut self, spec: &PrimitiveSpec) -> Result<BuildOutcome, KernelError>;

    /// Boolean operation between two shapes. `Cut` removes `b` from `a`.
    fn boolean(
        &mut self,
        kind: BooleanKind,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<BuildOutcome, KernelError>;

    /// Build a compound shape containing the given members, in order.
    fn make_compound(&mut self, members: &[ShapeHandle]) -> Result<ShapeHandle, KernelError>;

    /// Promote a sub-shape element to a standalone shape.
    fn extract(
        &mut self,
        shape: &ShapeHandle,
        element: ElementId,
    ) -> Result<ShapeHandle, KernelError>;

    /// Full independent duplication; the result shares no sub-structure with
    /// the source.
    fn duplicate(&mut self, shape: &ShapeHandle) -> Result<ShapeHandle, KernelError>;

    /// Build a fillet from the registered per-edge contributions.
    fn build_fillet(
        &mut self,
        shape: &ShapeHandle,
        contributions: &[FilletContribution],
    ) -> Result<BuildOutcome, KernelError>;

    /// Build a chamfer from the registered per-edge contributions.
    fn build_chamfer(
        &mut self,
        shape: &ShapeHandle,
        contributions: &[ChamferContribution],
    ) -> Result<BuildOutcome, KernelError>;

    /// Hollow a solid, removing the given faces and offsetting the rest.
    fn build_thick_solid(
        &mut self,
        shape: &ShapeHandle,
        open_faces: &[ElementId],
        offset: f64,
        tolerance: f64,
    ) -> Result<BuildOutcome, KernelError>;

    /// Remove the given edges from the shape, rebuilding it.
    fn remove_edges(
        &mut self,
        shape: &ShapeHandle,
        edges: &[ElementId],
    ) -> Result<ShapeHandle, KernelError>;

    /// Rebuild the shape with each `(old, new)` element substituted.
    fn replace_elements(
        &mut self,
        shape: &ShapeHandle,
        replacements: &[(ElementId, ElementId)],
    ) -> Result<ShapeHandle, KernelError>;

    /// Face-level fix pass: missing seams, wire order and orientation,
    /// small-area wires, natural bounds. Returns the replacement face and
    /// what was done, or `None` when no fix applied.
    fn fix_face(
        &mut self,
        shape: &ShapeHandle,
        face: ElementId,
    ) -> Result<Option<(ElementId, FaceFixStatus)>, KernelError>;

    /// Wire-level fix pass in the context of a face: reorder disconnected
    /// segments, merge connected ones, collapse edges shorter than the
    /// tolerance, repair curve mismatches, degeneracies, self-intersections
    /// and missing edges. Returns the replacement wire, or `None`.
    fn fix_wire(
        &mut self,
        shape: &ShapeHandle,
        face: ElementId,
        wire: ElementId,
        tolerance: f64,
    ) -> Result<Option<(ElementId, WireFixStatus)>, KernelError>;

    /// Shape-wide wireframe pass: close small 2-D/3-D gaps between wire
    /// endpoints and drop edges below the tolerance length.
    fn fix_wireframe(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<(ShapeHandle, WireframeFixStatus), KernelError>;

    /// Remove point-like and zero-width faces below the tolerance.
    fn drop_small_faces(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Stitch matching edges of the given standalone faces within the
    /// tolerance. `None` when sewing produced nothing.
    fn sew(
        &mut self,
        faces: &[ShapeHandle],
        tolerance: f64,
    ) -> Result<Option<ShapeHandle>, KernelError>;

    /// Close the given shells of a shape into solids.
    fn solids_from_shells(
        &mut self,
        shape: &ShapeHandle,
        shells: &[ElementId],
    ) -> Result<ShapeHandle, KernelError>;

    /// General shape-fix pass bounded by the tolerance.
    fn fix_shape(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Ensure consistent outward orientation of a closed solid's boundary.
    /// Returns the replacement solid element, or `None` when already
    /// oriented.
    fn orient_closed_solid(
        &mut self,
        shape: &ShapeHandle,
        solid: ElementId,
    ) -> Result<Option<ElementId>, KernelError>;

    /// Read a shape from a file.
    fn read(&mut self, path: &Path, format: FileFormat) -> Result<ShapeHandle, KernelError>;

    /// Write a shape to a file.
    fn write(
        &mut self,
        shape: &ShapeHandle,
        path: &Path,
        format: FileFormat,
    ) -> Result<(), KernelError>;
}

/// Read-only topology and mass-property queries on kernel shapes.
pub trait KernelIntrospect {
    /// The topological kind of the shape itself.
    fn shape_kind(&self, shape: &ShapeHandle) -> Result<TopoKind, KernelError>;

    /// Enumerate the unique sub-shapes of the given kind, in discovery
    /// order. Includes the shape itself when it is of that kind.
    fn sub_shapes(
        &self,
        shape: &ShapeHandle,
        kind: TopoKind,
    ) -> Result<Vec<ElementId>, KernelError>;

    /// The faces incident to an edge, in discovery order.
    fn edge_faces(
        &self,
        shape: &ShapeHandle,
        edge: ElementId,
    ) -> Result<Vec<ElementId>, KernelError>;

    /// The wires bounding a face.
    fn face_wires(
        &self,
        shape: &ShapeHandle,
        face: ElementId,
    ) -> Result<Vec<ElementId>, KernelError>;

    /// Whether an edge has no meaningful 3-D curve.
    fn is_degenerate(&self, shape: &ShapeHandle, edge: ElementId) -> Result<bool, KernelError>;

    /// Whether an edge bounds the given face on both sides.
    fn is_seam(
        &self,
        shape: &ShapeHandle,
        edge: ElementId,
        face: ElementId,
    ) -> Result<bool, KernelError>;

    /// Shallow topological validity analysis: closed shells, consistent
    /// orientation, no gross self-intersection.
    fn analyze(&self, shape: &ShapeHandle) -> Result<bool, KernelError>;

    /// Total surface area.
    fn area(&self, shape: &ShapeHandle) -> Result<f64, KernelError>;

    /// Total enclosed volume.
    fn volume(&self, shape: &ShapeHandle) -> Result<f64, KernelError>;

    /// Volume-weighted centre of mass.
    fn centre_of_mass(&self, shape: &ShapeHandle) -> Result<[f64; 3], KernelError>;

    /// Moments of inertia [Ixx, Iyy, Izz, Ixy, Ixz, Iyz] at unit density.
    fn inertia(&self, shape: &ShapeHandle) -> Result<[f64; 6], KernelError>;
}

/// Combined trait for operations that need both mutable `Kernel` access and
/// read-only `KernelIntrospect` access on the same object.
///
/// Avoids the borrow-checker issue of needing `&mut` and `&` on the same
/// value.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
