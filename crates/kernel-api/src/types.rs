use brep_types::ResolvedParam;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a kernel-side boundary-representation graph.
///
/// A handle is owned by exactly one entity at a time; cloning aliases the
/// same kernel shape (a full independent duplicate is a kernel call).
/// NEVER persisted — valid only for the current kernel session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeHandle(Uuid);

impl ShapeHandle {
    pub(crate) fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Borrowed reference into a shape's topology graph.
///
/// Valid only for the shape it was enumerated from and only until that shape
/// is mutated. NEVER persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// The kernel's generic failure signal. Callers of the orchestration layer
/// never see this type directly; it is converted at each public operation
/// boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("construction failed: {reason}")]
    ConstructionFailed { reason: String },

    #[error("numerical failure: {reason}")]
    Numerical { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: ElementId },

    #[error("unknown shape handle")]
    UnknownShape,

    #[error("i/o failure: {reason}")]
    Io { reason: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Result of a kernel build step. The kernel may finish without raising an
/// error yet still report the build unfinished, or hand back a null shape;
/// both must be handled by the caller before the result is committed.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub done: bool,
    pub shape: Option<ShapeHandle>,
}

impl BuildOutcome {
    pub fn finished(shape: ShapeHandle) -> Self {
        Self {
            done: true,
            shape: Some(shape),
        }
    }
}

/// One edge's registered contribution to a fillet build.
#[derive(Debug, Clone, Copy)]
pub struct FilletContribution {
    pub edge: ElementId,
    /// The face used to orient the fillet surface.
    pub face: ElementId,
    pub radius: ResolvedParam,
}

/// One edge's registered contribution to a chamfer build.
#[derive(Debug, Clone, Copy)]
pub struct ChamferContribution {
    pub edge: ElementId,
    /// The face the chamfer distance is measured from.
    pub face: ElementId,
    pub distance: f64,
}

/// Outcome flags from a face-level fix pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceFixStatus {
    pub wires_fixed: bool,
    pub orientation_fixed: bool,
    pub seam_added: bool,
    pub small_wire_dropped: bool,
    pub natural_bounds_added: bool,
}

impl FaceFixStatus {
    pub fn any(self) -> bool {
        self.wires_fixed
            || self.orientation_fixed
            || self.seam_added
            || self.small_wire_dropped
            || self.natural_bounds_added
    }
}

/// Outcome flags from a wire-level fix pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFixStatus {
    pub reordered: bool,
    pub connected_merged: bool,
    pub small_collapsed: bool,
    pub curves_repaired: bool,
    pub degenerate_fixed: bool,
    pub self_intersection_fixed: bool,
    pub missing_edges_added: bool,
}

impl WireFixStatus {
    pub fn any(self) -> bool {
        self.reordered
            || self.connected_merged
            || self.small_collapsed
            || self.curves_repaired
            || self.degenerate_fixed
            || self.self_intersection_fixed
            || self.missing_edges_added
    }
}

/// Outcome flags from the shape-wide wireframe pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireframeFixStatus {
    pub gaps_2d_fixed: bool,
    pub gaps_3d_fixed: bool,
    pub small_edges_dropped: bool,
}
