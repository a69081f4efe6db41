use serde::{Deserialize, Serialize};

/// Toggles and shared tolerance for the healing pipeline.
///
/// Each stage is independently skippable so callers can apply minimal-cost
/// healing; the tolerance is shared by every stage that takes one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealingConfig {
    pub tolerance: f64,
    /// Strip degenerate edges and run the face-level fix pass.
    pub fix_degenerate: bool,
    /// Repair wires and collapse edges shorter than the tolerance.
    pub fix_small_edges: bool,
    /// Remove point-like and zero-width faces below the tolerance.
    pub fix_spot_strip_faces: bool,
    /// Stitch matching face edges within the tolerance.
    pub sew_faces: bool,
    /// Close shells into solids and orient them outward.
    pub make_solids: bool,
}

impl HealingConfig {
    /// Every stage enabled with the given tolerance.
    pub fn full(tolerance: f64) -> Self {
        Self {
            tolerance,
            fix_degenerate: true,
            fix_small_edges: true,
            fix_spot_strip_faces: true,
            sew_faces: true,
            make_solids: true,
        }
    }

    /// True when no stage is enabled; healing is then a no-op.
    pub fn is_noop(&self) -> bool {
        !(self.fix_degenerate
            || self.fix_small_edges
            || self.fix_spot_strip_faces
            || self.sew_faces
            || self.make_solids)
    }
}

impl Default for HealingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            fix_degenerate: false,
            fix_small_edges: false,
            fix_spot_strip_faces: false,
            sew_faces: false,
            make_solids: false,
        }
    }
}
