use serde::{Deserialize, Serialize};

/// The kind of topological entity in a boundary-representation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    CompSolid,
    Compound,
}

impl TopoKind {
    /// A shape of this kind is a single connected body.
    pub fn is_single_body(self) -> bool {
        matches!(self, TopoKind::Solid | TopoKind::CompSolid)
    }

    /// A shape of this kind may be held by a `Solid` entity: a single body,
    /// or a compound of bodies.
    pub fn is_canonical(self) -> bool {
        self.is_single_body() || self == TopoKind::Compound
    }
}
