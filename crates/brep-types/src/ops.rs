use serde::{Deserialize, Serialize};

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanKind {
    Fuse,
    Cut,
    Common,
}

/// Parameters for a kernel primitive build.
///
/// Axis primitives (cylinder, cone, torus) derive their axis from two points;
/// the kernel rejects coincident points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PrimitiveSpec {
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Box {
        p1: [f64; 3],
        p2: [f64; 3],
    },
    Cylinder {
        p1: [f64; 3],
        p2: [f64; 3],
        radius: f64,
    },
    Cone {
        p1: [f64; 3],
        p2: [f64; 3],
        radius1: f64,
        radius2: f64,
    },
    Torus {
        p1: [f64; 3],
        p2: [f64; 3],
        radius1: f64,
        radius2: f64,
    },
}

/// Persistence format understood by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    Brep,
    Step,
}
