//! MockKernel — deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Models shapes as shared-node trees with synthetic topology and mass
//! properties, so the orchestration layer can be exercised with predictable
//! entity counts. Repair routines operate on explicit per-node flags rather
//! than real geometry.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use brep_types::{BooleanKind, FileFormat, PrimitiveSpec, ResolvedParam, TopoKind};
use serde::{Deserialize, Serialize};

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

const EPS: f64 = 1e-12;

/// Synthetic mass properties carried by each solid node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProps {
    pub volume: f64,
    pub centroid: [f64; 3],
    pub inertia: [f64; 6],
}

impl MassProps {
    fn zero() -> Self {
        Self {
            volume: 0.0,
            centroid: [0.0; 3],
            inertia: [0.0; 6],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum NodeData {
    Vertex,
    Edge {
        degenerate: bool,
        seam: bool,
        length: f64,
    },
    Wire {
        fix: WireFixStatus,
        has_gap: bool,
    },
    Face {
        area: f64,
        fix: FaceFixStatus,
    },
    Shell {
        closed: bool,
    },
    Solid {
        oriented: bool,
        props: MassProps,
    },
    CompSolid,
    Compound,
}

impl NodeData {
    fn kind(&self) -> TopoKind {
        match self {
            NodeData::Vertex => TopoKind::Vertex,
            NodeData::Edge { .. } => TopoKind::Edge,
            NodeData::Wire { .. } => TopoKind::Wire,
            NodeData::Face { .. } => TopoKind::Face,
            NodeData::Shell { .. } => TopoKind::Shell,
            NodeData::Solid { .. } => TopoKind::Solid,
            NodeData::CompSolid => TopoKind::CompSolid,
            NodeData::Compound => TopoKind::Compound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Node {
    data: NodeData,
    children: Vec<u64>,
}

#[derive(Debug, Clone)]
struct Root {
    node: u64,
    /// Forces analyze() to report the shape invalid.
    poisoned: bool,
}

/// On-disk representation used by the mock read/write implementation.
#[derive(Debug, Serialize, Deserialize)]
struct MockShapeFile {
    format: String,
    version: u32,
    root: u64,
    nodes: Vec<(u64, Node)>,
}

const FILE_VERSION: u32 = 1;

fn format_marker(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Brep => "mock-brep",
        FileFormat::Step => "mock-step",
    }
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_node: u64,
    nodes: HashMap<u64, Node>,
    roots: HashMap<uuid::Uuid, Root>,
    /// When set, the next build step reports `done == false`.
    pub incomplete_next_build: bool,
    /// When set, the next build step hands back a null shape.
    pub null_next_build: bool,
    /// When set, the next build produces a shape that fails analyze().
    pub invalid_next_build: bool,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_node: 1,
            nodes: HashMap::new(),
            roots: HashMap::new(),
            incomplete_next_build: false,
            null_next_build: false,
            invalid_next_build: false,
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_node;
        self.next_node += 1;
        id
    }

    fn add(&mut self, data: NodeData, children: Vec<u64>) -> u64 {
        let id = self.alloc_id();
        self.nodes.insert(id, Node { data, children });
        id
    }

    fn register(&mut self, node: u64) -> ShapeHandle {
        let handle = ShapeHandle::fresh();
        self.roots.insert(
            handle.id(),
            Root {
                node,
                poisoned: false,
            },
        );
        handle
    }

    fn root_of(&self, shape: &ShapeHandle) -> Result<&Root, KernelError> {
        self.roots.get(&shape.id()).ok_or(KernelError::UnknownShape)
    }

    fn root_node(&self, shape: &ShapeHandle) -> Result<u64, KernelError> {
        self.root_of(shape).map(|r| r.node)
    }

    /// Depth-first preorder enumeration of unique node ids, root included.
    fn collect_from(&self, root: u64) -> Vec<u64> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        order
    }

    fn node_in_shape(&self, shape: &ShapeHandle, element: ElementId) -> Result<&Node, KernelError> {
        let root = self.root_node(shape)?;
        if !self.collect_from(root).contains(&element.0) {
            return Err(KernelError::EntityNotFound { id: element });
        }
        self.nodes
            .get(&element.0)
            .ok_or(KernelError::EntityNotFound { id: element })
    }

    /// Rebuild the tree at `id`, substituting and removing elements.
    /// Untouched subtrees keep their identity.
    fn rebuilt(
        &mut self,
        id: u64,
        subs: &HashMap<u64, u64>,
        removals: &HashSet<u64>,
        memo: &mut HashMap<u64, Option<u64>>,
    ) -> Option<u64> {
        if removals.contains(&id) {
            return None;
        }
        let id = *subs.get(&id).unwrap_or(&id);
        if removals.contains(&id) {
            return None;
        }
        if let Some(&cached) = memo.get(&id) {
            return cached;
        }
        let node = self.nodes.get(&id)?.clone();
        let children: Vec<u64> = node
            .children
            .iter()
            .filter_map(|&c| self.rebuilt(c, subs, removals, memo))
            .collect();
        let result = if children == node.children {
            id
        } else {
            self.add(node.data, children)
        };
        memo.insert(id, Some(result));
        Some(result)
    }

    fn rebuild_root(
        &mut self,
        root: u64,
        subs: &HashMap<u64, u64>,
        removals: &HashSet<u64>,
    ) -> u64 {
        let mut memo = HashMap::new();
        // A root is never in the removal set for any caller.
        self.rebuilt(root, subs, removals, &mut memo).unwrap_or(root)
    }

    fn deep_clone(&mut self, id: u64, memo: &mut HashMap<u64, u64>) -> Result<u64, KernelError> {
        if let Some(&copied) = memo.get(&id) {
            return Ok(copied);
        }
        let node = self
            .nodes
            .get(&id)
            .cloned()
            .ok_or(KernelError::EntityNotFound { id: ElementId(id) })?;
        let new_id = self.alloc_id();
        memo.insert(id, new_id);
        let mut children = Vec::with_capacity(node.children.len());
        for child in node.children {
            children.push(self.deep_clone(child, memo)?);
        }
        self.nodes.insert(
            new_id,
            Node {
                data: node.data,
                children,
            },
        );
        Ok(new_id)
    }

    fn first_of_kind(&self, root: u64, kind: TopoKind) -> Option<u64> {
        self.collect_from(root)
            .into_iter()
            .find(|id| self.nodes.get(id).map(|n| n.data.kind()) == Some(kind))
    }

    /// Wrap a built node into a BuildOutcome, honoring the fault-injection
    /// knobs.
    fn finish_build(&mut self, node: u64) -> BuildOutcome {
        if self.incomplete_next_build {
            self.incomplete_next_build = false;
            return BuildOutcome {
                done: false,
                shape: None,
            };
        }
        if self.null_next_build {
            self.null_next_build = false;
            return BuildOutcome {
                done: true,
                shape: None,
            };
        }
        let handle = self.register(node);
        if self.invalid_next_build {
            self.invalid_next_build = false;
            if let Some(root) = self.roots.get_mut(&handle.id()) {
                root.poisoned = true;
            }
        }
        BuildOutcome::finished(handle)
    }

    // ── Primitive construction ──────────────────────────────────────────

    fn build_box(&mut self, p1: [f64; 3], p2: [f64; 3]) -> Result<u64, KernelError> {
        let d = [
            (p2[0] - p1[0]).abs(),
            (p2[1] - p1[1]).abs(),
            (p2[2] - p1[2]).abs(),
        ];
        if d.iter().any(|&x| x < EPS) {
            return Err(KernelError::ConstructionFailed {
                reason: "box corner points are degenerate".to_string(),
            });
        }
        let (dx, dy, dz) = (d[0], d[1], d[2]);

        let positions = [
            [0.0, 0.0, 0.0],
            [dx, 0.0, 0.0],
            [dx, dy, 0.0],
            [0.0, dy, 0.0],
            [0.0, 0.0, dz],
            [dx, 0.0, dz],
            [dx, dy, dz],
            [0.0, dy, dz],
        ];
        let verts: Vec<u64> = positions
            .iter()
            .map(|_| self.add(NodeData::Vertex, Vec::new()))
            .collect();

        // 4 bottom, 4 top, 4 vertical
        let edge_pairs = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        let edges: Vec<u64> = edge_pairs
            .iter()
            .map(|&(a, b)| {
                let (pa, pb) = (positions[a], positions[b]);
                let length = ((pb[0] - pa[0]).powi(2)
                    + (pb[1] - pa[1]).powi(2)
                    + (pb[2] - pa[2]).powi(2))
                .sqrt();
                self.add(
                    NodeData::Edge {
                        degenerate: false,
                        seam: false,
                        length,
                    },
                    vec![verts[a], verts[b]],
                )
            })
            .collect();

        let face_defs: [(&[usize; 4], f64); 6] = [
            (&[0, 1, 2, 3], dx * dy),
            (&[4, 5, 6, 7], dx * dy),
            (&[0, 9, 4, 8], dx * dz),
            (&[2, 11, 6, 10], dx * dz),
            (&[3, 8, 7, 11], dy * dz),
            (&[1, 10, 5, 9], dy * dz),
        ];
        let faces: Vec<u64> = face_defs
            .iter()
            .map(|(idx, area)| {
                let wire_edges: Vec<u64> = idx.iter().map(|&i| edges[i]).collect();
                let wire = self.add(
                    NodeData::Wire {
                        fix: WireFixStatus::default(),
                        has_gap: false,
                    },
                    wire_edges,
                );
                self.add(
                    NodeData::Face {
                        area: *area,
                        fix: FaceFixStatus::default(),
                    },
                    vec![wire],
                )
            })
            .collect();

        let shell = self.add(NodeData::Shell { closed: true }, faces);
        let volume = dx * dy * dz;
        let centroid = [
            (p1[0] + p2[0]) / 2.0,
            (p1[1] + p2[1]) / 2.0,
            (p1[2] + p2[2]) / 2.0,
        ];
        let props = MassProps {
            volume,
            centroid,
            inertia: [
                volume * (dy * dy + dz * dz) / 12.0,
                volume * (dx * dx + dz * dz) / 12.0,
                volume * (dx * dx + dy * dy) / 12.0,
                0.0,
                0.0,
                0.0,
            ],
        };
        Ok(self.add(
            NodeData::Solid {
                oriented: true,
                props,
            },
            vec![shell],
        ))
    }

    fn build_sphere(&mut self, center: [f64; 3], radius: f64) -> Result<u64, KernelError> {
        if radius <= EPS {
            return Err(KernelError::ConstructionFailed {
                reason: "sphere radius must be positive".to_string(),
            });
        }
        let pole_n = self.add(NodeData::Vertex, Vec::new());
        let pole_s = self.add(NodeData::Vertex, Vec::new());
        let seam = self.add(
            NodeData::Edge {
                degenerate: false,
                seam: true,
                length: std::f64::consts::PI * radius,
            },
            vec![pole_n, pole_s],
        );
        let cap_n = self.add(
            NodeData::Edge {
                degenerate: true,
                seam: false,
                length: 0.0,
            },
            vec![pole_n],
        );
        let cap_s = self.add(
            NodeData::Edge {
                degenerate: true,
                seam: false,
                length: 0.0,
            },
            vec![pole_s],
        );
        let wire = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            vec![seam, cap_n, cap_s],
        );
        let face = self.add(
            NodeData::Face {
                area: 4.0 * std::f64::consts::PI * radius * radius,
                fix: FaceFixStatus::default(),
            },
            vec![wire],
        );
        let shell = self.add(NodeData::Shell { closed: true }, vec![face]);
        let volume = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
        let moment = 0.4 * volume * radius * radius;
        let props = MassProps {
            volume,
            centroid: center,
            inertia: [moment, moment, moment, 0.0, 0.0, 0.0],
        };
        Ok(self.add(
            NodeData::Solid {
                oriented: true,
                props,
            },
            vec![shell],
        ))
    }

    fn axis_length(p1: [f64; 3], p2: [f64; 3]) -> Result<f64, KernelError> {
        let h = ((p2[0] - p1[0]).powi(2) + (p2[1] - p1[1]).powi(2) + (p2[2] - p1[2]).powi(2))
            .sqrt();
        if h < EPS {
            return Err(KernelError::ConstructionFailed {
                reason: "axis points are coincident".to_string(),
            });
        }
        Ok(h)
    }

    fn midpoint(p1: [f64; 3], p2: [f64; 3]) -> [f64; 3] {
        [
            (p1[0] + p2[0]) / 2.0,
            (p1[1] + p2[1]) / 2.0,
            (p1[2] + p2[2]) / 2.0,
        ]
    }

    fn circle_edge(&mut self, radius: f64) -> u64 {
        let v = self.add(NodeData::Vertex, Vec::new());
        self.add(
            NodeData::Edge {
                degenerate: false,
                seam: false,
                length: 2.0 * std::f64::consts::PI * radius,
            },
            vec![v],
        )
    }

    fn disc_face(&mut self, circle: u64, radius: f64) -> u64 {
        let wire = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            vec![circle],
        );
        self.add(
            NodeData::Face {
                area: std::f64::consts::PI * radius * radius,
                fix: FaceFixStatus::default(),
            },
            vec![wire],
        )
    }

    fn build_cylinder(
        &mut self,
        p1: [f64; 3],
        p2: [f64; 3],
        radius: f64,
    ) -> Result<u64, KernelError> {
        if radius <= EPS {
            return Err(KernelError::ConstructionFailed {
                reason: "cylinder radius must be positive".to_string(),
            });
        }
        let h = Self::axis_length(p1, p2)?;
        let pi = std::f64::consts::PI;

        let bottom = self.circle_edge(radius);
        let top = self.circle_edge(radius);
        let seam = self.add(
            NodeData::Edge {
                degenerate: false,
                seam: true,
                length: h,
            },
            Vec::new(),
        );
        let lateral_wire = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            vec![bottom, seam, top],
        );
        let lateral = self.add(
            NodeData::Face {
                area: 2.0 * pi * radius * h,
                fix: FaceFixStatus::default(),
            },
            vec![lateral_wire],
        );
        let cap_bottom = self.disc_face(bottom, radius);
        let cap_top = self.disc_face(top, radius);
        let shell = self.add(
            NodeData::Shell { closed: true },
            vec![lateral, cap_bottom, cap_top],
        );

        let volume = pi * radius * radius * h;
        let transverse = volume * (3.0 * radius * radius + h * h) / 12.0;
        let props = MassProps {
            volume,
            centroid: Self::midpoint(p1, p2),
            inertia: [
                transverse,
                transverse,
                volume * radius * radius / 2.0,
                0.0,
                0.0,
                0.0,
            ],
        };
        Ok(self.add(
            NodeData::Solid {
                oriented: true,
                props,
            },
            vec![shell],
        ))
    }

    fn build_cone(
        &mut self,
        p1: [f64; 3],
        p2: [f64; 3],
        radius1: f64,
        radius2: f64,
    ) -> Result<u64, KernelError> {
        if radius1 < 0.0 || radius2 < 0.0 || (radius1 <= EPS && radius2 <= EPS) {
            return Err(KernelError::ConstructionFailed {
                reason: "cone radii are degenerate".to_string(),
            });
        }
        let h = Self::axis_length(p1, p2)?;
        let pi = std::f64::consts::PI;

        let mut lateral_edges = Vec::new();
        let mut shell_faces = Vec::new();
        let rim = |k: &mut Self, radius: f64| -> u64 {
            if radius > EPS {
                k.circle_edge(radius)
            } else {
                // Collapsed apex rim.
                let v = k.add(NodeData::Vertex, Vec::new());
                k.add(
                    NodeData::Edge {
                        degenerate: true,
                        seam: false,
                        length: 0.0,
                    },
                    vec![v],
                )
            }
        };
        let bottom = rim(self, radius1);
        let top = rim(self, radius2);
        let slant = ((radius1 - radius2).powi(2) + h * h).sqrt();
        let seam = self.add(
            NodeData::Edge {
                degenerate: false,
                seam: true,
                length: slant,
            },
            Vec::new(),
        );
        lateral_edges.push(bottom);
        lateral_edges.push(seam);
        lateral_edges.push(top);
        let lateral_wire = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            lateral_edges,
        );
        let lateral = self.add(
            NodeData::Face {
                area: pi * (radius1 + radius2) * slant,
                fix: FaceFixStatus::default(),
            },
            vec![lateral_wire],
        );
        shell_faces.push(lateral);
        if radius1 > EPS {
            shell_faces.push(self.disc_face(bottom, radius1));
        }
        if radius2 > EPS {
            shell_faces.push(self.disc_face(top, radius2));
        }
        let shell = self.add(NodeData::Shell { closed: true }, shell_faces);

        let volume =
            pi * h * (radius1 * radius1 + radius1 * radius2 + radius2 * radius2) / 3.0;
        // Mean-radius approximation for the transverse moments.
        let rm = (radius1 + radius2) / 2.0;
        let transverse = volume * (3.0 * rm * rm + h * h) / 12.0;
        let props = MassProps {
            volume,
            centroid: Self::midpoint(p1, p2),
            inertia: [transverse, transverse, volume * rm * rm / 2.0, 0.0, 0.0, 0.0],
        };
        Ok(self.add(
            NodeData::Solid {
                oriented: true,
                props,
            },
            vec![shell],
        ))
    }

    fn build_torus(
        &mut self,
        p1: [f64; 3],
        p2: [f64; 3],
        radius1: f64,
        radius2: f64,
    ) -> Result<u64, KernelError> {
        if radius1 <= EPS || radius2 <= EPS {
            return Err(KernelError::ConstructionFailed {
                reason: "torus radii must be positive".to_string(),
            });
        }
        Self::axis_length(p1, p2)?;
        let pi = std::f64::consts::PI;

        let major_seam = self.add(
            NodeData::Edge {
                degenerate: false,
                seam: true,
                length: 2.0 * pi * radius1,
            },
            Vec::new(),
        );
        let minor_seam = self.add(
            NodeData::Edge {
                degenerate: false,
                seam: true,
                length: 2.0 * pi * radius2,
            },
            Vec::new(),
        );
        let wire = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            vec![major_seam, minor_seam],
        );
        let face = self.add(
            NodeData::Face {
                area: 4.0 * pi * pi * radius1 * radius2,
                fix: FaceFixStatus::default(),
            },
            vec![wire],
        );
        let shell = self.add(NodeData::Shell { closed: true }, vec![face]);

        let volume = 2.0 * pi * pi * radius1 * radius2 * radius2;
        let axial = volume * (radius1 * radius1 + 0.75 * radius2 * radius2);
        let transverse = volume * (0.5 * radius1 * radius1 + 0.625 * radius2 * radius2);
        let props = MassProps {
            volume,
            centroid: p1,
            inertia: [transverse, transverse, axial, 0.0, 0.0, 0.0],
        };
        Ok(self.add(
            NodeData::Solid {
                oriented: true,
                props,
            },
            vec![shell],
        ))
    }

    // ── Feature helpers ─────────────────────────────────────────────────

    /// Shared fillet/chamfer topology rewrite: drop the target edges, then
    /// append one new bounded face per contribution to the first shell.
    fn feature_rewrite(
        &mut self,
        root: u64,
        targets: &[(ElementId, f64)],
    ) -> Result<u64, KernelError> {
        let removals: HashSet<u64> = targets.iter().map(|(e, _)| e.0).collect();
        let trimmed = self.rebuild_root(root, &HashMap::new(), &removals);

        let mut new_faces = Vec::new();
        for &(edge, width) in targets {
            let length = match self.nodes.get(&edge.0).map(|n| &n.data) {
                Some(NodeData::Edge { length, .. }) => *length,
                _ => return Err(KernelError::EntityNotFound { id: edge }),
            };
            let v1 = self.add(NodeData::Vertex, Vec::new());
            let v2 = self.add(NodeData::Vertex, Vec::new());
            let e1 = self.add(
                NodeData::Edge {
                    degenerate: false,
                    seam: false,
                    length,
                },
                vec![v1],
            );
            let e2 = self.add(
                NodeData::Edge {
                    degenerate: false,
                    seam: false,
                    length,
                },
                vec![v2],
            );
            let wire = self.add(
                NodeData::Wire {
                    fix: WireFixStatus::default(),
                    has_gap: false,
                },
                vec![e1, e2],
            );
            new_faces.push(self.add(
                NodeData::Face {
                    area: length * width,
                    fix: FaceFixStatus::default(),
                },
                vec![wire],
            ));
        }
        if new_faces.is_empty() {
            return Ok(trimmed);
        }

        let shell = self
            .first_of_kind(trimmed, TopoKind::Shell)
            .ok_or(KernelError::Other {
                message: "feature target has no shell".to_string(),
            })?;
        let shell_node = self
            .nodes
            .get(&shell)
            .cloned()
            .ok_or(KernelError::UnknownShape)?;
        let mut children = shell_node.children.clone();
        children.extend(new_faces);
        let new_shell = self.add(shell_node.data, children);
        let mut subs = HashMap::new();
        subs.insert(shell, new_shell);
        Ok(self.rebuild_root(trimmed, &subs, &HashSet::new()))
    }

    fn verify_edges_exist(
        &self,
        shape: &ShapeHandle,
        edges: impl Iterator<Item = ElementId>,
    ) -> Result<(), KernelError> {
        let root = self.root_node(shape)?;
        let present: HashSet<u64> = self.collect_from(root).into_iter().collect();
        for edge in edges {
            if !present.contains(&edge.0) {
                return Err(KernelError::EntityNotFound { id: edge });
            }
        }
        Ok(())
    }

    /// Mutable access to a node verified to belong to the shape.
    fn node_mut_in_shape(
        &mut self,
        shape: &ShapeHandle,
        element: ElementId,
    ) -> Result<&mut Node, KernelError> {
        self.node_in_shape(shape, element)?;
        self.nodes
            .get_mut(&element.0)
            .ok_or(KernelError::EntityNotFound { id: element })
    }

    // ── Test-fixture hooks ──────────────────────────────────────────────

    /// Force analyze() to report this shape invalid.
    pub fn poison(&mut self, shape: &ShapeHandle) -> Result<(), KernelError> {
        let root = self
            .roots
            .get_mut(&shape.id())
            .ok_or(KernelError::UnknownShape)?;
        root.poisoned = true;
        Ok(())
    }

    pub fn flag_edge_degenerate(
        &mut self,
        shape: &ShapeHandle,
        edge: ElementId,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, edge)?.data {
            NodeData::Edge { degenerate, .. } => {
                *degenerate = true;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: edge }),
        }
    }

    pub fn flag_edge_seam(
        &mut self,
        shape: &ShapeHandle,
        edge: ElementId,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, edge)?.data {
            NodeData::Edge { seam, .. } => {
                *seam = true;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: edge }),
        }
    }

    pub fn set_edge_length(
        &mut self,
        shape: &ShapeHandle,
        edge: ElementId,
        new_length: f64,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, edge)?.data {
            NodeData::Edge { length, .. } => {
                *length = new_length;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: edge }),
        }
    }

    pub fn set_face_area(
        &mut self,
        shape: &ShapeHandle,
        face: ElementId,
        new_area: f64,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, face)?.data {
            NodeData::Face { area, .. } => {
                *area = new_area;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: face }),
        }
    }

    pub fn set_face_fix(
        &mut self,
        shape: &ShapeHandle,
        face: ElementId,
        status: FaceFixStatus,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, face)?.data {
            NodeData::Face { fix, .. } => {
                *fix = status;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: face }),
        }
    }

    pub fn set_wire_fix(
        &mut self,
        shape: &ShapeHandle,
        wire: ElementId,
        status: WireFixStatus,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, wire)?.data {
            NodeData::Wire { fix, .. } => {
                *fix = status;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: wire }),
        }
    }

    pub fn set_wire_gap(
        &mut self,
        shape: &ShapeHandle,
        wire: ElementId,
    ) -> Result<(), KernelError> {
        match &mut self.node_mut_in_shape(shape, wire)?.data {
            NodeData::Wire { has_gap, .. } => {
                *has_gap = true;
                Ok(())
            }
            _ => Err(KernelError::EntityNotFound { id: wire }),
        }
    }

    /// A compound of `n` standalone unit faces, e.g. for sewing scenarios.
    pub fn make_free_faces(&mut self, n: usize) -> ShapeHandle {
        let faces: Vec<u64> = (0..n)
            .map(|_| {
                let edges: Vec<u64> = (0..4)
                    .map(|_| {
                        let v = self.add(NodeData::Vertex, Vec::new());
                        self.add(
                            NodeData::Edge {
                                degenerate: false,
                                seam: false,
                                length: 1.0,
                            },
                            vec![v],
                        )
                    })
                    .collect();
                let wire = self.add(
                    NodeData::Wire {
                        fix: WireFixStatus::default(),
                        has_gap: false,
                    },
                    edges,
                );
                self.add(
                    NodeData::Face {
                        area: 1.0,
                        fix: FaceFixStatus::default(),
                    },
                    vec![wire],
                )
            })
            .collect();
        let compound = self.add(NodeData::Compound, faces);
        self.register(compound)
    }

    /// An open (unclosed) shell of `n` unit faces.
    pub fn make_open_shell(&mut self, n: usize) -> ShapeHandle {
        let free = self.make_free_faces(n);
        let faces = match self.root_node(&free) {
            Ok(root) => self
                .collect_from(root)
                .into_iter()
                .filter(|id| {
                    self.nodes.get(id).map(|x| x.data.kind()) == Some(TopoKind::Face)
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        let shell = self.add(NodeData::Shell { closed: false }, faces);
        self.register(shell)
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn build_primitive(&mut self, spec: &PrimitiveSpec) -> Result<BuildOutcome, KernelError> {
        let node = match *spec {
            PrimitiveSpec::Sphere { center, radius } => self.build_sphere(center, radius)?,
            PrimitiveSpec::Box { p1, p2 } => self.build_box(p1, p2)?,
            PrimitiveSpec::Cylinder { p1, p2, radius } => self.build_cylinder(p1, p2, radius)?,
            PrimitiveSpec::Cone {
                p1,
                p2,
                radius1,
                radius2,
            } => self.build_cone(p1, p2, radius1, radius2)?,
            PrimitiveSpec::Torus {
                p1,
                p2,
                radius1,
                radius2,
            } => self.build_torus(p1, p2, radius1, radius2)?,
        };
        Ok(self.finish_build(node))
    }

    fn boolean(
        &mut self,
        kind: BooleanKind,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<BuildOutcome, KernelError> {
        let root_a = self.root_node(a)?;
        let root_b = self.root_node(b)?;
        let va = self.volume(a)?;
        let vb = self.volume(b)?;

        let mut memo = HashMap::new();
        let result = self.deep_clone(root_a, &mut memo)?;

        // Fuse keeps both boundaries; cut and common keep the first body's.
        if kind == BooleanKind::Fuse {
            let mut memo_b = HashMap::new();
            let b_faces: Vec<u64> = {
                let ids = self.collect_from(root_b);
                let mut faces = Vec::new();
                for id in ids {
                    if self.nodes.get(&id).map(|n| n.data.kind()) == Some(TopoKind::Face) {
                        faces.push(self.deep_clone(id, &mut memo_b)?);
                    }
                }
                faces
            };
            if let Some(shell) = self.first_of_kind(result, TopoKind::Shell) {
                if let Some(node) = self.nodes.get_mut(&shell) {
                    node.children.extend(b_faces);
                }
            }
        }

        let volume = match kind {
            BooleanKind::Fuse => va + vb,
            BooleanKind::Cut => (va - vb).max(0.0),
            BooleanKind::Common => va.min(vb),
        };
        if let Some(solid) = self.first_of_kind(result, TopoKind::Solid) {
            if let Some(node) = self.nodes.get_mut(&solid) {
                if let NodeData::Solid { props, .. } = &mut node.data {
                    props.volume = volume;
                }
            }
        }
        Ok(self.finish_build(result))
    }

    fn make_compound(&mut self, members: &[ShapeHandle]) -> Result<ShapeHandle, KernelError> {
        let mut children = Vec::with_capacity(members.len());
        for member in members {
            children.push(self.root_node(member)?);
        }
        let compound = self.add(NodeData::Compound, children);
        Ok(self.register(compound))
    }

    fn extract(
        &mut self,
        shape: &ShapeHandle,
        element: ElementId,
    ) -> Result<ShapeHandle, KernelError> {
        self.node_in_shape(shape, element)?;
        Ok(self.register(element.0))
    }

    fn duplicate(&mut self, shape: &ShapeHandle) -> Result<ShapeHandle, KernelError> {
        let root = self.root_node(shape)?;
        let mut memo = HashMap::new();
        let copied = self.deep_clone(root, &mut memo)?;
        Ok(self.register(copied))
    }

    fn build_fillet(
        &mut self,
        shape: &ShapeHandle,
        contributions: &[FilletContribution],
    ) -> Result<BuildOutcome, KernelError> {
        self.verify_edges_exist(shape, contributions.iter().map(|c| c.edge))?;
        let root = self.root_node(shape)?;
        let targets: Vec<(ElementId, f64)> = contributions
            .iter()
            .map(|c| {
                let width = match c.radius {
                    ResolvedParam::Constant(r) => r,
                    ResolvedParam::Linear { start, end } => (start + end) / 2.0,
                };
                (c.edge, width * std::f64::consts::FRAC_PI_2)
            })
            .collect();
        let result = self.feature_rewrite(root, &targets)?;
        Ok(self.finish_build(result))
    }

    fn build_chamfer(
        &mut self,
        shape: &ShapeHandle,
        contributions: &[ChamferContribution],
    ) -> Result<BuildOutcome, KernelError> {
        self.verify_edges_exist(shape, contributions.iter().map(|c| c.edge))?;
        let root = self.root_node(shape)?;
        let targets: Vec<(ElementId, f64)> = contributions
            .iter()
            .map(|c| (c.edge, c.distance * std::f64::consts::SQRT_2))
            .collect();
        let result = self.feature_rewrite(root, &targets)?;
        Ok(self.finish_build(result))
    }

    fn build_thick_solid(
        &mut self,
        shape: &ShapeHandle,
        open_faces: &[ElementId],
        offset: f64,
        _tolerance: f64,
    ) -> Result<BuildOutcome, KernelError> {
        let root = self.root_node(shape)?;
        let present: HashSet<u64> = self.collect_from(root).into_iter().collect();
        for face in open_faces {
            if !present.contains(&face.0) {
                return Err(KernelError::EntityNotFound { id: *face });
            }
        }
        let removals: HashSet<u64> = open_faces.iter().map(|f| f.0).collect();
        let opened = self.rebuild_root(root, &HashMap::new(), &removals);

        // Mirror every kept face with an inner offset face.
        let kept_faces: Vec<(u64, f64)> = self
            .collect_from(opened)
            .into_iter()
            .filter_map(|id| match self.nodes.get(&id).map(|n| &n.data) {
                Some(NodeData::Face { area, .. }) => Some((id, *area)),
                _ => None,
            })
            .collect();
        let mut inner = Vec::new();
        for (_, area) in &kept_faces {
            let wire = self.add(
                NodeData::Wire {
                    fix: WireFixStatus::default(),
                    has_gap: false,
                },
                Vec::new(),
            );
            inner.push(self.add(
                NodeData::Face {
                    area: (area - offset.abs()).max(area * 0.01),
                    fix: FaceFixStatus::default(),
                },
                vec![wire],
            ));
        }
        let result = if let Some(shell) = self.first_of_kind(opened, TopoKind::Shell) {
            let shell_node = self
                .nodes
                .get(&shell)
                .cloned()
                .ok_or(KernelError::UnknownShape)?;
            let mut children = shell_node.children.clone();
            children.extend(inner);
            let new_shell = self.add(shell_node.data, children);
            let mut subs = HashMap::new();
            subs.insert(shell, new_shell);
            self.rebuild_root(opened, &subs, &HashSet::new())
        } else {
            opened
        };
        // Synthetic hollowed volume.
        if let Some(solid) = self.first_of_kind(result, TopoKind::Solid) {
            let solid_node = self
                .nodes
                .get(&solid)
                .cloned()
                .ok_or(KernelError::UnknownShape)?;
            if let NodeData::Solid { oriented, props } = solid_node.data {
                let hollowed = self.add(
                    NodeData::Solid {
                        oriented,
                        props: MassProps {
                            volume: props.volume * 0.25,
                            ..props
                        },
                    },
                    solid_node.children,
                );
                let mut subs = HashMap::new();
                subs.insert(solid, hollowed);
                let rebuilt = self.rebuild_root(result, &subs, &HashSet::new());
                return Ok(self.finish_build(rebuilt));
            }
        }
        Ok(self.finish_build(result))
    }

    fn remove_edges(
        &mut self,
        shape: &ShapeHandle,
        edges: &[ElementId],
    ) -> Result<ShapeHandle, KernelError> {
        self.verify_edges_exist(shape, edges.iter().copied())?;
        let root = self.root_node(shape)?;
        let removals: HashSet<u64> = edges.iter().map(|e| e.0).collect();
        let rebuilt = self.rebuild_root(root, &HashMap::new(), &removals);
        Ok(self.register(rebuilt))
    }

    fn replace_elements(
        &mut self,
        shape: &ShapeHandle,
        replacements: &[(ElementId, ElementId)],
    ) -> Result<ShapeHandle, KernelError> {
        let root = self.root_node(shape)?;
        let subs: HashMap<u64, u64> = replacements.iter().map(|(a, b)| (a.0, b.0)).collect();
        let rebuilt = self.rebuild_root(root, &subs, &HashSet::new());
        Ok(self.register(rebuilt))
    }

    fn fix_face(
        &mut self,
        shape: &ShapeHandle,
        face: ElementId,
    ) -> Result<Option<(ElementId, FaceFixStatus)>, KernelError> {
        let node = self.node_in_shape(shape, face)?.clone();
        match node.data {
            NodeData::Face { area, fix } if fix.any() => {
                let fixed = self.add(
                    NodeData::Face {
                        area,
                        fix: FaceFixStatus::default(),
                    },
                    node.children,
                );
                Ok(Some((ElementId(fixed), fix)))
            }
            NodeData::Face { .. } => Ok(None),
            _ => Err(KernelError::EntityNotFound { id: face }),
        }
    }

    fn fix_wire(
        &mut self,
        shape: &ShapeHandle,
        _face: ElementId,
        wire: ElementId,
        tolerance: f64,
    ) -> Result<Option<(ElementId, WireFixStatus)>, KernelError> {
        let node = self.node_in_shape(shape, wire)?.clone();
        let (mut status, has_gap) = match node.data {
            NodeData::Wire { fix, has_gap } => (fix, has_gap),
            _ => return Err(KernelError::EntityNotFound { id: wire }),
        };
        let kept: Vec<u64> = node
            .children
            .iter()
            .filter(|&&c| match self.nodes.get(&c).map(|n| &n.data) {
                Some(NodeData::Edge {
                    length, degenerate, ..
                }) => *degenerate || *length >= tolerance,
                _ => true,
            })
            .copied()
            .collect();
        if kept.len() != node.children.len() {
            status.small_collapsed = true;
        }
        if !status.any() && !has_gap {
            return Ok(None);
        }
        let fixed = self.add(
            NodeData::Wire {
                fix: WireFixStatus::default(),
                has_gap: false,
            },
            kept,
        );
        Ok(Some((ElementId(fixed), status)))
    }

    fn fix_wireframe(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<(ShapeHandle, WireframeFixStatus), KernelError> {
        let root = self.root_node(shape)?;
        let mut status = WireframeFixStatus::default();
        let mut removals = HashSet::new();
        let mut subs = HashMap::new();
        for id in self.collect_from(root) {
            let node = match self.nodes.get(&id) {
                Some(n) => n.clone(),
                None => continue,
            };
            match node.data {
                NodeData::Edge {
                    length,
                    degenerate: false,
                    ..
                } if length < tolerance => {
                    removals.insert(id);
                    status.small_edges_dropped = true;
                }
                NodeData::Wire { fix, has_gap: true } => {
                    let fixed = self.add(
                        NodeData::Wire {
                            fix,
                            has_gap: false,
                        },
                        node.children,
                    );
                    subs.insert(id, fixed);
                    status.gaps_3d_fixed = true;
                }
                _ => {}
            }
        }
        let rebuilt = self.rebuild_root(root, &subs, &removals);
        Ok((self.register(rebuilt), status))
    }

    fn drop_small_faces(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let root = self.root_node(shape)?;
        let removals: HashSet<u64> = self
            .collect_from(root)
            .into_iter()
            .filter(|id| match self.nodes.get(id).map(|n| &n.data) {
                Some(NodeData::Face { area, .. }) => *area < tolerance,
                _ => false,
            })
            .collect();
        let rebuilt = self.rebuild_root(root, &HashMap::new(), &removals);
        Ok(self.register(rebuilt))
    }

    fn sew(
        &mut self,
        faces: &[ShapeHandle],
        _tolerance: f64,
    ) -> Result<Option<ShapeHandle>, KernelError> {
        let mut sewn = Vec::new();
        for handle in faces {
            let root = self.root_node(handle)?;
            for id in self.collect_from(root) {
                if self.nodes.get(&id).map(|n| n.data.kind()) == Some(TopoKind::Face)
                    && !sewn.contains(&id)
                {
                    sewn.push(id);
                }
            }
        }
        if sewn.is_empty() {
            return Ok(None);
        }
        let shell = self.add(NodeData::Shell { closed: true }, sewn);
        Ok(Some(self.register(shell)))
    }

    fn solids_from_shells(
        &mut self,
        shape: &ShapeHandle,
        shells: &[ElementId],
    ) -> Result<ShapeHandle, KernelError> {
        let mut children = Vec::with_capacity(shells.len());
        let mut area = 0.0;
        for shell in shells {
            let node = self.node_in_shape(shape, *shell)?;
            if node.data.kind() != TopoKind::Shell {
                return Err(KernelError::EntityNotFound { id: *shell });
            }
            for id in self.collect_from(shell.0) {
                if let Some(NodeData::Face { area: a, .. }) =
                    self.nodes.get(&id).map(|n| &n.data)
                {
                    area += a;
                }
            }
            children.push(shell.0);
        }
        // Synthetic volume for reconstructed solids.
        let props = MassProps {
            volume: area / 6.0,
            centroid: [0.0; 3],
            inertia: [0.0; 6],
        };
        let solid = self.add(
            NodeData::Solid {
                oriented: false,
                props,
            },
            children,
        );
        Ok(self.register(solid))
    }

    fn fix_shape(
        &mut self,
        shape: &ShapeHandle,
        _tolerance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        let root = self.root_node(shape)?;
        let mut subs = HashMap::new();
        for id in self.collect_from(root) {
            let node = match self.nodes.get(&id) {
                Some(n) => n.clone(),
                None => continue,
            };
            match node.data {
                NodeData::Face { area, fix } if fix.any() => {
                    let fixed = self.add(
                        NodeData::Face {
                            area,
                            fix: FaceFixStatus::default(),
                        },
                        node.children,
                    );
                    subs.insert(id, fixed);
                }
                NodeData::Wire { fix, has_gap } if fix.any() || has_gap => {
                    let fixed = self.add(
                        NodeData::Wire {
                            fix: WireFixStatus::default(),
                            has_gap: false,
                        },
                        node.children,
                    );
                    subs.insert(id, fixed);
                }
                _ => {}
            }
        }
        let rebuilt = self.rebuild_root(root, &subs, &HashSet::new());
        Ok(self.register(rebuilt))
    }

    fn orient_closed_solid(
        &mut self,
        shape: &ShapeHandle,
        solid: ElementId,
    ) -> Result<Option<ElementId>, KernelError> {
        let node = self.node_in_shape(shape, solid)?.clone();
        match node.data {
            NodeData::Solid {
                oriented: false,
                props,
            } => {
                let fixed = self.add(
                    NodeData::Solid {
                        oriented: true,
                        props,
                    },
                    node.children,
                );
                Ok(Some(ElementId(fixed)))
            }
            NodeData::Solid { .. } => Ok(None),
            _ => Err(KernelError::EntityNotFound { id: solid }),
        }
    }

    fn read(&mut self, path: &Path, format: FileFormat) -> Result<ShapeHandle, KernelError> {
        let text = std::fs::read_to_string(path).map_err(|e| KernelError::Io {
            reason: e.to_string(),
        })?;
        let file: MockShapeFile = serde_json::from_str(&text).map_err(|e| KernelError::Io {
            reason: e.to_string(),
        })?;
        if file.format != format_marker(format) {
            return Err(KernelError::Io {
                reason: format!("unexpected format marker: {}", file.format),
            });
        }
        if file.version != FILE_VERSION {
            return Err(KernelError::Io {
                reason: format!("unsupported file version: {}", file.version),
            });
        }
        // Remap persisted ids into this session's id space.
        let mut map = HashMap::new();
        for (old, _) in &file.nodes {
            map.insert(*old, self.alloc_id());
        }
        for (old, node) in file.nodes {
            let children = node
                .children
                .iter()
                .filter_map(|c| map.get(c).copied())
                .collect();
            let new_id = map.get(&old).copied().ok_or(KernelError::Io {
                reason: "corrupt node table".to_string(),
            })?;
            self.nodes.insert(
                new_id,
                Node {
                    data: node.data,
                    children,
                },
            );
        }
        let root = map.get(&file.root).copied().ok_or(KernelError::Io {
            reason: "missing root node".to_string(),
        })?;
        Ok(self.register(root))
    }

    fn write(
        &mut self,
        shape: &ShapeHandle,
        path: &Path,
        format: FileFormat,
    ) -> Result<(), KernelError> {
        let root = self.root_node(shape)?;
        let nodes: Vec<(u64, Node)> = self
            .collect_from(root)
            .into_iter()
            .filter_map(|id| self.nodes.get(&id).map(|n| (id, n.clone())))
            .collect();
        let file = MockShapeFile {
            format: format_marker(format).to_string(),
            version: FILE_VERSION,
            root,
            nodes,
        };
        let text = serde_json::to_string_pretty(&file).map_err(|e| KernelError::Io {
            reason: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| KernelError::Io {
            reason: e.to_string(),
        })
    }
}

impl KernelIntrospect for MockKernel {
    fn shape_kind(&self, shape: &ShapeHandle) -> Result<TopoKind, KernelError> {
        let root = self.root_node(shape)?;
        self.nodes
            .get(&root)
            .map(|n| n.data.kind())
            .ok_or(KernelError::UnknownShape)
    }

    fn sub_shapes(
        &self,
        shape: &ShapeHandle,
        kind: TopoKind,
    ) -> Result<Vec<ElementId>, KernelError> {
        let root = self.root_node(shape)?;
        Ok(self
            .collect_from(root)
            .into_iter()
            .filter(|id| self.nodes.get(id).map(|n| n.data.kind()) == Some(kind))
            .map(ElementId)
            .collect())
    }

    fn edge_faces(
        &self,
        shape: &ShapeHandle,
        edge: ElementId,
    ) -> Result<Vec<ElementId>, KernelError> {
        self.node_in_shape(shape, edge)?;
        let root = self.root_node(shape)?;
        let mut faces = Vec::new();
        for id in self.collect_from(root) {
            let node = match self.nodes.get(&id) {
                Some(n) => n,
                None => continue,
            };
            if node.data.kind() != TopoKind::Face {
                continue;
            }
            let bounds_edge = node.children.iter().any(|wire| {
                self.nodes
                    .get(wire)
                    .map(|w| w.children.contains(&edge.0))
                    .unwrap_or(false)
            });
            if bounds_edge {
                faces.push(ElementId(id));
            }
        }
        Ok(faces)
    }

    fn face_wires(
        &self,
        shape: &ShapeHandle,
        face: ElementId,
    ) -> Result<Vec<ElementId>, KernelError> {
        let node = self.node_in_shape(shape, face)?;
        if node.data.kind() != TopoKind::Face {
            return Err(KernelError::EntityNotFound { id: face });
        }
        Ok(node
            .children
            .iter()
            .filter(|c| self.nodes.get(c).map(|n| n.data.kind()) == Some(TopoKind::Wire))
            .map(|&c| ElementId(c))
            .collect())
    }

    fn is_degenerate(&self, shape: &ShapeHandle, edge: ElementId) -> Result<bool, KernelError> {
        match self.node_in_shape(shape, edge)?.data {
            NodeData::Edge { degenerate, .. } => Ok(degenerate),
            _ => Err(KernelError::EntityNotFound { id: edge }),
        }
    }

    fn is_seam(
        &self,
        shape: &ShapeHandle,
        edge: ElementId,
        face: ElementId,
    ) -> Result<bool, KernelError> {
        self.node_in_shape(shape, face)?;
        match self.node_in_shape(shape, edge)?.data {
            NodeData::Edge { seam, .. } => Ok(seam),
            _ => Err(KernelError::EntityNotFound { id: edge }),
        }
    }

    fn analyze(&self, shape: &ShapeHandle) -> Result<bool, KernelError> {
        let root = self.root_of(shape)?;
        if root.poisoned {
            return Ok(false);
        }
        for id in self.collect_from(root.node) {
            if let Some(NodeData::Shell { closed: false }) = self.nodes.get(&id).map(|n| &n.data)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn area(&self, shape: &ShapeHandle) -> Result<f64, KernelError> {
        let root = self.root_node(shape)?;
        Ok(self
            .collect_from(root)
            .into_iter()
            .filter_map(|id| match self.nodes.get(&id).map(|n| &n.data) {
                Some(NodeData::Face { area, .. }) => Some(*area),
                _ => None,
            })
            .sum())
    }

    fn volume(&self, shape: &ShapeHandle) -> Result<f64, KernelError> {
        let root = self.root_node(shape)?;
        Ok(self
            .collect_from(root)
            .into_iter()
            .filter_map(|id| match self.nodes.get(&id).map(|n| &n.data) {
                Some(NodeData::Solid { props, .. }) => Some(props.volume),
                _ => None,
            })
            .sum())
    }

    fn centre_of_mass(&self, shape: &ShapeHandle) -> Result<[f64; 3], KernelError> {
        let root = self.root_node(shape)?;
        let mut total = 0.0;
        let mut weighted = [0.0; 3];
        for id in self.collect_from(root) {
            if let Some(NodeData::Solid { props, .. }) = self.nodes.get(&id).map(|n| &n.data) {
                total += props.volume;
                for (w, c) in weighted.iter_mut().zip(props.centroid.iter()) {
                    *w += props.volume * c;
                }
            }
        }
        if total < EPS {
            return Ok([0.0; 3]);
        }
        Ok([weighted[0] / total, weighted[1] / total, weighted[2] / total])
    }

    fn inertia(&self, shape: &ShapeHandle) -> Result<[f64; 6], KernelError> {
        let root = self.root_node(shape)?;
        let mut sum = [0.0; 6];
        for id in self.collect_from(root) {
            if let Some(NodeData::Solid { props, .. }) = self.nodes.get(&id).map(|n| &n.data) {
                for (s, m) in sum.iter_mut().zip(props.inertia.iter()) {
                    *s += m;
                }
            }
        }
        Ok(sum)
    }
}
