use brep_types::{HealingConfig, TopoKind};
use kernel_api::{ElementId, KernelBundle, ShapeHandle};
use tracing::{debug, trace};

use crate::types::OpError;

/// Run the multi-stage healing pipeline over a shape.
///
/// Stages execute in a fixed order, each consuming the previous stage's
/// output: degenerate removal and face fixes, wire and wireframe repair,
/// spot/strip face removal, sewing, a final unconditional degenerate
/// cleanup, and solid reconstruction. Structural repairs come before
/// aggregation because sewing malformed input is unreliable.
///
/// Best-effort: a stage that cannot improve the shape leaves it unchanged,
/// and every intermediate result is committed without a validity gate. With
/// every toggle off the call is a no-op.
pub fn execute_heal(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    config: &HealingConfig,
) -> Result<ShapeHandle, OpError> {
    if config.is_noop() {
        return Ok(shape.clone());
    }
    let tolerance = config.tolerance;
    let mut current = shape.clone();

    if config.fix_degenerate {
        current = remove_degenerate_edges(kb, &current)?;
        current = fix_faces(kb, &current)?;
        // Face fixes can introduce new degeneracies.
        current = remove_degenerate_edges(kb, &current)?;
    }

    if config.fix_small_edges {
        current = fix_wires(kb, &current, tolerance)?;
        current = remove_degenerate_edges(kb, &current)?;
        // Gaps can span wire boundaries, so this pass is shape-wide.
        let (next, status) = kb.fix_wireframe(&current, tolerance)?;
        debug!(?status, "wireframe pass");
        current = next;
    }

    if config.fix_spot_strip_faces {
        current = kb.drop_small_faces(&current, tolerance)?;
    }

    if config.sew_faces {
        let faces = kb.as_introspect().sub_shapes(&current, TopoKind::Face)?;
        let mut face_shapes = Vec::with_capacity(faces.len());
        for face in faces {
            face_shapes.push(kb.extract(&current, face)?);
        }
        if let Some(sewn) = kb.sew(&face_shapes, tolerance)? {
            debug!(faces = face_shapes.len(), "sewing replaced the shape");
            current = sewn;
        }
    }

    // Final cleanup runs regardless of which toggles were set.
    current = remove_degenerate_edges(kb, &current)?;

    if config.make_solids {
        current = reconstruct_solids(kb, &current, tolerance)?;
    }

    Ok(current)
}

/// Strip every degenerate edge from the shape. Unchanged when none exist.
fn remove_degenerate_edges(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
) -> Result<ShapeHandle, OpError> {
    let edges = kb.as_introspect().sub_shapes(shape, TopoKind::Edge)?;
    let mut degenerate = Vec::new();
    for edge in edges {
        if kb.as_introspect().is_degenerate(shape, edge)? {
            degenerate.push(edge);
        }
    }
    if degenerate.is_empty() {
        return Ok(shape.clone());
    }
    trace!(count = degenerate.len(), "removing degenerate edges");
    Ok(kb.remove_edges(shape, &degenerate)?)
}

/// Face-level fix pass over every face; fixed faces replace the originals.
fn fix_faces(kb: &mut dyn KernelBundle, shape: &ShapeHandle) -> Result<ShapeHandle, OpError> {
    let faces = kb.as_introspect().sub_shapes(shape, TopoKind::Face)?;
    let mut replacements: Vec<(ElementId, ElementId)> = Vec::new();
    for face in faces {
        if let Some((fixed, status)) = kb.fix_face(shape, face)? {
            debug!(face = face.0, ?status, "face fix applied");
            replacements.push((face, fixed));
        }
    }
    if replacements.is_empty() {
        return Ok(shape.clone());
    }
    Ok(kb.replace_elements(shape, &replacements)?)
}

/// Wire-level fix pass over every wire of every face.
fn fix_wires(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    tolerance: f64,
) -> Result<ShapeHandle, OpError> {
    let faces = kb.as_introspect().sub_shapes(shape, TopoKind::Face)?;
    let mut replacements: Vec<(ElementId, ElementId)> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for face in faces {
        for wire in kb.as_introspect().face_wires(shape, face)? {
            if !seen.insert(wire) {
                continue;
            }
            if let Some((fixed, status)) = kb.fix_wire(shape, face, wire, tolerance)? {
                debug!(wire = wire.0, ?status, "wire fix applied");
                replacements.push((wire, fixed));
            }
        }
    }
    if replacements.is_empty() {
        return Ok(shape.clone());
    }
    Ok(kb.replace_elements(shape, &replacements)?)
}

/// Close shells into solids, then fix and orient the result when it analyzes
/// as valid. A shape without shells, or an invalid reconstruction, is left
/// as it was.
fn reconstruct_solids(
    kb: &mut dyn KernelBundle,
    shape: &ShapeHandle,
    tolerance: f64,
) -> Result<ShapeHandle, OpError> {
    let shells = kb.as_introspect().sub_shapes(shape, TopoKind::Shell)?;
    if shells.is_empty() {
        return Ok(shape.clone());
    }
    let rebuilt = kb.solids_from_shells(shape, &shells)?;
    if !kb.as_introspect().analyze(&rebuilt)? {
        debug!("solid reconstruction failed analysis, keeping prior shape");
        return Ok(shape.clone());
    }
    let fixed = kb.fix_shape(&rebuilt, tolerance)?;

    let solids = kb.as_introspect().sub_shapes(&fixed, TopoKind::Solid)?;
    let mut replacements: Vec<(ElementId, ElementId)> = Vec::new();
    for solid in solids {
        if let Some(oriented) = kb.orient_closed_solid(&fixed, solid)? {
            replacements.push((solid, oriented));
        }
    }
    if replacements.is_empty() {
        return Ok(fixed);
    }
    Ok(kb.replace_elements(&fixed, &replacements)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brep_types::PrimitiveSpec;
    use kernel_api::{FaceFixStatus, Kernel, KernelIntrospect, MockKernel, WireFixStatus};

    #[test]
    fn all_toggles_off_is_a_noop() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let healed = execute_heal(&mut kernel, &shape, &HealingConfig::default()).unwrap();
        assert_eq!(healed, shape);
    }

    #[test]
    fn degenerate_stage_strips_flagged_edges() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let edges = kernel.sub_shapes(&shape, TopoKind::Edge).unwrap();
        kernel.flag_edge_degenerate(&shape, edges[0]).unwrap();
        kernel.flag_edge_degenerate(&shape, edges[5]).unwrap();

        let config = HealingConfig {
            fix_degenerate: true,
            ..HealingConfig::default()
        };
        let healed = execute_heal(&mut kernel, &shape, &config).unwrap();
        assert_eq!(kernel.sub_shapes(&healed, TopoKind::Edge).unwrap().len(), 10);
    }

    #[test]
    fn face_fix_pass_replaces_flagged_faces() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let faces = kernel.sub_shapes(&shape, TopoKind::Face).unwrap();
        kernel
            .set_face_fix(
                &shape,
                faces[2],
                FaceFixStatus {
                    seam_added: true,
                    wires_fixed: true,
                    ..FaceFixStatus::default()
                },
            )
            .unwrap();

        let config = HealingConfig {
            fix_degenerate: true,
            ..HealingConfig::default()
        };
        let healed = execute_heal(&mut kernel, &shape, &config).unwrap();

        let healed_faces = kernel.sub_shapes(&healed, TopoKind::Face).unwrap();
        assert_eq!(healed_faces.len(), 6);
        assert!(!healed_faces.contains(&faces[2]));
        // Nothing left for a second fix pass to do.
        for face in healed_faces {
            assert!(kernel.fix_face(&healed, face).unwrap().is_none());
        }
    }

    #[test]
    fn wire_repair_replaces_flagged_wires_and_collapses_short_edges() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let edges = kernel.sub_shapes(&shape, TopoKind::Edge).unwrap();
        let wires = kernel.sub_shapes(&shape, TopoKind::Wire).unwrap();
        kernel
            .set_wire_fix(
                &shape,
                wires[0],
                WireFixStatus {
                    reordered: true,
                    ..WireFixStatus::default()
                },
            )
            .unwrap();
        kernel.set_wire_gap(&shape, wires[1]).unwrap();
        // Short but not degenerate: only the small-edge stage may drop it.
        kernel.set_edge_length(&shape, edges[0], 1e-9).unwrap();

        let config = HealingConfig {
            fix_small_edges: true,
            ..HealingConfig::default()
        };
        let healed = execute_heal(&mut kernel, &shape, &config).unwrap();

        let healed_wires = kernel.sub_shapes(&healed, TopoKind::Wire).unwrap();
        assert_eq!(healed_wires.len(), 6);
        assert!(!healed_wires.contains(&wires[0]));
        assert!(!healed_wires.contains(&wires[1]));
        assert_eq!(kernel.sub_shapes(&healed, TopoKind::Edge).unwrap().len(), 11);
    }

    #[test]
    fn spot_faces_are_dropped() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let faces = kernel.sub_shapes(&shape, TopoKind::Face).unwrap();
        kernel.set_face_area(&shape, faces[0], 1e-9).unwrap();

        let config = HealingConfig {
            fix_spot_strip_faces: true,
            ..HealingConfig::default()
        };
        let healed = execute_heal(&mut kernel, &shape, &config).unwrap();
        assert_eq!(kernel.sub_shapes(&healed, TopoKind::Face).unwrap().len(), 5);
    }

    #[test]
    fn heal_is_stable_on_second_run() {
        let mut kernel = MockKernel::new();
        let shape = kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap();
        let edges = kernel.sub_shapes(&shape, TopoKind::Edge).unwrap();
        kernel.flag_edge_degenerate(&shape, edges[3]).unwrap();

        let config = HealingConfig::full(1e-6);
        let once = execute_heal(&mut kernel, &shape, &config).unwrap();
        let twice = execute_heal(&mut kernel, &once, &config).unwrap();
        for kind in [TopoKind::Edge, TopoKind::Face, TopoKind::Shell, TopoKind::Solid] {
            assert_eq!(
                kernel.sub_shapes(&once, kind).unwrap().len(),
                kernel.sub_shapes(&twice, kind).unwrap().len(),
            );
        }
    }
}
