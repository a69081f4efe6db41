//! Operation-level scenarios against the mock kernel: parameter
//! distribution, validity gating, and entity state safety.

use brep_types::{BooleanKind, ParameterSet, PrimitiveSpec, TopoKind};
use kernel_api::{KernelIntrospect, MockKernel};
use modeling_ops::{OpError, Solid};
use proptest::prelude::*;

fn box_solid(kernel: &mut MockKernel, p2: [f64; 3]) -> Solid {
    let mut solid = Solid::new();
    solid
        .create_primitive(kernel, &PrimitiveSpec::Box { p1: [0.0; 3], p2 })
        .unwrap();
    solid
}

fn edges_of(kernel: &MockKernel, solid: &Solid) -> Vec<kernel_api::ElementId> {
    kernel
        .sub_shapes(solid.shape().unwrap(), TopoKind::Edge)
        .unwrap()
}

#[test]
fn uniform_fillet_on_all_edges_keeps_one_body() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);
    assert_eq!(edges.len(), 12);

    solid
        .fillet(&mut kernel, &edges, &ParameterSet::uniform(0.1))
        .unwrap();
    assert_eq!(solid.num_solids(&kernel).unwrap(), 1);
    // One new face per filleted edge.
    assert_eq!(solid.num_faces(&kernel).unwrap(), 18);
}

#[test]
fn mismatched_parameter_count_leaves_entity_unchanged() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);
    let before = solid.shape().unwrap().clone();

    let err = solid
        .fillet(&mut kernel, &edges, &ParameterSet::per_element(vec![0.1, 0.2]))
        .unwrap_err();
    assert!(matches!(
        err,
        OpError::ParameterCountMismatch {
            supplied: 2,
            eligible: 12
        }
    ));
    assert_eq!(solid.shape().unwrap(), &before);
    assert_eq!(solid.num_faces(&kernel).unwrap(), 6);
}

#[test]
fn degenerate_edge_does_not_consume_a_parameter_slot() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);
    kernel
        .flag_edge_degenerate(solid.shape().unwrap(), edges[4])
        .unwrap();

    // 11 eligible edges remain; a 12-value set no longer fits.
    let err = solid
        .fillet(
            &mut kernel,
            &edges,
            &ParameterSet::per_element(vec![0.1; 12]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        OpError::ParameterCountMismatch {
            supplied: 12,
            eligible: 11
        }
    ));

    solid
        .fillet(
            &mut kernel,
            &edges,
            &ParameterSet::per_element(vec![0.1; 11]),
        )
        .unwrap();
    assert_eq!(solid.num_solids(&kernel).unwrap(), 1);
}

#[test]
fn seam_edge_is_skipped() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);
    kernel
        .flag_edge_seam(solid.shape().unwrap(), edges[0])
        .unwrap();

    solid
        .fillet(
            &mut kernel,
            &edges,
            &ParameterSet::per_element(vec![0.1; 11]),
        )
        .unwrap();
    // 11 fillet faces added, one edge untouched.
    assert_eq!(solid.num_faces(&kernel).unwrap(), 17);
}

#[test]
fn variable_radius_fillet_accepts_paired_values() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);

    let pairs: Vec<f64> = (0..24).map(|i| 0.05 + 0.01 * f64::from(i)).collect();
    solid
        .fillet(&mut kernel, &edges, &ParameterSet::paired(pairs))
        .unwrap();
    assert_eq!(solid.num_solids(&kernel).unwrap(), 1);
}

#[test]
fn chamfer_rejects_paired_values() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);

    let err = solid
        .chamfer(&mut kernel, &edges, &ParameterSet::paired(vec![0.1; 24]))
        .unwrap_err();
    assert!(matches!(err, OpError::ParameterCountMismatch { .. }));

    solid
        .chamfer(&mut kernel, &edges, &ParameterSet::uniform(0.05))
        .unwrap();
    assert_eq!(solid.num_faces(&kernel).unwrap(), 18);
}

#[test]
fn invalid_fillet_result_is_rejected_and_state_kept() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);
    let before = solid.shape().unwrap().clone();

    kernel.invalid_next_build = true;
    let err = solid
        .fillet(&mut kernel, &edges, &ParameterSet::uniform(0.1))
        .unwrap_err();
    assert!(matches!(err, OpError::InvalidTopology));
    assert_eq!(solid.shape().unwrap(), &before);
    assert_eq!(solid.num_faces(&kernel).unwrap(), 6);
}

#[test]
fn incomplete_build_maps_to_incomplete_error() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);

    kernel.incomplete_next_build = true;
    let err = solid
        .fillet(&mut kernel, &edges, &ParameterSet::uniform(0.1))
        .unwrap_err();
    assert!(matches!(err, OpError::Incomplete));
}

#[test]
fn null_build_result_maps_to_null_error() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let edges = edges_of(&kernel, &solid);

    kernel.null_next_build = true;
    let err = solid
        .fillet(&mut kernel, &edges, &ParameterSet::uniform(0.1))
        .unwrap_err();
    assert!(matches!(err, OpError::NullResult));
}

#[test]
fn boolean_fuse_combines_volumes() {
    let mut kernel = MockKernel::new();
    let mut a = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let b = box_solid(&mut kernel, [2.0, 1.0, 1.0]);

    a.boolean(&mut kernel, BooleanKind::Fuse, &b).unwrap();
    assert!((a.volume(&kernel).unwrap() - 3.0).abs() < 1e-9);
    assert_eq!(a.num_solids(&kernel).unwrap(), 1);
}

#[test]
fn failed_boolean_leaves_entity_unchanged() {
    let mut kernel = MockKernel::new();
    let mut a = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let b = box_solid(&mut kernel, [2.0, 1.0, 1.0]);
    let before = a.shape().unwrap().clone();

    kernel.incomplete_next_build = true;
    let err = a.boolean(&mut kernel, BooleanKind::Cut, &b).unwrap_err();
    assert!(matches!(err, OpError::Incomplete));
    assert_eq!(a.shape().unwrap(), &before);
    assert!((a.volume(&kernel).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn add_solids_builds_a_multi_body_compound() {
    let mut kernel = MockKernel::new();
    let a = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let b = box_solid(&mut kernel, [2.0, 2.0, 2.0]);

    let mut assembly = Solid::new();
    assembly.add_solids(&mut kernel, &[&a, &b]).unwrap();
    assert_eq!(assembly.num_solids(&kernel).unwrap(), 2);
    assert!((assembly.volume(&kernel).unwrap() - 9.0).abs() < 1e-9);
}

#[test]
fn shell_hollows_and_keeps_one_body() {
    let mut kernel = MockKernel::new();
    let mut solid = box_solid(&mut kernel, [1.0, 1.0, 1.0]);
    let faces = kernel
        .sub_shapes(solid.shape().unwrap(), TopoKind::Face)
        .unwrap();
    let before_volume = solid.volume(&kernel).unwrap();

    solid.shell(&mut kernel, &faces[..1], 0.1, 1e-6).unwrap();
    assert_eq!(solid.num_solids(&kernel).unwrap(), 1);
    assert!(solid.volume(&kernel).unwrap() < before_volume);
}

#[test]
fn queries_on_an_empty_entity_fail_cleanly() {
    let kernel = MockKernel::new();
    let solid = Solid::new();
    assert!(matches!(solid.volume(&kernel), Err(OpError::NullResult)));
    assert!(matches!(solid.num_faces(&kernel), Err(OpError::NullResult)));
}

proptest! {
    /// The binder accepts exactly the lengths 1, N and 2N.
    #[test]
    fn binder_length_policy(count in 1usize..16, len in 0usize..40) {
        let params = ParameterSet::per_element(vec![0.5; len]);
        let accepted = len == 1 || len == count || len == 2 * count;
        prop_assert_eq!(modeling_ops::bind(count, &params).is_ok(), accepted);
    }

    /// Uniform distribution hands every element the same value.
    #[test]
    fn binder_uniform_is_constant(count in 0usize..16, value in -1e3f64..1e3) {
        let bound = modeling_ops::bind(count, &ParameterSet::uniform(value)).unwrap();
        prop_assert_eq!(bound.len(), count);
        for r in bound {
            prop_assert_eq!(r, brep_types::ResolvedParam::Constant(value));
        }
    }
}
