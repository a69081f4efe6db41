use brep_types::TopoKind;
use kernel_api::{KernelBundle, ShapeHandle};

use crate::types::OpError;

/// Normalize a kernel-produced shape into the canonical representation: a
/// Solid/CompSolid for a single body, or a Compound of such for anything
/// else.
///
/// A single-body shape passes through unchanged. Otherwise the bodies found
/// inside the shape are enumerated in discovery order: a lone body is
/// unwrapped, any other count (including zero) is collected into a fresh
/// Compound. Classifying an already-canonical shape therefore changes
/// nothing.
pub fn classify(kb: &mut dyn KernelBundle, shape: &ShapeHandle) -> Result<ShapeHandle, OpError> {
    let kind = kb.as_introspect().shape_kind(shape)?;
    if kind.is_single_body() {
        return Ok(shape.clone());
    }

    let mut bodies = kb.as_introspect().sub_shapes(shape, TopoKind::Solid)?;
    bodies.extend(kb.as_introspect().sub_shapes(shape, TopoKind::CompSolid)?);

    if bodies.len() == 1 {
        return Ok(kb.extract(shape, bodies[0])?);
    }

    let mut members = Vec::with_capacity(bodies.len());
    for body in bodies {
        members.push(kb.extract(shape, body)?);
    }
    Ok(kb.make_compound(&members)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brep_types::PrimitiveSpec;
    use kernel_api::{Kernel, KernelIntrospect, MockKernel};

    fn unit_box(kernel: &mut MockKernel) -> ShapeHandle {
        kernel
            .build_primitive(&PrimitiveSpec::Box {
                p1: [0.0; 3],
                p2: [1.0, 1.0, 1.0],
            })
            .unwrap()
            .shape
            .unwrap()
    }

    #[test]
    fn solid_passes_through_unchanged() {
        let mut kernel = MockKernel::new();
        let shape = unit_box(&mut kernel);
        let canonical = classify(&mut kernel, &shape).unwrap();
        assert_eq!(canonical, shape);
    }

    #[test]
    fn singleton_body_is_unwrapped() {
        let mut kernel = MockKernel::new();
        let solid = unit_box(&mut kernel);
        let compound = kernel.make_compound(std::slice::from_ref(&solid)).unwrap();
        let canonical = classify(&mut kernel, &compound).unwrap();
        assert_eq!(kernel.shape_kind(&canonical).unwrap(), TopoKind::Solid);
    }

    #[test]
    fn multiple_bodies_become_a_compound() {
        let mut kernel = MockKernel::new();
        let a = unit_box(&mut kernel);
        let b = unit_box(&mut kernel);
        let c = unit_box(&mut kernel);
        let aggregate = kernel.make_compound(&[a, b, c]).unwrap();
        let canonical = classify(&mut kernel, &aggregate).unwrap();
        assert_eq!(kernel.shape_kind(&canonical).unwrap(), TopoKind::Compound);
        assert_eq!(
            kernel.sub_shapes(&canonical, TopoKind::Solid).unwrap().len(),
            3
        );
    }

    #[test]
    fn every_classified_shape_is_canonical() {
        let mut kernel = MockKernel::new();
        let solo = unit_box(&mut kernel);
        let a = unit_box(&mut kernel);
        let b = unit_box(&mut kernel);
        let pair = kernel.make_compound(&[a, b]).unwrap();
        let faces = kernel.make_free_faces(3);

        for shape in [solo, pair, faces] {
            let canonical = classify(&mut kernel, &shape).unwrap();
            assert!(kernel.shape_kind(&canonical).unwrap().is_canonical());
        }
    }

    #[test]
    fn shape_without_bodies_yields_empty_compound() {
        let mut kernel = MockKernel::new();
        let faces = kernel.make_free_faces(2);
        let canonical = classify(&mut kernel, &faces).unwrap();
        assert_eq!(kernel.shape_kind(&canonical).unwrap(), TopoKind::Compound);
        assert!(kernel.sub_shapes(&canonical, TopoKind::Solid).unwrap().is_empty());
    }
}
