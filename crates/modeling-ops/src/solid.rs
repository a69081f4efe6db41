use std::path::Path;

use brep_types::{BooleanKind, FileFormat, HealingConfig, ParameterSet, PrimitiveSpec, TopoKind};
use kernel_api::{ElementId, KernelBundle, KernelIntrospect, ShapeHandle};

use crate::classify::classify;
use crate::feature::{execute_chamfer, execute_fillet, execute_sew, execute_shell};
use crate::heal::execute_heal;
use crate::types::OpError;

/// A solid-modeling entity owning one canonical shape: a Solid/CompSolid for
/// a single body or a Compound of such for multiple bodies.
///
/// Every mutating operation stages a candidate with the kernel, classifies
/// or validity-gates it, and only then assigns it here; on any failure the
/// held shape is exactly what it was before the call.
#[derive(Debug, Default)]
pub struct Solid {
    shape: Option<ShapeHandle>,
}

impl Solid {
    pub fn new() -> Self {
        Self { shape: None }
    }

    /// The canonical shape, if one has been built or assigned.
    pub fn shape(&self) -> Option<&ShapeHandle> {
        self.shape.as_ref()
    }

    fn current(&self) -> Result<&ShapeHandle, OpError> {
        self.shape.as_ref().ok_or(OpError::NullResult)
    }

    /// Adopt an arbitrary kernel shape; it is canonicalized before it
    /// becomes this entity's shape.
    pub fn set_shape(
        &mut self,
        kb: &mut dyn KernelBundle,
        shape: &ShapeHandle,
    ) -> Result<(), OpError> {
        let canonical = classify(kb, shape)?;
        debug_assert!(kb.as_introspect().shape_kind(&canonical)?.is_canonical());
        self.shape = Some(canonical);
        Ok(())
    }

    /// Build a primitive solid (sphere, box, cylinder, cone, torus).
    pub fn create_primitive(
        &mut self,
        kb: &mut dyn KernelBundle,
        spec: &PrimitiveSpec,
    ) -> Result<(), OpError> {
        let outcome = kb.build_primitive(spec)?;
        if !outcome.done {
            return Err(OpError::Incomplete);
        }
        let shape = outcome.shape.ok_or(OpError::NullResult)?;
        self.set_shape(kb, &shape)
    }

    /// Boolean operation against another solid. `Cut` removes `other` from
    /// this entity; fuse and common are symmetric.
    pub fn boolean(
        &mut self,
        kb: &mut dyn KernelBundle,
        kind: BooleanKind,
        other: &Solid,
    ) -> Result<(), OpError> {
        let a = self.current()?.clone();
        let b = other.current()?.clone();
        let outcome = kb.boolean(kind, &a, &b)?;
        if !outcome.done {
            return Err(OpError::Incomplete);
        }
        let shape = outcome.shape.ok_or(OpError::NullResult)?;
        self.set_shape(kb, &shape)
    }

    /// Assemble a compound from the given solids' shapes.
    pub fn add_solids(
        &mut self,
        kb: &mut dyn KernelBundle,
        members: &[&Solid],
    ) -> Result<(), OpError> {
        let mut shapes = Vec::with_capacity(members.len());
        for member in members {
            shapes.push(member.current()?.clone());
        }
        let compound = kb.make_compound(&shapes)?;
        self.set_shape(kb, &compound)
    }

    /// Sew standalone faces within the tolerance into this entity's shape.
    pub fn create_solid(
        &mut self,
        kb: &mut dyn KernelBundle,
        faces: &[ShapeHandle],
        tolerance: f64,
    ) -> Result<(), OpError> {
        let shape = execute_sew(kb, faces, tolerance)?;
        self.shape = Some(shape);
        Ok(())
    }

    /// Alias this entity's shape, or duplicate it fully in the kernel. A
    /// deep copy shares no sub-structure with the original.
    pub fn copy(&self, kb: &mut dyn KernelBundle, deep: bool) -> Result<Solid, OpError> {
        let shape = if deep {
            kb.duplicate(self.current()?)?
        } else {
            self.current()?.clone()
        };
        Ok(Solid { shape: Some(shape) })
    }

    pub fn fillet(
        &mut self,
        kb: &mut dyn KernelBundle,
        edges: &[ElementId],
        radii: &ParameterSet,
    ) -> Result<(), OpError> {
        let current = self.current()?.clone();
        let next = execute_fillet(kb, &current, edges, radii)?;
        self.shape = Some(next);
        Ok(())
    }

    pub fn chamfer(
        &mut self,
        kb: &mut dyn KernelBundle,
        edges: &[ElementId],
        distances: &ParameterSet,
    ) -> Result<(), OpError> {
        let current = self.current()?.clone();
        let next = execute_chamfer(kb, &current, edges, distances)?;
        self.shape = Some(next);
        Ok(())
    }

    /// Hollow this solid, opening it at the given faces.
    pub fn shell(
        &mut self,
        kb: &mut dyn KernelBundle,
        open_faces: &[ElementId],
        offset: f64,
        tolerance: f64,
    ) -> Result<(), OpError> {
        let current = self.current()?.clone();
        let next = execute_shell(kb, &current, open_faces, offset, tolerance)?;
        self.shape = Some(next);
        Ok(())
    }

    /// Run the healing pipeline over this entity's shape. Healing commits
    /// its result unconditionally; it is not validity-gated the way feature
    /// operations are.
    pub fn heal(
        &mut self,
        kb: &mut dyn KernelBundle,
        config: &HealingConfig,
    ) -> Result<(), OpError> {
        let current = self.current()?.clone();
        let healed = execute_heal(kb, &current, config)?;
        self.shape = Some(healed);
        Ok(())
    }

    // ── Read-only queries ───────────────────────────────────────────────

    pub fn area(&self, introspect: &dyn KernelIntrospect) -> Result<f64, OpError> {
        Ok(introspect.area(self.current()?)?)
    }

    pub fn volume(&self, introspect: &dyn KernelIntrospect) -> Result<f64, OpError> {
        Ok(introspect.volume(self.current()?)?)
    }

    pub fn centre_of_mass(
        &self,
        introspect: &dyn KernelIntrospect,
    ) -> Result<[f64; 3], OpError> {
        Ok(introspect.centre_of_mass(self.current()?)?)
    }

    /// Moments of inertia [Ixx, Iyy, Izz, Ixy, Ixz, Iyz] at unit density.
    pub fn inertia(&self, introspect: &dyn KernelIntrospect) -> Result<[f64; 6], OpError> {
        Ok(introspect.inertia(self.current()?)?)
    }

    /// Number of bodies: 1 for a Solid-kind shape, otherwise the count of
    /// Solid sub-shapes.
    pub fn num_solids(&self, introspect: &dyn KernelIntrospect) -> Result<usize, OpError> {
        let shape = self.current()?;
        if introspect.shape_kind(shape)? == TopoKind::Solid {
            return Ok(1);
        }
        Ok(introspect.sub_shapes(shape, TopoKind::Solid)?.len())
    }

    pub fn num_faces(&self, introspect: &dyn KernelIntrospect) -> Result<usize, OpError> {
        Ok(introspect
            .sub_shapes(self.current()?, TopoKind::Face)?
            .len())
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Read a shape from a file; the result is canonicalized before it
    /// becomes this entity's shape.
    pub fn read_file(
        &mut self,
        kb: &mut dyn KernelBundle,
        path: &Path,
        format: FileFormat,
    ) -> Result<(), OpError> {
        let raw = kb.read(path, format)?;
        self.set_shape(kb, &raw)
    }

    pub fn write_file(
        &self,
        kb: &mut dyn KernelBundle,
        path: &Path,
        format: FileFormat,
    ) -> Result<(), OpError> {
        Ok(kb.write(self.current()?, path, format)?)
    }
}
