//! Assertion helpers with diagnostic output.
//!
//! Every failure names the scenario context and reports expected vs actual.

use brep_types::TopoKind;
use kernel_api::KernelIntrospect;
use modeling_ops::Solid;

use crate::helpers::{approx_eq, HarnessError};

/// Assert exact topology counts (E, F) and body count for an entity.
pub fn assert_topology_eq(
    introspect: &dyn KernelIntrospect,
    solid: &Solid,
    expected_e: usize,
    expected_f: usize,
    expected_bodies: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let shape = solid.shape().ok_or_else(|| HarnessError::AssertionFailed {
        detail: format!("[{ctx}] entity holds no shape"),
    })?;
    let e = introspect.sub_shapes(shape, TopoKind::Edge)?.len();
    let f = introspect.sub_shapes(shape, TopoKind::Face)?.len();
    let bodies = solid.num_solids(introspect)?;

    if e == expected_e && f == expected_f && bodies == expected_bodies {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected E={} F={} bodies={}, got E={} F={} bodies={}",
                ctx, expected_e, expected_f, expected_bodies, e, f, bodies,
            ),
        })
    }
}

/// Assert the entity holds exactly one valid body.
pub fn assert_single_valid_body(
    introspect: &dyn KernelIntrospect,
    solid: &Solid,
    ctx: &str,
) -> Result<(), HarnessError> {
    let shape = solid.shape().ok_or_else(|| HarnessError::AssertionFailed {
        detail: format!("[{ctx}] entity holds no shape"),
    })?;
    if !introspect.analyze(shape)? {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] shape failed validity analysis"),
        });
    }
    let bodies = solid.num_solids(introspect)?;
    if bodies != 1 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected 1 body, got {bodies}"),
        });
    }
    Ok(())
}

/// Assert a measured quantity within relative tolerance.
pub fn assert_close(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if approx_eq(actual, expected, tol) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected {expected:.6}, got {actual:.6} (tol={tol})"),
        })
    }
}
