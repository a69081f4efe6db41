use kernel_api::{BuildOutcome, KernelIntrospect, ShapeHandle};
use tracing::debug;

use crate::types::OpError;

/// Accept or reject a kernel build outcome before it may replace canonical
/// state.
///
/// An unfinished build, a null shape, or a candidate that fails the
/// topological validity analysis is rejected; the caller's existing shape is
/// never touched before this returns. This is the single checkpoint keeping
/// malformed kernel results out of good state.
pub fn validate(
    introspect: &dyn KernelIntrospect,
    outcome: BuildOutcome,
) -> Result<ShapeHandle, OpError> {
    if !outcome.done {
        return Err(OpError::Incomplete);
    }
    let candidate = outcome.shape.ok_or(OpError::NullResult)?;
    if !introspect.analyze(&candidate)? {
        debug!("candidate rejected by validity analysis");
        return Err(OpError::InvalidTopology);
    }
    Ok(candidate)
}
