use kernel_api::KernelError;

/// Errors from modeling operations.
///
/// This is the whole failure surface of the orchestration layer: every
/// kernel-level failure is caught at the boundary of a public operation and
/// converted here. On any failure the owning entity's shape is exactly as it
/// was before the call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    /// The kernel completed without raising an error but reported its build
    /// step unfinished.
    #[error("kernel reported the build step unfinished")]
    Incomplete,

    /// The kernel handed back a structurally empty shape.
    #[error("kernel returned a null shape")]
    NullResult,

    /// A parameter set's length matches none of the accepted distribution
    /// policies (1, N or 2N values for N eligible elements).
    #[error("{supplied} parameters supplied for {eligible} eligible elements")]
    ParameterCountMismatch { supplied: usize, eligible: usize },

    /// The candidate result failed the validity analysis.
    #[error("result failed topological validity analysis")]
    InvalidTopology,
}
