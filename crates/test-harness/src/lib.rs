//! Test harness for the solid-modeling orchestration layer.
//!
//! Provides fixture builders over the mock kernel and assertion helpers
//! with diagnostic output, used by the end-to-end scenarios in `tests/`.
//!
//! - [`helpers`] — entity and fixture builders
//! - [`assertions`] — assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;

pub use helpers::HarnessError;
