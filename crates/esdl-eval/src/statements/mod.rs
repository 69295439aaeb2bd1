//! Per-statement dispatchers.
//!
//! One function per statement kind. Each dispatcher validates the nesting
//! context and parameter list, resolves the names its payload mentions, and
//! applies its registry mutations inline. Mutations are not rolled back on
//! error: a dispatcher that fails halfway may leave earlier side effects
//! visible, and the driver discards the package on any error.

pub(crate) mod decls;
pub(crate) mod fields;
pub(crate) mod notify;
pub(crate) mod system;

use crate::error::{EvalError, EvalErrorCode};

/// Context-shaped error with no content; callers attach content when the
/// statement names something useful.
pub(crate) fn invalid_context() -> EvalError {
    EvalError::bare(EvalErrorCode::InvalidContext)
}
