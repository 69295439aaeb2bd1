//! Context matching.
//!
//! Every statement kind is only legal under certain parent blocks. The
//! driver hands the evaluator the stack of currently open block statements
//! (outermost first); this module checks the top of that stack against the
//! allowed parent kinds and hands back the parent statement for payload
//! extraction.
//!
//! The sentinel [`StatementKind::None`] in an allowed set means "legal at
//! top level", i.e. with an empty context stack.

use esdl_ast::{Statement, StatementKind};

use crate::error::{EvalError, EvalErrorCode, EvalResult};

/// Check that the innermost open block is one of `allowed`.
///
/// Returns the parent statement, or `None` when the statement is at top
/// level (empty stack, `StatementKind::None` allowed). Errors carry the
/// offending parent's kind as context; callers fill in `relevant_content`.
pub fn expect_context<'a>(
    context_stack: &'a [Statement],
    allowed: &[StatementKind],
) -> EvalResult<Option<&'a Statement>> {
    let Some(context) = context_stack.last() else {
        if allowed.contains(&StatementKind::None) {
            return Ok(None);
        }
        return Err(EvalError::bare(EvalErrorCode::InvalidContext));
    };

    if allowed.contains(&context.kind()) {
        return Ok(Some(context));
    }

    Err(EvalError::bare(EvalErrorCode::InvalidContext).in_context(context.kind()))
}

/// Like [`expect_context`], for statements that are never legal at top
/// level: the parent statement is mandatory.
pub fn require_context<'a>(
    context_stack: &'a [Statement],
    allowed: &[StatementKind],
) -> EvalResult<&'a Statement> {
    expect_context(context_stack, allowed)?
        .ok_or_else(|| EvalError::bare(EvalErrorCode::InvalidContext))
}
