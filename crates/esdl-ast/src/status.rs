//! Parse status codes the driver forwards to the evaluator hooks.

use serde::{Deserialize, Serialize};

/// Outcome of parsing one statement, as reported by the parser to the driver.
///
/// The evaluator itself only cares about [`ParseStatus::BlockEnd`], which
/// triggers the end-of-block postcondition hook; the other values exist so a
/// driver can forward its status without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    Ok,
    BlockBegin,
    BlockEnd,
    ExpectedStatementEnd,
}

impl ParseStatus {
    /// True when this status closes the innermost open block.
    pub fn is_block_end(self) -> bool {
        self == ParseStatus::BlockEnd
    }
}
