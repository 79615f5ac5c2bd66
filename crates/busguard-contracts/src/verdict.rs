//! The terminal decision the engine returns.

use serde::{Deserialize, Serialize};

/// The outcome of a single access check: either the action proceeds or it
/// does not. There is no third state — `RequireApproval`-style verdicts
/// belong to richer policy engines, not this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessVerdict {
    Allow,
    Deny,
}

impl AccessVerdict {
    pub fn is_allow(self) -> bool {
        matches!(self, AccessVerdict::Allow)
    }
}
