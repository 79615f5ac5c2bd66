//! The internal error taxonomy for policy construction.
//!
//! Every fallible step in parsing returns a typed `PolicyError`. The
//! public `Policy::new`/`Policy::new_full` constructors collapse this to
//! `Option<Policy>` — the engine never reports *which* error occurred to
//! the caller (this mirrors the original `libdbusaccess` contract, used
//! by long-lived daemons whose upstream config validation already
//! surfaces diagnostics). Keeping the typed error internally lets unit
//! tests assert on the exact failure mode even though the public API
//! cannot.

use thiserror::Error;

/// Why a policy failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("policy text is empty or whitespace-only")]
    EmptyOrWhitespace,

    #[error("unsupported policy version '{found}' (expected {expected})")]
    BadVersion { found: String, expected: u32 },

    #[error("lex error at byte {pos}: {reason}")]
    LexError { pos: usize, reason: String },

    #[error("syntax error at byte {pos}: {reason}")]
    SyntaxError { pos: usize, reason: String },

    #[error("unknown action '{name}'")]
    UnknownAction { name: String },

    #[error("action '{name}' used with the wrong argument arity")]
    ArityMismatch { name: String },

    #[error("wildcard '*' cannot be combined with other atoms in a conjunction")]
    WildcardMixing,
}

/// Convenience alias used throughout the parser.
pub type PolicyParseResult<T> = Result<T, PolicyError>;
