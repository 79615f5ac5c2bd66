//! # busguard-contracts
//!
//! Shared types for the busguard access-control policy engine: the
//! `Credential` and `ActionRegistry` inputs, the `AccessVerdict` output,
//! the `NameResolver` boundary trait, and the `PolicyError` taxonomy.
//!
//! No business logic lives in this crate — only data definitions and the
//! error type. `busguard-policy` depends on this crate; this crate
//! depends on nothing in the workspace.

pub mod action;
pub mod credential;
pub mod error;
pub mod resolver;
pub mod verdict;

pub use action::{ActionDescriptor, ActionRegistry, RESERVED_NAMES};
pub use credential::Credential;
pub use error::{PolicyError, PolicyParseResult};
pub use resolver::{NameResolver, NullResolver};
pub use verdict::AccessVerdict;
