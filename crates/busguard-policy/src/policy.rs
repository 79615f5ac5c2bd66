//! The compiled, shareable policy handle.
//!
//! The legacy C API this engine descends from used manual
//! `da_policy_ref`/`da_policy_unref` reference counting around an
//! opaque `DAPolicy*`. `Arc` is the idiomatic Rust replacement: cloning
//! a `Policy` is the ref, dropping the last clone is the unref, and
//! there is no way to leak or double-free the underlying rule list.

use std::sync::Arc;

use busguard_contracts::ActionRegistry;
use tracing::{debug, warn};

use crate::parser;
use crate::rule::Rule;

#[derive(Debug)]
struct PolicyInner {
    rules: Vec<Rule>,
}

/// A parsed, immutable policy. Cheap to clone (an `Arc` bump) and safe
/// to share across threads.
#[derive(Debug, Clone)]
pub struct Policy {
    inner: Arc<PolicyInner>,
}

impl Policy {
    /// Parse `text` with no registered actions. Only `user()`, `group()`,
    /// and `*` atoms can appear in such a policy; any action predicate
    /// fails with `UnknownAction`.
    ///
    /// Returns `None` on any parse error, mirroring the legacy API's
    /// "return NULL on failure" contract — callers who need the reason
    /// should use [`Policy::new_full`] directly, or call
    /// [`crate::parser::parse`] themselves.
    pub fn new(text: &str) -> Option<Self> {
        Self::new_full(text, &ActionRegistry::new(Vec::new()))
    }

    /// Parse `text` against `registry`, returning `None` on any error.
    pub fn new_full(text: &str, registry: &ActionRegistry) -> Option<Self> {
        match parser::parse(text, registry) {
            Ok(rules) => {
                debug!(rule_count = rules.len(), "policy parsed");
                Some(Self { inner: Arc::new(PolicyInner { rules }) })
            }
            Err(err) => {
                warn!(%err, "policy parse failed");
                None
            }
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.inner.rules
    }

    /// Structural equality: two policies are equal iff their rule lists
    /// are equal element-for-element, in order. Rule order is
    /// significant for evaluation (first match wins), so unlike
    /// `Conjunction`/`Disjunction` this is not a multiset comparison.
    pub fn equal(&self, other: &Policy) -> bool {
        self.inner.rules == other.inner.rules
    }
}

impl PartialEq for Policy {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}
