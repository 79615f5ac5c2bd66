//! The atomic predicates a rule's condition is built from.
//!
//! `Atom` is a closed tagged union — no open-ended extensibility is
//! needed, so pattern matching on the variant is the natural evaluator
//! shape (see `engine::eval_atom`). Every variant derives `Ord` so that
//! `rule::Conjunction`/`rule::Disjunction` can implement the structural,
//! commutativity-respecting equality required by spec §4.6 by sorting
//! at construction time rather than comparing as true multisets at
//! every `==`.

/// The gid half of a `user(A:B)` tuple, as written in the rule text.
/// Resolution of the symbolic form happens at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GidSpec {
    Numeric(u32),
    Symbolic(String),
}

/// A single atomic predicate, independent of any negation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Atom {
    /// Matches when the caller's uid equals `uid`, and — when `gid` is
    /// present (the `user(uid:gid)` tuple form) — the caller's *primary*
    /// gid also matches `gid` (numerically, or via `resolve_group` for
    /// the symbolic form). This compound shape is required by the
    /// `user(1:1)` tuple scenario (spec §8 "User tuple"): the bare `uid`
    /// alone is not sufficient to reject a caller with the same uid but
    /// a different gid.
    UserId { uid: u32, gid: Option<GidSpec> },

    /// Matches when `resolve_user(name)` yields the caller's uid, and
    /// (if `gid` is present) it matches the caller's primary gid the
    /// same way as `UserId`'s `gid` field.
    UserName { name: String, gid: Option<GidSpec> },

    /// Matches when `gid` is the caller's primary gid or appears among
    /// its supplementary gids.
    GroupId { gid: u32 },

    /// Matches when `resolve_group(name)` equals the caller's primary
    /// gid or appears among its supplementary gids.
    GroupName { name: String },

    /// Matches when the runtime action id equals `action_id` and the
    /// runtime argument matches `pattern` per the glob rules in
    /// `crate::glob`. `None` means a no-argument action, which matches
    /// only when the runtime argument is absent.
    Action { action_id: u32, pattern: Option<String> },

    /// Always matches. Written `*` in the DSL; must stand alone in its
    /// conjunction (enforced by the parser, not by this type).
    Wildcard,
}

/// An atom paired with its negation flag, as written in the DSL (`!` or
/// nothing).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NegatedAtom {
    pub atom: Atom,
    pub negated: bool,
}

impl NegatedAtom {
    pub fn new(atom: Atom, negated: bool) -> Self {
        Self { atom, negated }
    }
}
