//! Policy evaluation.
//!
//! The decision algorithm, in order:
//!
//! 1. If a credential is present and is the superuser (`uid == 0`), it
//!    is always allowed — even against an absent policy or one with
//!    zero rules. The bypass is checked before the policy is consulted
//!    at all, and is not overridable by policy content.
//! 2. An absent policy (`policy: None`) falls back to `default_verdict`.
//! 3. Otherwise rules are walked in textual order; the first rule whose
//!    condition matches the caller/action/argument wins. No further
//!    rules are consulted once one matches.
//! 4. If no rule matches, `default_verdict` is returned.

use busguard_contracts::{AccessVerdict, Credential, NameResolver};
use tracing::{debug, trace};

use crate::atom::{Atom, GidSpec, NegatedAtom};
use crate::glob::glob_match;
use crate::policy::Policy;
use crate::rule::{Conjunction, Disjunction};

/// Decide whether `credential` may invoke `action_id` with `argument`
/// under `policy`.
///
/// `credential` may be absent (e.g. an unauthenticated or unverifiable
/// peer): every credential-dependent atom then evaluates false, so only
/// `Wildcard` conditions (and their negations) can match.
///
/// `action_id == 0` never matches any `Action` atom — it denotes "no
/// action is being checked" (e.g. a pure credential check) and is
/// treated the same as an absent argument for matching purposes.
pub fn check(
    policy: Option<&Policy>,
    credential: Option<&Credential>,
    action_id: u32,
    argument: Option<&str>,
    default_verdict: AccessVerdict,
    resolver: &dyn NameResolver,
) -> AccessVerdict {
    debug!(
        uid = ?credential.map(|c| c.uid),
        action_id,
        argument = ?argument,
        "evaluating access check"
    );

    if let Some(cred) = credential {
        if cred.is_root() {
            debug!(uid = cred.uid, "superuser bypass");
            return AccessVerdict::Allow;
        }
    }

    let Some(policy) = policy else {
        debug!("no policy present, using default verdict");
        return default_verdict;
    };

    for (index, rule) in policy.rules().iter().enumerate() {
        trace!(index, "attempting rule match");
        if eval_disjunction(&rule.condition, credential, action_id, argument, resolver) {
            debug!(verdict = ?rule.verdict, "rule matched");
            return rule.verdict;
        }
    }

    trace!("no rule matched, using default verdict");
    default_verdict
}

fn eval_disjunction(
    disjunction: &Disjunction,
    credential: Option<&Credential>,
    action_id: u32,
    argument: Option<&str>,
    resolver: &dyn NameResolver,
) -> bool {
    disjunction
        .conjunctions()
        .iter()
        .any(|c| eval_conjunction(c, credential, action_id, argument, resolver))
}

fn eval_conjunction(
    conjunction: &Conjunction,
    credential: Option<&Credential>,
    action_id: u32,
    argument: Option<&str>,
    resolver: &dyn NameResolver,
) -> bool {
    conjunction
        .atoms()
        .iter()
        .all(|a| eval_negated_atom(a, credential, action_id, argument, resolver))
}

fn eval_negated_atom(
    negated: &NegatedAtom,
    credential: Option<&Credential>,
    action_id: u32,
    argument: Option<&str>,
    resolver: &dyn NameResolver,
) -> bool {
    let result = eval_atom(&negated.atom, credential, action_id, argument, resolver);
    if negated.negated {
        !result
    } else {
        result
    }
}

fn gid_matches(spec: &GidSpec, credential: &Credential, resolver: &dyn NameResolver) -> bool {
    let gid = match spec {
        GidSpec::Numeric(gid) => Some(*gid),
        GidSpec::Symbolic(name) => resolver.resolve_group(name),
    };
    match gid {
        Some(gid) => credential.gid == gid,
        None => false,
    }
}

/// Every credential-dependent atom (`UserId`, `UserName`, `GroupId`,
/// `GroupName`) is false when `credential` is absent; `Wildcard` and
/// `Action` atoms don't depend on the credential at all.
fn eval_atom(
    atom: &Atom,
    credential: Option<&Credential>,
    action_id: u32,
    argument: Option<&str>,
    resolver: &dyn NameResolver,
) -> bool {
    match atom {
        Atom::Wildcard => true,

        Atom::UserId { uid, gid } => match credential {
            Some(cred) => {
                cred.uid == *uid && gid.as_ref().map_or(true, |g| gid_matches(g, cred, resolver))
            }
            None => false,
        },

        Atom::UserName { name, gid } => match (credential, resolver.resolve_user(name)) {
            (Some(cred), Some(uid)) => {
                cred.uid == uid && gid.as_ref().map_or(true, |g| gid_matches(g, cred, resolver))
            }
            _ => false,
        },

        Atom::GroupId { gid } => credential.map_or(false, |cred| cred.has_gid(*gid)),

        Atom::GroupName { name } => match (credential, resolver.resolve_group(name)) {
            (Some(cred), Some(gid)) => cred.has_gid(gid),
            _ => false,
        },

        Atom::Action { action_id: atom_action_id, pattern } => {
            if *atom_action_id != action_id {
                return false;
            }
            match (pattern, argument) {
                (None, None) => true,
                (None, Some(_)) => false,
                (Some(p), None) => p == "*",
                (Some(p), Some(arg)) => glob_match(p, arg),
            }
        }
    }
}
