//! The caller's OS identity as seen by the policy engine.

/// The OS credentials of a request initiator: a user id, a primary group
/// id, and zero or more supplementary group ids.
///
/// `uid == 0` denotes the superuser, which the evaluator always allows
/// regardless of policy content (see `busguard_policy::engine::check`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub uid: u32,
    pub gid: u32,
    pub supplementary_gids: Vec<u32>,
}

impl Credential {
    /// Build a credential with no supplementary groups.
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid, supplementary_gids: Vec::new() }
    }

    /// Build a credential with the given supplementary groups.
    pub fn with_groups(uid: u32, gid: u32, supplementary_gids: Vec<u32>) -> Self {
        Self { uid, gid, supplementary_gids }
    }

    /// True when this credential is the superuser.
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }

    /// True if `gid` is this credential's primary group or appears among
    /// its supplementary groups. The supplementary list is treated as an
    /// unordered set.
    pub fn has_gid(&self, gid: u32) -> bool {
        self.gid == gid || self.supplementary_gids.contains(&gid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_uid_is_root() {
        assert!(Credential::new(0, 0).is_root());
        assert!(!Credential::new(1, 0).is_root());
    }

    #[test]
    fn has_gid_checks_primary_and_supplementary() {
        let cred = Credential::with_groups(1, 1, vec![2, 3]);
        assert!(cred.has_gid(1));
        assert!(cred.has_gid(2));
        assert!(cred.has_gid(3));
        assert!(!cred.has_gid(4));
    }

    #[test]
    fn supplementary_gid_order_is_irrelevant() {
        let a = Credential::with_groups(1, 5, vec![4, 3]);
        let b = Credential::with_groups(1, 5, vec![3, 4]);
        assert_eq!(a.has_gid(4), b.has_gid(4));
        assert_eq!(a.has_gid(3), b.has_gid(3));
    }
}
