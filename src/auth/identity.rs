//! Caller identity and the privilege policy.

use std::collections::BTreeSet;

/// Role claim that unlocks the unrestricted listings.
pub const ADMIN_ROLE: &str = "Administrador";

/// Authenticated caller, built once per request from validated token claims.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Identity {
            subject: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Exact, case-sensitive membership test on the caller's role claims.
pub fn has_privilege(identity: &Identity, role: &str) -> bool {
    identity.roles.contains(role)
}
