//! Identity, sessions, and the admin allow-list.

use std::collections::HashSet;

pub mod extract;
pub mod service;

pub use extract::{AdminUser, CurrentUser};
pub use service::{AuthError, AuthService, LocalAuthService, SignedIn, MIN_PASSWORD_LEN};

/// The fixed set of admin email addresses. A plain membership test over
/// raw strings, case-insensitive on the email side.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_insensitive_and_trimmed() {
        let admins = AdminAllowList::new(["admin@srm.edu.in", " Dean@SRM.edu.in "]);
        assert!(admins.is_admin("admin@srm.edu.in"));
        assert!(admins.is_admin("ADMIN@srm.edu.in"));
        assert!(admins.is_admin("dean@srm.edu.in"));
        assert!(!admins.is_admin("student@srm.edu.in"));
    }

    #[test]
    fn empty_entries_are_ignored() {
        let admins = AdminAllowList::new(["", "  ", "a@b.c"]);
        assert_eq!(admins.len(), 1);
    }
}
