//! Role-based [`Authorizer`].

use servicehub_domain::caller::Caller;

use crate::ports::Authorizer;

/// Grants privilege to callers whose role is in a configured set.
#[derive(Debug, Clone)]
pub struct RoleAuthorizer {
    privileged_roles: Vec<String>,
}

impl RoleAuthorizer {
    #[must_use]
    pub fn new(privileged_roles: Vec<String>) -> Self {
        Self { privileged_roles }
    }
}

impl Authorizer for RoleAuthorizer {
    fn is_authorized(&self, caller: &Caller) -> bool {
        caller
            .role
            .as_deref()
            .is_some_and(|role| self.privileged_roles.iter().any(|r| r == role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servicehub_domain::id::UserId;

    fn authorizer() -> RoleAuthorizer {
        RoleAuthorizer::new(vec!["admin".to_string(), "operator".to_string()])
    }

    #[test]
    fn should_authorize_privileged_role() {
        let caller = Caller::new(UserId::new()).with_role("operator");
        assert!(authorizer().is_authorized(&caller));
    }

    #[test]
    fn should_reject_other_role() {
        let caller = Caller::new(UserId::new()).with_role("viewer");
        assert!(!authorizer().is_authorized(&caller));
    }

    #[test]
    fn should_reject_caller_without_role() {
        let caller = Caller::new(UserId::new());
        assert!(!authorizer().is_authorized(&caller));
    }

    #[test]
    fn should_reject_everyone_when_no_roles_configured() {
        let caller = Caller::new(UserId::new()).with_role("admin");
        assert!(!RoleAuthorizer::new(vec![]).is_authorized(&caller));
    }
}
