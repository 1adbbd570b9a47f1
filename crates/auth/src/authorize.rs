use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{actual}' does not satisfy required role '{required}'")]
    Forbidden { required: Role, actual: Role },
}

/// Authorize an actor's role against a required role.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Lower rank = more privilege: the actor passes when its rank is numerically
/// less than or equal to the requirement's.
pub fn authorize(actual: Role, required: Role) -> Result<(), AuthzError> {
    if actual.rank() <= required.rank() {
        Ok(())
    } else {
        Err(AuthzError::Forbidden { required, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stronger_role_satisfies_weaker_requirement() {
        assert!(authorize(Role::Admin, Role::Manager).is_ok());
        assert!(authorize(Role::Admin, Role::Worker).is_ok());
        assert!(authorize(Role::Manager, Role::Worker).is_ok());
    }

    #[test]
    fn equal_role_satisfies_requirement() {
        assert!(authorize(Role::Manager, Role::Manager).is_ok());
        assert!(authorize(Role::Worker, Role::Worker).is_ok());
    }

    #[test]
    fn weaker_role_is_forbidden() {
        let err = authorize(Role::Worker, Role::Manager).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                required: Role::Manager,
                actual: Role::Worker,
            }
        );

        assert!(authorize(Role::Manager, Role::Admin).is_err());
    }
}
