use serde::{Deserialize, Serialize};

/// Role held by an agent, used for rank-based authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Worker,
}

impl Role {
    /// Privilege rank: lower is stronger.
    ///
    /// The mapping is an explicit match so reordering the enum members can
    /// never silently change authorization decisions.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Manager => 1,
            Role::Worker => 2,
        }
    }

    /// Whether agents with this role may own products.
    ///
    /// Managers and workers own products; admins administer but never own.
    pub fn can_own_products(&self) -> bool {
        matches!(self, Role::Manager | Role::Worker)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Worker => "worker",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_mapping_is_fixed() {
        assert_eq!(Role::Admin.rank(), 0);
        assert_eq!(Role::Manager.rank(), 1);
        assert_eq!(Role::Worker.rank(), 2);
    }

    #[test]
    fn only_managers_and_workers_own_products() {
        assert!(!Role::Admin.can_own_products());
        assert!(Role::Manager.can_own_products());
        assert!(Role::Worker.can_own_products());
    }
}
