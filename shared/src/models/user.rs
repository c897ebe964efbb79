//! Staff roles

use serde::{Deserialize, Serialize};

/// Role attached to a staff profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Cashier => "cashier",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "cashier" => Ok(UserRole::Cashier),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Roles allowed to change inventory, catalog and order status
pub const INVENTORY_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Manager];

/// Roles allowed to read reports
pub const REPORT_ROLES: &[UserRole] = &[UserRole::Admin];

/// Whether `role` is one of `allowed`. A missing role never passes.
pub fn role_allowed(role: Option<UserRole>, allowed: &[UserRole]) -> bool {
    role.map(|r| allowed.contains(&r)).unwrap_or(false)
}
