//! # Roles and Sessions
//!
//! The caller's identity travels as an explicit [`Session`] value into every
//! command. Nothing in the workspace reads a "current user" from ambient
//! state.
//!
//! ## Capability Matrix
//! ```text
//! ┌──────────────────┬─────────┬──────────┬──────────┐
//! │ Capability       │  admin  │ employee │  client  │
//! ├──────────────────┼─────────┼──────────┼──────────┤
//! │ BrowseCatalog    │    ✓    │    ✓     │    ✓     │
//! │ ManageCatalog    │    ✓    │    ✓     │          │
//! │ RegisterSale     │    ✓    │    ✓     │          │
//! │ ViewReports      │    ✓    │          │          │
//! │ ManageUsers      │    ✓    │          │          │
//! └──────────────────┴─────────┴──────────┴──────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::User;

// =============================================================================
// Role
// =============================================================================

/// What a user is, as far as the shop is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owner/manager: everything, including reports and user accounts.
    Admin,
    /// Shop floor: sells and keeps the catalog up to date.
    Employee,
    /// Customer: browses the catalog only.
    Client,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::Client];

    /// Stable lowercase name (also the stored value).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
        }
    }

    /// Whether this role grants `capability`.
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::BrowseCatalog => true,
            Capability::ManageCatalog | Capability::RegisterSale => {
                matches!(self, Role::Admin | Role::Employee)
            }
            Capability::ViewReports | Capability::ManageUsers => matches!(self, Role::Admin),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "client" => Ok(Role::Client),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Capability
// =============================================================================

/// An action family that a role may or may not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    BrowseCatalog,
    ManageCatalog,
    RegisterSale,
    ViewReports,
    ManageUsers,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Capability::BrowseCatalog => "browse the catalog",
            Capability::ManageCatalog => "manage the catalog",
            Capability::RegisterSale => "register sales",
            Capability::ViewReports => "view reports",
            Capability::ManageUsers => "manage users",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated caller.
///
/// Built from a [`User`] returned by the authentication gateway and passed
/// by reference into each command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl Session {
    /// Opens a session for a verified user.
    pub fn for_user(user: &User) -> Self {
        Session {
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.name.clone().unwrap_or_else(|| user.username.clone()),
            role: user.role,
        }
    }

    /// The id stamped on sales made in this session.
    #[inline]
    pub fn actor_id(&self) -> i64 {
        self.user_id
    }

    /// Checks the capability, returning [`CoreError::Forbidden`] if missing.
    pub fn require(&self, capability: Capability) -> CoreResult<()> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                role: self.role,
                capability,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user_id: 7,
            username: "maria".to_string(),
            display_name: "Maria".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_can_do_everything() {
        let admin = session(Role::Admin);
        for cap in [
            Capability::BrowseCatalog,
            Capability::ManageCatalog,
            Capability::RegisterSale,
            Capability::ViewReports,
            Capability::ManageUsers,
        ] {
            assert!(admin.require(cap).is_ok(), "admin denied {cap}");
        }
    }

    #[test]
    fn test_employee_sells_but_cannot_see_reports() {
        let employee = session(Role::Employee);
        assert!(employee.require(Capability::RegisterSale).is_ok());
        assert!(employee.require(Capability::ManageCatalog).is_ok());
        assert!(matches!(
            employee.require(Capability::ViewReports),
            Err(CoreError::Forbidden { role: Role::Employee, .. })
        ));
    }

    #[test]
    fn test_client_only_browses() {
        let client = session(Role::Client);
        assert!(client.require(Capability::BrowseCatalog).is_ok());
        assert!(client.require(Capability::RegisterSale).is_err());
        assert!(client.require(Capability::ManageCatalog).is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" employee ".parse::<Role>().unwrap(), Role::Employee);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_session_uses_username_when_name_missing() {
        let user = User {
            id: 3,
            username: "joao".to_string(),
            role: Role::Employee,
            name: None,
            birth_date: None,
            email: None,
            phone: None,
            national_id: None,
            profile_image: None,
        };
        let session = Session::for_user(&user);
        assert_eq!(session.display_name, "joao");
        assert_eq!(session.actor_id(), 3);
    }
}
