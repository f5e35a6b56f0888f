//! Account roles.
//!
//! Fixed set, no tenant-defined roles and no hierarchy: `Admin` is not a
//! subset or superset of `Owner` by construction, each row of the permission
//! table is written out in full.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use hure_core::DomainError;

/// Role of an account within its tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Hr,
    Employee,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Hr, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Hr => "hr",
            Role::Employee => "employee",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "hr" => Ok(Role::Hr),
            "employee" => Ok(Role::Employee),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}
