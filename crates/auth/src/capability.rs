//! Capabilities and the role permission table.
//!
//! The table below IS the access-control policy. Every role row lists its
//! grants in full; there is no wildcard and no role inherits from another.
//! Changing who may do what means editing exactly one `matches!` arm.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use hure_core::DomainError;

use crate::role::Role;

/// A named thing an account can be allowed to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewStaff,
    CreateStaff,
    EditStaff,
    DeleteStaff,
    ViewSchedule,
    ManageSchedule,
    RequestLeave,
    ApproveLeave,
    ViewPayroll,
    ManagePayroll,
    ManageLocations,
    ManageBilling,
    InviteAdmins,
    ViewReports,
    ManageSettings,
}

impl Capability {
    pub const ALL: [Capability; 15] = [
        Capability::ViewStaff,
        Capability::CreateStaff,
        Capability::EditStaff,
        Capability::DeleteStaff,
        Capability::ViewSchedule,
        Capability::ManageSchedule,
        Capability::RequestLeave,
        Capability::ApproveLeave,
        Capability::ViewPayroll,
        Capability::ManagePayroll,
        Capability::ManageLocations,
        Capability::ManageBilling,
        Capability::InviteAdmins,
        Capability::ViewReports,
        Capability::ManageSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewStaff => "view_staff",
            Capability::CreateStaff => "create_staff",
            Capability::EditStaff => "edit_staff",
            Capability::DeleteStaff => "delete_staff",
            Capability::ViewSchedule => "view_schedule",
            Capability::ManageSchedule => "manage_schedule",
            Capability::RequestLeave => "request_leave",
            Capability::ApproveLeave => "approve_leave",
            Capability::ViewPayroll => "view_payroll",
            Capability::ManagePayroll => "manage_payroll",
            Capability::ManageLocations => "manage_locations",
            Capability::ManageBilling => "manage_billing",
            Capability::InviteAdmins => "invite_admins",
            Capability::ViewReports => "view_reports",
            Capability::ManageSettings => "manage_settings",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown capability '{s}'")))
    }
}

impl Role {
    /// The permission table. Each arm is one complete role row.
    pub fn allows(self, capability: Capability) -> bool {
        use Capability::*;

        match self {
            Role::Owner => matches!(
                capability,
                ViewStaff
                    | CreateStaff
                    | EditStaff
                    | DeleteStaff
                    | ViewSchedule
                    | ManageSchedule
                    | RequestLeave
                    | ApproveLeave
                    | ViewPayroll
                    | ManagePayroll
                    | ManageLocations
                    | ManageBilling
                    | InviteAdmins
                    | ViewReports
                    | ManageSettings
            ),
            Role::Admin => matches!(
                capability,
                ViewStaff
                    | CreateStaff
                    | EditStaff
                    | DeleteStaff
                    | ViewSchedule
                    | ManageSchedule
                    | RequestLeave
                    | ApproveLeave
                    | ViewPayroll
                    | ManagePayroll
                    | ManageLocations
                    | ViewReports
                    | ManageSettings
            ),
            Role::Hr => matches!(
                capability,
                ViewStaff
                    | EditStaff
                    | ViewSchedule
                    | ManageSchedule
                    | RequestLeave
                    | ApproveLeave
                    | ViewPayroll
                    | ViewReports
            ),
            Role::Employee => matches!(capability, ViewSchedule | RequestLeave),
        }
    }

    /// The granted capabilities of a role, in table order (audit/display).
    pub fn capabilities(self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.allows(*c))
            .collect()
    }
}

/// Fail-closed string-keyed resolver.
///
/// Unknown role or unknown capability answer `false`, never an error: callers
/// at the HTTP edge get a denial, not a 500.
pub fn has_permission(role: &str, capability: &str) -> bool {
    let (Ok(role), Ok(capability)) = (role.parse::<Role>(), capability.parse::<Capability>())
    else {
        return false;
    };
    role.allows(capability)
}
