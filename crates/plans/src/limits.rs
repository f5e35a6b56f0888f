//! Plan limit checking: current usage vs. the caps of a tier.
//!
//! Pure comparison only. Nothing here refuses a staff creation or suspends a
//! tenant; enforcement belongs to the collaborator that mutates usage.

use serde::{Deserialize, Serialize};

use crate::catalog::{PlanTier, StaffCap};

/// A tenant's current resource counts. Mutated elsewhere (staff/location
/// CRUD); this layer only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUsage {
    pub staff_count: u32,
    pub location_count: u32,
    pub admin_role_count: u32,
}

/// Outcome of a limit check: one flag and one utilization ratio per resource.
///
/// An unbounded cap reports `within_limit = true` and usage `0.0` regardless
/// of the count; there is no division by a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimitReport {
    pub staff_within_limit: bool,
    pub locations_within_limit: bool,
    pub admin_roles_within_limit: bool,
    pub staff_usage: f64,
    pub locations_usage: f64,
    pub admin_roles_usage: f64,
}

/// Compare usage against a tier's caps.
pub fn check_plan_limits(usage: &TenantUsage, plan: &PlanTier) -> PlanLimitReport {
    let (staff_within_limit, staff_usage) = match plan.max_staff {
        StaffCap::Unbounded => (true, 0.0),
        StaffCap::Limited(cap) => ratio(usage.staff_count, cap),
    };
    let (locations_within_limit, locations_usage) = ratio(usage.location_count, plan.max_locations);
    let (admin_roles_within_limit, admin_roles_usage) =
        ratio(usage.admin_role_count, plan.max_admin_roles);

    PlanLimitReport {
        staff_within_limit,
        locations_within_limit,
        admin_roles_within_limit,
        staff_usage,
        locations_usage,
        admin_roles_usage,
    }
}

fn ratio(count: u32, cap: u32) -> (bool, f64) {
    // Caps in the catalog are >= 1, so the division is well-defined.
    (count <= cap, f64::from(count) / f64::from(cap))
}
