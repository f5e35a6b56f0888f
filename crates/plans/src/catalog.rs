//! Static plan catalog.
//!
//! Two products are sold: **core** (the staff-management workspace, priced by
//! clinic size) and **care** (the patient-care add-on, staff-unlimited and
//! priced by location footprint). Tiers are defined at compile time; there is
//! no runtime plan administration.

use core::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use hure_core::DomainError;

/// Which product line a plan tier belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanProduct {
    Core,
    Care,
}

impl PlanProduct {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanProduct::Core => "core",
            PlanProduct::Care => "care",
        }
    }
}

impl core::fmt::Display for PlanProduct {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanProduct {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(PlanProduct::Core),
            "care" => Ok(PlanProduct::Care),
            other => Err(DomainError::validation(format!(
                "unknown plan product '{other}'"
            ))),
        }
    }
}

/// Cap on staff headcount for a tier.
///
/// Care tiers are staff-unbounded; the limit checker must treat that as
/// "always within limit, zero utilization" rather than dividing by a sentinel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StaffCap {
    Limited(u32),
    Unbounded,
}

impl Serialize for StaffCap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StaffCap::Limited(n) => serializer.serialize_u32(*n),
            StaffCap::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// A priced subscription tier with resource caps.
///
/// Prices are integers in minor currency units and currency-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTier {
    pub product: PlanProduct,
    pub key: &'static str,
    pub label: &'static str,
    pub price: u64,
    pub max_staff: StaffCap,
    pub max_locations: u32,
    pub max_admin_roles: u32,
}

/// The full catalog, fixed at compile time.
pub const CATALOG: &[PlanTier] = &[
    PlanTier {
        product: PlanProduct::Core,
        key: "starter",
        label: "HURE Core Starter",
        price: 4000,
        max_staff: StaffCap::Limited(10),
        max_locations: 1,
        max_admin_roles: 1,
    },
    PlanTier {
        product: PlanProduct::Core,
        key: "essential",
        label: "HURE Core Essential",
        price: 8000,
        max_staff: StaffCap::Limited(25),
        max_locations: 3,
        max_admin_roles: 3,
    },
    PlanTier {
        product: PlanProduct::Core,
        key: "growth",
        label: "HURE Core Growth",
        price: 15000,
        max_staff: StaffCap::Limited(100),
        max_locations: 10,
        max_admin_roles: 5,
    },
    PlanTier {
        product: PlanProduct::Care,
        key: "care_basic",
        label: "HURE Care Basic",
        price: 6000,
        max_staff: StaffCap::Unbounded,
        max_locations: 1,
        max_admin_roles: 2,
    },
    PlanTier {
        product: PlanProduct::Care,
        key: "care_standard",
        label: "HURE Care Standard",
        price: 10000,
        max_staff: StaffCap::Unbounded,
        max_locations: 5,
        max_admin_roles: 5,
    },
    PlanTier {
        product: PlanProduct::Care,
        key: "care_plus",
        label: "HURE Care Plus",
        price: 18000,
        max_staff: StaffCap::Unbounded,
        max_locations: 15,
        max_admin_roles: 10,
    },
];

/// Care tier used for a bundle when the buyer did not pick one.
pub const DEFAULT_CARE_KEY: &str = "care_standard";

/// Look up a tier by product and key. Unknown keys yield `None`, never panic.
pub fn plan_details(product: PlanProduct, key: &str) -> Option<&'static PlanTier> {
    CATALOG
        .iter()
        .find(|tier| tier.product == product && tier.key == key)
}
