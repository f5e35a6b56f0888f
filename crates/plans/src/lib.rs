//! `hure-plans` — subscription plan catalog, bundle pricing, and plan limits.
//!
//! Everything here is static data plus pure functions: the catalog is fixed at
//! compile time, quotes are recomputed on demand and never persisted, and the
//! limit checker only reports — enforcement is the caller's job.

pub mod catalog;
pub mod limits;
pub mod pricing;

pub use catalog::{plan_details, PlanProduct, PlanTier, StaffCap, CATALOG, DEFAULT_CARE_KEY};
pub use limits::{check_plan_limits, PlanLimitReport, TenantUsage};
pub use pricing::{bundle_quote, BundleQuote, BUNDLE_DISCOUNT_PERCENT};
