//! Resource inventory and health.

mod conversions;
mod health;
mod types;

pub use conversions::{
    bucket_resource, build_inventory, db_resource, function_resource, instance_resource,
    normalize_bucket_region, summarize_inventory,
};
pub use health::{build_health_report, unhealthy_reason};
pub use types::{
    HealthReport, InventoryScope, InventorySummary, Resource, ResourceInventory, ResourceType,
    UnhealthyResource,
};
