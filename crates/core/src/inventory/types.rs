use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceType {
    Ec2,
    S3,
    Rds,
    Lambda,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Ec2,
        ResourceType::S3,
        ResourceType::Rds,
        ResourceType::Lambda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Ec2 => "EC2",
            ResourceType::S3 => "S3",
            ResourceType::Rds => "RDS",
            ResourceType::Lambda => "LAMBDA",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EC2" => Ok(ResourceType::Ec2),
            "S3" => Ok(ResourceType::S3),
            "RDS" => Ok(ResourceType::Rds),
            "LAMBDA" => Ok(ResourceType::Lambda),
            _ => Err(ToolError::InvalidInput(format!(
                "unsupported resource type {raw}, expected EC2, S3, RDS or LAMBDA"
            ))),
        }
    }
}

/// Resource types selected by an inventory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryScope {
    All,
    Only(ResourceType),
}

impl InventoryScope {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().eq_ignore_ascii_case("ALL") {
            Ok(InventoryScope::All)
        } else {
            ResourceType::parse(raw).map(InventoryScope::Only)
        }
    }

    pub fn includes(&self, resource_type: ResourceType) -> bool {
        match self {
            InventoryScope::All => true,
            InventoryScope::Only(only) => *only == resource_type,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InventoryScope::All => "ALL",
            InventoryScope::Only(t) => t.as_str(),
        }
    }
}

/// A discovered resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub name: Option<String>,
    pub status: String,
    pub region: String,
    pub created_at: Option<DateTime<Utc>>,
    pub tags: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total: usize,
    pub by_type: BTreeMap<ResourceType, usize>,
    pub by_status: BTreeMap<String, usize>,
}

/// A resource inventory for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInventory {
    pub region: String,
    pub scope: String,
    pub resources: Vec<Resource>,
    pub summary: InventorySummary,
}

/// A resource that is not in a healthy state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnhealthyResource {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub status: String,
    pub reason: String,
}

/// Health of the resources in a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub region: String,
    pub scope: String,
    pub total: usize,
    pub healthy: usize,
    pub healthy_percentage: f64,
    pub by_status: BTreeMap<String, usize>,
    pub unhealthy: Vec<UnhealthyResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parse() {
        assert_eq!(ResourceType::parse("lambda").unwrap(), ResourceType::Lambda);
        assert_eq!(ResourceType::parse(" ec2 ").unwrap(), ResourceType::Ec2);
        assert!(ResourceType::parse("DYNAMODB").is_err());
    }

    #[test]
    fn test_inventory_scope() {
        assert_eq!(InventoryScope::parse("all").unwrap(), InventoryScope::All);
        let s3 = InventoryScope::parse("S3").unwrap();
        assert!(s3.includes(ResourceType::S3));
        assert!(!s3.includes(ResourceType::Rds));
        assert_eq!(s3.label(), "S3");
    }

    #[test]
    fn test_by_type_serializes_with_type_names() {
        let mut summary = InventorySummary::default();
        summary.by_type.insert(ResourceType::Lambda, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_type"]["LAMBDA"], 2);
    }
}
