use serde::{Deserialize, Serialize};

use super::{Result, ToolError};

/// A tool the concierge exposes to the agent and the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "getCostAnalysis")]
    CostAnalysis,
    #[serde(rename = "getIdleResources")]
    IdleResources,
    #[serde(rename = "getCostOptimization")]
    CostOptimization,
    #[serde(rename = "getResourceInventory")]
    ResourceInventory,
    #[serde(rename = "getResourceDetails")]
    ResourceDetails,
    #[serde(rename = "getResourceHealth")]
    ResourceHealth,
    #[serde(rename = "getSecurityAssessment")]
    SecurityAssessment,
    #[serde(rename = "checkEncryptionStatus")]
    EncryptionStatus,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::CostAnalysis,
        Operation::IdleResources,
        Operation::CostOptimization,
        Operation::ResourceInventory,
        Operation::ResourceDetails,
        Operation::ResourceHealth,
        Operation::SecurityAssessment,
        Operation::EncryptionStatus,
    ];

    /// The operation name used in action-group schemas and response bodies.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CostAnalysis => "getCostAnalysis",
            Operation::IdleResources => "getIdleResources",
            Operation::CostOptimization => "getCostOptimization",
            Operation::ResourceInventory => "getResourceInventory",
            Operation::ResourceDetails => "getResourceDetails",
            Operation::ResourceHealth => "getResourceHealth",
            Operation::SecurityAssessment => "getSecurityAssessment",
            Operation::EncryptionStatus => "checkEncryptionStatus",
        }
    }

    /// The API path, e.g. `/cost-analysis`.
    pub fn api_path(&self) -> &'static str {
        match self {
            Operation::CostAnalysis => "/cost-analysis",
            Operation::IdleResources => "/idle-resources",
            Operation::CostOptimization => "/cost-optimization",
            Operation::ResourceInventory => "/resource-inventory",
            Operation::ResourceDetails => "/resource-details",
            Operation::ResourceHealth => "/resource-health",
            Operation::SecurityAssessment => "/security-assessment",
            Operation::EncryptionStatus => "/encryption-status",
        }
    }

    /// Resolves an operation from an action-group `apiPath`.
    ///
    /// Accepts the API path (`/cost-analysis`) or the operation name with or
    /// without a leading slash (`getCostAnalysis`, `/getCostAnalysis`).
    pub fn from_api_path(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let bare = trimmed.trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|op| op.api_path() == trimmed || op.name() == bare)
            .ok_or_else(|| ToolError::UnknownOperation(bare.to_string()))
    }

    /// Cost Explorer bills per request, so its results are worth caching.
    pub fn is_cacheable(&self) -> bool {
        matches!(
            self,
            Operation::CostAnalysis | Operation::IdleResources | Operation::CostOptimization
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_path_maps_every_path() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_api_path(op.api_path()).unwrap(), op);
        }
    }

    #[test]
    fn test_from_api_path_accepts_operation_names() {
        assert_eq!(
            Operation::from_api_path("getSecurityAssessment").unwrap(),
            Operation::SecurityAssessment
        );
        assert_eq!(
            Operation::from_api_path("/checkEncryptionStatus").unwrap(),
            Operation::EncryptionStatus
        );
    }

    #[test]
    fn test_from_api_path_unknown() {
        assert_eq!(
            Operation::from_api_path("/delete-everything"),
            Err(ToolError::UnknownOperation("delete-everything".to_string()))
        );
    }

    #[test]
    fn test_only_cost_operations_are_cacheable() {
        assert!(Operation::CostAnalysis.is_cacheable());
        assert!(!Operation::SecurityAssessment.is_cacheable());
        assert!(!Operation::ResourceInventory.is_cacheable());
    }

    #[test]
    fn test_serializes_as_operation_name() {
        let json = serde_json::to_string(&Operation::EncryptionStatus).unwrap();
        assert_eq!(json, "\"checkEncryptionStatus\"");
    }
}
