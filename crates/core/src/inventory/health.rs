use std::collections::BTreeMap;

use crate::round2;

use super::types::{HealthReport, InventoryScope, Resource, ResourceType, UnhealthyResource};

const EC2_HEALTHY: [&str; 3] = ["running", "stopped", "pending"];
const RDS_HEALTHY: [&str; 3] = ["available", "backing-up", "stopped"];

/// Why a resource is unhealthy, or `None` when it is fine.
pub fn unhealthy_reason(resource: &Resource) -> Option<String> {
    let status = resource.status.as_str();
    match resource.resource_type {
        ResourceType::Ec2 if !EC2_HEALTHY.contains(&status) => {
            Some(format!("instance is {status}"))
        }
        ResourceType::Rds if !RDS_HEALTHY.contains(&status) => {
            Some(format!("database is {status}"))
        }
        ResourceType::Lambda if status.eq_ignore_ascii_case("Failed") => {
            Some("function is in Failed state".to_string())
        }
        _ => None,
    }
}

pub fn build_health_report(
    region: &str,
    scope: InventoryScope,
    resources: &[Resource],
) -> HealthReport {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut unhealthy = Vec::new();
    let mut total = 0;

    for resource in resources.iter().filter(|r| scope.includes(r.resource_type)) {
        total += 1;
        *by_status.entry(resource.status.clone()).or_default() += 1;
        if let Some(reason) = unhealthy_reason(resource) {
            unhealthy.push(UnhealthyResource {
                resource_id: resource.resource_id.clone(),
                resource_type: resource.resource_type,
                status: resource.status.clone(),
                reason,
            });
        }
    }

    let healthy = total - unhealthy.len();
    HealthReport {
        region: region.to_string(),
        scope: scope.label().to_string(),
        total,
        healthy,
        healthy_percentage: if total == 0 {
            100.0
        } else {
            round2(healthy as f64 / total as f64 * 100.0)
        },
        by_status,
        unhealthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, resource_type: ResourceType, status: &str) -> Resource {
        Resource {
            resource_id: id.to_string(),
            resource_type,
            name: None,
            status: status.to_string(),
            region: "us-east-1".to_string(),
            created_at: None,
            tags: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_unhealthy_rules() {
        assert!(unhealthy_reason(&resource("i-1", ResourceType::Ec2, "running")).is_none());
        assert!(unhealthy_reason(&resource("i-2", ResourceType::Ec2, "stopping")).is_some());
        assert!(unhealthy_reason(&resource("db", ResourceType::Rds, "backing-up")).is_none());
        assert!(unhealthy_reason(&resource("db", ResourceType::Rds, "failed")).is_some());
        assert!(unhealthy_reason(&resource("fn", ResourceType::Lambda, "Failed")).is_some());
        assert!(unhealthy_reason(&resource("fn", ResourceType::Lambda, "Pending")).is_none());
        assert!(unhealthy_reason(&resource("b", ResourceType::S3, "available")).is_none());
    }

    #[test]
    fn test_health_report() {
        let resources = vec![
            resource("i-1", ResourceType::Ec2, "running"),
            resource("i-2", ResourceType::Ec2, "shutting-down"),
            resource("db", ResourceType::Rds, "available"),
            resource("fn", ResourceType::Lambda, "Active"),
        ];
        let report = build_health_report("us-east-1", InventoryScope::All, &resources);
        assert_eq!(report.total, 4);
        assert_eq!(report.healthy, 3);
        assert_eq!(report.healthy_percentage, 75.0);
        assert_eq!(report.unhealthy[0].resource_id, "i-2");
        assert_eq!(report.by_status["running"], 1);

        let ec2 = build_health_report(
            "us-east-1",
            InventoryScope::Only(ResourceType::Ec2),
            &resources,
        );
        assert_eq!(ec2.total, 2);
        assert_eq!(ec2.healthy_percentage, 50.0);
    }

    #[test]
    fn test_empty_health_report() {
        let report = build_health_report("us-east-1", InventoryScope::All, &[]);
        assert_eq!(report.healthy_percentage, 100.0);
        assert!(report.unhealthy.is_empty());
    }
}
