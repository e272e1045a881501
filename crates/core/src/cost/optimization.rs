use crate::round2;

use super::analysis::ServiceFamily;
use super::types::{
    CostReport, IdleReport, OptimizationRecommendation, OptimizationReport, Priority,
    RightsizingAction,
};

/// Builds savings recommendations from a cost report and an optional idle scan.
///
/// Only the five most expensive services are considered for service-specific
/// advice. Recommendations are ordered by estimated savings.
pub fn build_optimization_report(
    cost: &CostReport,
    idle: Option<&IdleReport>,
) -> OptimizationReport {
    let mut recommendations = Vec::new();

    if let Some(idle) = idle.filter(|r| !r.idle_instances.is_empty()) {
        let actions = idle
            .idle_instances
            .iter()
            .filter(|i| i.recommendation != RightsizingAction::Monitor)
            .map(|i| {
                format!(
                    "{} ({}): {}",
                    i.instance_id,
                    i.instance_type,
                    action_label(i.recommendation)
                )
            })
            .collect();
        recommendations.push(OptimizationRecommendation {
            category: "EC2 Rightsizing".to_string(),
            priority: Priority::High,
            title: format!("Act on {} idle EC2 instances", idle.idle_instances.len()),
            description: format!(
                "These instances averaged under {}% CPU over the last {} days.",
                idle.cpu_threshold, idle.days
            ),
            estimated_monthly_savings: idle.total_potential_savings,
            actions,
        });
    }

    for service in cost.service_breakdown.iter().take(5) {
        let advice = match ServiceFamily::classify(&service.service) {
            ServiceFamily::S3 if service.cost > 50.0 => Some((
                "Storage Optimization",
                Priority::Medium,
                0.30,
                "Move infrequently accessed S3 data to cheaper storage classes",
                vec![
                    "Enable S3 Intelligent-Tiering on large buckets".to_string(),
                    "Add lifecycle rules to archive old objects to Glacier".to_string(),
                ],
            )),
            ServiceFamily::Rds if service.cost > 100.0 => Some((
                "Database Optimization",
                Priority::Medium,
                0.25,
                "Cover steady RDS usage with Reserved Instances",
                vec![
                    "Buy Reserved Instances for databases that run all month".to_string(),
                    "Check for oversized or idle database instances".to_string(),
                ],
            )),
            ServiceFamily::Lambda if service.cost > 20.0 => Some((
                "Serverless Optimization",
                Priority::Low,
                0.20,
                "Tune Lambda memory and duration",
                vec![
                    "Profile memory settings with Lambda Power Tuning".to_string(),
                    "Consider Graviton (arm64) for compatible functions".to_string(),
                ],
            )),
            _ => None,
        };

        if let Some((category, priority, share, title, actions)) = advice {
            recommendations.push(OptimizationRecommendation {
                category: category.to_string(),
                priority,
                title: title.to_string(),
                description: format!(
                    "{} cost ${:.2} in this period.",
                    service.service, service.cost
                ),
                estimated_monthly_savings: round2(service.cost * share),
                actions,
            });
        }
    }

    if cost.total_cost > 500.0 {
        recommendations.push(OptimizationRecommendation {
            category: "General".to_string(),
            priority: Priority::Low,
            title: "Adopt Savings Plans and cost allocation tags".to_string(),
            description: format!(
                "Total spend of ${:.2} is high enough for commitment discounts to pay off.",
                cost.total_cost
            ),
            estimated_monthly_savings: round2(cost.total_cost * 0.15),
            actions: vec![
                "Review Compute Savings Plans recommendations".to_string(),
                "Tag resources by team to find unowned spend".to_string(),
            ],
        });
    }

    recommendations.sort_by(|a, b| {
        b.estimated_monthly_savings
            .total_cmp(&a.estimated_monthly_savings)
            .then_with(|| a.priority.cmp(&b.priority))
    });

    let total_potential_savings = round2(
        recommendations
            .iter()
            .map(|r| r.estimated_monthly_savings)
            .sum(),
    );
    let savings_percentage = if cost.total_cost > 0.0 {
        round2(total_potential_savings / cost.total_cost * 100.0)
    } else {
        0.0
    };

    OptimizationReport {
        total_monthly_cost: cost.total_cost,
        total_potential_savings,
        savings_percentage,
        idle_resource_count: idle.map(|r| r.idle_instances.len()).unwrap_or(0),
        recommendations,
    }
}

fn action_label(action: RightsizingAction) -> &'static str {
    match action {
        RightsizingAction::Terminate => "terminate",
        RightsizingAction::DownsizeSignificantly => "downsize by two or more sizes",
        RightsizingAction::Downsize => "downsize one size",
        RightsizingAction::ConsiderBurstable => "move to a burstable type",
        RightsizingAction::Monitor => "keep monitoring",
    }
}
