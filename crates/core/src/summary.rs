//! Short plain-language summaries of tool results.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cost::{CostReport, IdleReport, OptimizationReport, RightsizingAction};
use crate::inventory::{HealthReport, Resource, ResourceInventory};
use crate::security::{EncryptionReport, SecurityAssessment, Severity};
use crate::tool::Operation;

const TOP_SERVICES: usize = 10;
const TOP_HIGH_FINDINGS: usize = 5;
const TOP_MEDIUM_FINDINGS: usize = 3;

pub fn cost_summary(report: &CostReport) -> String {
    if let Some(message) = &report.message {
        return message.clone();
    }

    let mut text = format!(
        "Total cost for {}: {} {:.2}\n",
        report.time_period.label, report.currency, report.total_cost
    );
    if !report.service_breakdown.is_empty() {
        text.push_str("\nCost breakdown:\n");
        for item in report.service_breakdown.iter().take(TOP_SERVICES) {
            text.push_str(&format!(
                "- {}: {} {:.2} ({:.1}%)\n",
                item.service, report.currency, item.cost, item.percentage
            ));
        }
    }
    for insight in &report.insights {
        text.push_str(&format!("\n* {insight}"));
    }
    text
}

fn action_label(action: RightsizingAction) -> &'static str {
    match action {
        RightsizingAction::Terminate => "terminate",
        RightsizingAction::DownsizeSignificantly => "downsize significantly",
        RightsizingAction::Downsize => "downsize",
        RightsizingAction::ConsiderBurstable => "move to a burstable type",
        RightsizingAction::Monitor => "monitor",
    }
}

pub fn idle_summary(report: &IdleReport) -> String {
    let mut text = format!(
        "{} of {} running instances in {} averaged under {}% CPU over {} days\n",
        report.idle_instances.len(),
        report.instances_analyzed,
        report.region,
        report.cpu_threshold,
        report.days
    );
    for instance in &report.idle_instances {
        text.push_str(&format!(
            "- {} ({}): {}, saves ${:.2}/month\n",
            instance.name.as_deref().unwrap_or(&instance.instance_id),
            instance.instance_type,
            action_label(instance.recommendation),
            instance.estimated_monthly_savings
        ));
    }
    if report.total_potential_savings > 0.0 {
        text.push_str(&format!(
            "\nTotal potential savings: ${:.2}/month",
            report.total_potential_savings
        ));
    }
    text
}

pub fn optimization_summary(report: &OptimizationReport) -> String {
    let mut text = format!(
        "Potential savings: ${:.2}/month ({:.1}% of ${:.2})\n",
        report.total_potential_savings, report.savings_percentage, report.total_monthly_cost
    );
    for recommendation in &report.recommendations {
        text.push_str(&format!(
            "- [{:?}] {}: ${:.2}/month\n",
            recommendation.priority, recommendation.title, recommendation.estimated_monthly_savings
        ));
    }
    text
}

pub fn security_summary(assessment: &SecurityAssessment) -> String {
    let mut text = format!("Security risk score: {}/100\n", assessment.risk_score);
    if assessment.findings.is_empty() {
        text.push_str("\nNo security issues found.");
        return text;
    }

    let mut section = |severity: Severity, label: &str, limit: usize| {
        let matching: Vec<_> = assessment
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect();
        if matching.is_empty() {
            return;
        }
        text.push_str(&format!("\n{label} ({}):\n", matching.len()));
        for finding in matching.into_iter().take(limit) {
            text.push_str(&format!("- {}\n", finding.title));
        }
    };
    section(Severity::High, "High risk issues", TOP_HIGH_FINDINGS);
    section(Severity::Medium, "Medium risk issues", TOP_MEDIUM_FINDINGS);
    text
}

pub fn encryption_text(report: &EncryptionReport) -> String {
    let mut text = format!(
        "{} of {} resources encrypted ({:.1}% compliant)\n",
        report.summary.encrypted, report.summary.total, report.summary.compliance_percentage
    );
    for resource in report.resources.iter().filter(|r| !r.encrypted) {
        text.push_str(&format!(
            "- {:?} {} is not encrypted\n",
            resource.resource_type, resource.resource_id
        ));
    }
    text
}

pub fn inventory_summary(inventory: &ResourceInventory) -> String {
    let mut text = format!(
        "Found {} resources in {}\n",
        inventory.summary.total, inventory.region
    );
    if !inventory.summary.by_type.is_empty() {
        text.push_str("\nResource breakdown:\n");
        for (resource_type, count) in &inventory.summary.by_type {
            text.push_str(&format!("- {}: {count} resources\n", resource_type.as_str()));
        }
    }
    text
}

pub fn resource_summary(resource: &Resource) -> String {
    let mut text = format!(
        "{} {} is {} in {}\n",
        resource.resource_type.as_str(),
        resource.name.as_deref().unwrap_or(&resource.resource_id),
        resource.status,
        resource.region
    );
    for (key, value) in &resource.metadata {
        text.push_str(&format!("- {key}: {value}\n"));
    }
    text
}

pub fn health_summary(report: &HealthReport) -> String {
    let mut text = format!(
        "{} of {} resources healthy ({:.1}%)\n",
        report.healthy, report.total, report.healthy_percentage
    );
    for resource in &report.unhealthy {
        text.push_str(&format!(
            "- {} {}: {}\n",
            resource.resource_type.as_str(),
            resource.resource_id,
            resource.reason
        ));
    }
    text
}

/// Summarises the `data` of a tool response. Returns None when the data
/// does not have the shape the operation produces.
pub fn summarize(operation: Operation, data: &Value) -> Option<String> {
    match operation {
        Operation::CostAnalysis => parse(data).map(|r| cost_summary(&r)),
        Operation::IdleResources => parse(data).map(|r| idle_summary(&r)),
        Operation::CostOptimization => parse(data).map(|r| optimization_summary(&r)),
        Operation::ResourceInventory => parse(data).map(|r| inventory_summary(&r)),
        Operation::ResourceDetails => parse(data).map(|r| resource_summary(&r)),
        Operation::ResourceHealth => parse(data).map(|r| health_summary(&r)),
        Operation::SecurityAssessment => parse(data).map(|r| security_summary(&r)),
        Operation::EncryptionStatus => parse(data).map(|r| encryption_text(&r)),
    }
}

fn parse<T: DeserializeOwned>(data: &Value) -> Option<T> {
    serde_json::from_value(data.clone()).ok()
}
