//! Idle EC2 detection and rightsizing advice.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::cloud::{Instance, InstanceMetrics, MetricWindow};
use crate::round2;
use crate::tool::{Result, ToolError};

use super::types::{Confidence, IdleInstance, IdleReport, RightsizingAction, UsageSummary};

pub const DEFAULT_CPU_THRESHOLD: f64 = 5.0;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// CloudWatch period for idle analysis: one hour.
pub const METRIC_PERIOD_SECONDS: i32 = 3600;

/// Approximate on-demand monthly cost (USD, us-east-1) per instance type.
const INSTANCE_MONTHLY_COST: [(&str, f64); 23] = [
    ("t2.micro", 8.50),
    ("t2.small", 17.00),
    ("t2.medium", 34.00),
    ("t2.large", 68.00),
    ("t2.xlarge", 136.00),
    ("t3.micro", 7.60),
    ("t3.small", 15.20),
    ("t3.medium", 30.40),
    ("t3.large", 60.80),
    ("t3.xlarge", 121.60),
    ("t3.2xlarge", 243.20),
    ("m5.large", 70.00),
    ("m5.xlarge", 140.00),
    ("m5.2xlarge", 280.00),
    ("m5.4xlarge", 560.00),
    ("c5.large", 62.00),
    ("c5.xlarge", 124.00),
    ("c5.2xlarge", 248.00),
    ("c5.4xlarge", 496.00),
    ("r5.large", 91.00),
    ("r5.xlarge", 182.00),
    ("r5.2xlarge", 364.00),
    ("r5.4xlarge", 728.00),
];

const UNKNOWN_INSTANCE_MONTHLY_COST: f64 = 50.0;

/// Validates the idle scan parameters.
pub fn validate_idle_params(cpu_threshold: f64, days: u32) -> Result<()> {
    if !(0.0..=100.0).contains(&cpu_threshold) {
        return Err(ToolError::InvalidInput(
            "cpu_threshold must be between 0 and 100".to_string(),
        ));
    }
    if !(1..=30).contains(&days) {
        return Err(ToolError::InvalidInput(
            "days must be between 1 and 30".to_string(),
        ));
    }
    Ok(())
}

/// The metrics window covering the last `days` days.
pub fn metric_window(now: DateTime<Utc>, days: u32) -> MetricWindow {
    MetricWindow {
        start: now - Duration::days(i64::from(days)),
        end: now,
        period_seconds: METRIC_PERIOD_SECONDS,
    }
}

/// Instances launched less than `days` ago lack a full window of metrics.
pub fn has_full_window(instance: &Instance, now: DateTime<Utc>, days: u32) -> bool {
    instance
        .launch_time
        .is_none_or(|launched| now - launched >= Duration::days(i64::from(days)))
}

/// Reduces raw samples to averages. `None` when there are no CPU samples.
pub fn summarize_usage(metrics: &InstanceMetrics) -> Option<UsageSummary> {
    if metrics.cpu.is_empty() {
        return None;
    }
    let mean = |values: &[f64]| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };

    let averages: Vec<f64> = metrics.cpu.iter().map(|p| p.average).collect();
    let max_cpu = metrics
        .cpu
        .iter()
        .map(|p| p.maximum)
        .fold(f64::MIN, f64::max);

    Some(UsageSummary {
        avg_cpu: round2(mean(&averages)),
        max_cpu: round2(max_cpu),
        avg_network_in: round2(mean(&metrics.network_in)),
        avg_network_out: round2(mean(&metrics.network_out)),
        data_points: metrics.cpu.len(),
    })
}

/// Picks a rightsizing action from average and peak CPU.
pub fn recommend(avg_cpu: f64, max_cpu: f64) -> RightsizingAction {
    if avg_cpu < 1.0 && max_cpu < 5.0 {
        RightsizingAction::Terminate
    } else if avg_cpu < 2.0 && max_cpu < 10.0 {
        RightsizingAction::DownsizeSignificantly
    } else if avg_cpu < 5.0 && max_cpu < 20.0 {
        RightsizingAction::Downsize
    } else if avg_cpu < 10.0 && max_cpu < 30.0 {
        RightsizingAction::ConsiderBurstable
    } else {
        RightsizingAction::Monitor
    }
}

/// Confidence grows with hourly samples: under a day is low, under a week medium.
pub fn confidence(data_points: usize) -> Confidence {
    if data_points < 24 {
        Confidence::Low
    } else if data_points < 168 {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

/// Estimated monthly on-demand cost for an instance type.
pub fn estimated_monthly_cost(instance_type: &str) -> f64 {
    INSTANCE_MONTHLY_COST
        .iter()
        .find(|(t, _)| *t == instance_type)
        .map(|(_, cost)| *cost)
        .unwrap_or(UNKNOWN_INSTANCE_MONTHLY_COST)
}

/// Evaluates one instance. `None` when it is busy or has no samples.
pub fn evaluate_instance(
    instance: &Instance,
    metrics: &InstanceMetrics,
    cpu_threshold: f64,
) -> Option<IdleInstance> {
    let usage = summarize_usage(metrics)?;
    if usage.avg_cpu >= cpu_threshold {
        return None;
    }

    let recommendation = recommend(usage.avg_cpu, usage.max_cpu);
    let savings_percentage = recommendation.savings_percentage();
    let monthly_cost = estimated_monthly_cost(&instance.instance_type);

    Some(IdleInstance {
        instance_id: instance.instance_id.clone(),
        instance_type: instance.instance_type.clone(),
        name: instance.tags.get("Name").cloned(),
        launch_time: instance.launch_time,
        availability_zone: instance.availability_zone.clone(),
        usage,
        recommendation,
        savings_percentage,
        estimated_monthly_cost: monthly_cost,
        estimated_monthly_savings: round2(monthly_cost * f64::from(savings_percentage) / 100.0),
        confidence: confidence(usage.data_points),
    })
}

/// Summary lines for an idle scan.
pub fn idle_insights(idle: &[IdleInstance], analyzed: usize) -> Vec<String> {
    if idle.is_empty() {
        return vec![format!(
            "No idle instances found among {analyzed} running instances; utilisation looks healthy."
        )];
    }

    let mut insights = vec![format!(
        "{} of {analyzed} running instances are idle.",
        idle.len()
    )];

    let count = |action: RightsizingAction| {
        idle.iter()
            .filter(|i| i.recommendation == action)
            .count()
    };
    let terminate = count(RightsizingAction::Terminate);
    if terminate > 0 {
        insights.push(format!(
            "{terminate} instances show almost no activity and are candidates for termination."
        ));
    }
    let downsize =
        count(RightsizingAction::Downsize) + count(RightsizingAction::DownsizeSignificantly);
    if downsize > 0 {
        insights.push(format!("{downsize} instances could run on a smaller type."));
    }

    if idle.len() > 1 {
        let mut by_type: HashMap<&str, usize> = HashMap::new();
        for instance in idle {
            *by_type.entry(instance.instance_type.as_str()).or_default() += 1;
        }
        if let Some((instance_type, n)) = by_type
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        {
            insights.push(format!(
                "Most common idle instance type: {instance_type} ({n} instances)."
            ));
        }
    }

    let savings: f64 = idle.iter().map(|i| i.estimated_monthly_savings).sum();
    if savings > 100.0 {
        insights.push(format!(
            "Acting on these instances could save about ${savings:.2} per month."
        ));
    }

    insights
}

/// Assembles an idle report.
pub fn build_idle_report(
    region: &str,
    cpu_threshold: f64,
    days: u32,
    instances_analyzed: usize,
    mut idle_instances: Vec<IdleInstance>,
) -> IdleReport {
    idle_instances.sort_by(|a, b| {
        b.estimated_monthly_savings
            .total_cmp(&a.estimated_monthly_savings)
            .then_with(|| a.instance_id.cmp(&b.instance_id))
    });
    let total_potential_savings = round2(
        idle_instances
            .iter()
            .map(|i| i.estimated_monthly_savings)
            .sum(),
    );
    let insights = idle_insights(&idle_instances, instances_analyzed);

    IdleReport {
        region: region.to_string(),
        cpu_threshold,
        days,
        instances_analyzed,
        idle_instances,
        total_potential_savings,
        insights,
    }
}
