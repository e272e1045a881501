//! Cost aggregation, trends and insights.

use std::collections::HashMap;

use crate::cloud::{BudgetSpend, CostPeriod};
use crate::round2;

use super::types::{
    CostReport, CostTrend, CostWindow, DailyCost, GroupBy, ServiceCost, TrendDirection,
};

pub const COST_EXPLORER_SOURCE: &str = "AWS Cost Explorer";
pub const BUDGETS_SOURCE: &str = "AWS Budgets API";

/// Broad service families used by insights and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFamily {
    Ec2,
    S3,
    Rds,
    Lambda,
    DataTransfer,
    CloudFront,
    Other,
}

impl ServiceFamily {
    /// Classifies a Cost Explorer service name such as
    /// `Amazon Elastic Compute Cloud - Compute`.
    pub fn classify(service: &str) -> Self {
        let lower = service.to_lowercase();
        let has_word = |word: &str| {
            lower
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|w| w == word)
        };
        if lower.contains("elastic compute cloud") || has_word("ec2") {
            ServiceFamily::Ec2
        } else if lower.contains("simple storage service") || has_word("s3") {
            ServiceFamily::S3
        } else if lower.contains("relational database") || has_word("rds") {
            ServiceFamily::Rds
        } else if lower.contains("lambda") {
            ServiceFamily::Lambda
        } else if lower.contains("data transfer") {
            ServiceFamily::DataTransfer
        } else if lower.contains("cloudfront") {
            ServiceFamily::CloudFront
        } else {
            ServiceFamily::Other
        }
    }
}

/// Totals across all periods of a Cost Explorer result.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAggregate {
    pub total_cost: f64,
    pub currency: String,
    pub breakdown: Vec<ServiceCost>,
    pub daily: Vec<DailyCost>,
}

/// Sums costs per group key across periods.
///
/// The breakdown is sorted by cost, most expensive first, with percentages of
/// the total. All amounts are rounded to cents.
pub fn aggregate_costs(periods: &[CostPeriod]) -> CostAggregate {
    let mut per_key: HashMap<&str, (f64, f64, &str)> = HashMap::new();
    let mut currency = None;
    let mut daily = Vec::with_capacity(periods.len());

    for period in periods {
        let mut period_total = 0.0;
        for group in &period.groups {
            let entry = per_key
                .entry(group.key.as_str())
                .or_insert((0.0, 0.0, group.usage_unit.as_str()));
            entry.0 += group.amount;
            entry.1 += group.usage_quantity;
            period_total += group.amount;
            currency.get_or_insert_with(|| group.currency.clone());
        }
        daily.push(DailyCost {
            date: period.start,
            cost: round2(period_total),
        });
    }

    let total: f64 = per_key.values().map(|(cost, _, _)| cost).sum();
    let mut breakdown: Vec<ServiceCost> = per_key
        .into_iter()
        .map(|(service, (cost, usage, unit))| ServiceCost {
            service: service.to_string(),
            cost: round2(cost),
            usage_quantity: round2(usage),
            unit: unit.to_string(),
            percentage: if total > 0.0 {
                round2(cost / total * 100.0)
            } else {
                0.0
            },
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.cost
            .total_cmp(&a.cost)
            .then_with(|| a.service.cmp(&b.service))
    });

    CostAggregate {
        total_cost: round2(total),
        currency: currency.unwrap_or_else(|| "USD".to_string()),
        breakdown,
        daily,
    }
}

/// Compares the first and last entries of a cost series.
///
/// Moves of more than 10% either way count as a trend.
pub fn cost_trend(daily: &[DailyCost]) -> CostTrend {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return CostTrend {
            trend: TrendDirection::InsufficientData,
            change_percentage: None,
            first_period_cost: None,
            last_period_cost: None,
        };
    };

    if daily.len() < 2 {
        return CostTrend {
            trend: TrendDirection::InsufficientData,
            change_percentage: None,
            first_period_cost: Some(first.cost),
            last_period_cost: Some(last.cost),
        };
    }

    if first.cost == 0.0 {
        return CostTrend {
            trend: TrendDirection::NoBaseline,
            change_percentage: None,
            first_period_cost: Some(first.cost),
            last_period_cost: Some(last.cost),
        };
    }

    let change = (last.cost - first.cost) / first.cost * 100.0;
    let trend = if change > 10.0 {
        TrendDirection::Increasing
    } else if change < -10.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    CostTrend {
        trend,
        change_percentage: Some(round2(change)),
        first_period_cost: Some(first.cost),
        last_period_cost: Some(last.cost),
    }
}

/// Plain-language observations about a cost breakdown.
pub fn cost_insights(breakdown: &[ServiceCost], total: f64) -> Vec<String> {
    if breakdown.is_empty() || total <= 0.0 {
        return vec!["No cost data available for analysis".to_string()];
    }

    let mut insights = Vec::new();

    if let Some(top) = breakdown.first() {
        if top.percentage > 50.0 {
            insights.push(format!(
                "{} accounts for {:.1}% of your total costs; review its usage first.",
                top.service, top.percentage
            ));
        }
    }

    let expensive = breakdown.iter().filter(|s| s.cost > 100.0).count();
    if expensive > 3 {
        insights.push(format!(
            "{expensive} services cost more than $100 each in this period."
        ));
    }

    let family_total = |family: ServiceFamily| -> (f64, f64) {
        breakdown
            .iter()
            .filter(|s| ServiceFamily::classify(&s.service) == family)
            .fold((0.0, 0.0), |(cost, pct), s| (cost + s.cost, pct + s.percentage))
    };

    let (_, ec2_share) = family_total(ServiceFamily::Ec2);
    if ec2_share > 30.0 {
        insights.push(format!(
            "EC2 makes up {ec2_share:.1}% of spend. Rightsizing or Reserved Instances could lower it."
        ));
    }

    let (s3_cost, _) = family_total(ServiceFamily::S3);
    if s3_cost > 50.0 {
        insights.push(format!(
            "S3 costs ${s3_cost:.2}. Lifecycle policies and cheaper storage classes may help."
        ));
    }

    let (transfer_cost, _) = family_total(ServiceFamily::DataTransfer);
    let (cdn_cost, _) = family_total(ServiceFamily::CloudFront);
    if transfer_cost + cdn_cost > 20.0 {
        insights.push(format!(
            "Data transfer and CloudFront cost ${:.2}. Check cross-region and internet egress.",
            transfer_cost + cdn_cost
        ));
    }

    if insights.is_empty() {
        insights.push(
            "Costs look reasonable and are spread across services without an obvious hotspot."
                .to_string(),
        );
    }

    insights
}

/// Builds the report for a Cost Explorer result.
pub fn build_cost_report(
    window: &CostWindow,
    group_by: GroupBy,
    periods: &[CostPeriod],
) -> CostReport {
    let aggregate = aggregate_costs(periods);
    let insights = cost_insights(&aggregate.breakdown, aggregate.total_cost);
    let cost_trend = cost_trend(&aggregate.daily);

    CostReport {
        time_period: window.clone(),
        group_by,
        total_cost: aggregate.total_cost,
        currency: aggregate.currency,
        service_breakdown: aggregate.breakdown,
        daily_costs: aggregate.daily,
        cost_trend,
        insights,
        data_source: COST_EXPLORER_SOURCE.to_string(),
        message: None,
        error_type: None,
    }
}

/// Picks the first budget that has recorded spend.
pub fn select_budget(budgets: &[BudgetSpend]) -> Option<&BudgetSpend> {
    budgets.iter().find(|b| b.amount > 0.0)
}

/// Report built from a budget's actual spend when Cost Explorer has nothing.
pub fn budget_report(window: &CostWindow, group_by: GroupBy, budget: &BudgetSpend) -> CostReport {
    CostReport {
        time_period: window.clone(),
        group_by,
        total_cost: round2(budget.amount),
        currency: budget.currency.clone(),
        service_breakdown: Vec::new(),
        daily_costs: Vec::new(),
        cost_trend: cost_trend(&[]),
        insights: vec![
            format!(
                "Spend taken from budget '{}' because Cost Explorer has no data for this period yet.",
                budget.budget_name
            ),
            "A per-service breakdown will be available once Cost Explorer catches up.".to_string(),
        ],
        data_source: BUDGETS_SOURCE.to_string(),
        message: None,
        error_type: None,
    }
}

/// Empty report for a period Cost Explorer has not processed yet.
pub fn pending_data_report(window: &CostWindow, group_by: GroupBy) -> CostReport {
    CostReport {
        message: Some(
            "No cost data is available for this period yet. Cost Explorer can take 8 to 24 hours to show new usage."
                .to_string(),
        ),
        error_type: Some("data_pending".to_string()),
        ..empty_report(window, group_by)
    }
}

/// Empty report for a period that has not started.
pub fn future_period_report(window: &CostWindow, group_by: GroupBy) -> CostReport {
    CostReport {
        message: Some(format!(
            "{} has not started yet, so there is no cost data for it.",
            window.label
        )),
        error_type: Some("future_date".to_string()),
        ..empty_report(window, group_by)
    }
}

fn empty_report(window: &CostWindow, group_by: GroupBy) -> CostReport {
    CostReport {
        time_period: window.clone(),
        group_by,
        total_cost: 0.0,
        currency: "USD".to_string(),
        service_breakdown: Vec::new(),
        daily_costs: Vec::new(),
        cost_trend: cost_trend(&[]),
        insights: Vec::new(),
        data_source: COST_EXPLORER_SOURCE.to_string(),
        message: None,
        error_type: None,
    }
}
