use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::tool::{Result, ToolError};

/// Cost Explorer time granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Monthly => "MONTHLY",
        }
    }

    /// Parses `DAILY` or `MONTHLY`, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Granularity::Daily),
            "MONTHLY" => Ok(Granularity::Monthly),
            _ => Err(ToolError::InvalidInput(format!(
                "granularity must be DAILY or MONTHLY, got {raw}"
            ))),
        }
    }
}

/// Cost Explorer grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupBy {
    Service,
    Region,
    UsageType,
    InstanceType,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Service => "SERVICE",
            GroupBy::Region => "REGION",
            GroupBy::UsageType => "USAGE_TYPE",
            GroupBy::InstanceType => "INSTANCE_TYPE",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SERVICE" => Ok(GroupBy::Service),
            "REGION" => Ok(GroupBy::Region),
            "USAGE_TYPE" => Ok(GroupBy::UsageType),
            "INSTANCE_TYPE" => Ok(GroupBy::InstanceType),
            _ => Err(ToolError::InvalidInput(format!(
                "group_by must be one of SERVICE, REGION, USAGE_TYPE, INSTANCE_TYPE, got {raw}"
            ))),
        }
    }
}

/// A requested reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Daily,
    Monthly,
    Yearly,
    Month { year: i32, month: u32 },
}

/// A resolved Cost Explorer date window. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
    pub label: String,
}

/// A Cost Explorer query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
    pub group_by: GroupBy,
}

impl CostQuery {
    pub fn new(window: &CostWindow, group_by: GroupBy) -> Self {
        Self {
            start: window.start,
            end: window.end,
            granularity: window.granularity,
            group_by,
        }
    }
}

/// Cost of one group (usually one service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub cost: f64,
    pub usage_quantity: f64,
    pub unit: String,
    pub percentage: f64,
}

/// Total cost for one granularity step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: NaiveDate,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
    NoBaseline,
}

/// Change between the first and last period of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTrend {
    pub trend: TrendDirection,
    pub change_percentage: Option<f64>,
    pub first_period_cost: Option<f64>,
    pub last_period_cost: Option<f64>,
}

/// The result of a cost analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub time_period: CostWindow,
    pub group_by: GroupBy,
    pub total_cost: f64,
    pub currency: String,
    pub service_breakdown: Vec<ServiceCost>,
    pub daily_costs: Vec<DailyCost>,
    pub cost_trend: CostTrend,
    pub insights: Vec<String>,
    pub data_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightsizingAction {
    Terminate,
    DownsizeSignificantly,
    Downsize,
    ConsiderBurstable,
    Monitor,
}

impl RightsizingAction {
    /// Expected share of the instance cost saved by acting.
    pub fn savings_percentage(&self) -> u8 {
        match self {
            RightsizingAction::Terminate => 100,
            RightsizingAction::DownsizeSignificantly => 70,
            RightsizingAction::Downsize => 50,
            RightsizingAction::ConsiderBurstable => 30,
            RightsizingAction::Monitor => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Aggregated CloudWatch usage for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub avg_cpu: f64,
    pub max_cpu: f64,
    pub avg_network_in: f64,
    pub avg_network_out: f64,
    pub data_points: usize,
}

/// An instance whose average CPU is under the idle threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleInstance {
    pub instance_id: String,
    pub instance_type: String,
    pub name: Option<String>,
    pub launch_time: Option<DateTime<Utc>>,
    pub availability_zone: Option<String>,
    pub usage: UsageSummary,
    pub recommendation: RightsizingAction,
    pub savings_percentage: u8,
    pub estimated_monthly_cost: f64,
    pub estimated_monthly_savings: f64,
    pub confidence: Confidence,
}

/// The result of an idle resource scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleReport {
    pub region: String,
    pub cpu_threshold: f64,
    pub days: u32,
    pub instances_analyzed: usize,
    pub idle_instances: Vec<IdleInstance>,
    pub total_potential_savings: f64,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One cost optimization suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub estimated_monthly_savings: f64,
    pub actions: Vec<String>,
}

/// Combined cost optimization report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub total_monthly_cost: f64,
    pub total_potential_savings: f64,
    pub savings_percentage: f64,
    pub idle_resource_count: usize,
    pub recommendations: Vec<OptimizationRecommendation>,
}
