//! Cost analysis: time periods, aggregation, idle detection and optimization.

mod analysis;
mod dates;
mod idle;
mod optimization;
mod types;

pub use analysis::{
    aggregate_costs, budget_report, build_cost_report, cost_insights, cost_trend,
    future_period_report, pending_data_report, select_budget, CostAggregate, ServiceFamily,
    BUDGETS_SOURCE, COST_EXPLORER_SOURCE,
};
pub use dates::{cost_window, is_future_period, month_label, parse_time_period};
pub use idle::{
    build_idle_report, confidence, estimated_monthly_cost, evaluate_instance, has_full_window,
    idle_insights, metric_window, recommend, summarize_usage, validate_idle_params,
    DEFAULT_CPU_THRESHOLD, DEFAULT_LOOKBACK_DAYS, METRIC_PERIOD_SECONDS,
};
pub use optimization::build_optimization_report;
pub use types::{
    Confidence, CostQuery, CostReport, CostTrend, CostWindow, DailyCost, Granularity, GroupBy,
    IdleInstance, IdleReport, OptimizationRecommendation, OptimizationReport, Priority,
    RightsizingAction, ServiceCost, TimePeriod, TrendDirection, UsageSummary,
};
