use chrono::Utc;

use concierge_core::audit::AuditEvent;
use concierge_core::cloud::CloudError;
use concierge_core::cost::{
    budget_report, build_cost_report, build_idle_report, build_optimization_report, cost_window,
    evaluate_instance, future_period_report, has_full_window, is_future_period, metric_window,
    parse_time_period, pending_data_report, select_budget, validate_idle_params, CostQuery,
    CostReport, Granularity, GroupBy, IdleReport, OptimizationReport, DEFAULT_CPU_THRESHOLD,
    DEFAULT_LOOKBACK_DAYS,
};
use concierge_core::tool::{ToolError, ToolParams};

use crate::audit::AuditLog;
use crate::cloud::CloudProviders;

/// Cost report for the requested period.
///
/// Falls back to AWS Budgets when Cost Explorer has nothing for the window,
/// and to an explanatory empty report when Budgets has nothing either.
pub async fn cost_analysis(
    cloud: &CloudProviders,
    audit: &AuditLog,
    params: &ToolParams,
) -> Result<CostReport, ToolError> {
    let today = Utc::now().date_naive();
    let period = parse_time_period(params.get_or("time_period", "MONTHLY"), today)?;
    let granularity = Granularity::parse(params.get_or("granularity", "DAILY"))?;
    let group_by = GroupBy::parse(params.get_or("group_by", "SERVICE"))?;
    let window = cost_window(period, granularity, today)?;

    if is_future_period(period, today) {
        return Ok(future_period_report(&window, group_by));
    }

    let report = match cloud
        .cost
        .cost_and_usage(&CostQuery::new(&window, group_by))
        .await
    {
        Ok(periods) => Some(build_cost_report(&window, group_by, &periods)),
        Err(CloudError::DataUnavailable(message)) => {
            tracing::info!(%message, window = %window.label, "Cost Explorer data unavailable");
            None
        }
        Err(err) => return Err(err.into()),
    };

    let report = match report {
        Some(report) if report.total_cost > 0.0 => report,
        _ => match cloud.cost.budget_spend().await {
            Ok(budgets) => match select_budget(&budgets) {
                Some(budget) => budget_report(&window, group_by, budget),
                None => pending_data_report(&window, group_by),
            },
            Err(err) => {
                tracing::warn!(error = %err, "Budgets fallback failed");
                pending_data_report(&window, group_by)
            }
        },
    };

    audit.record(AuditEvent::cost_analysis(
        &report.time_period.label,
        report.total_cost,
        &report.currency,
        report.insights.len(),
    ));
    Ok(report)
}

/// Running instances whose CPU stayed under the threshold for the whole window.
pub(super) async fn idle_resources(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<IdleReport, ToolError> {
    let cpu_threshold = params.parse_or("cpu_threshold", DEFAULT_CPU_THRESHOLD)?;
    let days = params.parse_or("days", DEFAULT_LOOKBACK_DAYS)?;
    validate_idle_params(cpu_threshold, days)?;

    let now = Utc::now();
    let window = metric_window(now, days);
    let instances = cloud.compute.instances(region, Some("running")).await?;
    let candidates: Vec<_> = instances
        .iter()
        .filter(|instance| has_full_window(instance, now, days))
        .collect();

    let mut idle = Vec::new();
    for instance in &candidates {
        match cloud
            .compute
            .instance_metrics(region, &instance.instance_id, window)
            .await
        {
            Ok(metrics) => idle.extend(evaluate_instance(instance, &metrics, cpu_threshold)),
            Err(err) => tracing::warn!(
                instance_id = %instance.instance_id,
                error = %err,
                "Skipping instance without metrics"
            ),
        }
    }

    audit.record(AuditEvent::resource_access(
        "EC2",
        candidates.len(),
        vec![region.to_string()],
    ));
    Ok(build_idle_report(
        region,
        cpu_threshold,
        days,
        candidates.len(),
        idle,
    ))
}

/// Cost analysis plus idle instances. An idle scan failure only drops the EC2
/// recommendations.
pub(super) async fn cost_optimization(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<OptimizationReport, ToolError> {
    let cost = cost_analysis(cloud, audit, params).await?;
    let idle = match idle_resources(cloud, audit, region, params).await {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::warn!(error = %err, "Idle scan failed, optimizing from costs only");
            None
        }
    };

    Ok(build_optimization_report(&cost, idle.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use concierge_core::cloud::{self, BudgetSpend, CostPeriod, CostSource};
    use concierge_core::cost::{RightsizingAction, BUDGETS_SOURCE, COST_EXPLORER_SOURCE};

    fn audit() -> AuditLog {
        AuditLog::new("req-test")
    }

    #[tokio::test]
    async fn test_cost_analysis_past_month() {
        let params = ToolParams::new().with("time_period", "march 2024");
        let report = cost_analysis(&CloudProviders::demo(), &audit(), &params)
            .await
            .unwrap();

        assert_eq!(report.data_source, COST_EXPLORER_SOURCE);
        assert_eq!(report.time_period.label, "March 2024");
        assert!(report.total_cost > 0.0);
        assert_eq!(
            report.service_breakdown[0].service,
            "Amazon Elastic Compute Cloud - Compute"
        );
    }

    #[tokio::test]
    async fn test_cost_analysis_future_month() {
        let next_year = Utc::now().date_naive().format("%Y").to_string();
        let next_year: i32 = next_year.parse::<i32>().unwrap() + 1;
        let params = ToolParams::new().with("time_period", format!("june {next_year}"));
        let report = cost_analysis(&CloudProviders::demo(), &audit(), &params)
            .await
            .unwrap();

        assert_eq!(report.error_type.as_deref(), Some("future_date"));
        assert_eq!(report.total_cost, 0.0);
    }

    #[tokio::test]
    async fn test_cost_analysis_rejects_bad_group_by() {
        let params = ToolParams::new().with("group_by", "COLOR");
        let err = cost_analysis(&CloudProviders::demo(), &audit(), &params)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    /// Cost source with no Cost Explorer data and a fixed budget list.
    struct NoCostData(Vec<BudgetSpend>);

    #[async_trait]
    impl CostSource for NoCostData {
        async fn cost_and_usage(&self, _query: &CostQuery) -> cloud::Result<Vec<CostPeriod>> {
            Err(CloudError::DataUnavailable("not processed yet".to_string()))
        }

        async fn budget_spend(&self) -> cloud::Result<Vec<BudgetSpend>> {
            Ok(self.0.clone())
        }
    }

    fn without_cost_data(budgets: Vec<BudgetSpend>) -> CloudProviders {
        CloudProviders {
            cost: Arc::new(NoCostData(budgets)),
            ..CloudProviders::demo()
        }
    }

    #[tokio::test]
    async fn test_budget_fallback_when_cost_explorer_has_no_data() {
        let cloud = without_cost_data(vec![BudgetSpend {
            budget_name: "team".to_string(),
            amount: 87.5,
            currency: "USD".to_string(),
        }]);
        let report = cost_analysis(&cloud, &audit(), &ToolParams::new())
            .await
            .unwrap();

        assert_eq!(report.data_source, BUDGETS_SOURCE);
        assert_eq!(report.total_cost, 87.5);
    }

    #[tokio::test]
    async fn test_pending_report_without_budget_spend() {
        let cloud = without_cost_data(Vec::new());
        let report = cost_analysis(&cloud, &audit(), &ToolParams::new())
            .await
            .unwrap();

        assert_eq!(report.total_cost, 0.0);
        assert!(report.message.unwrap().contains("8 to 24 hours"));
    }

    #[tokio::test]
    async fn test_idle_resources_finds_idle_web_server() {
        let report = idle_resources(
            &CloudProviders::demo(),
            &audit(),
            "us-east-1",
            &ToolParams::new(),
        )
        .await
        .unwrap();

        // The two-day-old sandbox is skipped, the stopped instance is not running.
        assert_eq!(report.instances_analyzed, 2);
        assert_eq!(report.idle_instances.len(), 1);
        assert_eq!(report.idle_instances[0].instance_id, "i-0a1b2c3d4e5f60001");
        assert_eq!(
            report.idle_instances[0].recommendation,
            RightsizingAction::Terminate
        );
    }

    #[tokio::test]
    async fn test_idle_resources_validates_threshold() {
        let params = ToolParams::new().with("cpu_threshold", "150");
        let err = idle_resources(&CloudProviders::demo(), &audit(), "us-east-1", &params)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_cost_optimization_includes_idle_savings() {
        let params = ToolParams::new().with("time_period", "march 2024");
        let report = cost_optimization(&CloudProviders::demo(), &audit(), "us-east-1", &params)
            .await
            .unwrap();

        assert_eq!(report.idle_resource_count, 1);
        assert!(report.total_potential_savings > 0.0);
    }
}
