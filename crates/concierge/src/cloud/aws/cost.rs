use async_trait::async_trait;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity as CeGranularity, GroupDefinition, GroupDefinitionType, MetricValue,
};
use chrono::NaiveDate;

use concierge_core::cloud::{
    BudgetSpend, CloudError, CostGroup, CostPeriod, CostSource, IdentitySource, Result,
};
use concierge_core::cost::{CostQuery, Granularity};

use super::error::ApiCall;
use super::{AwsCloud, COST_EXPLORER_REGION};

const COST_METRIC: &str = "BlendedCost";
const USAGE_METRIC: &str = "UsageQuantity";

#[async_trait]
impl CostSource for AwsCloud {
    async fn cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostPeriod>> {
        let interval = DateInterval::builder()
            .start(query.start.format("%Y-%m-%d").to_string())
            .end(query.end.format("%Y-%m-%d").to_string())
            .build()
            .map_err(|e| CloudError::InvalidParameter {
                service: "ce".to_string(),
                message: e.to_string(),
            })?;
        let granularity = match query.granularity {
            Granularity::Daily => CeGranularity::Daily,
            Granularity::Monthly => CeGranularity::Monthly,
        };
        let group = GroupDefinition::builder()
            .r#type(GroupDefinitionType::Dimension)
            .key(query.group_by.as_str())
            .build();

        let mut periods = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = ApiCall::new("ce", "GetCostAndUsage", Some(COST_EXPLORER_REGION)).finish(
                self.cost_explorer
                    .get_cost_and_usage()
                    .time_period(interval.clone())
                    .granularity(granularity.clone())
                    .metrics(COST_METRIC)
                    .metrics(USAGE_METRIC)
                    .group_by(group.clone())
                    .set_next_page_token(next_token.take())
                    .send()
                    .await,
            )?;

            for result in output.results_by_time() {
                let Some(window) = result.time_period() else {
                    continue;
                };
                let (Some(start), Some(end)) =
                    (parse_date(window.start()), parse_date(window.end()))
                else {
                    tracing::warn!(
                        start = window.start(),
                        end = window.end(),
                        "Skipping period with malformed dates"
                    );
                    continue;
                };

                let groups = result
                    .groups()
                    .iter()
                    .map(|group| {
                        let metrics = group.metrics();
                        let cost = metrics.and_then(|m| m.get(COST_METRIC));
                        let usage = metrics.and_then(|m| m.get(USAGE_METRIC));
                        CostGroup {
                            key: group.keys().first().cloned().unwrap_or_default(),
                            amount: metric_amount(cost),
                            currency: metric_unit(cost).unwrap_or_else(|| "USD".to_string()),
                            usage_quantity: metric_amount(usage),
                            usage_unit: metric_unit(usage).unwrap_or_default(),
                        }
                    })
                    .collect();

                periods.push(CostPeriod { start, end, groups });
            }

            match output.next_page_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(periods)
    }

    async fn budget_spend(&self) -> Result<Vec<BudgetSpend>> {
        let identity = self.caller_identity().await?;

        let result = ApiCall::new("budgets", "DescribeBudgets", self.home_region()).finish(
            self.budgets
                .describe_budgets()
                .account_id(&identity.account)
                .send()
                .await,
        );
        let output = match result {
            Ok(output) => output,
            // An account without budgets answers NotFound.
            Err(CloudError::Service { code, .. }) if code == "NotFoundException" => {
                return Ok(Vec::new())
            }
            Err(err) => return Err(err),
        };

        Ok(output
            .budgets()
            .iter()
            .filter_map(|budget| {
                let spend = budget.calculated_spend()?.actual_spend()?;
                Some(BudgetSpend {
                    budget_name: budget.budget_name().to_string(),
                    amount: spend.amount().parse().unwrap_or(0.0),
                    currency: spend.unit().to_string(),
                })
            })
            .collect())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn metric_amount(metric: Option<&MetricValue>) -> f64 {
    metric
        .and_then(|m| m.amount())
        .and_then(|a| a.parse().ok())
        .unwrap_or(0.0)
}

fn metric_unit(metric: Option<&MetricValue>) -> Option<String> {
    metric.and_then(|m| m.unit()).map(str::to_string)
}
