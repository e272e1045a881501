//! Tool CLI arguments.
//!
//! Each argument set converts to the JSON parameter object the server expects.
//! Values are passed through as given; the server validates them.

use clap::Args;
use serde_json::{Map, Value};

use concierge_core::tool::Operation;

/// JSON parameter object, skipping unset options.
#[derive(Debug, Default)]
struct Params(Map<String, Value>);

impl Params {
    fn set(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Cost analysis arguments.
#[derive(Debug, Clone, Args)]
pub struct CostArgs {
    /// DAILY, MONTHLY, YEARLY or a month such as "march 2025".
    #[arg(long)]
    pub period: Option<String>,
    /// DAILY or MONTHLY.
    #[arg(long)]
    pub granularity: Option<String>,
    /// SERVICE, REGION, USAGE_TYPE or INSTANCE_TYPE.
    #[arg(long)]
    pub group_by: Option<String>,
}

impl CostArgs {
    pub fn params(&self) -> Value {
        self.with_params(Params::default()).into_value()
    }

    fn with_params(&self, params: Params) -> Params {
        params
            .set("time_period", self.period.clone())
            .set("granularity", self.granularity.clone())
            .set("group_by", self.group_by.clone())
    }
}

/// Idle instance scan arguments.
#[derive(Debug, Clone, Args)]
pub struct IdleArgs {
    /// Region to scan.
    #[arg(long)]
    pub region: Option<String>,
    /// Average CPU percentage under which an instance is idle.
    #[arg(long)]
    pub cpu_threshold: Option<f64>,
    /// Days of metrics to look at.
    #[arg(long)]
    pub days: Option<u32>,
}

impl IdleArgs {
    pub fn params(&self) -> Value {
        self.with_params(Params::default()).into_value()
    }

    fn with_params(&self, params: Params) -> Params {
        params
            .set("region", self.region.clone())
            .set("cpu_threshold", self.cpu_threshold)
            .set("days", self.days)
    }
}

/// Optimization arguments: the cost period plus the idle scan.
#[derive(Debug, Clone, Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub cost: CostArgs,
    #[command(flatten)]
    pub idle: IdleArgs,
}

impl OptimizeArgs {
    pub fn params(&self) -> Value {
        let params = self.cost.with_params(Params::default());
        self.idle.with_params(params).into_value()
    }
}

/// Arguments for tools that take a region and a resource type filter.
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    /// Region to query.
    #[arg(long)]
    pub region: Option<String>,
    /// Resource type filter (ALL when omitted).
    #[arg(long)]
    pub resource_type: Option<String>,
}

impl ScopeArgs {
    pub fn params(&self) -> Value {
        Params::default()
            .set("region", self.region.clone())
            .set("resource_type", self.resource_type.clone())
            .into_value()
    }
}

/// Inventory arguments.
#[derive(Debug, Clone, Args)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

impl InventoryArgs {
    pub fn params(&self) -> Value {
        self.scope.params()
    }
}

/// Resource details arguments.
#[derive(Debug, Clone, Args)]
pub struct DetailsArgs {
    /// EC2, S3, RDS or LAMBDA.
    pub resource_type: String,
    /// Instance id, bucket name, DB identifier or function name.
    pub resource_id: String,
    /// Region to query.
    #[arg(long)]
    pub region: Option<String>,
}

impl DetailsArgs {
    pub fn params(&self) -> Value {
        Params::default()
            .set("resource_type", Some(self.resource_type.clone()))
            .set("resource_id", Some(self.resource_id.clone()))
            .set("region", self.region.clone())
            .into_value()
    }
}

/// Security assessment arguments.
#[derive(Debug, Clone, Args)]
pub struct SecurityArgs {
    /// Region to assess.
    #[arg(long)]
    pub region: Option<String>,
    /// Include IAM users.
    #[arg(long)]
    pub comprehensive: bool,
}

impl SecurityArgs {
    pub fn params(&self) -> Value {
        let assessment_type = if self.comprehensive {
            "COMPREHENSIVE"
        } else {
            "BASIC"
        };
        Params::default()
            .set("region", self.region.clone())
            .set("assessment_type", Some(assessment_type))
            .into_value()
    }
}

/// The operation and parameters for a tool command.
pub fn tool_request(command: &super::Commands) -> Option<(Operation, Value)> {
    use super::Commands;

    let request = match command {
        Commands::Cost(args) => (Operation::CostAnalysis, args.params()),
        Commands::Idle(args) => (Operation::IdleResources, args.params()),
        Commands::Optimize(args) => (Operation::CostOptimization, args.params()),
        Commands::Inventory(args) => (Operation::ResourceInventory, args.params()),
        Commands::Details(args) => (Operation::ResourceDetails, args.params()),
        Commands::HealthReport(args) => (Operation::ResourceHealth, args.params()),
        Commands::Security(args) => (Operation::SecurityAssessment, args.params()),
        Commands::Encryption(args) => (Operation::EncryptionStatus, args.params()),
        Commands::Chat(_) | Commands::Session { .. } | Commands::Health(_) => return None,
    };
    Some(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serde_json::json;

    fn request(args: &[&str]) -> Option<(Operation, Value)> {
        let cli = Cli::parse_from(std::iter::once("concierge-client").chain(args.iter().copied()));
        tool_request(&cli.command)
    }

    #[test]
    fn test_cost_params_skip_unset() {
        let (operation, params) = request(&["cost", "--period", "march 2025"]).unwrap();
        assert_eq!(operation, Operation::CostAnalysis);
        assert_eq!(params, json!({ "time_period": "march 2025" }));
    }

    #[test]
    fn test_optimize_merges_cost_and_idle() {
        let (operation, params) =
            request(&["optimize", "--group-by", "REGION", "--days", "7"]).unwrap();
        assert_eq!(operation, Operation::CostOptimization);
        assert_eq!(params, json!({ "group_by": "REGION", "days": 7 }));
    }

    #[test]
    fn test_details_positional_args() {
        let (_, params) = request(&["details", "RDS", "demo-postgres"]).unwrap();
        assert_eq!(
            params,
            json!({ "resource_type": "RDS", "resource_id": "demo-postgres" })
        );
    }

    #[test]
    fn test_security_assessment_type() {
        let (_, basic) = request(&["security"]).unwrap();
        assert_eq!(basic["assessment_type"], "BASIC");

        let (_, full) = request(&["security", "--comprehensive"]).unwrap();
        assert_eq!(full["assessment_type"], "COMPREHENSIVE");
    }

    #[test]
    fn test_non_tool_commands() {
        assert!(request(&["session", "session-1"]).is_none());
        assert!(request(&["health"]).is_none());
    }
}
