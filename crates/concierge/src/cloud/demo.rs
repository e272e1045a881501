//! Deterministic sample account used by the `demo` feature and by tests.
//!
//! The data is picked so every tool has something to report: one idle and one
//! busy instance, open security groups, an unencrypted bucket, a database in a
//! bad state and an administrator user. Times are relative to "now".

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use concierge_core::cloud::{
    AgentInvocation, AgentReply, AgentRuntime, AttachedPolicy, Bucket, BucketEncryption,
    BudgetSpend, CallerIdentity, CloudError, ComputeSource, CostGroup, CostPeriod, CostSource,
    CpuDatapoint, DatabaseSource, DbInstance, Function, FunctionSource, IamUser, IdentitySource,
    IngressRule, Instance, InstanceMetrics, MetricWindow, PublicAccessBlock, Result,
    SecurityGroup, StorageSource, Volume,
};
use concierge_core::cost::{CostQuery, Granularity, GroupBy};

use super::CloudProviders;

pub const DEMO_ACCOUNT_ID: &str = "123456789012";

const SERVICE_DAILY_COSTS: [(&str, f64); 6] = [
    ("Amazon Elastic Compute Cloud - Compute", 12.40),
    ("Amazon Relational Database Service", 4.75),
    ("Amazon Simple Storage Service", 2.10),
    ("Amazon CloudFront", 0.80),
    ("AWS Lambda", 0.35),
    ("Amazon DynamoDB", 0.25),
];

const REGION_DAILY_COSTS: [(&str, f64); 2] = [("us-east-1", 14.60), ("eu-west-1", 6.05)];

const USAGE_TYPE_DAILY_COSTS: [(&str, f64); 4] = [
    ("BoxUsage:t3.medium", 8.10),
    ("BoxUsage:m5.large", 4.30),
    ("TimedStorage-ByteHrs", 2.10),
    ("DataTransfer-Out-Bytes", 1.15),
];

const INSTANCE_TYPE_DAILY_COSTS: [(&str, f64); 2] = [("t3.medium", 8.10), ("m5.large", 4.30)];

/// Sample account data. Stateless; every call returns the same account.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoCloud;

impl DemoCloud {
    pub fn new() -> Self {
        Self
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// The demo has no agent, so chat always takes the simulated path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoAgent;

#[async_trait]
impl AgentRuntime for DemoAgent {
    async fn invoke(&self, _invocation: &AgentInvocation) -> Result<AgentReply> {
        Err(CloudError::NotConfigured("Bedrock agent".to_string()))
    }
}

impl CloudProviders {
    pub fn demo() -> Self {
        CloudProviders::from_single(Arc::new(DemoCloud::new()), Arc::new(DemoAgent), "demo")
    }
}

fn daily_costs(group_by: GroupBy) -> &'static [(&'static str, f64)] {
    match group_by {
        GroupBy::Service => &SERVICE_DAILY_COSTS,
        GroupBy::Region => &REGION_DAILY_COSTS,
        GroupBy::UsageType => &USAGE_TYPE_DAILY_COSTS,
        GroupBy::InstanceType => &INSTANCE_TYPE_DAILY_COSTS,
    }
}

/// Costs grow by 1% a day from the 1st of each month so trends are visible.
fn cost_on(base: f64, day: NaiveDate) -> f64 {
    base * (1.0 + f64::from(day.day0()) * 0.01)
}

fn next_month_start(day: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn cost_period(start: NaiveDate, end: NaiveDate, group_by: GroupBy) -> CostPeriod {
    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d < end).collect();
    let groups = daily_costs(group_by)
        .iter()
        .map(|(key, base)| CostGroup {
            key: key.to_string(),
            amount: days.iter().map(|d| cost_on(*base, *d)).sum(),
            currency: "USD".to_string(),
            usage_quantity: days.len() as f64 * 24.0,
            usage_unit: "Hrs".to_string(),
        })
        .collect();
    CostPeriod { start, end, groups }
}

#[async_trait]
impl CostSource for DemoCloud {
    async fn cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostPeriod>> {
        // Nothing is billed after today.
        let end = query.end.min(Self::today() + Duration::days(1));
        let mut periods = Vec::new();
        let mut start = query.start;

        while start < end {
            let period_end = match query.granularity {
                Granularity::Daily => start + Duration::days(1),
                Granularity::Monthly => next_month_start(start).unwrap_or(end).min(end),
            };
            periods.push(cost_period(start, period_end, query.group_by));
            start = period_end;
        }

        Ok(periods)
    }

    async fn budget_spend(&self) -> Result<Vec<BudgetSpend>> {
        Ok(vec![
            BudgetSpend {
                budget_name: "sandbox-budget".to_string(),
                amount: 0.0,
                currency: "USD".to_string(),
            },
            BudgetSpend {
                budget_name: "monthly-demo-budget".to_string(),
                amount: 412.37,
                currency: "USD".to_string(),
            },
        ])
    }
}

fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn days_ago(days: i64) -> Option<DateTime<Utc>> {
    Some(Utc::now() - Duration::days(days))
}

fn demo_instances(region: &str) -> Vec<Instance> {
    let az = Some(format!("{region}a"));
    vec![
        Instance {
            instance_id: "i-0a1b2c3d4e5f60001".to_string(),
            instance_type: "t3.medium".to_string(),
            state: "running".to_string(),
            launch_time: days_ago(90),
            availability_zone: az.clone(),
            vpc_id: Some("vpc-0demo".to_string()),
            subnet_id: Some("subnet-0public".to_string()),
            public_ip: Some("203.0.113.10".to_string()),
            private_ip: Some("10.0.1.10".to_string()),
            security_groups: vec!["sg-0web".to_string()],
            tags: tags(&[("Name", "web-server"), ("Environment", "demo")]),
        },
        Instance {
            instance_id: "i-0a1b2c3d4e5f60002".to_string(),
            instance_type: "m5.large".to_string(),
            state: "running".to_string(),
            launch_time: days_ago(60),
            availability_zone: az.clone(),
            vpc_id: Some("vpc-0demo".to_string()),
            subnet_id: Some("subnet-0private".to_string()),
            public_ip: None,
            private_ip: Some("10.0.2.20".to_string()),
            security_groups: vec!["sg-0db".to_string()],
            tags: tags(&[("Name", "batch-worker"), ("Environment", "demo")]),
        },
        Instance {
            instance_id: "i-0a1b2c3d4e5f60003".to_string(),
            instance_type: "t2.micro".to_string(),
            state: "stopped".to_string(),
            launch_time: days_ago(400),
            availability_zone: az.clone(),
            vpc_id: Some("vpc-0demo".to_string()),
            subnet_id: Some("subnet-0public".to_string()),
            public_ip: None,
            private_ip: Some("10.0.1.30".to_string()),
            security_groups: vec!["sg-0legacy".to_string()],
            tags: tags(&[("Name", "legacy-app")]),
        },
        Instance {
            instance_id: "i-0a1b2c3d4e5f60004".to_string(),
            instance_type: "t3.small".to_string(),
            state: "running".to_string(),
            launch_time: days_ago(2),
            availability_zone: az,
            vpc_id: Some("vpc-0demo".to_string()),
            subnet_id: Some("subnet-0private".to_string()),
            public_ip: None,
            private_ip: Some("10.0.2.40".to_string()),
            security_groups: vec!["sg-0db".to_string()],
            tags: tags(&[("Name", "dev-sandbox")]),
        },
    ]
}

fn tcp_rule(port: i32, cidr: &str) -> IngressRule {
    IngressRule {
        protocol: "tcp".to_string(),
        from_port: Some(port),
        to_port: Some(port),
        cidr_ranges: vec![cidr.to_string()],
    }
}

/// (average, maximum) CPU per instance.
fn cpu_profile(instance_id: &str) -> (f64, f64) {
    match instance_id {
        "i-0a1b2c3d4e5f60001" => (0.6, 3.2),
        "i-0a1b2c3d4e5f60004" => (1.5, 8.0),
        _ => (37.5, 82.0),
    }
}

#[async_trait]
impl ComputeSource for DemoCloud {
    async fn instances(&self, region: &str, state: Option<&str>) -> Result<Vec<Instance>> {
        Ok(demo_instances(region)
            .into_iter()
            .filter(|i| match state {
                Some(s) => i.state == s,
                None => true,
            })
            .collect())
    }

    async fn security_groups(&self, _region: &str) -> Result<Vec<SecurityGroup>> {
        Ok(vec![
            SecurityGroup {
                group_id: "sg-0web".to_string(),
                group_name: "web-sg".to_string(),
                vpc_id: Some("vpc-0demo".to_string()),
                ingress: vec![tcp_rule(443, "0.0.0.0/0"), tcp_rule(22, "0.0.0.0/0")],
            },
            SecurityGroup {
                group_id: "sg-0db".to_string(),
                group_name: "db-sg".to_string(),
                vpc_id: Some("vpc-0demo".to_string()),
                ingress: vec![tcp_rule(5432, "10.0.0.0/16")],
            },
            SecurityGroup {
                group_id: "sg-0legacy".to_string(),
                group_name: "legacy-sg".to_string(),
                vpc_id: Some("vpc-0demo".to_string()),
                ingress: vec![
                    tcp_rule(8080, "0.0.0.0/0"),
                    IngressRule {
                        protocol: "-1".to_string(),
                        from_port: None,
                        to_port: None,
                        cidr_ranges: vec!["0.0.0.0/0".to_string()],
                    },
                ],
            },
        ])
    }

    async fn volumes(&self, _region: &str) -> Result<Vec<Volume>> {
        Ok(vec![
            Volume {
                volume_id: "vol-0encrypted0001".to_string(),
                encrypted: true,
                kms_key_id: Some("alias/aws/ebs".to_string()),
                size_gib: Some(30),
                state: Some("in-use".to_string()),
            },
            Volume {
                volume_id: "vol-0plain00000002".to_string(),
                encrypted: false,
                kms_key_id: None,
                size_gib: Some(100),
                state: Some("in-use".to_string()),
            },
        ])
    }

    async fn instance_metrics(
        &self,
        _region: &str,
        instance_id: &str,
        window: MetricWindow,
    ) -> Result<InstanceMetrics> {
        let (average, maximum) = cpu_profile(instance_id);
        let seconds = (window.end - window.start).num_seconds().max(0);
        let samples = (seconds / i64::from(window.period_seconds.max(1))) as usize;

        Ok(InstanceMetrics {
            cpu: vec![CpuDatapoint { average, maximum }; samples],
            network_in: vec![average * 10_000.0; samples],
            network_out: vec![average * 4_000.0; samples],
        })
    }
}

#[async_trait]
impl StorageSource for DemoCloud {
    async fn buckets(&self) -> Result<Vec<Bucket>> {
        Ok(["demo-app-assets", "demo-access-logs", "demo-public-site"]
            .into_iter()
            .map(|name| Bucket {
                name: name.to_string(),
                created_at: days_ago(180),
            })
            .collect())
    }

    async fn bucket_region(&self, bucket: &str) -> Result<String> {
        Ok(match bucket {
            "demo-access-logs" => "eu-west-1",
            _ => "us-east-1",
        }
        .to_string())
    }

    async fn public_access_block(&self, bucket: &str) -> Result<Option<PublicAccessBlock>> {
        Ok(match bucket {
            "demo-app-assets" => Some(PublicAccessBlock {
                block_public_acls: true,
                ignore_public_acls: true,
                block_public_policy: true,
                restrict_public_buckets: true,
            }),
            "demo-access-logs" => Some(PublicAccessBlock {
                block_public_acls: true,
                ignore_public_acls: true,
                block_public_policy: false,
                restrict_public_buckets: false,
            }),
            _ => None,
        })
    }

    async fn bucket_encryption(&self, bucket: &str) -> Result<Option<BucketEncryption>> {
        Ok(match bucket {
            "demo-app-assets" => Some(BucketEncryption {
                algorithm: "AES256".to_string(),
                kms_key_id: None,
            }),
            "demo-public-site" => Some(BucketEncryption {
                algorithm: "aws:kms".to_string(),
                kms_key_id: Some("alias/demo-site".to_string()),
            }),
            _ => None,
        })
    }

    async fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>> {
        Ok((bucket == "demo-app-assets").then(|| "Enabled".to_string()))
    }
}

#[async_trait]
impl DatabaseSource for DemoCloud {
    async fn db_instances(&self, region: &str) -> Result<Vec<DbInstance>> {
        let az = Some(format!("{region}b"));
        Ok(vec![
            DbInstance {
                identifier: "demo-postgres".to_string(),
                engine: "postgres".to_string(),
                engine_version: Some("16.3".to_string()),
                instance_class: "db.t3.medium".to_string(),
                status: "available".to_string(),
                created_at: days_ago(200),
                availability_zone: az.clone(),
                allocated_storage_gib: Some(100),
                multi_az: true,
                publicly_accessible: false,
                storage_encrypted: true,
                kms_key_id: Some("alias/aws/rds".to_string()),
            },
            DbInstance {
                identifier: "demo-reporting".to_string(),
                engine: "mysql".to_string(),
                engine_version: Some("8.0.35".to_string()),
                instance_class: "db.t3.small".to_string(),
                status: "storage-full".to_string(),
                created_at: days_ago(120),
                availability_zone: az,
                allocated_storage_gib: Some(20),
                multi_az: false,
                publicly_accessible: true,
                storage_encrypted: false,
                kms_key_id: None,
            },
        ])
    }
}

#[async_trait]
impl FunctionSource for DemoCloud {
    async fn functions(&self, region: &str) -> Result<Vec<Function>> {
        let function = |name: &str, state: &str| Function {
            name: name.to_string(),
            arn: Some(format!(
                "arn:aws:lambda:{region}:{DEMO_ACCOUNT_ID}:function:{name}"
            )),
            runtime: Some("python3.12".to_string()),
            handler: Some("index.handler".to_string()),
            memory_mb: Some(256),
            timeout_seconds: Some(30),
            last_modified: Some((Utc::now() - Duration::days(14)).to_rfc3339()),
            state: Some(state.to_string()),
        };
        Ok(vec![
            function("demo-api-handler", "Active"),
            function("demo-nightly-report", "Failed"),
        ])
    }
}

#[async_trait]
impl IdentitySource for DemoCloud {
    async fn users(&self) -> Result<Vec<IamUser>> {
        let policy = |name: &str| AttachedPolicy {
            name: name.to_string(),
            arn: format!("arn:aws:iam::aws:policy/{name}"),
        };
        Ok(vec![
            IamUser {
                user_name: "alice".to_string(),
                attached_policies: vec![policy("AdministratorAccess")],
            },
            IamUser {
                user_name: "bob".to_string(),
                attached_policies: vec![policy("ReadOnlyAccess")],
            },
        ])
    }

    async fn caller_identity(&self) -> Result<CallerIdentity> {
        Ok(CallerIdentity {
            account: DEMO_ACCOUNT_ID.to_string(),
            arn: format!("arn:aws:iam::{DEMO_ACCOUNT_ID}:user/demo"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> CostQuery {
        CostQuery {
            start,
            end,
            granularity,
            group_by: GroupBy::Service,
        }
    }

    #[tokio::test]
    async fn test_daily_costs_one_period_per_day() {
        let today = DemoCloud::today();
        let start = today - Duration::days(3);
        let periods = DemoCloud
            .cost_and_usage(&query(start, today, Granularity::Daily))
            .await
            .unwrap();

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start, start);
        assert_eq!(periods[0].groups.len(), SERVICE_DAILY_COSTS.len());
    }

    #[tokio::test]
    async fn test_future_window_has_no_costs() {
        let start = DemoCloud::today() + Duration::days(40);
        let periods = DemoCloud
            .cost_and_usage(&query(start, start + Duration::days(30), Granularity::Monthly))
            .await
            .unwrap();

        assert!(periods.is_empty());
    }

    #[tokio::test]
    async fn test_monthly_periods_split_on_month_boundaries() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let periods = DemoCloud
            .cost_and_usage(&query(start, end, Granularity::Monthly))
            .await
            .unwrap();

        let starts: Vec<u32> = periods.iter().map(|p| p.start.month()).collect();
        assert_eq!(starts, vec![1, 2, 3]);
        assert_eq!(periods[1].end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn test_instances_filter_by_state() {
        let running = DemoCloud
            .instances("us-east-1", Some("running"))
            .await
            .unwrap();
        let all = DemoCloud.instances("us-east-1", None).await.unwrap();

        assert_eq!(running.len(), 3);
        assert_eq!(all.len(), 4);
        assert_eq!(running[0].availability_zone.as_deref(), Some("us-east-1a"));
    }

    #[tokio::test]
    async fn test_metrics_sample_count_follows_window() {
        let end = Utc::now();
        let window = MetricWindow {
            start: end - Duration::days(7),
            end,
            period_seconds: 3600,
        };
        let metrics = DemoCloud
            .instance_metrics("us-east-1", "i-0a1b2c3d4e5f60001", window)
            .await
            .unwrap();

        assert_eq!(metrics.cpu.len(), 168);
        assert_eq!(metrics.cpu[0].average, 0.6);
    }

    #[tokio::test]
    async fn test_agent_is_not_configured() {
        let invocation = AgentInvocation {
            session_id: "session-1".to_string(),
            input: "hello".to_string(),
        };
        let err = DemoAgent.invoke(&invocation).await.unwrap_err();
        assert_eq!(err, CloudError::NotConfigured("Bedrock agent".to_string()));
    }
}
