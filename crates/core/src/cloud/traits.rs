use async_trait::async_trait;

use crate::cost::CostQuery;

use super::types::{
    AgentInvocation, AgentReply, Bucket, BucketEncryption, BudgetSpend, CallerIdentity,
    CostPeriod, DbInstance, Function, IamUser, Instance, InstanceMetrics, MetricWindow,
    PublicAccessBlock, SecurityGroup, Volume,
};
use super::Result;

/// Cost Explorer and Budgets.
#[async_trait]
pub trait CostSource: Send + Sync {
    /// Gets grouped cost and usage for a date range.
    async fn cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostPeriod>>;

    /// Gets the actual spend of every budget in the account.
    async fn budget_spend(&self) -> Result<Vec<BudgetSpend>>;
}

/// EC2 and CloudWatch.
#[async_trait]
pub trait ComputeSource: Send + Sync {
    /// Lists instances, optionally filtered by state name (e.g. `running`).
    async fn instances(&self, region: &str, state: Option<&str>) -> Result<Vec<Instance>>;

    /// Lists security groups with their ingress rules.
    async fn security_groups(&self, region: &str) -> Result<Vec<SecurityGroup>>;

    /// Lists EBS volumes.
    async fn volumes(&self, region: &str) -> Result<Vec<Volume>>;

    /// Gets CPU and network samples for an instance.
    async fn instance_metrics(
        &self,
        region: &str,
        instance_id: &str,
        window: MetricWindow,
    ) -> Result<InstanceMetrics>;
}

/// S3.
#[async_trait]
pub trait StorageSource: Send + Sync {
    async fn buckets(&self) -> Result<Vec<Bucket>>;

    /// Gets the bucket's region, `us-east-1` for the legacy empty location.
    async fn bucket_region(&self, bucket: &str) -> Result<String>;

    /// Gets the bucket's Block Public Access settings, `None` when unset.
    async fn public_access_block(&self, bucket: &str) -> Result<Option<PublicAccessBlock>>;

    /// Gets the bucket's default encryption, `None` when unset.
    async fn bucket_encryption(&self, bucket: &str) -> Result<Option<BucketEncryption>>;

    /// Gets the versioning status (`Enabled`, `Suspended`), `None` when never enabled.
    async fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>>;
}

/// RDS.
#[async_trait]
pub trait DatabaseSource: Send + Sync {
    async fn db_instances(&self, region: &str) -> Result<Vec<DbInstance>>;
}

/// Lambda.
#[async_trait]
pub trait FunctionSource: Send + Sync {
    async fn functions(&self, region: &str) -> Result<Vec<Function>>;
}

/// IAM and STS.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Lists IAM users with their attached managed policies.
    async fn users(&self) -> Result<Vec<IamUser>>;

    async fn caller_identity(&self) -> Result<CallerIdentity>;
}

/// Bedrock Agent Runtime.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Sends user input to the agent and collects the full response stream.
    async fn invoke(&self, invocation: &AgentInvocation) -> Result<AgentReply>;
}
