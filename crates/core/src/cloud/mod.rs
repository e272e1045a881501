//! Cloud provider abstractions.

mod error;
mod traits;
mod types;

pub use error::{CloudError, Result};
pub use traits::{
    AgentRuntime, ComputeSource, CostSource, DatabaseSource, FunctionSource, IdentitySource,
    StorageSource,
};
pub use types::{
    AgentInvocation, AgentReply, AttachedPolicy, Bucket, BucketEncryption, BudgetSpend,
    CallerIdentity, Citation, CostGroup, CostPeriod, CpuDatapoint, DbInstance, Function, IamUser,
    IngressRule, Instance, InstanceMetrics, MetricWindow, PublicAccessBlock, SecurityGroup, Volume,
};
