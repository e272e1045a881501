//! Records returned by cloud providers.
//!
//! These are provider-neutral snapshots of the AWS responses the tools need.
//! The AWS implementation fills them from SDK output, the demo provider from
//! static sample data.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One cost bucket of a Cost Explorer result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroup {
    /// Group key, e.g. a service name when grouped by SERVICE.
    pub key: String,
    pub amount: f64,
    pub currency: String,
    pub usage_quantity: f64,
    pub usage_unit: String,
}

/// Costs for one granularity step (a day or a month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub groups: Vec<CostGroup>,
}

/// Actual spend reported by an AWS Budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSpend {
    pub budget_name: String,
    pub amount: f64,
    pub currency: String,
}

/// An EC2 instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub instance_type: String,
    pub state: String,
    pub launch_time: Option<DateTime<Utc>>,
    pub availability_zone: Option<String>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub security_groups: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

/// A single ingress permission on a security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    /// `-1` means all protocols.
    pub protocol: String,
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
    pub cidr_ranges: Vec<String>,
}

impl IngressRule {
    /// Returns true if this rule admits traffic from anywhere on the internet.
    pub fn is_open_to_world(&self) -> bool {
        self.cidr_ranges.iter().any(|cidr| cidr == "0.0.0.0/0")
    }

    /// Returns true if this rule covers every protocol and port.
    pub fn is_all_traffic(&self) -> bool {
        self.protocol == "-1" || self.from_port.is_none()
    }
}

/// A VPC security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: String,
    pub vpc_id: Option<String>,
    pub ingress: Vec<IngressRule>,
}

/// An EBS volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub volume_id: String,
    pub encrypted: bool,
    pub kms_key_id: Option<String>,
    pub size_gib: Option<i32>,
    pub state: Option<String>,
}

/// A CloudWatch datapoint for CPU utilisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuDatapoint {
    pub average: f64,
    pub maximum: f64,
}

/// Raw CloudWatch samples for one instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceMetrics {
    pub cpu: Vec<CpuDatapoint>,
    /// Average bytes received per period.
    pub network_in: Vec<f64>,
    /// Average bytes sent per period.
    pub network_out: Vec<f64>,
}

/// The time window and resolution for a metrics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_seconds: i32,
}

/// An S3 bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// S3 Block Public Access settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// All four settings enabled.
    pub fn fully_blocked(&self) -> bool {
        self.block_public_acls
            && self.ignore_public_acls
            && self.block_public_policy
            && self.restrict_public_buckets
    }
}

/// Default server-side encryption of a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEncryption {
    pub algorithm: String,
    pub kms_key_id: Option<String>,
}

/// An RDS database instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbInstance {
    pub identifier: String,
    pub engine: String,
    pub engine_version: Option<String>,
    pub instance_class: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub availability_zone: Option<String>,
    pub allocated_storage_gib: Option<i32>,
    pub multi_az: bool,
    pub publicly_accessible: bool,
    pub storage_encrypted: bool,
    pub kms_key_id: Option<String>,
}

/// A Lambda function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub arn: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    pub memory_mb: Option<i32>,
    pub timeout_seconds: Option<i32>,
    pub last_modified: Option<String>,
    /// `Active`, `Pending`, `Inactive` or `Failed`.
    pub state: Option<String>,
}

/// An IAM policy attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedPolicy {
    pub name: String,
    pub arn: String,
}

/// An IAM user with its attached managed policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamUser {
    pub user_name: String,
    pub attached_policies: Vec<AttachedPolicy>,
}

/// STS caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// A Bedrock agent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    pub session_id: String,
    pub input: String,
}

/// A source reference attached to an agent answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub text: String,
    pub sources: Vec<String>,
}

/// The collected agent response stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub text: String,
    pub citations: Vec<Citation>,
    pub trace_events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(protocol: &str, port: Option<i32>, cidr: &str) -> IngressRule {
        IngressRule {
            protocol: protocol.to_string(),
            from_port: port,
            to_port: port,
            cidr_ranges: vec![cidr.to_string()],
        }
    }

    #[test]
    fn test_ingress_open_to_world() {
        assert!(rule("tcp", Some(22), "0.0.0.0/0").is_open_to_world());
        assert!(!rule("tcp", Some(22), "10.0.0.0/8").is_open_to_world());
    }

    #[test]
    fn test_ingress_all_traffic() {
        assert!(rule("-1", None, "0.0.0.0/0").is_all_traffic());
        assert!(!rule("tcp", Some(443), "0.0.0.0/0").is_all_traffic());
    }

    #[test]
    fn test_public_access_block_fully_blocked() {
        let all = PublicAccessBlock {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        };
        assert!(all.fully_blocked());

        let partial = PublicAccessBlock {
            restrict_public_buckets: false,
            ..all
        };
        assert!(!partial.fully_blocked());
        assert!(!PublicAccessBlock::default().fully_blocked());
    }
}
