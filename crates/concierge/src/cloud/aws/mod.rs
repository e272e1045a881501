//! AWS SDK providers.
//!
//! One `AwsCloud` value implements every source trait. Global services (Cost
//! Explorer, Budgets, S3 listing, IAM, STS) share clients built once from the
//! default credential chain; regional services get a client per call pointed
//! at the requested region.

mod agent;
mod compute;
mod cost;
mod database;
mod error;
mod functions;
mod identity;
mod storage;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use agent::BedrockAgent;

use super::CloudProviders;
use crate::config::Config;

/// Cost Explorer only answers in us-east-1.
const COST_EXPLORER_REGION: &str = "us-east-1";

pub struct AwsCloud {
    sdk_config: SdkConfig,
    cost_explorer: aws_sdk_costexplorer::Client,
    budgets: aws_sdk_budgets::Client,
    s3: aws_sdk_s3::Client,
    iam: aws_sdk_iam::Client,
    sts: aws_sdk_sts::Client,
    /// Bucket name to region, filled by `bucket_region`.
    bucket_regions: RwLock<HashMap<String, String>>,
}

impl AwsCloud {
    pub fn new(sdk_config: SdkConfig) -> Self {
        let cost_explorer = aws_sdk_costexplorer::Client::from_conf(
            aws_sdk_costexplorer::config::Builder::from(&sdk_config)
                .region(Region::new(COST_EXPLORER_REGION))
                .build(),
        );

        Self {
            cost_explorer,
            budgets: aws_sdk_budgets::Client::new(&sdk_config),
            s3: aws_sdk_s3::Client::new(&sdk_config),
            iam: aws_sdk_iam::Client::new(&sdk_config),
            sts: aws_sdk_sts::Client::new(&sdk_config),
            bucket_regions: RwLock::new(HashMap::new()),
            sdk_config,
        }
    }

    fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::from_conf(
            aws_sdk_ec2::config::Builder::from(&self.sdk_config)
                .region(Region::new(region.to_string()))
                .build(),
        )
    }

    fn cloudwatch(&self, region: &str) -> aws_sdk_cloudwatch::Client {
        aws_sdk_cloudwatch::Client::from_conf(
            aws_sdk_cloudwatch::config::Builder::from(&self.sdk_config)
                .region(Region::new(region.to_string()))
                .build(),
        )
    }

    fn s3_in(&self, region: &str) -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::config::Builder::from(&self.sdk_config)
                .region(Region::new(region.to_string()))
                .build(),
        )
    }

    fn rds(&self, region: &str) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::from_conf(
            aws_sdk_rds::config::Builder::from(&self.sdk_config)
                .region(Region::new(region.to_string()))
                .build(),
        )
    }

    fn lambda(&self, region: &str) -> aws_sdk_lambda::Client {
        aws_sdk_lambda::Client::from_conf(
            aws_sdk_lambda::config::Builder::from(&self.sdk_config)
                .region(Region::new(region.to_string()))
                .build(),
        )
    }

    /// Region of the shared config, used to label global calls.
    fn home_region(&self) -> Option<&str> {
        self.sdk_config.region().map(|r| r.as_ref())
    }
}

impl CloudProviders {
    /// Builds the AWS providers from the default credential chain.
    pub async fn aws(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let agent = BedrockAgent::new(
            aws_sdk_bedrockagentruntime::Client::new(&sdk_config),
            config.agent_id.clone(),
            config.agent_alias_id.clone(),
        );

        tracing::info!(
            region = %config.region,
            agent_configured = config.agent_id.is_some(),
            "AWS providers initialized"
        );

        CloudProviders::from_single(Arc::new(AwsCloud::new(sdk_config)), Arc::new(agent), "aws")
    }
}
