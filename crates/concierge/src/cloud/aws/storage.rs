use async_trait::async_trait;
use chrono::DateTime;

use concierge_core::cloud::{
    Bucket, BucketEncryption, CloudError, PublicAccessBlock, Result, StorageSource,
};
use concierge_core::inventory::normalize_bucket_region;

use super::error::ApiCall;
use super::AwsCloud;

/// Error codes S3 uses for "this bucket has no such configuration".
const NO_PUBLIC_ACCESS_BLOCK: &str = "NoSuchPublicAccessBlockConfiguration";
const NO_ENCRYPTION: &str = "ServerSideEncryptionConfigurationNotFoundError";

impl AwsCloud {
    /// Bucket-level calls must go to the bucket's own region.
    async fn s3_for(&self, bucket: &str) -> Result<aws_sdk_s3::Client> {
        let region = self.bucket_region(bucket).await?;
        Ok(self.s3_in(&region))
    }

    fn cached_bucket_region(&self, bucket: &str) -> Option<String> {
        self.bucket_regions
            .read()
            .ok()
            .and_then(|regions| regions.get(bucket).cloned())
    }
}

fn is_missing(err: &CloudError, missing_code: &str) -> bool {
    matches!(err, CloudError::Service { code, .. } if code == missing_code)
}

#[async_trait]
impl StorageSource for AwsCloud {
    async fn buckets(&self) -> Result<Vec<Bucket>> {
        let output = ApiCall::new("s3", "ListBuckets", self.home_region())
            .finish(self.s3.list_buckets().send().await)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                Some(Bucket {
                    name: bucket.name()?.to_string(),
                    created_at: bucket
                        .creation_date()
                        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                })
            })
            .collect())
    }

    async fn bucket_region(&self, bucket: &str) -> Result<String> {
        if let Some(region) = self.cached_bucket_region(bucket) {
            return Ok(region);
        }

        let output = ApiCall::new("s3", "GetBucketLocation", self.home_region())
            .finish(self.s3.get_bucket_location().bucket(bucket).send().await)?;
        let region =
            normalize_bucket_region(output.location_constraint().map(|c| c.as_str()));

        if let Ok(mut regions) = self.bucket_regions.write() {
            regions.insert(bucket.to_string(), region.clone());
        }
        Ok(region)
    }

    async fn public_access_block(&self, bucket: &str) -> Result<Option<PublicAccessBlock>> {
        let client = self.s3_for(bucket).await?;
        let result = ApiCall::new("s3", "GetPublicAccessBlock", self.home_region())
            .finish(client.get_public_access_block().bucket(bucket).send().await);

        match result {
            Ok(output) => Ok(output.public_access_block_configuration().map(|config| {
                PublicAccessBlock {
                    block_public_acls: config.block_public_acls().unwrap_or(false),
                    ignore_public_acls: config.ignore_public_acls().unwrap_or(false),
                    block_public_policy: config.block_public_policy().unwrap_or(false),
                    restrict_public_buckets: config.restrict_public_buckets().unwrap_or(false),
                }
            })),
            Err(err) if is_missing(&err, NO_PUBLIC_ACCESS_BLOCK) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn bucket_encryption(&self, bucket: &str) -> Result<Option<BucketEncryption>> {
        let client = self.s3_for(bucket).await?;
        let result = ApiCall::new("s3", "GetBucketEncryption", self.home_region())
            .finish(client.get_bucket_encryption().bucket(bucket).send().await);

        match result {
            Ok(output) => Ok(output
                .server_side_encryption_configuration()
                .and_then(|config| config.rules().first())
                .and_then(|rule| rule.apply_server_side_encryption_by_default())
                .map(|default| BucketEncryption {
                    algorithm: default.sse_algorithm().as_str().to_string(),
                    kms_key_id: default.kms_master_key_id().map(str::to_string),
                })),
            Err(err) if is_missing(&err, NO_ENCRYPTION) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn bucket_versioning(&self, bucket: &str) -> Result<Option<String>> {
        let client = self.s3_for(bucket).await?;
        let output = ApiCall::new("s3", "GetBucketVersioning", self.home_region())
            .finish(client.get_bucket_versioning().bucket(bucket).send().await)?;

        Ok(output.status().map(|s| s.as_str().to_string()))
    }
}
