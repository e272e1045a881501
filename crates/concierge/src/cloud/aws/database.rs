use async_trait::async_trait;
use chrono::DateTime;

use concierge_core::cloud::{DatabaseSource, DbInstance, Result};

use super::error::ApiCall;
use super::AwsCloud;

#[async_trait]
impl DatabaseSource for AwsCloud {
    async fn db_instances(&self, region: &str) -> Result<Vec<DbInstance>> {
        let client = self.rds(region);
        let mut instances = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = ApiCall::new("rds", "DescribeDBInstances", Some(region)).finish(
                client
                    .describe_db_instances()
                    .set_marker(marker.take())
                    .send()
                    .await,
            )?;

            instances.extend(output.db_instances().iter().map(|db| DbInstance {
                identifier: db.db_instance_identifier().unwrap_or_default().to_string(),
                engine: db.engine().unwrap_or_default().to_string(),
                engine_version: db.engine_version().map(str::to_string),
                instance_class: db.db_instance_class().unwrap_or_default().to_string(),
                status: db
                    .db_instance_status()
                    .unwrap_or("unknown")
                    .to_string(),
                created_at: db
                    .instance_create_time()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                availability_zone: db.availability_zone().map(str::to_string),
                allocated_storage_gib: db.allocated_storage(),
                multi_az: db.multi_az().unwrap_or(false),
                publicly_accessible: db.publicly_accessible().unwrap_or(false),
                storage_encrypted: db.storage_encrypted().unwrap_or(false),
                kms_key_id: db.kms_key_id().map(str::to_string),
            }));

            match output.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(instances)
    }
}
