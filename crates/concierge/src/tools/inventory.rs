use std::collections::BTreeSet;

use concierge_core::audit::AuditEvent;
use concierge_core::cloud::CloudError;
use concierge_core::inventory::{
    bucket_resource, build_health_report, build_inventory, db_resource, function_resource,
    instance_resource, HealthReport, InventoryScope, Resource, ResourceInventory, ResourceType,
};
use concierge_core::tool::{ToolError, ToolParams};

use crate::audit::AuditLog;
use crate::cloud::CloudProviders;

/// Lists the resources selected by `scope`.
///
/// Buckets are global, so they are listed with their own region whatever the
/// requested one is. Missing bucket settings only blank the metadata.
async fn collect_resources(
    cloud: &CloudProviders,
    region: &str,
    scope: InventoryScope,
) -> Result<Vec<Resource>, ToolError> {
    let mut resources = Vec::new();

    if scope.includes(ResourceType::Ec2) {
        let instances = cloud.compute.instances(region, None).await?;
        resources.extend(instances.iter().map(|i| instance_resource(i, region)));
    }

    if scope.includes(ResourceType::S3) {
        for bucket in cloud.storage.buckets().await? {
            let bucket_region = cloud
                .storage
                .bucket_region(&bucket.name)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(
                        bucket = %bucket.name,
                        error = %err,
                        "Bucket location lookup failed"
                    );
                    region.to_string()
                });
            let versioning = cloud
                .storage
                .bucket_versioning(&bucket.name)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(
                        bucket = %bucket.name,
                        error = %err,
                        "Bucket versioning lookup failed"
                    );
                    None
                });
            let encryption = cloud
                .storage
                .bucket_encryption(&bucket.name)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(
                        bucket = %bucket.name,
                        error = %err,
                        "Bucket encryption lookup failed"
                    );
                    None
                });

            resources.push(bucket_resource(
                &bucket,
                &bucket_region,
                versioning.as_deref(),
                encryption.as_ref().map(|e| e.algorithm.as_str()),
            ));
        }
    }

    if scope.includes(ResourceType::Rds) {
        let databases = cloud.database.db_instances(region).await?;
        resources.extend(databases.iter().map(|db| db_resource(db, region)));
    }

    if scope.includes(ResourceType::Lambda) {
        let functions = cloud.functions.functions(region).await?;
        resources.extend(functions.iter().map(|f| function_resource(f, region)));
    }

    Ok(resources)
}

fn record_access(audit: &AuditLog, scope: InventoryScope, resources: &[Resource], region: &str) {
    let mut regions: BTreeSet<String> = resources.iter().map(|r| r.region.clone()).collect();
    if regions.is_empty() {
        regions.insert(region.to_string());
    }
    audit.record(AuditEvent::resource_access(
        scope.label(),
        resources.len(),
        regions.into_iter().collect(),
    ));
}

pub(super) async fn resource_inventory(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<ResourceInventory, ToolError> {
    let scope = InventoryScope::parse(params.get_or("resource_type", "ALL"))?;
    let resources = collect_resources(cloud, region, scope).await?;
    record_access(audit, scope, &resources, region);
    Ok(build_inventory(region, scope, resources))
}

/// One resource by type and id.
pub(super) async fn resource_details(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<Resource, ToolError> {
    let resource_id = params.require("resource_id")?;
    let resource_type = ResourceType::parse(params.require("resource_type")?)?;
    let scope = InventoryScope::Only(resource_type);

    let resources = collect_resources(cloud, region, scope).await?;
    let resource = resources
        .into_iter()
        .find(|r| r.resource_id == resource_id)
        .ok_or_else(|| CloudError::NotFound {
            resource_type: resource_type.as_str().to_string(),
            id: resource_id.to_string(),
        })?;

    record_access(audit, scope, std::slice::from_ref(&resource), region);
    Ok(resource)
}

pub(super) async fn resource_health(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<HealthReport, ToolError> {
    let scope = InventoryScope::parse(params.get_or("resource_type", "ALL"))?;
    let resources = collect_resources(cloud, region, scope).await?;
    record_access(audit, scope, &resources, region);
    Ok(build_health_report(region, scope, &resources))
}
