//! Conversions from provider records to inventory resources.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::cloud::{Bucket, DbInstance, Function, Instance};

use super::types::{InventoryScope, InventorySummary, Resource, ResourceInventory, ResourceType};

/// S3 reports the original region as an empty location constraint.
pub fn normalize_bucket_region(location: Option<&str>) -> String {
    match location {
        None | Some("") => "us-east-1".to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}

pub fn instance_resource(instance: &Instance, region: &str) -> Resource {
    let mut metadata = BTreeMap::new();
    metadata.insert("instance_type".to_string(), json!(instance.instance_type));
    insert_opt(&mut metadata, "availability_zone", &instance.availability_zone);
    insert_opt(&mut metadata, "vpc_id", &instance.vpc_id);
    insert_opt(&mut metadata, "subnet_id", &instance.subnet_id);
    insert_opt(&mut metadata, "public_ip", &instance.public_ip);
    insert_opt(&mut metadata, "private_ip", &instance.private_ip);
    metadata.insert(
        "security_groups".to_string(),
        json!(instance.security_groups),
    );

    Resource {
        resource_id: instance.instance_id.clone(),
        resource_type: ResourceType::Ec2,
        name: instance.tags.get("Name").cloned(),
        status: instance.state.clone(),
        region: region.to_string(),
        created_at: instance.launch_time,
        tags: instance.tags.clone(),
        metadata,
    }
}

/// A bucket resource. Buckets have no state, so they are always `available`.
pub fn bucket_resource(
    bucket: &Bucket,
    region: &str,
    versioning: Option<&str>,
    encryption: Option<&str>,
) -> Resource {
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "versioning".to_string(),
        json!(versioning.unwrap_or("Disabled")),
    );
    metadata.insert(
        "encryption".to_string(),
        encryption.map(|e| json!(e)).unwrap_or(Value::Null),
    );

    Resource {
        resource_id: bucket.name.clone(),
        resource_type: ResourceType::S3,
        name: Some(bucket.name.clone()),
        status: "available".to_string(),
        region: region.to_string(),
        created_at: bucket.created_at,
        tags: BTreeMap::new(),
        metadata,
    }
}

pub fn db_resource(db: &DbInstance, region: &str) -> Resource {
    let mut metadata = BTreeMap::new();
    metadata.insert("engine".to_string(), json!(db.engine));
    insert_opt(&mut metadata, "engine_version", &db.engine_version);
    metadata.insert("instance_class".to_string(), json!(db.instance_class));
    insert_opt(&mut metadata, "availability_zone", &db.availability_zone);
    if let Some(storage) = db.allocated_storage_gib {
        metadata.insert("allocated_storage_gib".to_string(), json!(storage));
    }
    metadata.insert("multi_az".to_string(), json!(db.multi_az));
    metadata.insert("publicly_accessible".to_string(), json!(db.publicly_accessible));
    metadata.insert("storage_encrypted".to_string(), json!(db.storage_encrypted));

    Resource {
        resource_id: db.identifier.clone(),
        resource_type: ResourceType::Rds,
        name: Some(db.identifier.clone()),
        status: db.status.clone(),
        region: region.to_string(),
        created_at: db.created_at,
        tags: BTreeMap::new(),
        metadata,
    }
}

/// A function resource. Functions without a reported state are `Active`.
pub fn function_resource(function: &Function, region: &str) -> Resource {
    let mut metadata = BTreeMap::new();
    insert_opt(&mut metadata, "arn", &function.arn);
    insert_opt(&mut metadata, "runtime", &function.runtime);
    insert_opt(&mut metadata, "handler", &function.handler);
    insert_opt(&mut metadata, "last_modified", &function.last_modified);
    if let Some(memory) = function.memory_mb {
        metadata.insert("memory_mb".to_string(), json!(memory));
    }
    if let Some(timeout) = function.timeout_seconds {
        metadata.insert("timeout_seconds".to_string(), json!(timeout));
    }

    Resource {
        resource_id: function.name.clone(),
        resource_type: ResourceType::Lambda,
        name: Some(function.name.clone()),
        status: function
            .state
            .clone()
            .unwrap_or_else(|| "Active".to_string()),
        region: region.to_string(),
        created_at: None,
        tags: BTreeMap::new(),
        metadata,
    }
}

pub fn summarize_inventory(resources: &[Resource]) -> InventorySummary {
    let mut summary = InventorySummary {
        total: resources.len(),
        ..Default::default()
    };
    for resource in resources {
        *summary.by_type.entry(resource.resource_type).or_default() += 1;
        *summary.by_status.entry(resource.status.clone()).or_default() += 1;
    }
    summary
}

/// Assembles an inventory, ordered by type then id.
pub fn build_inventory(
    region: &str,
    scope: InventoryScope,
    mut resources: Vec<Resource>,
) -> ResourceInventory {
    resources.retain(|r| scope.includes(r.resource_type));
    resources.sort_by(|a, b| {
        a.resource_type
            .cmp(&b.resource_type)
            .then_with(|| a.resource_id.cmp(&b.resource_id))
    });

    ResourceInventory {
        region: region.to_string(),
        scope: scope.label().to_string(),
        summary: summarize_inventory(&resources),
        resources,
    }
}

fn insert_opt(metadata: &mut BTreeMap<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_instance() -> Instance {
        let mut tags = BTreeMap::new();
        tags.insert("Name".to_string(), "web-1".to_string());
        tags.insert("Team".to_string(), "platform".to_string());
        Instance {
            instance_id: "i-0abc".to_string(),
            instance_type: "t3.small".to_string(),
            state: "running".to_string(),
            launch_time: None,
            availability_zone: Some("us-east-1a".to_string()),
            vpc_id: Some("vpc-1".to_string()),
            subnet_id: None,
            public_ip: None,
            private_ip: Some("10.0.0.5".to_string()),
            security_groups: vec!["web".to_string()],
            tags,
        }
    }

    fn sample_function(name: &str, state: Option<&str>) -> Function {
        Function {
            name: name.to_string(),
            arn: None,
            runtime: Some("python3.12".to_string()),
            handler: None,
            memory_mb: Some(128),
            timeout_seconds: None,
            last_modified: None,
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_bucket_region() {
        assert_eq!(normalize_bucket_region(None), "us-east-1");
        assert_eq!(normalize_bucket_region(Some("")), "us-east-1");
        assert_eq!(normalize_bucket_region(Some("EU")), "eu-west-1");
        assert_eq!(normalize_bucket_region(Some("ap-south-1")), "ap-south-1");
    }

    #[test]
    fn test_instance_resource() {
        let resource = instance_resource(&sample_instance(), "us-east-1");
        assert_eq!(resource.name.as_deref(), Some("web-1"));
        assert_eq!(resource.status, "running");
        assert_eq!(resource.metadata["instance_type"], "t3.small");
        assert_eq!(resource.metadata["private_ip"], "10.0.0.5");
        assert!(!resource.metadata.contains_key("public_ip"));
        assert_eq!(resource.tags.len(), 2);
    }

    #[test]
    fn test_bucket_resource_defaults() {
        let bucket = Bucket {
            name: "logs".to_string(),
            created_at: None,
        };
        let resource = bucket_resource(&bucket, "us-east-1", None, None);
        assert_eq!(resource.metadata["versioning"], "Disabled");
        assert_eq!(resource.metadata["encryption"], Value::Null);
        assert_eq!(resource.status, "available");
    }

    #[test]
    fn test_function_resource_default_state() {
        let resource = function_resource(&sample_function("worker", None), "us-east-1");
        assert_eq!(resource.status, "Active");
        assert_eq!(resource.metadata["memory_mb"], 128);
    }

    #[test]
    fn test_build_inventory_filters_and_counts() {
        let resources = vec![
            function_resource(&sample_function("b-fn", None), "us-east-1"),
            instance_resource(&sample_instance(), "us-east-1"),
            function_resource(&sample_function("a-fn", Some("Failed")), "us-east-1"),
        ];

        let all = build_inventory("us-east-1", InventoryScope::All, resources.clone());
        assert_eq!(all.summary.total, 3);
        assert_eq!(all.resources[0].resource_type, ResourceType::Ec2);
        assert_eq!(all.resources[1].resource_id, "a-fn");
        assert_eq!(all.summary.by_type[&ResourceType::Lambda], 2);
        assert_eq!(all.summary.by_status["Failed"], 1);

        let only = build_inventory(
            "us-east-1",
            InventoryScope::Only(ResourceType::Ec2),
            resources,
        );
        assert_eq!(only.summary.total, 1);
        assert_eq!(only.scope, "EC2");
    }
}
