//! Finding rules for security groups, buckets and IAM users.

use crate::cloud::{
    BucketEncryption, DbInstance, IamUser, PublicAccessBlock, SecurityGroup, Volume,
};

use super::types::{EncryptionScope, EncryptionStatus, Finding, FindingResource, Severity};

/// Ports that must never be reachable from the whole internet.
pub const SENSITIVE_PORTS: [i32; 4] = [22, 3389, 80, 443];

/// Flags every ingress rule open to `0.0.0.0/0`.
///
/// Open sensitive ports and all-traffic rules are HIGH, anything else MEDIUM.
pub fn security_group_findings(group: &SecurityGroup, region: &str) -> Vec<Finding> {
    group
        .ingress
        .iter()
        .filter(|rule| rule.is_open_to_world())
        .map(|rule| {
            let (port_label, severity) = if rule.is_all_traffic() {
                ("all".to_string(), Severity::High)
            } else {
                let port = rule.from_port.unwrap_or_default();
                let severity = if SENSITIVE_PORTS.contains(&port) {
                    Severity::High
                } else {
                    Severity::Medium
                };
                (port.to_string(), severity)
            };

            let mut remediation_steps = vec![
                format!(
                    "Restrict the source of the port {port_label} rule to known CIDR ranges"
                ),
                "Remove the rule if the port does not need to be reachable".to_string(),
            ];
            if matches!(rule.from_port, Some(22) | Some(3389)) || rule.is_all_traffic() {
                remediation_steps.push(
                    "Use Systems Manager Session Manager or a bastion host for administration"
                        .to_string(),
                );
            }

            Finding {
                finding_id: format!("sg-{}-open-{}", group.group_id, port_label),
                severity,
                resource_type: FindingResource::SecurityGroup,
                resource_id: group.group_id.clone(),
                title: format!(
                    "Security group {} allows inbound traffic from anywhere",
                    group.group_name
                ),
                description: format!(
                    "Ingress on port {port_label} ({}) is open to 0.0.0.0/0.",
                    rule.protocol
                ),
                region: Some(region.to_string()),
                remediation_steps,
            }
        })
        .collect()
}

/// Checks a bucket's Block Public Access settings. `None` means the bucket has no
/// configuration at all.
pub fn bucket_public_access_finding(
    bucket: &str,
    block: Option<&PublicAccessBlock>,
) -> Option<Finding> {
    match block {
        Some(block) if block.fully_blocked() => None,
        Some(_) => Some(Finding {
            finding_id: format!("s3-{bucket}-public-access"),
            severity: Severity::High,
            resource_type: FindingResource::S3Bucket,
            resource_id: bucket.to_string(),
            title: format!("Bucket {bucket} may allow public access"),
            description: "Not all Block Public Access settings are enabled.".to_string(),
            region: None,
            remediation_steps: vec![
                "Enable all four Block Public Access settings".to_string(),
                "Review the bucket policy and ACLs for public grants".to_string(),
            ],
        }),
        None => Some(Finding {
            finding_id: format!("s3-{bucket}-no-public-access-block"),
            severity: Severity::Medium,
            resource_type: FindingResource::S3Bucket,
            resource_id: bucket.to_string(),
            title: format!("Bucket {bucket} has no Block Public Access configuration"),
            description: "Public access is governed only by the bucket policy and ACLs."
                .to_string(),
            region: None,
            remediation_steps: vec![
                "Configure Block Public Access on the bucket".to_string(),
                "Enable Block Public Access at the account level".to_string(),
            ],
        }),
    }
}

/// Returns true for administrator policies.
pub fn is_admin_policy(name: &str, arn: &str) -> bool {
    name.contains("Admin") || arn.ends_with("AdministratorAccess")
}

/// Flags a user with an administrator policy attached directly.
pub fn iam_user_finding(user: &IamUser) -> Option<Finding> {
    let policy = user
        .attached_policies
        .iter()
        .find(|p| is_admin_policy(&p.name, &p.arn))?;

    Some(Finding {
        finding_id: format!("iam-user-{}-admin-access", user.user_name),
        severity: Severity::High,
        resource_type: FindingResource::IamUser,
        resource_id: user.user_name.clone(),
        title: format!("IAM user {} has administrator access", user.user_name),
        description: format!("Policy {} grants full administrative permissions.", policy.name),
        region: None,
        remediation_steps: vec![
            "Replace the policy with least-privilege permissions".to_string(),
            "Grant admin access through a role assumed with MFA instead".to_string(),
        ],
    })
}

pub fn bucket_encryption_status(
    bucket: &str,
    encryption: Option<&BucketEncryption>,
) -> EncryptionStatus {
    EncryptionStatus {
        resource_id: bucket.to_string(),
        resource_type: EncryptionScope::S3,
        encrypted: encryption.is_some(),
        encryption_type: encryption.map(|e| e.algorithm.clone()),
        kms_key_id: encryption.and_then(|e| e.kms_key_id.clone()),
    }
}

pub fn volume_encryption_status(volume: &Volume) -> EncryptionStatus {
    EncryptionStatus {
        resource_id: volume.volume_id.clone(),
        resource_type: EncryptionScope::Ebs,
        encrypted: volume.encrypted,
        encryption_type: volume.encrypted.then(|| "aws:kms".to_string()),
        kms_key_id: volume.kms_key_id.clone(),
    }
}

pub fn db_encryption_status(db: &DbInstance) -> EncryptionStatus {
    EncryptionStatus {
        resource_id: db.identifier.clone(),
        resource_type: EncryptionScope::Rds,
        encrypted: db.storage_encrypted,
        encryption_type: db.storage_encrypted.then(|| "aws:kms".to_string()),
        kms_key_id: db.kms_key_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{AttachedPolicy, IngressRule};

    fn group(rules: Vec<IngressRule>) -> SecurityGroup {
        SecurityGroup {
            group_id: "sg-123".to_string(),
            group_name: "web".to_string(),
            vpc_id: None,
            ingress: rules,
        }
    }

    fn rule(protocol: &str, port: Option<i32>, cidr: &str) -> IngressRule {
        IngressRule {
            protocol: protocol.to_string(),
            from_port: port,
            to_port: port,
            cidr_ranges: vec![cidr.to_string()],
        }
    }

    #[test]
    fn test_open_ssh_is_high() {
        let findings = security_group_findings(
            &group(vec![rule("tcp", Some(22), "0.0.0.0/0")]),
            "us-east-1",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].finding_id, "sg-sg-123-open-22");
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].remediation_steps.len(), 3);
    }

    #[test]
    fn test_open_custom_port_is_medium() {
        let findings = security_group_findings(
            &group(vec![
                rule("tcp", Some(8080), "0.0.0.0/0"),
                rule("tcp", Some(5432), "10.0.0.0/16"),
            ]),
            "us-east-1",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].remediation_steps.len(), 2);
    }

    #[test]
    fn test_all_traffic_rule() {
        let findings =
            security_group_findings(&group(vec![rule("-1", None, "0.0.0.0/0")]), "eu-west-1");
        assert_eq!(findings[0].finding_id, "sg-sg-123-open-all");
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_bucket_public_access() {
        let full = PublicAccessBlock {
            block_public_acls: true,
            ignore_public_acls: true,
            block_public_policy: true,
            restrict_public_buckets: true,
        };
        assert!(bucket_public_access_finding("logs", Some(&full)).is_none());

        let partial = PublicAccessBlock {
            block_public_policy: false,
            ..full
        };
        let finding = bucket_public_access_finding("logs", Some(&partial)).unwrap();
        assert_eq!(finding.finding_id, "s3-logs-public-access");
        assert_eq!(finding.severity, Severity::High);

        let missing = bucket_public_access_finding("logs", None).unwrap();
        assert_eq!(missing.finding_id, "s3-logs-no-public-access-block");
        assert_eq!(missing.severity, Severity::Medium);
    }

    #[test]
    fn test_iam_admin_detection() {
        let admin = IamUser {
            user_name: "alice".to_string(),
            attached_policies: vec![AttachedPolicy {
                name: "AdministratorAccess".to_string(),
                arn: "arn:aws:iam::aws:policy/AdministratorAccess".to_string(),
            }],
        };
        let finding = iam_user_finding(&admin).unwrap();
        assert_eq!(finding.finding_id, "iam-user-alice-admin-access");

        let reader = IamUser {
            user_name: "bob".to_string(),
            attached_policies: vec![AttachedPolicy {
                name: "ReadOnlyAccess".to_string(),
                arn: "arn:aws:iam::aws:policy/ReadOnlyAccess".to_string(),
            }],
        };
        assert!(iam_user_finding(&reader).is_none());
        assert!(is_admin_policy("TeamAdminPolicy", "arn:aws:iam::123:policy/x"));
    }

    #[test]
    fn test_encryption_statuses() {
        let status = bucket_encryption_status(
            "data",
            Some(&BucketEncryption {
                algorithm: "AES256".to_string(),
                kms_key_id: None,
            }),
        );
        assert!(status.encrypted);
        assert_eq!(status.encryption_type.as_deref(), Some("AES256"));
        assert!(!bucket_encryption_status("plain", None).encrypted);

        let volume = Volume {
            volume_id: "vol-1".to_string(),
            encrypted: false,
            kms_key_id: None,
            size_gib: Some(8),
            state: None,
        };
        let status = volume_encryption_status(&volume);
        assert!(!status.encrypted);
        assert_eq!(status.encryption_type, None);
    }
}
