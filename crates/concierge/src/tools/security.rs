use concierge_core::audit::AuditEvent;
use concierge_core::security::{
    bucket_encryption_status, bucket_public_access_finding, build_assessment,
    build_encryption_report, db_encryption_status, iam_user_finding, security_group_findings,
    volume_encryption_status, AssessmentType, EncryptionReport, EncryptionScope, ScanCounts,
    SecurityAssessment,
};
use concierge_core::tool::{ToolError, ToolParams};

use crate::audit::AuditLog;
use crate::cloud::CloudProviders;

/// Security groups and S3 public access; IAM admin users for COMPREHENSIVE.
pub(super) async fn security_assessment(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<SecurityAssessment, ToolError> {
    let assessment_type = AssessmentType::parse(params.get_or("assessment_type", "BASIC"))?;
    let mut findings = Vec::new();
    let mut scanned = ScanCounts::default();

    let groups = cloud.compute.security_groups(region).await?;
    scanned.security_groups = groups.len();
    for group in &groups {
        findings.extend(security_group_findings(group, region));
    }

    let buckets = cloud.storage.buckets().await?;
    scanned.buckets = buckets.len();
    for bucket in &buckets {
        match cloud.storage.public_access_block(&bucket.name).await {
            Ok(block) => {
                findings.extend(bucket_public_access_finding(&bucket.name, block.as_ref()))
            }
            Err(err) => tracing::warn!(
                bucket = %bucket.name,
                error = %err,
                "Skipping bucket public access check"
            ),
        }
    }

    if assessment_type == AssessmentType::Comprehensive {
        let users = cloud.identity.users().await?;
        scanned.iam_users = users.len();
        findings.extend(users.iter().filter_map(iam_user_finding));
    }

    let assessment = build_assessment(assessment_type, region, findings, scanned);
    audit.record(AuditEvent::security_check(
        assessment_type.as_str(),
        region,
        assessment.findings.len(),
        assessment.risk_score,
    ));
    Ok(assessment)
}

pub(super) async fn encryption_status(
    cloud: &CloudProviders,
    audit: &AuditLog,
    region: &str,
    params: &ToolParams,
) -> Result<EncryptionReport, ToolError> {
    let scope = EncryptionScope::parse(params.get_or("resource_type", "ALL"))?;
    let mut resources = Vec::new();

    if scope.includes(EncryptionScope::S3) {
        for bucket in cloud.storage.buckets().await? {
            let encryption = cloud.storage.bucket_encryption(&bucket.name).await?;
            resources.push(bucket_encryption_status(&bucket.name, encryption.as_ref()));
        }
    }

    if scope.includes(EncryptionScope::Ebs) {
        let volumes = cloud.compute.volumes(region).await?;
        resources.extend(volumes.iter().map(volume_encryption_status));
    }

    if scope.includes(EncryptionScope::Rds) {
        let databases = cloud.database.db_instances(region).await?;
        resources.extend(databases.iter().map(db_encryption_status));
    }

    let report = build_encryption_report(scope, region, resources);
    audit.record(AuditEvent::security_check(
        "ENCRYPTION",
        region,
        report.summary.unencrypted,
        0,
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::security::Severity;

    fn audit() -> AuditLog {
        AuditLog::new("req-test")
    }

    #[tokio::test]
    async fn test_basic_assessment_skips_iam() {
        let assessment = security_assessment(
            &CloudProviders::demo(),
            &audit(),
            "us-east-1",
            &ToolParams::new(),
        )
        .await
        .unwrap();

        assert_eq!(assessment.resources_scanned.iam_users, 0);
        assert_eq!(assessment.resources_scanned.security_groups, 3);
        assert!(assessment
            .findings
            .iter()
            .all(|f| !f.finding_id.starts_with("iam-")));
        assert!(assessment
            .findings
            .iter()
            .any(|f| f.finding_id == "s3-demo-public-site-no-public-access-block"));
    }

    #[tokio::test]
    async fn test_comprehensive_assessment_flags_admin() {
        let params = ToolParams::new().with("assessment_type", "comprehensive");
        let assessment =
            security_assessment(&CloudProviders::demo(), &audit(), "us-east-1", &params)
                .await
                .unwrap();

        let admin = assessment
            .findings
            .iter()
            .find(|f| f.finding_id == "iam-user-alice-admin-access")
            .unwrap();
        assert_eq!(admin.severity, Severity::High);
        assert_eq!(assessment.resources_scanned.iam_users, 2);
        assert_eq!(assessment.risk_score, 100);
    }

    #[tokio::test]
    async fn test_unknown_assessment_type() {
        let params = ToolParams::new().with("assessment_type", "DEEP");
        let err = security_assessment(&CloudProviders::demo(), &audit(), "us-east-1", &params)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_encryption_all_scopes() {
        let report = encryption_status(
            &CloudProviders::demo(),
            &audit(),
            "us-east-1",
            &ToolParams::new(),
        )
        .await
        .unwrap();

        // 3 buckets, 2 volumes, 2 databases; logs bucket, one volume and one database are plain.
        assert_eq!(report.summary.total, 7);
        assert_eq!(report.summary.unencrypted, 3);
    }

    #[tokio::test]
    async fn test_encryption_ebs_only() {
        let params = ToolParams::new().with("resource_type", "EBS");
        let report = encryption_status(&CloudProviders::demo(), &audit(), "us-east-1", &params)
            .await
            .unwrap();

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.compliance_percentage, 50.0);
    }
}
