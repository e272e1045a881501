use std::collections::BTreeSet;

use crate::round2;

use super::types::{
    AssessmentType, EncryptionReport, EncryptionScope, EncryptionStatus, EncryptionSummary,
    Finding, FindingResource, FindingSummary, ScanCounts, SecurityAssessment, Severity,
};

pub const MAX_RISK_SCORE: u32 = 100;

/// Scores above this are reported as high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 70;

/// Sums severity weights, capped at [`MAX_RISK_SCORE`].
pub fn risk_score(findings: &[Finding]) -> u32 {
    findings
        .iter()
        .map(|f| f.severity.weight())
        .sum::<u32>()
        .min(MAX_RISK_SCORE)
}

pub fn is_high_risk(score: u32) -> bool {
    score > HIGH_RISK_THRESHOLD
}

pub fn summarize_findings(findings: &[Finding]) -> FindingSummary {
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    FindingSummary {
        total: findings.len(),
        high: count(Severity::High),
        medium: count(Severity::Medium),
        low: count(Severity::Low),
    }
}

pub fn security_recommendations(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec!["No security issues found in this assessment".to_string()];
    }

    let summary = summarize_findings(findings);
    let mut recommendations = Vec::new();

    if summary.high > 0 {
        recommendations.push(format!(
            "Address {} high-severity findings immediately",
            summary.high
        ));
    }
    if summary.medium > 0 {
        recommendations.push(format!(
            "Plan remediation for {} medium-severity findings",
            summary.medium
        ));
    }

    let kinds: BTreeSet<FindingResource> = findings.iter().map(|f| f.resource_type).collect();
    for kind in kinds {
        recommendations.push(
            match kind {
                FindingResource::SecurityGroup => {
                    "Restrict security group ingress to specific IP ranges"
                }
                FindingResource::S3Bucket => {
                    "Enable S3 Block Public Access on buckets that do not serve public content"
                }
                FindingResource::IamUser => {
                    "Apply least privilege and avoid attaching administrator policies to users"
                }
            }
            .to_string(),
        );
    }

    recommendations
}

/// Assembles an assessment, ordering findings by severity then id.
pub fn build_assessment(
    assessment_type: AssessmentType,
    region: &str,
    mut findings: Vec<Finding>,
    resources_scanned: ScanCounts,
) -> SecurityAssessment {
    findings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.finding_id.cmp(&b.finding_id))
    });

    SecurityAssessment {
        assessment_type,
        region: region.to_string(),
        summary: summarize_findings(&findings),
        risk_score: risk_score(&findings),
        recommendations: security_recommendations(&findings),
        findings,
        resources_scanned,
    }
}

/// Counts encrypted resources. Compliance is 100% when there is nothing to check.
pub fn encryption_summary(resources: &[EncryptionStatus]) -> EncryptionSummary {
    let encrypted = resources.iter().filter(|r| r.encrypted).count();
    let total = resources.len();
    EncryptionSummary {
        total,
        encrypted,
        unencrypted: total - encrypted,
        compliance_percentage: if total == 0 {
            100.0
        } else {
            round2(encrypted as f64 / total as f64 * 100.0)
        },
    }
}

pub fn build_encryption_report(
    scope: EncryptionScope,
    region: &str,
    resources: Vec<EncryptionStatus>,
) -> EncryptionReport {
    EncryptionReport {
        scope,
        region: region.to_string(),
        summary: encryption_summary(&resources),
        resources,
    }
}
