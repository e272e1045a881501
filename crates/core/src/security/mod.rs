//! Security posture checks, risk scoring and encryption status.

mod checks;
mod scoring;
mod types;

pub use checks::{
    bucket_encryption_status, bucket_public_access_finding, db_encryption_status,
    iam_user_finding, is_admin_policy, security_group_findings, volume_encryption_status,
    SENSITIVE_PORTS,
};
pub use scoring::{
    build_assessment, build_encryption_report, encryption_summary, is_high_risk, risk_score,
    security_recommendations, summarize_findings, HIGH_RISK_THRESHOLD, MAX_RISK_SCORE,
};
pub use types::{
    AssessmentType, EncryptionReport, EncryptionScope, EncryptionStatus, EncryptionSummary,
    Finding, FindingResource, FindingSummary, ScanCounts, SecurityAssessment, Severity,
};
