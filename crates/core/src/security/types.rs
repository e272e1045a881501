use serde::{Deserialize, Serialize};

use crate::tool::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Contribution of one finding to the risk score.
    pub fn weight(&self) -> u32 {
        match self {
            Severity::High => 30,
            Severity::Medium => 15,
            Severity::Low => 5,
        }
    }
}

/// The kind of resource a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingResource {
    SecurityGroup,
    S3Bucket,
    #[serde(rename = "IAMUser")]
    IamUser,
}

/// A single security issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub finding_id: String,
    pub severity: Severity,
    pub resource_type: FindingResource,
    pub resource_id: String,
    pub title: String,
    pub description: String,
    pub region: Option<String>,
    pub remediation_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssessmentType {
    /// Security groups and S3.
    Basic,
    /// Basic plus IAM.
    Comprehensive,
}

impl AssessmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentType::Basic => "BASIC",
            AssessmentType::Comprehensive => "COMPREHENSIVE",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(AssessmentType::Basic),
            "COMPREHENSIVE" => Ok(AssessmentType::Comprehensive),
            _ => Err(ToolError::InvalidInput(format!(
                "assessment_type must be BASIC or COMPREHENSIVE, got {raw}"
            ))),
        }
    }
}

/// Counts of findings by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// How many resources of each kind were inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounts {
    pub security_groups: usize,
    pub buckets: usize,
    pub iam_users: usize,
}

/// The result of a security assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub assessment_type: AssessmentType,
    pub region: String,
    pub findings: Vec<Finding>,
    pub summary: FindingSummary,
    pub risk_score: u32,
    pub recommendations: Vec<String>,
    pub resources_scanned: ScanCounts,
}

/// Which resources an encryption check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionScope {
    All,
    S3,
    Ebs,
    Rds,
}

impl EncryptionScope {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(EncryptionScope::All),
            "S3" => Ok(EncryptionScope::S3),
            "EBS" => Ok(EncryptionScope::Ebs),
            "RDS" => Ok(EncryptionScope::Rds),
            _ => Err(ToolError::InvalidInput(format!(
                "resource_type must be ALL, S3, EBS or RDS, got {raw}"
            ))),
        }
    }

    pub fn includes(&self, other: EncryptionScope) -> bool {
        *self == EncryptionScope::All || *self == other
    }
}

/// Encryption state of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionStatus {
    pub resource_id: String,
    pub resource_type: EncryptionScope,
    pub encrypted: bool,
    pub encryption_type: Option<String>,
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionSummary {
    pub total: usize,
    pub encrypted: usize,
    pub unencrypted: usize,
    pub compliance_percentage: f64,
}

/// The result of an encryption status check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptionReport {
    pub scope: EncryptionScope,
    pub region: String,
    pub resources: Vec<EncryptionStatus>,
    pub summary: EncryptionSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::High.weight(), 30);
        assert_eq!(Severity::Medium.weight(), 15);
        assert_eq!(Severity::Low.weight(), 5);
    }

    #[test]
    fn test_finding_resource_serialization() {
        assert_eq!(
            serde_json::to_string(&FindingResource::IamUser).unwrap(),
            "\"IAMUser\""
        );
        assert_eq!(
            serde_json::to_string(&FindingResource::S3Bucket).unwrap(),
            "\"S3Bucket\""
        );
    }

    #[test]
    fn test_assessment_type_parse() {
        assert_eq!(AssessmentType::parse("basic").unwrap(), AssessmentType::Basic);
        assert_eq!(
            AssessmentType::parse("COMPREHENSIVE").unwrap(),
            AssessmentType::Comprehensive
        );
        assert!(AssessmentType::parse("deep").is_err());
    }

    #[test]
    fn test_encryption_scope_includes() {
        assert!(EncryptionScope::All.includes(EncryptionScope::S3));
        assert!(EncryptionScope::Ebs.includes(EncryptionScope::Ebs));
        assert!(!EncryptionScope::Ebs.includes(EncryptionScope::Rds));
        assert_eq!(serde_json::to_string(&EncryptionScope::Ebs).unwrap(), "\"EBS\"");
    }
}
