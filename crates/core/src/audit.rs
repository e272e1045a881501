//! Audit events and the classification rules applied to them.
//!
//! Events are plain data. The server serializes them onto the `audit`
//! tracing target.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::ErrorSeverity;
use crate::round2;
use crate::tool::ToolParams;

/// Tool invocations slower than this miss their SLA.
pub const TOOL_SLA_MS: f64 = 15_000.0;

/// Responses slower than this miss their SLA.
pub const RESPONSE_SLA_MS: f64 = 5_000.0;

pub const COMPLIANT_REGIONS: [&str; 7] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
];

const SENSITIVE_KEYS: [&str; 5] = ["password", "secret", "key", "token", "credential"];
const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    RequestReceived,
    ToolInvocation,
    AwsApiCall,
    ResponseSent,
    ErrorOccurred,
    SecurityCheck,
    CostAnalysis,
    ResourceAccess,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::RequestReceived => "REQUEST_RECEIVED",
            AuditEventType::ToolInvocation => "TOOL_INVOCATION",
            AuditEventType::AwsApiCall => "AWS_API_CALL",
            AuditEventType::ResponseSent => "RESPONSE_SENT",
            AuditEventType::ErrorOccurred => "ERROR_OCCURRED",
            AuditEventType::SecurityCheck => "SECURITY_CHECK",
            AuditEventType::CostAnalysis => "COST_ANALYSIS",
            AuditEventType::ResourceAccess => "RESOURCE_ACCESS",
        }
    }
}

/// Where a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    BedrockAgent,
    Api,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionTimeCategory {
    Fast,
    Normal,
    Slow,
    VerySlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSizeCategory {
    Small,
    Medium,
    Large,
    VeryLarge,
}

/// Log level an event should be emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

pub fn categorize_execution_time(ms: f64) -> ExecutionTimeCategory {
    if ms < 1_000.0 {
        ExecutionTimeCategory::Fast
    } else if ms < 5_000.0 {
        ExecutionTimeCategory::Normal
    } else if ms < 15_000.0 {
        ExecutionTimeCategory::Slow
    } else {
        ExecutionTimeCategory::VerySlow
    }
}

pub fn categorize_response_size(bytes: usize) -> ResponseSizeCategory {
    if bytes < 1_024 {
        ResponseSizeCategory::Small
    } else if bytes < 10_240 {
        ResponseSizeCategory::Medium
    } else if bytes < 102_400 {
        ResponseSizeCategory::Large
    } else {
        ResponseSizeCategory::VeryLarge
    }
}

/// Redacts values whose key looks like a secret.
pub fn sanitize_parameters(params: &ToolParams) -> BTreeMap<String, String> {
    params
        .iter()
        .map(|(key, value)| {
            let lower = key.to_lowercase();
            let value = if SENSITIVE_KEYS.iter().any(|s| lower.contains(s)) {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

/// No region counts as compliant.
pub fn is_region_compliant(region: Option<&str>) -> bool {
    region.is_none_or(|r| COMPLIANT_REGIONS.contains(&r))
}

pub fn is_data_residency_compliant(regions: &[String]) -> bool {
    regions.iter().all(|r| is_region_compliant(Some(r)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEvent {
    RequestReceived {
        event_source: EventSource,
        operation: String,
        parameters: BTreeMap<String, String>,
    },
    ToolInvocation {
        tool_name: String,
        parameters: BTreeMap<String, String>,
        execution_time_ms: f64,
        success: bool,
        execution_time_category: ExecutionTimeCategory,
        meets_sla: bool,
    },
    AwsApiCall {
        aws_service: String,
        aws_operation: String,
        aws_region: Option<String>,
        success: bool,
        error_code: Option<String>,
        region_compliant: bool,
    },
    ResponseSent {
        operation: String,
        response_size_bytes: usize,
        processing_time_ms: f64,
        success: bool,
        meets_response_time_sla: bool,
        response_size_category: ResponseSizeCategory,
    },
    ErrorOccurred {
        error_type: String,
        error_code: Option<String>,
        operation: String,
        severity: ErrorSeverity,
        user_impact: String,
    },
    SecurityCheck {
        check_type: String,
        resource_id: String,
        findings_count: usize,
        risk_score: u32,
        high_risk_detected: bool,
    },
    CostAnalysis {
        time_period: String,
        total_cost: f64,
        currency: String,
        optimization_opportunities: usize,
    },
    ResourceAccess {
        resource_type: String,
        resource_count: usize,
        regions_accessed: Vec<String>,
        cross_region_access: bool,
        data_residency_compliant: bool,
    },
}

impl AuditEvent {
    pub fn request_received(source: EventSource, operation: &str, params: &ToolParams) -> Self {
        AuditEvent::RequestReceived {
            event_source: source,
            operation: operation.to_string(),
            parameters: sanitize_parameters(params),
        }
    }

    pub fn tool_invocation(tool_name: &str, params: &ToolParams, ms: f64, success: bool) -> Self {
        AuditEvent::ToolInvocation {
            tool_name: tool_name.to_string(),
            parameters: sanitize_parameters(params),
            execution_time_ms: round2(ms),
            success,
            execution_time_category: categorize_execution_time(ms),
            meets_sla: ms < TOOL_SLA_MS,
        }
    }

    pub fn aws_api_call(
        service: &str,
        operation: &str,
        region: Option<&str>,
        error_code: Option<&str>,
    ) -> Self {
        AuditEvent::AwsApiCall {
            aws_service: service.to_string(),
            aws_operation: operation.to_string(),
            aws_region: region.map(str::to_string),
            success: error_code.is_none(),
            error_code: error_code.map(str::to_string),
            region_compliant: is_region_compliant(region),
        }
    }

    pub fn response_sent(operation: &str, bytes: usize, ms: f64, success: bool) -> Self {
        AuditEvent::ResponseSent {
            operation: operation.to_string(),
            response_size_bytes: bytes,
            processing_time_ms: round2(ms),
            success,
            meets_response_time_sla: ms < RESPONSE_SLA_MS,
            response_size_category: categorize_response_size(bytes),
        }
    }

    pub fn error_occurred(
        error_type: &str,
        error_code: Option<&str>,
        operation: &str,
        severity: ErrorSeverity,
        user_impact: &str,
    ) -> Self {
        AuditEvent::ErrorOccurred {
            error_type: error_type.to_string(),
            error_code: error_code.map(str::to_string),
            operation: operation.to_string(),
            severity,
            user_impact: user_impact.to_string(),
        }
    }

    pub fn security_check(
        check_type: &str,
        resource_id: &str,
        findings_count: usize,
        risk_score: u32,
    ) -> Self {
        AuditEvent::SecurityCheck {
            check_type: check_type.to_string(),
            resource_id: resource_id.to_string(),
            findings_count,
            risk_score,
            high_risk_detected: crate::security::is_high_risk(risk_score),
        }
    }

    pub fn cost_analysis(
        time_period: &str,
        total_cost: f64,
        currency: &str,
        optimization_opportunities: usize,
    ) -> Self {
        AuditEvent::CostAnalysis {
            time_period: time_period.to_string(),
            total_cost,
            currency: currency.to_string(),
            optimization_opportunities,
        }
    }

    pub fn resource_access(
        resource_type: &str,
        resource_count: usize,
        regions: Vec<String>,
    ) -> Self {
        AuditEvent::ResourceAccess {
            resource_type: resource_type.to_string(),
            resource_count,
            cross_region_access: regions.len() > 1,
            data_residency_compliant: is_data_residency_compliant(&regions),
            regions_accessed: regions,
        }
    }

    pub fn event_type(&self) -> AuditEventType {
        match self {
            AuditEvent::RequestReceived { .. } => AuditEventType::RequestReceived,
            AuditEvent::ToolInvocation { .. } => AuditEventType::ToolInvocation,
            AuditEvent::AwsApiCall { .. } => AuditEventType::AwsApiCall,
            AuditEvent::ResponseSent { .. } => AuditEventType::ResponseSent,
            AuditEvent::ErrorOccurred { .. } => AuditEventType::ErrorOccurred,
            AuditEvent::SecurityCheck { .. } => AuditEventType::SecurityCheck,
            AuditEvent::CostAnalysis { .. } => AuditEventType::CostAnalysis,
            AuditEvent::ResourceAccess { .. } => AuditEventType::ResourceAccess,
        }
    }

    pub fn level(&self) -> AuditLevel {
        match self {
            AuditEvent::AwsApiCall { success: false, .. } => AuditLevel::Warn,
            AuditEvent::ErrorOccurred { severity, .. } => match severity {
                ErrorSeverity::Warning => AuditLevel::Warn,
                ErrorSeverity::Error => AuditLevel::Error,
            },
            _ => AuditLevel::Info,
        }
    }
}

/// An event stamped with its request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditRecord {
    pub fn new(request_id: Option<&str>, timestamp: DateTime<Utc>, event: AuditEvent) -> Self {
        Self {
            request_id: request_id.map(str::to_string),
            timestamp,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_time_categories() {
        assert_eq!(categorize_execution_time(999.0), ExecutionTimeCategory::Fast);
        assert_eq!(categorize_execution_time(1_000.0), ExecutionTimeCategory::Normal);
        assert_eq!(categorize_execution_time(14_999.0), ExecutionTimeCategory::Slow);
        assert_eq!(categorize_execution_time(15_000.0), ExecutionTimeCategory::VerySlow);
    }

    #[test]
    fn test_response_size_categories() {
        assert_eq!(categorize_response_size(1_023), ResponseSizeCategory::Small);
        assert_eq!(categorize_response_size(1_024), ResponseSizeCategory::Medium);
        assert_eq!(categorize_response_size(50_000), ResponseSizeCategory::Large);
        assert_eq!(categorize_response_size(102_400), ResponseSizeCategory::VeryLarge);
    }

    #[test]
    fn test_sanitize_parameters() {
        let params = ToolParams::new()
            .with("api_key", "abc")
            .with("SessionToken", "xyz")
            .with("db_password", "hunter2")
            .with("region", "us-east-1");
        let sanitized = sanitize_parameters(&params);
        assert_eq!(sanitized["api_key"], "[REDACTED]");
        assert_eq!(sanitized["SessionToken"], "[REDACTED]");
        assert_eq!(sanitized["db_password"], "[REDACTED]");
        assert_eq!(sanitized["region"], "us-east-1");
    }

    #[test]
    fn test_region_compliance() {
        assert!(is_region_compliant(None));
        assert!(is_region_compliant(Some("eu-central-1")));
        assert!(!is_region_compliant(Some("ap-southeast-2")));
        assert!(is_data_residency_compliant(&[]));
        assert!(!is_data_residency_compliant(&[
            "us-east-1".to_string(),
            "sa-east-1".to_string()
        ]));
    }

    #[test]
    fn test_tool_invocation_sla() {
        let event =
            AuditEvent::tool_invocation("getCostAnalysis", &ToolParams::new(), 16_000.0, true);
        match event {
            AuditEvent::ToolInvocation {
                meets_sla,
                execution_time_category,
                ..
            } => {
                assert!(!meets_sla);
                assert_eq!(execution_time_category, ExecutionTimeCategory::VerySlow);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(
            AuditEvent::aws_api_call("ce", "GetCostAndUsage", Some("us-east-1"), None).level(),
            AuditLevel::Info
        );
        assert_eq!(
            AuditEvent::aws_api_call("ce", "GetCostAndUsage", None, Some("Throttling")).level(),
            AuditLevel::Warn
        );
        let error = AuditEvent::error_occurred(
            "AccessDenied",
            None,
            "getCostAnalysis",
            ErrorSeverity::Error,
            "request failed",
        );
        assert_eq!(error.level(), AuditLevel::Error);
    }

    #[test]
    fn test_record_serialization() {
        let record = AuditRecord::new(
            Some("req-1"),
            Utc::now(),
            AuditEvent::security_check("BASIC", "us-east-1", 3, 75),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event_type"], "SECURITY_CHECK");
        assert_eq!(json["request_id"], "req-1");
        assert_eq!(json["high_risk_detected"], true);
        assert_eq!(
            AuditEvent::resource_access("EC2", 2, vec!["us-east-1".to_string()]).event_type(),
            AuditEventType::ResourceAccess
        );
    }
}
