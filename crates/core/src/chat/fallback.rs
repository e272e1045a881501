//! Canned replies used when the Bedrock agent cannot answer.

use crate::cloud::CloudError;
use crate::cost::CostReport;

/// Suffix appended to the model label of a canned reply.
pub const SIMULATED_SUFFIX: &str = " (simulated)";

/// Services listed in a cost-enriched reply.
const TOP_SERVICES: usize = 5;

/// What a user message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Cost,
    Security,
    Resources,
    Greeting,
    General,
}

impl Topic {
    /// Classifies a message. Checked in order, so a message about both cost
    /// and security is a cost question.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has(&["cost", "spending", "bill", "budget"]) {
            Topic::Cost
        } else if has(&["security", "vulnerab", "risk", "compliance"]) {
            Topic::Security
        } else if has(&["resource", "instance", "inventory", "ec2"]) {
            Topic::Resources
        } else if has(&["hello", "help", "capabilities"]) || has_word(&lower, "hi") {
            Topic::Greeting
        } else {
            Topic::General
        }
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// Short reason logged and returned in the trace when the agent fails.
pub fn fallback_reason(error: &CloudError) -> &'static str {
    match error {
        CloudError::AccessDenied { .. } => "Permission denied - check IAM roles",
        CloudError::NotFound { .. } => "Agent not found - check agent ID",
        CloudError::InvalidParameter { .. } => "Invalid request format",
        CloudError::NotConfigured(_) => "Agent not configured",
        CloudError::Service { code, .. } if code.contains("AccessDenied") => {
            "Permission denied - check IAM roles"
        }
        CloudError::Service { code, .. } if code.contains("ResourceNotFound") => {
            "Agent not found - check agent ID"
        }
        CloudError::Service { code, .. } if code.contains("ValidationException") => {
            "Invalid request format"
        }
        _ => "Unknown error",
    }
}

/// Model label for a canned reply.
pub fn simulated_model(model_id: &str) -> String {
    format!("{model_id}{SIMULATED_SUFFIX}")
}

/// The canned reply for a topic. Cost replies use live data when available.
pub fn fallback_reply(topic: Topic, cost: Option<&CostReport>) -> String {
    match topic {
        Topic::Cost => match cost {
            Some(report) if report.total_cost > 0.0 => cost_reply(report),
            _ => COST_REPLY.to_string(),
        },
        Topic::Security => SECURITY_REPLY.to_string(),
        Topic::Resources => RESOURCES_REPLY.to_string(),
        Topic::Greeting => GREETING_REPLY.to_string(),
        Topic::General => GENERAL_REPLY.to_string(),
    }
}

fn cost_reply(report: &CostReport) -> String {
    let mut text = format!(
        "**AWS Cost Analysis**\n\nTotal spend for {}: ${:.2} {}\n\n**Top services:**\n",
        report.time_period.label, report.total_cost, report.currency
    );
    for service in report.service_breakdown.iter().take(TOP_SERVICES) {
        text.push_str(&format!(
            "- {}: ${:.2} ({:.1}%)\n",
            service.service, service.cost, service.percentage
        ));
    }
    if !report.insights.is_empty() {
        text.push_str("\n**Insights:**\n");
        for insight in &report.insights {
            text.push_str(&format!("- {insight}\n"));
        }
    }
    text.push_str("\nAsk me about idle resources to find savings.");
    text
}

const COST_REPLY: &str = "**AWS Cost Analysis**

I can break down your spending by service, region or usage type, spot trends \
and find idle EC2 instances worth stopping.

Cost data is not available right now. Cost Explorer can take 8 to 24 hours to \
report new spend.

Try asking:
- \"What did I spend this month?\"
- \"Show my costs for August 2025\"
- \"Find idle resources\"";

const SECURITY_REPLY: &str = "**Security Assessment**

I check security groups open to the internet, S3 buckets without Block Public \
Access, IAM users with administrator policies and encryption at rest for S3, \
EBS and RDS.

Try asking:
- \"Run a security assessment\"
- \"Which volumes are unencrypted?\"";

const RESOURCES_REPLY: &str = "**Resource Inventory**

I can list EC2 instances, S3 buckets, RDS databases and Lambda functions, show \
details for a single resource and report which resources are unhealthy.

Try asking:
- \"List my EC2 instances\"
- \"Show the health of my resources\"";

const GREETING_REPLY: &str = "**AWS AI Concierge**

Hello! I help you understand and optimize your AWS account.

I can assist with:
- Cost analysis: \"What are my AWS costs?\"
- Security assessment: \"Check for security issues\"
- Resource discovery: \"Show my EC2 instances\"";

const GENERAL_REPLY: &str = "**AWS AI Concierge**

I can answer questions about your AWS costs, security posture and resources.

Try asking:
- \"Analyze my AWS spending\"
- \"Find security vulnerabilities\"
- \"List my resources\"";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{pending_data_report, CostWindow, Granularity, GroupBy, ServiceCost};
    use chrono::NaiveDate;

    #[test]
    fn test_classify_order() {
        assert_eq!(Topic::classify("What is my BILL?"), Topic::Cost);
        assert_eq!(Topic::classify("cost of security tooling"), Topic::Cost);
        assert_eq!(Topic::classify("any vulnerabilities?"), Topic::Security);
        assert_eq!(Topic::classify("list ec2 boxes"), Topic::Resources);
        assert_eq!(Topic::classify("what are your capabilities"), Topic::Greeting);
        assert_eq!(Topic::classify("tell me a story"), Topic::General);
    }

    #[test]
    fn test_classify_hi_is_whole_word() {
        assert_eq!(Topic::classify("Hi there"), Topic::Greeting);
        assert_eq!(Topic::classify("hi!"), Topic::Greeting);
        assert_eq!(Topic::classify("which region is this"), Topic::General);
    }

    #[test]
    fn test_fallback_reason() {
        let denied = CloudError::AccessDenied {
            service: "bedrock".to_string(),
            message: "no".to_string(),
        };
        assert_eq!(fallback_reason(&denied), "Permission denied - check IAM roles");

        let missing = CloudError::from_code("bedrock", "ResourceNotFoundException", "agent");
        assert_eq!(fallback_reason(&missing), "Agent not found - check agent ID");

        let invalid = CloudError::from_code("bedrock", "ValidationException", "bad");
        assert_eq!(fallback_reason(&invalid), "Invalid request format");

        let throttled = CloudError::Throttling {
            service: "bedrock".to_string(),
        };
        assert_eq!(fallback_reason(&throttled), "Unknown error");
    }

    #[test]
    fn test_simulated_model() {
        assert_eq!(
            simulated_model("amazon.nova-pro-v1:0"),
            "amazon.nova-pro-v1:0 (simulated)"
        );
    }

    #[test]
    fn test_cost_reply_uses_live_data() {
        let window = CostWindow {
            start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            granularity: Granularity::Daily,
            label: "September 2025".to_string(),
        };
        let report = CostReport {
            total_cost: 120.5,
            service_breakdown: vec![ServiceCost {
                service: "Amazon EC2".to_string(),
                cost: 100.0,
                usage_quantity: 0.0,
                unit: String::new(),
                percentage: 82.99,
            }],
            insights: vec!["Amazon EC2 is 83% of spend".to_string()],
            message: None,
            error_type: None,
            ..pending_data_report(&window, GroupBy::Service)
        };

        let text = fallback_reply(Topic::Cost, Some(&report));
        assert!(text.contains("$120.50 USD"));
        assert!(text.contains("Amazon EC2: $100.00 (83.0%)"));
        assert!(text.contains("September 2025"));

        let empty = CostReport {
            total_cost: 0.0,
            ..report
        };
        assert_eq!(fallback_reply(Topic::Cost, Some(&empty)), COST_REPLY);
        assert_eq!(fallback_reply(Topic::Cost, None), COST_REPLY);
    }
}
