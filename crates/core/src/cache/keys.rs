use crate::tool::{Operation, ToolParams};

/// Returns the cache key for a tool result: `tool:<operation>:<k=v&...>`.
///
/// Parameters are sorted by name, so the same request always maps to the
/// same key.
pub fn tool_key(operation: Operation, params: &ToolParams) -> String {
    format!("tool:{}:{}", operation.name(), params.fingerprint())
}

/// Extracts the operation name from a tool key.
pub fn operation_from_key(key: &str) -> Option<&str> {
    key.strip_prefix("tool:")?.split(':').next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_key_is_sorted() {
        let a = ToolParams::new()
            .with("time_period", "MONTHLY")
            .with("group_by", "SERVICE");
        let b = ToolParams::new()
            .with("group_by", "SERVICE")
            .with("time_period", "MONTHLY");
        assert_eq!(tool_key(Operation::CostAnalysis, &a), tool_key(Operation::CostAnalysis, &b));
        assert_eq!(
            tool_key(Operation::CostAnalysis, &a),
            "tool:getCostAnalysis:group_by=SERVICE&time_period=MONTHLY"
        );
    }

    #[test]
    fn test_tool_key_without_params() {
        assert_eq!(
            tool_key(Operation::IdleResources, &ToolParams::new()),
            "tool:getIdleResources:"
        );
    }

    #[test]
    fn test_operation_from_key() {
        assert_eq!(
            operation_from_key("tool:getCostAnalysis:time_period=MONTHLY"),
            Some("getCostAnalysis")
        );
        assert_eq!(operation_from_key("session:abc"), None);
    }
}
