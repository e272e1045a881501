//! Output formatting functions.

pub mod pretty;

use crate::cli::OutputFormat;

/// Format a value for output: compact JSON, or indented JSON for pretty mode
/// when there is no dedicated formatter.
pub fn format_output<T: serde::Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Pretty => format_json_pretty(value),
    }
}

/// Format a value as indented JSON.
pub fn format_json_pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_output_modes() {
        let value = json!({ "status": "ok" });
        assert_eq!(format_output(&value, OutputFormat::Json), r#"{"status":"ok"}"#);
        assert_eq!(
            format_output(&value, OutputFormat::Pretty),
            "{\n  \"status\": \"ok\"\n}"
        );
    }
}
