use std::{env, str::FromStr, time::Duration};

use concierge_core::session::{DEFAULT_TTL_DAYS, MAX_TTL_DAYS};
use concierge_core::tool::DEFAULT_REGION;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bedrock agent id. The chat falls back to simulated replies without one.
    pub agent_id: Option<String>,
    /// Bedrock agent alias (default: "TSTALIASID")
    pub agent_alias_id: String,
    /// DynamoDB table for chat sessions (default: "demo-chat-sessions")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub sessions_table: String,
    /// Days a session record is kept (default: 7)
    pub session_ttl_days: i64,
    /// Default region for regional tools (default: "us-east-1")
    pub region: String,
    /// Whole-request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
    /// Agent invocation timeout in seconds (default: 25)
    pub agent_timeout_seconds: u64,
    /// Result cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached results (default: 1,000)
    pub cache_max_entries: usize,
    /// Model label reported with agent replies (default: "amazon.nova-pro-v1:0")
    pub model_id: String,
    /// Action group name used when an event omits it (default: "aws-ai-concierge-tools")
    pub action_group_name: String,
    /// Pause between streamed chat chunks in milliseconds (default: 40)
    pub stream_chunk_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AGENT_ID` - Bedrock agent id (optional)
    /// - `AGENT_ALIAS_ID` - Bedrock agent alias (default: "TSTALIASID")
    /// - `SESSIONS_TABLE` - DynamoDB sessions table (default: "demo-chat-sessions")
    /// - `SESSION_TTL_DAYS` - Session retention in days (default: 7)
    /// - `AWS_REGION` - Default region (default: "us-east-1")
    /// - `REQUEST_TIMEOUT_SECONDS` - HTTP request timeout (default: 30)
    /// - `AGENT_TIMEOUT_SECONDS` - Agent invocation timeout (default: 25)
    /// - `CACHE_TTL_SECONDS` - Result cache TTL (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached results (default: 1,000)
    /// - `MODEL_ID` - Model label (default: "amazon.nova-pro-v1:0")
    /// - `ACTION_GROUP_NAME` - Default action group (default: "aws-ai-concierge-tools")
    /// - `STREAM_CHUNK_DELAY_MS` - Delay between SSE chunks (default: 40)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            agent_id: lookup("AGENT_ID").filter(|v| !v.trim().is_empty()),
            agent_alias_id: string("AGENT_ALIAS_ID", "TSTALIASID"),
            sessions_table: string("SESSIONS_TABLE", "demo-chat-sessions"),
            session_ttl_days: parse_var(&lookup, "SESSION_TTL_DAYS")
                .unwrap_or(DEFAULT_TTL_DAYS)
                .clamp(1, MAX_TTL_DAYS),
            region: string("AWS_REGION", DEFAULT_REGION),
            request_timeout_seconds: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS").unwrap_or(30),
            agent_timeout_seconds: parse_var(&lookup, "AGENT_TIMEOUT_SECONDS").unwrap_or(25),
            cache_ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS").unwrap_or(300),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(1_000),
            model_id: string("MODEL_ID", "amazon.nova-pro-v1:0"),
            action_group_name: string("ACTION_GROUP_NAME", "aws-ai-concierge-tools"),
            stream_chunk_delay_ms: parse_var(&lookup, "STREAM_CHUNK_DELAY_MS").unwrap_or(40),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_seconds)
    }

    pub fn stream_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.stream_chunk_delay_ms)
    }
}

/// Unparseable values count as unset.
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.agent_id, None);
        assert_eq!(config.agent_alias_id, "TSTALIASID");
        assert_eq!(config.sessions_table, "demo-chat-sessions");
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.agent_timeout_seconds, 25);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_max_entries, 1_000);
        assert_eq!(config.model_id, "amazon.nova-pro-v1:0");
        assert_eq!(config.action_group_name, "aws-ai-concierge-tools");
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = config_from(&[
            ("AGENT_ID", "WWYOPOAATI"),
            ("AWS_REGION", "eu-west-1"),
            ("CACHE_TTL_SECONDS", "600"),
            ("AGENT_TIMEOUT_SECONDS", "soon"),
        ]);

        assert_eq!(config.agent_id.as_deref(), Some("WWYOPOAATI"));
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.agent_timeout(), Duration::from_secs(25));
    }

    #[test]
    fn test_session_ttl_is_clamped() {
        let huge = config_from(&[("SESSION_TTL_DAYS", "9223372036854775807")]);
        assert_eq!(huge.session_ttl_days, MAX_TTL_DAYS);

        let negative = config_from(&[("SESSION_TTL_DAYS", "-3")]);
        assert_eq!(negative.session_ttl_days, 1);
    }

    #[test]
    fn test_blank_agent_id_is_unset() {
        let config = config_from(&[("AGENT_ID", "  ")]);
        assert_eq!(config.agent_id, None);
    }
}
