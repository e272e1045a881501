use async_trait::async_trait;

use concierge_core::cloud::{Function, FunctionSource, Result};

use super::error::ApiCall;
use super::AwsCloud;

#[async_trait]
impl FunctionSource for AwsCloud {
    async fn functions(&self, region: &str) -> Result<Vec<Function>> {
        let client = self.lambda(region);
        let mut functions = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = ApiCall::new("lambda", "ListFunctions", Some(region)).finish(
                client
                    .list_functions()
                    .set_marker(marker.take())
                    .send()
                    .await,
            )?;

            functions.extend(output.functions().iter().map(|f| Function {
                name: f.function_name().unwrap_or_default().to_string(),
                arn: f.function_arn().map(str::to_string),
                runtime: f.runtime().map(|r| r.as_str().to_string()),
                handler: f.handler().map(str::to_string),
                memory_mb: f.memory_size(),
                timeout_seconds: f.timeout(),
                last_modified: f.last_modified().map(str::to_string),
                // ListFunctions omits state for most functions; treat those as active.
                state: Some(
                    f.state()
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_else(|| "Active".to_string()),
                ),
            }));

            match output.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(functions)
    }
}
