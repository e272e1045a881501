use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::types::{Citation as AgentCitation, ResponseStream};
use aws_sdk_bedrockagentruntime::Client;

use concierge_core::cloud::{
    AgentInvocation, AgentReply, AgentRuntime, Citation, CloudError, Result,
};

use super::error::{map_sdk_error, ApiCall};

const SERVICE: &str = "bedrock-agent-runtime";

/// Bedrock agent invoked with tracing enabled.
pub struct BedrockAgent {
    client: Client,
    agent_id: Option<String>,
    agent_alias_id: String,
}

impl BedrockAgent {
    pub fn new(client: Client, agent_id: Option<String>, agent_alias_id: String) -> Self {
        Self {
            client,
            agent_id,
            agent_alias_id,
        }
    }
}

#[async_trait]
impl AgentRuntime for BedrockAgent {
    async fn invoke(&self, invocation: &AgentInvocation) -> Result<AgentReply> {
        let Some(agent_id) = self.agent_id.as_deref() else {
            return Err(CloudError::NotConfigured("Bedrock agent".to_string()));
        };
        let region = self.client.config().region().map(|r| r.to_string());

        let mut output = ApiCall::new(SERVICE, "InvokeAgent", region.as_deref()).finish(
            self.client
                .invoke_agent()
                .agent_id(agent_id)
                .agent_alias_id(&self.agent_alias_id)
                .session_id(&invocation.session_id)
                .input_text(&invocation.input)
                .enable_trace(true)
                .send()
                .await,
        )?;

        let mut reply = AgentReply::default();
        loop {
            let event = output
                .completion
                .recv()
                .await
                .map_err(|e| map_sdk_error(SERVICE, &e))?;
            match event {
                Some(ResponseStream::Chunk(part)) => {
                    if let Some(bytes) = part.bytes() {
                        reply.text.push_str(&String::from_utf8_lossy(bytes.as_ref()));
                    }
                    if let Some(attribution) = part.attribution() {
                        reply
                            .citations
                            .extend(attribution.citations().iter().filter_map(to_citation));
                    }
                }
                Some(ResponseStream::Trace(_)) => reply.trace_events += 1,
                Some(_) => {}
                None => break,
            }
        }

        tracing::debug!(
            session_id = %invocation.session_id,
            chars = reply.text.len(),
            citations = reply.citations.len(),
            trace_events = reply.trace_events,
            "Agent stream complete"
        );
        Ok(reply)
    }
}

fn to_citation(citation: &AgentCitation) -> Option<Citation> {
    let text = citation
        .generated_response_part()?
        .text_response_part()?
        .text()?
        .to_string();
    let sources = citation
        .retrieved_references()
        .iter()
        .filter_map(|reference| {
            let location = reference.location()?;
            location
                .s3_location()
                .and_then(|s3| s3.uri())
                .or_else(|| location.web_location().and_then(|web| web.url()))
                .map(str::to_string)
        })
        .collect();

    Some(Citation { text, sources })
}
