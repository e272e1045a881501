//! Session operations.

use concierge_core::session::SessionTranscript;

use super::ConciergeClient;
use crate::error::Result;

impl ConciergeClient {
    /// Get a recorded session with its messages.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionTranscript> {
        let response = self
            .client
            .get(self.url(&format!("/api/sessions/{session_id}")))
            .send()
            .await?;
        self.handle_response(response, &format!("session {session_id}"))
            .await
    }
}
