use async_trait::async_trait;

use super::MessagingProvider;

/// Used when no Twilio credentials are configured: the text is logged, not delivered.
pub struct LogMessagingProvider;

#[async_trait]
impl MessagingProvider for LogMessagingProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!("confirmation text not sent, Twilio not configured");
        tracing::debug!(to, body, "unsent confirmation text");
        Ok(())
    }
}
