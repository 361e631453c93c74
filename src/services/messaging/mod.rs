pub mod log;
pub mod twilio;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// `to` is an E.164 number.
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

pub fn confirmation_body(details: &str) -> String {
    format!("Your appointment details:\n{details}")
}
