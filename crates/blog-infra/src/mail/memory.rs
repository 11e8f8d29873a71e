//! In-memory mail transport. Keeps every accepted message in an outbox.

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{MailError, MailMessage, Mailer};

pub struct InMemoryMailer {
    outbox: RwLock<Vec<MailMessage>>,
    fail_with: Option<String>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            outbox: RwLock::new(Vec::new()),
            fail_with: None,
        }
    }

    /// A transport that refuses every message with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outbox: RwLock::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// Messages accepted so far, oldest first.
    pub async fn outbox(&self) -> Vec<MailMessage> {
        self.outbox.read().await.clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if let Some(reason) = &self.fail_with {
            return Err(MailError::Transport(reason.clone()));
        }
        if message.to.is_empty() {
            return Err(MailError::Rejected("message has no recipients".to_string()));
        }

        self.outbox.write().await.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            subject: "Hi".into(),
            body: "Body".into(),
            from: "noreply@blog.local".into(),
            reply_to: None,
            to: vec!["bob@example.com".into()],
        }
    }

    #[tokio::test]
    async fn accepted_messages_land_in_outbox() {
        let mailer = InMemoryMailer::new();
        mailer.send(message()).await.unwrap();
        assert_eq!(mailer.outbox().await, vec![message()]);
    }

    #[tokio::test]
    async fn failing_transport_keeps_outbox_empty() {
        let mailer = InMemoryMailer::failing("smtp down");
        let err = mailer.send(message()).await.unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));
        assert!(mailer.outbox().await.is_empty());
    }
}
