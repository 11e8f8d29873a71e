//! Console mail transport - logs outgoing mail instead of sending it (for development).

use async_trait::async_trait;

use blog_core::ports::{MailError, MailMessage, Mailer, mask_address};

pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::Rejected("message has no recipients".to_string()));
        }

        let recipients: Vec<String> = message.to.iter().map(|to| mask_address(to)).collect();
        tracing::info!(
            from = %message.from,
            to = ?recipients,
            subject = %message.subject,
            "Outgoing mail\n{}",
            message.body
        );
        Ok(())
    }
}
