//! Mail transport port.

use async_trait::async_trait;
use serde::Serialize;

/// An outgoing plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub to: Vec<String>,
}

/// Mail transport - hands a message to whatever delivers it.
///
/// A successful return means the transport accepted the message, not that
/// it was delivered.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mail transport errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Transport unavailable: {0}")]
    Transport(String),

    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Mask the local part of an address for logging: `jane@x.org` -> `j***@x.org`.
pub fn mask_address(email: &str) -> String {
    match email.find('@') {
        Some(at) => {
            let (local, domain) = email.split_at(at);
            match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::mask_address;

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_address("jane@example.com"), "j***@example.com");
        assert_eq!(mask_address("j@example.com"), "***@example.com");
        assert_eq!(mask_address("nonsense"), "***");
    }
}
