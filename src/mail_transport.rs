//! The mail delivery seam.
//!
//! Everything that sends mail goes through [`MailTransport`], so handlers and
//! the dispatch engine never depend on a concrete delivery backend.

use async_trait::async_trait;

/// Attempts delivery of one message.
///
/// Each call succeeds or fails on its own; implementations keep no state
/// between calls that would make one attempt depend on another.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> Result<(), TransportError>;
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("invalid recipient, {0}")]
    InvalidRecipient(String),
    #[error("mail API request failed, reqwest error {0}")]
    Request(#[from] reqwest::Error),
    #[error("mail API rejected the message, {0}")]
    Rejected(String),
}
