use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    domain::RecipientEmail,
    mail_transport::{MailTransport, TransportError},
};

/// HTTP client for the mail API.
///
/// Posts one JSON message per call to `{base_url}/email`.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: RecipientEmail,
    authorization_token: SecretString,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<&'a str>,
}

impl EmailClient {
    pub fn new(
        sender: RecipientEmail,
        base_url: String,
        authorization_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        })
    }

    pub async fn send_message(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        text_content: &str,
        html_content: Option<&str>,
    ) -> Result<(), TransportError> {
        let url = format!("{}/email", self.base_url);
        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            text_body: text_content,
            html_body: html_content,
        };
        let response = self
            .http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected(format!(
                "{} answered {} for {}",
                url, status, recipient
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MailTransport for EmailClient {
    #[tracing::instrument(
        name = "Sending an email through the mail API",
        skip(self, text_body, html_body)
    )]
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> Result<(), TransportError> {
        let recipient =
            RecipientEmail::parse(to.to_owned()).map_err(TransportError::InvalidRecipient)?;
        self.send_message(&recipient, subject, text_body, html_body)
            .await
    }
}
