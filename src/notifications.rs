//! Single-recipient templated notifications.
//!
//! Bodies are rendered from `templates/` with escaping disabled, so every field
//! reaches the message exactly as supplied. Failures are reported in the
//! returned [`NotificationResult`], never raised.

use chrono::{DateTime, Utc};
use rinja_axum::Template;
use serde::{Deserialize, Serialize};

use crate::{domain::NewRecipient, mail_transport::MailTransport};

const WELCOME_SUBJECT: &str = "Welcome to UnXchange!";

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationResult {
    fn success(message: String) -> Self {
        Self {
            success: true,
            message,
            timestamp: Utc::now(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// The convocatoria a user has been selected for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvocatoriaDetails {
    pub title: String,
    pub description: String,
    pub destination_institution: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Template)]
#[template(path = "welcome.txt")]
struct WelcomeText<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Template)]
#[template(path = "welcome.html", escape = "none")]
struct WelcomeHtml<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Template)]
#[template(path = "convocatoria_chosen.txt")]
struct ConvocatoriaText<'a> {
    name: &'a str,
    details: &'a ConvocatoriaDetails,
}

#[derive(Template)]
#[template(path = "convocatoria_chosen.html", escape = "none")]
struct ConvocatoriaHtml<'a> {
    name: &'a str,
    details: &'a ConvocatoriaDetails,
}

struct RenderedEmail {
    subject: String,
    text_body: String,
    html_body: String,
}

fn render_welcome(recipient: &NewRecipient) -> Result<RenderedEmail, String> {
    let name = recipient.name.as_ref();
    let email = recipient.email.as_ref();
    Ok(RenderedEmail {
        subject: WELCOME_SUBJECT.to_string(),
        text_body: WelcomeText { name, email }
            .render()
            .map_err(|e| e.to_string())?,
        html_body: WelcomeHtml { name, email }
            .render()
            .map_err(|e| e.to_string())?,
    })
}

fn render_convocatoria_chosen(
    recipient: &NewRecipient,
    details: &ConvocatoriaDetails,
) -> Result<RenderedEmail, String> {
    let name = recipient.name.as_ref();
    Ok(RenderedEmail {
        subject: format!("You have been selected for {}", details.title),
        text_body: ConvocatoriaText { name, details }
            .render()
            .map_err(|e| e.to_string())?,
        html_body: ConvocatoriaHtml { name, details }
            .render()
            .map_err(|e| e.to_string())?,
    })
}

async fn deliver<T>(
    transport: &T,
    recipient: &NewRecipient,
    rendered: Result<RenderedEmail, String>,
    kind: &str,
) -> NotificationResult
where
    T: MailTransport + ?Sized,
{
    let email = match rendered {
        Ok(email) => email,
        Err(e) => {
            tracing::error!(error = %e, kind, "Couldn't render the notification");
            return NotificationResult::failure(format!("couldn't render the {kind} email, {e}"));
        }
    };

    match transport
        .send_email(
            recipient.email.as_ref(),
            &email.subject,
            &email.text_body,
            Some(&email.html_body),
        )
        .await
    {
        Ok(()) => NotificationResult::success(format!(
            "{kind} email sent to {}",
            recipient.email
        )),
        Err(e) => {
            tracing::error!(error = %e, kind, "Couldn't send the notification");
            NotificationResult::failure(format!(
                "couldn't send the {kind} email to {}, {e}",
                recipient.email
            ))
        }
    }
}

#[tracing::instrument(
    name = "Sending a welcome email",
    skip(transport, recipient),
    fields(recipient_email = %recipient.email)
)]
pub async fn send_welcome<T>(transport: &T, recipient: &NewRecipient) -> NotificationResult
where
    T: MailTransport + ?Sized,
{
    deliver(transport, recipient, render_welcome(recipient), "welcome").await
}

#[tracing::instrument(
    name = "Sending a convocatoria chosen email",
    skip(transport, recipient, details),
    fields(
        recipient_email = %recipient.email,
        convocatoria = %details.title
    )
)]
pub async fn send_convocatoria_chosen<T>(
    transport: &T,
    recipient: &NewRecipient,
    details: &ConvocatoriaDetails,
) -> NotificationResult
where
    T: MailTransport + ?Sized,
{
    let rendered = render_convocatoria_chosen(recipient, details);
    deliver(transport, recipient, rendered, "convocatoria").await
}
