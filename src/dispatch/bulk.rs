use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DispatchError, FilterSpec, load_snapshot, resolve};
use crate::{domain::Recipient, mail_transport::MailTransport, recipient_store::RecipientStore};

/// Result of the single delivery attempt made for one recipient.
#[derive(Debug)]
pub struct DeliveryOutcome<'a> {
    pub recipient: &'a Recipient,
    pub delivered: bool,
}

/// Aggregate of one bulk dispatch.
///
/// Only built from outcomes, so `overall_success` always equals
/// `failed_recipients.is_empty()`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    attempted: usize,
    succeeded: usize,
    failed_recipients: Vec<String>,
    overall_success: bool,
    timestamp: DateTime<Utc>,
}

impl DispatchReport {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = DeliveryOutcome<'a>>) -> Self {
        let mut attempted = 0;
        let mut succeeded = 0;
        let mut failed_recipients = Vec::new();
        for outcome in outcomes {
            attempted += 1;
            if outcome.delivered {
                succeeded += 1;
            } else {
                failed_recipients.push(outcome.recipient.email.clone());
            }
        }
        Self {
            attempted,
            succeeded,
            overall_success: failed_recipients.is_empty(),
            failed_recipients,
            timestamp: Utc::now(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed_recipients(&self) -> &[String] {
        &self.failed_recipients
    }

    pub fn overall_success(&self) -> bool {
        self.overall_success
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn summary(&self) -> String {
        format!(
            "sent {}, failed {}",
            self.succeeded,
            self.failed_recipients.len()
        )
    }
}

/// Send `subject`/`body` once to every recipient `filter` selects from `full_set`.
///
/// Recipients are attempted one after another in resolution order. A failed
/// attempt is logged and recorded, and the loop moves on.
#[tracing::instrument(
    name = "Dispatching a bulk email",
    skip(transport, full_set, body),
    fields(snapshot_size = full_set.len())
)]
pub async fn dispatch<T>(
    transport: &T,
    full_set: &[Recipient],
    filter: Option<&FilterSpec>,
    subject: &str,
    body: &str,
) -> DispatchReport
where
    T: MailTransport + ?Sized,
{
    let targets = resolve(full_set, filter);
    let mut outcomes = Vec::with_capacity(targets.len());

    for recipient in &targets {
        let delivered = match transport
            .send_email(&recipient.email, subject, body, None)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    recipient_id = recipient.id,
                    recipient_email = %recipient.email,
                    error = %e,
                    "Delivery attempt failed, continuing with the batch"
                );
                false
            }
        };
        outcomes.push(DeliveryOutcome {
            recipient,
            delivered,
        });
    }

    let report = DispatchReport::from_outcomes(outcomes);
    tracing::info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed_recipients.len(),
        "Bulk dispatch finished"
    );
    report
}

/// Like [`dispatch`], reading the snapshot from `store` first.
pub async fn dispatch_from_store<S, T>(
    store: &S,
    transport: &T,
    filter: Option<&FilterSpec>,
    subject: &str,
    body: &str,
) -> Result<DispatchReport, DispatchError>
where
    S: RecipientStore + ?Sized,
    T: MailTransport + ?Sized,
{
    let full_set = load_snapshot(store, filter).await?;
    Ok(dispatch(transport, &full_set, filter, subject, body).await)
}
