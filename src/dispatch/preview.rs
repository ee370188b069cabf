use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use super::{DispatchError, FilterSpec, load_snapshot, resolve};
use crate::{domain::Recipient, recipient_store::RecipientStore};

pub const LARGE_RECIPIENT_COUNT: &str = "large recipient count";
pub const NO_MATCHING_RECIPIENTS: &str = "filter matches no recipients";

/// Presentation heuristics of the dry-run preview.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub preview_sample_size: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub large_batch_threshold: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub seconds_per_message: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            preview_sample_size: 5,
            large_batch_threshold: 100,
            seconds_per_message: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub recipient_count: usize,
    pub estimated_duration_seconds: f64,
    pub warnings: Vec<String>,
    pub preview_sample: Vec<Recipient>,
}

/// Resolve `filter` without sending anything and describe the would-be batch.
pub fn validate(
    full_set: &[Recipient],
    filter: Option<&FilterSpec>,
    settings: &PreviewSettings,
) -> ValidationReport {
    let targets = resolve(full_set, filter);
    let recipient_count = targets.len();

    let mut warnings = Vec::new();
    if recipient_count > settings.large_batch_threshold {
        warnings.push(LARGE_RECIPIENT_COUNT.to_string());
    }
    if recipient_count == 0 {
        warnings.push(NO_MATCHING_RECIPIENTS.to_string());
    }

    let preview_sample = targets
        .into_iter()
        .take(settings.preview_sample_size)
        .collect();

    ValidationReport {
        recipient_count,
        estimated_duration_seconds: recipient_count as f64 * settings.seconds_per_message,
        warnings,
        preview_sample,
    }
}

#[tracing::instrument(name = "Previewing a bulk email", skip(store, settings))]
pub async fn validate_from_store<S>(
    store: &S,
    filter: Option<&FilterSpec>,
    settings: &PreviewSettings,
) -> Result<ValidationReport, DispatchError>
where
    S: RecipientStore + ?Sized,
{
    let full_set = load_snapshot(store, filter).await?;
    Ok(validate(&full_set, filter, settings))
}
