//! Bulk delivery core: filter resolution, fan-out and the dry-run preview.
//!
//! [`resolve`], [`dispatch`] and [`validate`] work on a recipient snapshot the
//! caller already holds. The `*_from_store` variants read that snapshot from a
//! [`RecipientStore`] once per call and turn store failures into
//! [`DispatchError::Unavailable`].

mod bulk;
mod filter;
mod preview;

pub use bulk::{DeliveryOutcome, DispatchReport, dispatch, dispatch_from_store};
pub use filter::{FilterSpec, Stage, domain_stage, exclusion_stage, resolve, role_stage};
pub use preview::{
    LARGE_RECIPIENT_COUNT, NO_MATCHING_RECIPIENTS, PreviewSettings, ValidationReport, validate,
    validate_from_store,
};

use crate::{
    domain::Recipient,
    recipient_store::{RecipientStore, StoreError},
};

/// Failures that stop a whole dispatch or preview call.
///
/// A single recipient's failed delivery is never one of these; it is recorded
/// in the [`DispatchReport`] instead.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("recipient store is unavailable, {0}")]
    Unavailable(#[source] StoreError),
    #[error("malformed filter, {0}")]
    MalformedFilter(String),
}

async fn load_snapshot<S>(
    store: &S,
    filter: Option<&FilterSpec>,
) -> Result<Vec<Recipient>, DispatchError>
where
    S: RecipientStore + ?Sized,
{
    if let Some(filter) = filter {
        filter.check()?;
    }
    store.get_all().await.map_err(|e| {
        tracing::error!(error = %e, "Couldn't load the recipient snapshot");
        DispatchError::Unavailable(e)
    })
}
