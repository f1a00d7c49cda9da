use std::future::Future;

use brokerage_models::submission::{DeliveryId, FieldErrors, FormVariant, SubmissionDraft};
use thiserror::Error;

use crate::{delivery::MissingDeliveryConfig, dispatch::SubmissionDispatchError};

pub mod delivery;
pub mod dispatch;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SubmissionFeatureService: Send + Sync + 'static {
    /// Validate a form submission and, if it is valid, deliver it to the
    /// operator inbox.
    ///
    /// Validation and the delivery configuration are checked before any
    /// connection to the mail server is made. A valid submission results in
    /// exactly one delivery attempt.
    fn submit(
        &self,
        variant: FormVariant,
        draft: SubmissionDraft,
    ) -> impl Future<Output = Result<Option<DeliveryId>, SubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("The submission is invalid: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    NotConfigured(#[from] MissingDeliveryConfig),
    #[error("Failed to deliver the submission.")]
    Dispatch(#[source] SubmissionDispatchError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockSubmissionFeatureService {
    pub fn with_submit(
        mut self,
        variant: FormVariant,
        draft: SubmissionDraft,
        result: Result<Option<DeliveryId>, SubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(
                mockall::predicate::eq(variant),
                mockall::predicate::eq(draft),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
