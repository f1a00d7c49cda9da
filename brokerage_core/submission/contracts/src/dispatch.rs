use std::future::Future;

use brokerage_email_contracts::EmailSendError;
use brokerage_models::submission::{DeliveryId, SubmissionRecord};
use thiserror::Error;

use crate::delivery::MailDelivery;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SubmissionDispatchService: Send + Sync + 'static {
    /// Turn a validated submission into a notification email and make a
    /// single attempt to deliver it.
    fn dispatch(
        &self,
        record: SubmissionRecord,
        delivery: &MailDelivery,
    ) -> impl Future<Output = Result<Option<DeliveryId>, SubmissionDispatchError>> + Send;
}

#[derive(Debug, Error)]
pub enum SubmissionDispatchError {
    #[error(transparent)]
    Transport(#[from] EmailSendError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockSubmissionDispatchService {
    pub fn with_dispatch(
        mut self,
        record: SubmissionRecord,
        delivery: MailDelivery,
        result: Result<Option<DeliveryId>, SubmissionDispatchError>,
    ) -> Self {
        self.expect_dispatch()
            .once()
            .with(
                mockall::predicate::eq(record),
                mockall::predicate::eq(delivery),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
