use std::{collections::BTreeMap, future::Future};

use brokerage_models::submission::{FormVariant, SubmissionDraft};

/// Client for the submission endpoint of a running backend.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SubmissionApiService: Send + Sync + 'static {
    fn submit(
        &self,
        variant: FormVariant,
        draft: SubmissionDraft,
    ) -> impl Future<Output = anyhow::Result<SubmissionApiResponse>> + Send;
}

/// Outcome reported by the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionApiResponse {
    /// `200`: the mail server accepted the submission.
    Accepted { delivery_id: Option<String> },
    /// `400`: the request was refused before any delivery attempt. `errors`
    /// is empty if the body itself was malformed.
    Rejected {
        message: String,
        errors: BTreeMap<String, String>,
    },
    /// `5xx`: the submission was valid but could not be delivered.
    Failed {
        message: String,
        error: Option<String>,
    },
}

#[cfg(feature = "mock")]
impl MockSubmissionApiService {
    pub fn with_submit(
        mut self,
        variant: FormVariant,
        draft: SubmissionDraft,
        result: SubmissionApiResponse,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(
                mockall::predicate::eq(variant),
                mockall::predicate::eq(draft),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
