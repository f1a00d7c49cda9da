use std::sync::Arc;

use brokerage_core_submission_contracts::{
    delivery::DeliveryConfig,
    dispatch::{SubmissionDispatchError, SubmissionDispatchService},
    SubmissionFeatureService, SubmitError,
};
use brokerage_models::submission::{
    DeliveryId, FormVariant, SubmissionDraft, SubmissionRecord, ValidationRules,
};
use tracing::{debug, error, info};

pub mod dispatch;

#[derive(Debug, Clone)]
pub struct SubmissionFeatureServiceImpl<Dispatch> {
    pub dispatch: Dispatch,
    pub config: SubmissionFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct SubmissionFeatureConfig {
    pub rules: ValidationRules,
    pub delivery: Arc<DeliveryConfig>,
}

impl<Dispatch> SubmissionFeatureService for SubmissionFeatureServiceImpl<Dispatch>
where
    Dispatch: SubmissionDispatchService,
{
    async fn submit(
        &self,
        variant: FormVariant,
        draft: SubmissionDraft,
    ) -> Result<Option<DeliveryId>, SubmitError> {
        let record = SubmissionRecord::from_draft(&draft, variant, self.config.rules)
            .inspect_err(|errors| debug!(%variant, %errors, "rejected invalid submission"))
            .map_err(SubmitError::Invalid)?;

        let delivery = self.config.delivery.resolve().inspect_err(|err| {
            error!(%variant, missing = ?err.0, "cannot deliver submission: {err}")
        })?;

        let delivery_id = self
            .dispatch
            .dispatch(record, &delivery)
            .await
            .map_err(|err| match err {
                SubmissionDispatchError::Other(err) => SubmitError::Other(err),
                err => {
                    error!(%variant, "failed to deliver submission: {err:?}");
                    SubmitError::Dispatch(err)
                }
            })?;

        info!(%variant, ?delivery_id, "submission delivered");
        Ok(delivery_id)
    }
}
