use brokerage_models::submission::{DeliveryId, SubmissionDraft};
use serde::{Deserialize, Serialize};

/// Body of a form submission. Every page posts a subset of these fields;
/// the contact page calls the name `firstName`. If both are sent, `name`
/// wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmission {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ip_block: Option<String>,
    pub lease_duration: Option<String>,
    pub service: Option<Vec<String>>,
    pub message: Option<String>,
}

impl From<ApiSubmission> for SubmissionDraft {
    fn from(value: ApiSubmission) -> Self {
        Self {
            name: value.name.or(value.first_name),
            email: value.email,
            phone: value.phone,
            ip_block: value.ip_block,
            lease_duration: value.lease_duration,
            service: value.service.unwrap_or_default(),
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmissionAccepted {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<DeliveryId>,
}
