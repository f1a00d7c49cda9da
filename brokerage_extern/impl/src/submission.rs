use std::{collections::BTreeMap, sync::Arc};

use anyhow::{bail, Context};
use brokerage_extern_contracts::submission::{SubmissionApiResponse, SubmissionApiService};
use brokerage_models::submission::{FormVariant, SubmissionDraft};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct SubmissionApiServiceImpl {
    client: HttpClient,
    config: SubmissionApiServiceConfig,
}

#[derive(Debug, Clone)]
pub struct SubmissionApiServiceConfig {
    pub base_url: Arc<Url>,
}

impl SubmissionApiServiceImpl {
    pub fn new(client: HttpClient, config: SubmissionApiServiceConfig) -> Self {
        Self { client, config }
    }
}

impl SubmissionApiService for SubmissionApiServiceImpl {
    async fn submit(
        &self,
        variant: FormVariant,
        draft: SubmissionDraft,
    ) -> anyhow::Result<SubmissionApiResponse> {
        let url = self
            .config
            .base_url
            .join(&format!("api/submissions/{variant}"))?;

        let response = self
            .client
            .post(url)
            .json(&SubmitRequest::from(&draft))
            .send()
            .await?;

        let status = response.status();
        let body = response
            .json::<SubmitResponse>()
            .await
            .with_context(|| format!("Failed to read response (status {status})"))?;

        Ok(match status {
            StatusCode::OK => SubmissionApiResponse::Accepted {
                delivery_id: body.delivery_id,
            },
            StatusCode::BAD_REQUEST => SubmissionApiResponse::Rejected {
                message: body.message,
                errors: body.errors,
            },
            status if status.is_server_error() => SubmissionApiResponse::Failed {
                message: body.message,
                error: body.error,
            },
            status => bail!("Unexpected response status {status}: {}", body.message),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_block: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lease_duration: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    service: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> From<&'a SubmissionDraft> for SubmitRequest<'a> {
    fn from(value: &'a SubmissionDraft) -> Self {
        Self {
            name: value.name.as_deref(),
            email: value.email.as_deref(),
            phone: value.phone.as_deref(),
            ip_block: value.ip_block.as_deref(),
            lease_duration: value.lease_duration.as_deref(),
            service: &value.service,
            message: value.message.as_deref(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    #[serde(default)]
    message: String,
    delivery_id: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
    error: Option<String>,
}
