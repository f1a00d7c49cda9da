use std::{net::IpAddr, time::Duration};

use anyhow::{bail, Context};
use brokerage_config::Config;
use brokerage_extern_contracts::submission::{SubmissionApiResponse, SubmissionApiService};
use brokerage_extern_impl::{
    http::HttpClient,
    submission::{SubmissionApiServiceConfig, SubmissionApiServiceImpl},
};
use brokerage_models::submission::{validate, FormVariant, SubmissionDraft, ValidationRules};
use clap::Args;
use tracing::debug;
use url::Url;

use crate::environment;

/// Additional time granted to the backend on top of its own send timeout.
const RESPONSE_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// The form to submit (contact, buy, sell or lease)
    variant: FormVariant,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    ip_block: Option<String>,
    #[arg(long)]
    lease_duration: Option<String>,
    /// Selected service, may be repeated
    #[arg(long = "service")]
    services: Vec<String>,
    #[arg(long)]
    message: Option<String>,
    /// Base url of the backend [default: the configured http listener]
    #[arg(long)]
    url: Option<Url>,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let base_url = match self.url.clone() {
            Some(url) => url,
            None => local_url(config.http.host, config.http.port)?,
        };
        let api = SubmissionApiServiceImpl::new(
            HttpClient::new(config.email.send_timeout.saturating_add(RESPONSE_GRACE))?,
            SubmissionApiServiceConfig {
                base_url: base_url.into(),
            },
        );
        let rules = environment::validation_rules(&config);
        let (variant, draft) = self.into_draft();

        let delivery_id = tokio::select! {
            result = submit(&api, variant, draft, rules) => result?,
            _ = tokio::signal::ctrl_c() => bail!("Submission cancelled"),
        };

        match delivery_id {
            Some(delivery_id) => println!("Submission delivered ({delivery_id})"),
            None => println!("Submission delivered"),
        }

        Ok(())
    }

    fn into_draft(self) -> (FormVariant, SubmissionDraft) {
        let draft = SubmissionDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            ip_block: self.ip_block,
            lease_duration: self.lease_duration,
            service: self.services,
            message: self.message,
        };
        (self.variant, draft)
    }
}

fn local_url(host: IpAddr, port: u16) -> anyhow::Result<Url> {
    let host = match host {
        IpAddr::V4(ip) if ip.is_unspecified() => "127.0.0.1".to_owned(),
        IpAddr::V6(ip) if ip.is_unspecified() => "[::1]".to_owned(),
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{ip}]"),
    };
    format!("http://{host}:{port}/")
        .parse()
        .context("Failed to build backend url")
}

/// Validate the submission locally and post it to the backend. Returns the
/// delivery id reported by the backend.
async fn submit(
    api: &impl SubmissionApiService,
    variant: FormVariant,
    draft: SubmissionDraft,
    rules: ValidationRules,
) -> anyhow::Result<Option<String>> {
    let errors = validate(&draft, variant, rules);
    if !errors.is_empty() {
        bail!("Invalid submission: {errors}");
    }

    debug!(%variant, "posting submission");
    match api.submit(variant, draft).await? {
        SubmissionApiResponse::Accepted { delivery_id } => Ok(delivery_id),
        SubmissionApiResponse::Rejected { message, errors } if errors.is_empty() => {
            bail!("{message}")
        }
        SubmissionApiResponse::Rejected { message, errors } => {
            let errors = errors
                .iter()
                .map(|(field, error)| format!("{field}: {error}"))
                .collect::<Vec<_>>()
                .join(", ");
            bail!("{message} ({errors})")
        }
        SubmissionApiResponse::Failed {
            message,
            error: Some(error),
        } => bail!("{message}: {error}"),
        SubmissionApiResponse::Failed {
            message,
            error: None,
        } => bail!("{message}"),
    }
}
