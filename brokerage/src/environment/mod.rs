use std::{net::SocketAddr, sync::Arc};

use brokerage_api_rest::RestServerConfig;
use brokerage_config::{Config, EmailConfig};
use brokerage_core_blog_impl::BlogFeatureServiceImpl;
use brokerage_core_health_impl::{HealthFeatureConfig, HealthFeatureServiceImpl};
use brokerage_core_submission_contracts::delivery::DeliveryConfig;
use brokerage_core_submission_impl::{
    dispatch::SubmissionDispatchServiceImpl, SubmissionFeatureConfig, SubmissionFeatureServiceImpl,
};
use brokerage_email_impl::EmailServiceImpl;
use brokerage_extern_impl::{
    cms::{CmsApiServiceConfig, CmsApiServiceImpl},
    http::HttpClient,
};
use brokerage_models::submission::ValidationRules;
use brokerage_templates_impl::TemplateServiceImpl;
use tracing::warn;

use self::types::{Blog, Health, RestServer, Submission};

pub mod types;

/// Build the rest server and all services it depends on.
pub fn rest_server(config: &Config) -> anyhow::Result<RestServer> {
    let delivery = Arc::new(delivery_config(&config.email));
    let missing = delivery.missing();
    if !missing.is_empty() {
        warn!(
            ?missing,
            "Mail delivery is not configured, submissions will be rejected"
        );
    }

    let email = EmailServiceImpl;

    let health: Health = HealthFeatureServiceImpl::new(
        email,
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
            delivery: Arc::clone(&delivery),
        },
    );

    let submission: Submission = SubmissionFeatureServiceImpl {
        dispatch: SubmissionDispatchServiceImpl {
            email,
            template: TemplateServiceImpl::new()?,
        },
        config: SubmissionFeatureConfig {
            rules: validation_rules(config),
            delivery,
        },
    };

    let blog: Blog = BlogFeatureServiceImpl {
        cms_api: CmsApiServiceImpl::new(
            HttpClient::new(config.cms.timeout.into())?,
            cms_api_service_config(config)?,
        ),
    };

    Ok(RestServer {
        health,
        submission,
        blog,
        config: RestServerConfig {
            addr: SocketAddr::new(config.http.host, config.http.port),
            expose_error_details: config.http.expose_error_details,
        },
    })
}

/// Delivery settings from the `[email]` section. Blank values count as
/// missing, so that an empty environment variable does not pass as
/// configured.
pub fn delivery_config(config: &EmailConfig) -> DeliveryConfig {
    fn non_blank(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(Into::into)
    }

    DeliveryConfig {
        smtp_host: non_blank(&config.smtp_host),
        smtp_port: config.smtp_port,
        smtp_secure: config.smtp_secure,
        smtp_user: non_blank(&config.smtp_user),
        smtp_password: config.smtp_password.clone().filter(|x| !x.is_empty()),
        from: config.from.clone(),
        to: config.to.clone(),
        cc: config.cc.clone(),
        send_timeout: config.send_timeout.into(),
        verify_connection: config.verify_connection,
    }
}

pub fn validation_rules(config: &Config) -> ValidationRules {
    ValidationRules {
        strict_phone: config.submission.strict_phone,
    }
}

pub fn cms_api_service_config(config: &Config) -> anyhow::Result<CmsApiServiceConfig> {
    CmsApiServiceConfig::new(
        &config.cms.project_id,
        &config.cms.dataset,
        &config.cms.api_version,
        config.cms.use_cdn,
        config.cms.base_url_override.clone(),
    )
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::Path};

    use brokerage_config::DEFAULT_CONFIG_PATH;
    use pretty_assertions::assert_eq;

    use super::*;

    fn load(env: &[(&str, &str)]) -> Config {
        let env = env
            .iter()
            .map(|&(k, v)| (k.into(), v.into()))
            .collect::<HashMap<_, _>>();
        brokerage_config::load_from(&[Path::new(DEFAULT_CONFIG_PATH)], Some(env)).unwrap()
    }

    #[test]
    fn default_config_is_incomplete() {
        let config = load(&[]);

        let delivery = delivery_config(&config.email);

        assert_eq!(
            delivery.missing(),
            [
                "email.smtp_host",
                "email.smtp_user",
                "email.smtp_password",
                "email.from",
                "email.to"
            ]
        );
    }

    #[test]
    fn blank_values_are_missing() {
        let config = load(&[
            ("BROKERAGE__EMAIL__SMTP_HOST", "  "),
            ("BROKERAGE__EMAIL__SMTP_USER", "admin@example.com"),
            ("BROKERAGE__EMAIL__SMTP_PASSWORD", ""),
            ("BROKERAGE__EMAIL__FROM", "IPv4 Brokerage <admin@example.com>"),
            ("BROKERAGE__EMAIL__TO", "ipv4@example.com"),
        ]);

        let delivery = delivery_config(&config.email);

        assert_eq!(
            delivery.missing(),
            ["email.smtp_host", "email.smtp_password"]
        );
    }

    #[test]
    fn complete_config() {
        let config = load(&[
            ("BROKERAGE__EMAIL__SMTP_HOST", "smtp.example.com"),
            ("BROKERAGE__EMAIL__SMTP_USER", "admin@example.com"),
            ("BROKERAGE__EMAIL__SMTP_PASSWORD", "secret"),
            ("BROKERAGE__EMAIL__FROM", "IPv4 Brokerage <admin@example.com>"),
            ("BROKERAGE__EMAIL__TO", "ipv4@example.com"),
        ]);

        let delivery = delivery_config(&config.email).resolve().unwrap();

        assert_eq!(delivery.smtp.host, "smtp.example.com");
        assert_eq!(delivery.smtp.port, 587);
        assert_eq!(delivery.to.email(), "ipv4@example.com");
        assert!(delivery.cc.is_empty());
    }

    #[test]
    fn cms_endpoint() {
        let config = load(&[]);

        let cms = cms_api_service_config(&config).unwrap();

        assert_eq!(
            cms.query_endpoint().as_str(),
            "https://6ery2gt6.apicdn.sanity.io/v2025-05-03/data/query/production"
        );
    }

    #[test]
    fn build_rest_server() {
        let config = load(&[]);
        rest_server(&config).unwrap();
    }
}
