use std::{collections::HashMap, net::IpAddr, path::Path};

use anyhow::Context;
use brokerage_models::{email_address::EmailAddressWithName, Sensitive};
use config::{Environment, File, FileFormat};
pub use duration::Duration;
use serde::{de::Error, Deserialize, Deserializer};
use url::Url;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_ENV: &str = "BROKERAGE_CONFIG";

/// Prefix of environment variables overriding single values, e.g.
/// `BROKERAGE__EMAIL__SMTP_HOST`.
pub const ENV_PREFIX: &str = "BROKERAGE";

/// Load the default config, the files listed in `BROKERAGE_CONFIG` and the
/// `BROKERAGE__*` environment variables, in that order.
pub fn load() -> anyhow::Result<Config> {
    let extra_paths = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = std::iter::once(DEFAULT_CONFIG_PATH)
        .chain(extra_paths.split(':').filter(|x| !x.is_empty()))
        .collect::<Vec<_>>();

    load_from(&paths, None)
}

/// Load the given config files followed by the environment. If `env` is set,
/// it is used instead of the process environment.
pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<Config> {
    let environment = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .source(env);

    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(environment)
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub health: HealthConfig,
    pub submission: SubmissionConfig,
    pub email: EmailConfig,
    pub cms: CmsConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Include transport error details in `500` responses. Never enable this
    /// in production.
    #[serde(default)]
    pub expose_error_details: bool,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub strict_phone: bool,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    /// Use implicit TLS instead of STARTTLS.
    #[serde(default)]
    pub smtp_secure: bool,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<Sensitive<String>>,
    pub from: Option<EmailAddressWithName>,
    pub to: Option<EmailAddressWithName>,
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub cc: Vec<EmailAddressWithName>,
    pub send_timeout: Duration,
    #[serde(default)]
    pub verify_connection: bool,
}

#[derive(Debug, Deserialize)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub base_url_override: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: Option<String>,
}

/// Accept both a TOML array and a comma separated string (as set via the
/// environment).
fn list_or_comma_separated<'de, D>(deserializer: D) -> Result<Vec<EmailAddressWithName>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<EmailAddressWithName>),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::List(list) => Ok(list),
        Raw::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(|x| x.parse().map_err(D::Error::custom))
            .collect(),
    }
}
