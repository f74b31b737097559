use anyhow::{bail, Context};
use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use adapter::FreshdeskConfig;
use domain::protocol::DEFAULT_PARENT_FIELD;

const APP_PREFIX: &str = "RELAY_";

/// Un-prefixed variables the relay has always been deployed with.
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("FRESHDESK_DOMAIN", "freshdesk.domain"),
    ("FRESHDESK_API_KEY", "freshdesk.api_key"),
    ("FRESHDESK_BASE_URL", "freshdesk.base_url"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
];

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub freshdesk: FreshdeskSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct FreshdeskSettings {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub api_key: String,
    /// Overrides `https://{domain}`, e.g. for a sandbox or a local mock.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub parent_field: String,
}

impl fmt::Debug for FreshdeskSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshdeskSettings")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("parent_field", &self.parent_field)
            .finish()
    }
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let settings = Self::from_sources(&run_mode, collect_env_vars(std::env::vars()))
            .context("Failed to load configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_sources(run_mode: &str, env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("freshdesk.timeout_secs", 30)?
            .set_default("freshdesk.parent_field", DEFAULT_PARENT_FIELD)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .map_err(|e| ConfigError::Foreign(Box::new(e)))?,
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }

    /// Every request would fail without credentials, so refuse to start.
    pub fn validate(&self) -> anyhow::Result<()> {
        let fd = &self.freshdesk;
        let has_base_url = fd.base_url.as_deref().is_some_and(|u| !u.trim().is_empty());

        if fd.domain.trim().is_empty() && !has_base_url {
            bail!("FRESHDESK_DOMAIN is not set");
        }
        if fd.api_key.trim().is_empty() {
            bail!("FRESHDESK_API_KEY is not set");
        }
        if fd.parent_field.trim().is_empty() {
            bail!("freshdesk.parent_field must not be empty");
        }
        if fd.timeout_secs == 0 {
            bail!("freshdesk.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn freshdesk_client_config(&self) -> FreshdeskConfig {
        let fd = &self.freshdesk;
        let mut config = FreshdeskConfig::for_domain(&fd.domain, fd.api_key.trim())
            .with_timeout(Duration::from_secs(fd.timeout_secs));

        if let Some(base_url) = fd.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Builds a dotted-key map from the environment.
///
/// `RELAY_FRESHDESK__TIMEOUT_SECS` becomes `freshdesk.timeout_secs`; the
/// plain variables in [`PLAIN_ENV_KEYS`] are mapped first so the prefixed
/// form wins when both are set.
fn collect_env_vars<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();

    let plain = vars.iter().filter_map(|(k, v)| {
        PLAIN_ENV_KEYS
            .iter()
            .find(|(name, _)| name == k)
            .map(|(_, key)| (key.to_string(), v.clone()))
    });

    let prefixed = vars.iter().filter(|(k, _)| k.starts_with(APP_PREFIX)).map(|(k, v)| {
        let new_key = k
            .trim_start_matches(APP_PREFIX)
            .replace("__", ".")
            .to_lowercase();
        (new_key, v.clone())
    });

    plain.chain(prefixed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        collect_env_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    fn load(pairs: &[(&str, &str)]) -> Settings {
        Settings::from_sources("test", env(pairs)).unwrap()
    }

    #[test]
    fn test_plain_variables_are_mapped() {
        let settings = load(&[
            ("FRESHDESK_DOMAIN", "acme.freshdesk.com"),
            ("FRESHDESK_API_KEY", "key"),
            ("PORT", "8080"),
            ("UNRELATED", "x"),
        ]);

        assert_eq!(settings.freshdesk.domain, "acme.freshdesk.com");
        assert_eq!(settings.freshdesk.api_key, "key");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[("FRESHDESK_DOMAIN", "a.freshdesk.com"), ("FRESHDESK_API_KEY", "k")]);

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.freshdesk.timeout_secs, 30);
        assert_eq!(settings.freshdesk.parent_field, "cf_parent_ticket_id");
        assert_eq!(settings.freshdesk_client_config().base_url, "https://a.freshdesk.com");
    }

    #[test]
    fn test_prefixed_variables_win() {
        let settings = load(&[
            ("FRESHDESK_DOMAIN", "plain.freshdesk.com"),
            ("RELAY_FRESHDESK__DOMAIN", "prefixed.freshdesk.com"),
            ("FRESHDESK_API_KEY", "k"),
            ("RELAY_FRESHDESK__TIMEOUT_SECS", "5"),
            ("RELAY_FRESHDESK__PARENT_FIELD", "cf_parent"),
        ]);

        assert_eq!(settings.freshdesk.domain, "prefixed.freshdesk.com");
        assert_eq!(settings.freshdesk.timeout_secs, 5);
        assert_eq!(settings.freshdesk.parent_field, "cf_parent");

        let client = settings.freshdesk_client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let settings = load(&[("FRESHDESK_DOMAIN", "a.freshdesk.com")]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("FRESHDESK_API_KEY"));

        let settings = load(&[("FRESHDESK_API_KEY", "k")]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("FRESHDESK_DOMAIN"));

        let settings = load(&[("FRESHDESK_DOMAIN", "a"), ("FRESHDESK_API_KEY", "   ")]);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_base_url_replaces_domain() {
        let settings = load(&[
            ("FRESHDESK_BASE_URL", "http://127.0.0.1:9999"),
            ("FRESHDESK_API_KEY", "k"),
        ]);

        assert!(settings.validate().is_ok());
        assert_eq!(settings.freshdesk_client_config().base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let settings = load(&[("FRESHDESK_DOMAIN", "a"), ("FRESHDESK_API_KEY", "top-secret")]);
        assert!(!format!("{:?}", settings).contains("top-secret"));
    }
}
