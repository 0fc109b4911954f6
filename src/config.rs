//! # Consumer Configuration
//!
//! Everything a consumer system needs before it can talk to anyone: its own
//! identity, the client certificate and key used for every outbound call, where
//! the orchestrator lives, and the transport policy (server certificate
//! verification and request timeout).
//!
//! Configuration is passed explicitly into [`crate::ConsumerSystem`]; nothing
//! here is global.
//!
//! # Examples
//!
//! ```rust
//! use arrowhead_consumer::config::ConsumerConfig;
//! use arrowhead_consumer::system::SystemIdentity;
//! use std::time::Duration;
//!
//! let config = ConsumerConfig::new(
//!     SystemIdentity::new("thermostat", "10.0.0.7", 8443, ""),
//!     "10.0.0.1:8441/orchestrator",
//!     Duration::from_secs(10),
//! )
//! .with_credentials("certificates/thermostat.crt", "certificates/thermostat.key");
//!
//! assert!(config.verify_server_cert);
//! assert!(config.validate().is_ok());
//! ```

use ::config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ConsumerError, ConsumerResult};
use crate::system::SystemIdentity;

/// Environment variable prefix for overrides, e.g. `ARROWHEAD_REQUEST_TIMEOUT_MS`
pub const ENV_PREFIX: &str = "ARROWHEAD";

/// Configuration for a consumer system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub authentication_info: String,
    /// Client certificate (PEM) presented on every call
    #[serde(default)]
    pub certfile: PathBuf,
    /// Private key (PEM) matching `certfile`
    #[serde(default)]
    pub keyfile: PathBuf,
    /// Extra trusted root for a private Arrowhead cloud CA
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
    /// `host:port[/base-path]` of the orchestrator
    pub orchestrator_address: String,
    #[serde(default = "default_verify_server_cert")]
    pub verify_server_cert: bool,
    /// Request timeout in milliseconds; has no default
    pub request_timeout_ms: u64,
}

fn default_verify_server_cert() -> bool {
    true
}

/// Layout of a properties file: everything lives under `[SYSTEM]`
#[derive(Debug, Deserialize)]
struct PropertiesFile {
    #[serde(alias = "SYSTEM")]
    system: ConsumerConfig,
}

impl ConsumerConfig {
    pub fn new(
        identity: SystemIdentity,
        orchestrator_address: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            system_name: identity.system_name,
            address: identity.address,
            port: identity.port,
            authentication_info: identity.authentication_info,
            certfile: PathBuf::new(),
            keyfile: PathBuf::new(),
            ca_file: None,
            orchestrator_address: orchestrator_address.into(),
            verify_server_cert: true,
            request_timeout_ms: u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn with_credentials(
        mut self,
        certfile: impl AsRef<Path>,
        keyfile: impl AsRef<Path>,
    ) -> Self {
        self.certfile = certfile.as_ref().to_path_buf();
        self.keyfile = keyfile.as_ref().to_path_buf();
        self
    }

    pub fn identity(&self) -> SystemIdentity {
        SystemIdentity::new(
            self.system_name.clone(),
            self.address.clone(),
            self.port,
            self.authentication_info.clone(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Load a properties file and apply `ARROWHEAD_*` environment overrides
    ///
    /// ```ini
    /// [SYSTEM]
    /// system_name = thermostat
    /// address = 10.0.0.7
    /// port = 8443
    /// certfile = certificates/thermostat.crt
    /// keyfile = certificates/thermostat.key
    /// orchestrator_address = 10.0.0.1:8441/orchestrator
    /// request_timeout_ms = 10000
    /// ```
    pub fn load_from_file(path: &Path) -> ConsumerResult<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Same as [`Self::load_from_file`] with a custom environment prefix
    pub fn load_with_env_prefix(path: &Path, env_prefix: &str) -> ConsumerResult<Self> {
        debug!("Loading consumer config from: {}", path.display());

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()?;

        let mut config = settings.try_deserialize::<PropertiesFile>()?.system;
        config.apply_env_overrides(env_prefix)?;
        config.validate()?;

        debug!(
            system_name = %config.system_name,
            orchestrator_address = %config.orchestrator_address,
            timeout_ms = config.request_timeout_ms,
            "Loaded consumer configuration"
        );
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self, prefix: &str) -> ConsumerResult<()> {
        let var = |name: &str| std::env::var(format!("{prefix}_{name}")).ok();

        if let Some(address) = var("ORCHESTRATOR_ADDRESS") {
            self.orchestrator_address = address;
        }
        if let Some(timeout) = var("REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = timeout.parse().map_err(|e| {
                ConsumerError::config_error(format!("Invalid {prefix}_REQUEST_TIMEOUT_MS: {e}"))
            })?;
        }
        if let Some(verify) = var("VERIFY_SERVER_CERT") {
            self.verify_server_cert = verify.parse().map_err(|e| {
                ConsumerError::config_error(format!("Invalid {prefix}_VERIFY_SERVER_CERT: {e}"))
            })?;
        }
        if let Some(certfile) = var("CERTFILE") {
            self.certfile = PathBuf::from(certfile);
        }
        if let Some(keyfile) = var("KEYFILE") {
            self.keyfile = PathBuf::from(keyfile);
        }
        if let Some(ca_file) = var("CA_FILE") {
            self.ca_file = Some(PathBuf::from(ca_file));
        }
        Ok(())
    }

    pub fn validate(&self) -> ConsumerResult<()> {
        if self.system_name.trim().is_empty() {
            return Err(ConsumerError::config_error("system_name must not be empty"));
        }
        if self.address.trim().is_empty() {
            return Err(ConsumerError::config_error("address must not be empty"));
        }
        if self.orchestrator_address.trim().is_empty() {
            return Err(ConsumerError::config_error(
                "orchestrator_address must not be empty",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConsumerError::config_error(
                "request_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PROPERTIES: &str = "\
[SYSTEM]
system_name = thermostat
address = 10.0.0.7
port = 8443
authentication_info = fingerprint
certfile = certificates/thermostat.crt
keyfile = certificates/thermostat.key
orchestrator_address = 10.0.0.1:8441/orchestrator
request_timeout_ms = 5000
";

    fn write_properties(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_properties_file() {
        let file = write_properties(PROPERTIES);
        let config =
            ConsumerConfig::load_with_env_prefix(file.path(), "ARROWHEAD_TEST_UNSET").unwrap();

        assert_eq!(config.system_name, "thermostat");
        assert_eq!(config.port, 8443);
        assert_eq!(config.authentication_info, "fingerprint");
        assert_eq!(config.certfile, PathBuf::from("certificates/thermostat.crt"));
        assert_eq!(config.orchestrator_address, "10.0.0.1:8441/orchestrator");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.verify_server_cert);
        assert!(config.ca_file.is_none());
        assert_eq!(config.identity().url(), "10.0.0.7:8443");
    }

    #[test]
    fn test_timeout_is_required() {
        let file = write_properties(&PROPERTIES.replace("request_timeout_ms = 5000\n", ""));
        let result = ConsumerConfig::load_with_env_prefix(file.path(), "ARROWHEAD_TEST_UNSET");
        assert!(matches!(result, Err(ConsumerError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = ConsumerConfig::load_from_file(Path::new("/nonexistent/consumer.ini"));
        assert!(matches!(result, Err(ConsumerError::Config(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let prefix = "ARROWHEAD_TEST_OVERRIDES";
        std::env::set_var(format!("{prefix}_REQUEST_TIMEOUT_MS"), "750");
        std::env::set_var(format!("{prefix}_VERIFY_SERVER_CERT"), "false");
        std::env::set_var(format!("{prefix}_ORCHESTRATOR_ADDRESS"), "orch.local:8441");

        let file = write_properties(PROPERTIES);
        let config = ConsumerConfig::load_with_env_prefix(file.path(), prefix).unwrap();

        assert_eq!(config.request_timeout_ms, 750);
        assert!(!config.verify_server_cert);
        assert_eq!(config.orchestrator_address, "orch.local:8441");
    }

    #[test]
    fn test_validation() {
        let identity = SystemIdentity::new("consumer", "127.0.0.1", 8080, "");
        let valid = ConsumerConfig::new(identity, "127.0.0.1:8441", Duration::from_secs(1));
        assert!(valid.validate().is_ok());

        let mut zero_timeout = valid.clone();
        zero_timeout.request_timeout_ms = 0;
        assert!(zero_timeout.validate().is_err());

        let mut no_name = valid.clone();
        no_name.system_name = " ".to_string();
        assert!(no_name.validate().is_err());

        let huge = ConsumerConfig::new(
            SystemIdentity::new("consumer", "127.0.0.1", 8080, ""),
            "127.0.0.1:8441",
            Duration::MAX,
        );
        assert_eq!(huge.request_timeout_ms, u64::MAX);

        let mut no_orchestrator = valid;
        no_orchestrator.orchestrator_address.clear();
        assert!(no_orchestrator.validate().is_err());
    }
}
