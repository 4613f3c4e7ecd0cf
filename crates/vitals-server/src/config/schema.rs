use serde::Deserialize;
use vitals_core::error::{Result, VitalsError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub shutdown: ShutdownSection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            app: AppSection::default(),
            shutdown: ShutdownSection::default(),
            log: LogSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VitalsError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.app.validate()?;
        self.shutdown.validate()?;

        Ok(())
    }

    /// Development mode exposes internal error detail in 500 responses.
    pub fn is_development(&self) -> bool {
        self.server.environment == "development"
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            environment: default_environment(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(VitalsError::BadRequest(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            )));
        }
        if self.environment.trim().is_empty() {
            return Err(VitalsError::BadRequest(
                "server.environment must not be empty".into(),
            ));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(VitalsError::BadRequest(
                "server.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VitalsError::BadRequest("app.name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ShutdownSection {
    /// Time between flipping readiness off and closing the listener.
    #[serde(default)]
    pub drain_delay_ms: u64,
}

impl ShutdownSection {
    pub fn validate(&self) -> Result<()> {
        if self.drain_delay_ms > 60_000 {
            return Err(VitalsError::BadRequest(
                "shutdown.drain_delay_ms must be between 0 and 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_environment() -> String {
    "development".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_app_name() -> String {
    "vitals".into()
}
fn default_app_version() -> String {
    "1.0.0".into()
}
fn default_log_filter() -> String {
    "info".into()
}
