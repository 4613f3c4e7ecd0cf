//! Service config loader (strict parsing + env overrides).

pub mod schema;

use std::fs;
use std::path::Path;

use vitals_core::error::{Result, VitalsError};

pub use schema::{AppSection, LogSection, ServerSection, ServiceConfig, ShutdownSection};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "VITALS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "vitals.yaml";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VitalsError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| VitalsError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve config for the binary: `$VITALS_CONFIG`, else `vitals.yaml` if
/// present, else built-in defaults. `PORT` and `APP_ENV` are applied last.
pub fn load() -> Result<ServiceConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => ServiceConfig::default(),
    };
    apply_overrides(
        &mut cfg,
        std::env::var("PORT").ok().as_deref(),
        std::env::var("APP_ENV").ok().as_deref(),
    )?;
    Ok(cfg)
}

/// Apply `PORT` / `APP_ENV` style overrides, then re-validate.
pub fn apply_overrides(
    cfg: &mut ServiceConfig,
    port: Option<&str>,
    environment: Option<&str>,
) -> Result<()> {
    if let Some(port) = port {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| VitalsError::BadRequest(format!("PORT must be a port number, got {port:?}")))?;
        let mut addr: std::net::SocketAddr = cfg
            .server
            .listen
            .parse()
            .map_err(|e| VitalsError::BadRequest(format!("server.listen: {e}")))?;
        addr.set_port(port);
        cfg.server.listen = addr.to_string();
    }
    if let Some(env) = environment {
        cfg.server.environment = env.to_string();
    }
    cfg.validate()
}
