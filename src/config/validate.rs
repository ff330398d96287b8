// src/config/validate.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    ConfigFile, InstallerConfig, RawConfigFile, RawInstallerSection, RawServerSection,
    ServerConfig,
};
use crate::errors::{Result, ShimError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ShimError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_prompts(&raw.prompts)?;
        let server = validate_server(&raw.server)?;
        let installer = validate_installer(&raw.installer)?;
        Ok(ConfigFile::new_unchecked(raw.prompts, server, installer))
    }
}

fn validate_prompts(prompts: &[String]) -> Result<()> {
    for (idx, prompt) in prompts.iter().enumerate() {
        if prompt.trim().is_empty() {
            return Err(ShimError::ConfigError(format!(
                "prompts[{idx}] must not be blank"
            )));
        }
    }
    Ok(())
}

fn validate_server(raw: &RawServerSection) -> Result<ServerConfig> {
    let bind = parse_bind(&raw.bind)?;

    if raw.index_page.trim().is_empty() {
        return Err(ShimError::ConfigError(
            "[server].index_page must not be empty".to_string(),
        ));
    }

    Ok(ServerConfig {
        bind,
        index_page: PathBuf::from(&raw.index_page),
    })
}

fn validate_installer(raw: &RawInstallerSection) -> Result<InstallerConfig> {
    if raw.program.trim().is_empty() {
        return Err(ShimError::ConfigError(
            "[installer].program must not be empty".to_string(),
        ));
    }

    if raw.error_marker.is_empty() {
        return Err(ShimError::ConfigError(
            "[installer].error_marker must not be empty".to_string(),
        ));
    }

    let line_delay = parse_line_delay(&raw.line_delay)?;

    Ok(InstallerConfig {
        program: PathBuf::from(&raw.program),
        line_delay,
        error_marker: raw.error_marker.clone(),
    })
}

/// Parse a listen address, as used by both `[server].bind` and `--bind`.
pub fn parse_bind(s: &str) -> Result<SocketAddr> {
    s.trim().parse().map_err(|e| {
        ShimError::ConfigError(format!("invalid bind address '{s}': {e}"))
    })
}

fn parse_line_delay(s: &str) -> Result<Duration> {
    parse_duration(s).map_err(|e| {
        ShimError::ConfigError(format!("[installer].line_delay: {e}"))
    })
}
