// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// prompts = ["Hostname?", "Username?"]
///
/// [server]
/// bind = "127.0.0.1:8000"
/// index_page = "index.html"
///
/// [installer]
/// program = "./zi.sh"
/// line_delay = "100ms"
/// error_marker = "ERROR"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Questions the caller answers, in the order the installer reads them.
    #[serde(default)]
    pub prompts: Vec<String>,

    #[serde(default)]
    pub server: RawServerSection,

    #[serde(default)]
    pub installer: RawInstallerSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawServerSection {
    /// Listen address. Loopback by default.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTML page served on `GET /`.
    #[serde(default = "default_index_page")]
    pub index_page: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_index_page() -> String {
    "index.html".to_string()
}

impl Default for RawServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            index_page: default_index_page(),
        }
    }
}

/// `[installer]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInstallerSection {
    /// Installer executable, resolved against the working directory.
    #[serde(default = "default_program")]
    pub program: String,

    /// Pause after each processed output line (e.g. `"100ms"`, `"0"`).
    #[serde(default = "default_line_delay")]
    pub line_delay: String,

    /// Substring that marks a fatal output line.
    #[serde(default = "default_error_marker")]
    pub error_marker: String,
}

fn default_program() -> String {
    "./zi.sh".to_string()
}

fn default_line_delay() -> String {
    "100ms".to_string()
}

fn default_error_marker() -> String {
    "ERROR".to_string()
}

impl Default for RawInstallerSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            line_delay: default_line_delay(),
            error_marker: default_error_marker(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so every value in here
/// has already been parsed and checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub prompts: Vec<String>,
    pub server: ServerConfig,
    pub installer: InstallerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub index_page: PathBuf,
}

#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub program: PathBuf,
    pub line_delay: Duration,
    pub error_marker: String,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        prompts: Vec<String>,
        server: ServerConfig,
        installer: InstallerConfig,
    ) -> Self {
        Self {
            prompts,
            server,
            installer,
        }
    }
}
