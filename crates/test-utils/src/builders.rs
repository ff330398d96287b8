use installer_shim::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults but with `line_delay = "0"` so tests don't sleep.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.installer.line_delay = "0".to_string();
        Self { config }
    }

    pub fn with_prompts(mut self, prompts: &[&str]) -> Self {
        self.config
            .prompts
            .extend(prompts.iter().map(|p| p.to_string()));
        self
    }

    pub fn with_line_delay(mut self, delay: &str) -> Self {
        self.config.installer.line_delay = delay.to_string();
        self
    }

    pub fn with_error_marker(mut self, marker: &str) -> Self {
        self.config.installer.error_marker = marker.to_string();
        self
    }

    pub fn with_index_page(mut self, path: &str) -> Self {
        self.config.server.index_page = path.to_string();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
