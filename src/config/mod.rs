pub mod defaults;
pub mod types;

pub use defaults::CONFIG_TEMPLATE;
pub use types::{Config, ConfigError, EnvironmentFixture};

use crate::core::mhs::url::{build_inbound_url, build_outbound_url, validate_url};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_NHS_ENVIRONMENT: &str = "NHS_ENVIRONMENT";
pub const ENV_MHS_INBOUND_URL: &str = "MHS_INBOUND_URL";
pub const ENV_MHS_OUTBOUND_URL: &str = "MHS_OUTBOUND_URL";
pub const ENV_CONFIG_PATH: &str = "MHS_PROBE_CONFIG";

impl Config {
    /// Default config file: `<config dir>/mhs-probe/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(dir.join("mhs-probe").join("config.toml"))
    }

    /// Config file a `load` would read, `None` when built-in defaults apply
    ///
    /// An explicit path wins over `MHS_PROBE_CONFIG`, which wins over the
    /// default path. Explicit and env paths are returned even if missing so
    /// that loading them fails loudly.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
        if let Some(path) = explicit {
            return Ok(Some(path.to_path_buf()));
        }
        if let Some(path) = non_empty_var(ENV_CONFIG_PATH) {
            return Ok(Some(PathBuf::from(path)));
        }

        let path = Self::default_path()?;
        Ok(path.exists().then_some(path))
    }

    /// Load configuration and apply environment overrides
    ///
    /// An explicit path (argument or `MHS_PROBE_CONFIG`) must exist. A
    /// missing default file falls back to `Config::default()` so that a
    /// fully environment-driven setup works without any file.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_source(explicit).map(|(config, _)| config)
    }

    /// As `load`, also returning the file that was read
    pub fn load_with_source(
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = Self::resolve_path(explicit)?;
        let mut config = match &source {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok((config, source))
    }

    /// Parse a config file without applying overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply NHS_ENVIRONMENT, MHS_INBOUND_URL and MHS_OUTBOUND_URL
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_var(ENV_NHS_ENVIRONMENT) {
            self.nhs_environment = Some(value);
        }
        if let Some(value) = non_empty_var(ENV_MHS_INBOUND_URL) {
            self.mhs_inbound_url = Some(value);
        }
        if let Some(value) = non_empty_var(ENV_MHS_OUTBOUND_URL) {
            self.mhs_outbound_url = Some(value);
        }
    }

    /// Select an environment, overriding file and env values
    pub fn with_environment(mut self, nhs_environment: impl Into<String>) -> Self {
        self.nhs_environment = Some(nhs_environment.into());
        self
    }

    pub fn nhs_environment(&self) -> Result<&str, ConfigError> {
        self.nhs_environment
            .as_deref()
            .filter(|env| !env.trim().is_empty())
            .ok_or(ConfigError::MissingEnvironment)
    }

    /// Fixture of the selected environment
    pub fn fixture(&self) -> Result<&EnvironmentFixture, ConfigError> {
        let env = self.nhs_environment()?;
        self.fixtures
            .get(env)
            .ok_or_else(|| ConfigError::UnknownEnvironment(env.to_string()))
    }

    pub fn inbound_url(&self) -> Result<String, ConfigError> {
        match &self.mhs_inbound_url {
            Some(url) => Ok(url.clone()),
            None => Ok(build_inbound_url(self.nhs_environment()?)),
        }
    }

    pub fn outbound_url(&self) -> Result<String, ConfigError> {
        match &self.mhs_outbound_url {
            Some(url) => Ok(url.clone()),
            None => Ok(build_outbound_url(self.nhs_environment()?)),
        }
    }

    /// Validate that both endpoints parse and the selected fixture exists
    pub fn check(&self) -> Result<(), ConfigError> {
        for url in [self.inbound_url()?, self.outbound_url()?] {
            validate_url(&url).map_err(|e| ConfigError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        }
        self.fixture()?;
        Ok(())
    }

    /// Write the template to the default path unless a file already exists
    ///
    /// Returns the path and whether a new file was written.
    pub fn init() -> Result<(PathBuf, bool), ConfigError> {
        let path = Self::default_path()?;
        let created = Self::init_at(&path)?;
        Ok((path, created))
    }

    /// Returns `false` when a config already exists at `path`
    pub fn init_at(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(true)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
