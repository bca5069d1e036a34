//! Tester configuration
//!
//! Values are resolved with this precedence, highest first:
//! 1. Command-line flags
//! 2. Environment variables (`LLM_TESTER_*`)
//! 3. Project config file (.llm-tester/config.yaml)
//! 4. Global config file (~/.llm-tester/config.yaml)
//! 5. Built-in defaults

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

const CONFIG_DIR: &str = ".llm-tester";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TesterConfig {
    /// Model service host (default: localhost)
    pub host: String,
    /// Model service port (default: 11434)
    pub port: u16,
    /// Transport timeout in seconds (default: 300)
    pub timeout_secs: u64,
    /// Maximum tests in flight in parallel mode (default: 3)
    pub max_concurrency: usize,
    /// Run models in parallel instead of one after another (default: false)
    pub parallel: bool,
    /// Log level when neither --verbose nor --quiet is given (default: info)
    pub log_level: String,
    /// Problems found while loading, logged once the subscriber is installed
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 11434,
            timeout_secs: 300,
            max_concurrency: 3,
            parallel: false,
            log_level: "info".to_string(),
            warnings: Vec::new(),
        }
    }
}

/// Values given on the command line; `None` keeps the resolved value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub max_concurrency: Option<usize>,
    pub parallel: Option<bool>,
}

/// On-disk layout: every key under `tester:` is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    tester: Option<PartialConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    host: Option<String>,
    port: Option<u16>,
    timeout_secs: Option<u64>,
    max_concurrency: Option<usize>,
    parallel: Option<bool>,
    log_level: Option<String>,
}

impl TesterConfig {
    /// Load from the global file, the project file and the environment.
    ///
    /// Validation is left to the caller so command-line overrides can apply first.
    pub fn load_with_precedence() -> CliResult<Self> {
        Self::load_from(Self::global_config_path(), Self::project_config_path())
    }

    /// Same as [`Self::load_with_precedence`] with explicit file locations
    pub fn load_from(global: Option<PathBuf>, project: PathBuf) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(global) = global {
            if global.exists() {
                debug!("Loading global config from {:?}", global);
                config.merge_from_file(&global)?;
            }
        }

        if project.exists() {
            debug!("Loading project config from {:?}", project);
            config.merge_from_file(&project)?;
        }

        config.load_from_env();
        Ok(config)
    }

    /// `~/.llm-tester/config.yaml`, if a home directory can be resolved
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// `.llm-tester/config.yaml` relative to the working directory
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Override with any `LLM_TESTER_*` variables; unparsable values are ignored
    /// and noted in [`Self::warnings`]
    pub fn load_from_env(&mut self) {
        if let Ok(host) = std::env::var("LLM_TESTER_HOST") {
            debug!("Loading LLM_TESTER_HOST from environment: {}", host);
            self.host = host;
        }
        if let Some(port) = self.env_parse::<u16>("LLM_TESTER_PORT") {
            self.port = port;
        }
        if let Some(timeout) = self.env_parse::<u64>("LLM_TESTER_TIMEOUT_SECS") {
            self.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.env_parse::<usize>("LLM_TESTER_MAX_CONCURRENCY") {
            self.max_concurrency = concurrency;
        }
        if let Some(parallel) = self.env_parse::<bool>("LLM_TESTER_PARALLEL") {
            self.parallel = parallel;
        }
        if let Ok(level) = std::env::var("LLM_TESTER_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Merge a YAML file; keys present in the file replace current values
    pub fn merge_from_file(&mut self, path: &Path) -> CliResult<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(tester) = file.tester {
            if let Some(host) = tester.host {
                self.host = host;
            }
            if let Some(port) = tester.port {
                self.port = port;
            }
            if let Some(timeout_secs) = tester.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
            if let Some(max_concurrency) = tester.max_concurrency {
                self.max_concurrency = max_concurrency;
            }
            if let Some(parallel) = tester.parallel {
                self.parallel = parallel;
            }
            if let Some(log_level) = tester.log_level {
                self.log_level = log_level;
            }
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(max_concurrency) = overrides.max_concurrency {
            self.max_concurrency = max_concurrency;
        }
        if let Some(parallel) = overrides.parallel {
            self.parallel = parallel;
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.host.trim().is_empty() {
            return Err(CliError::Config("host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(CliError::Config("port must be greater than 0".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(CliError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(CliError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Emit the warnings collected while loading
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    fn env_parse<T: std::str::FromStr>(&mut self, name: &str) -> Option<T> {
        let raw = std::env::var(name).ok()?;
        match raw.trim().parse::<T>() {
            Ok(value) => {
                debug!("Loading {} from environment: {}", name, raw);
                Some(value)
            }
            Err(_) => {
                self.warnings
                    .push(format!("Ignoring invalid {} value: {}", name, raw));
                None
            }
        }
    }
}
