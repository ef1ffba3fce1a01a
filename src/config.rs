//! Server configuration
//!
//! Settings come from defaults, then an optional YAML file named by
//! `WEBROOT_CONFIG`, then the `LISTEN` and `DOCUMENT_ROOT` environment
//! variables.
//!
//! ```yaml
//! listen_addr: 127.0.0.1:10000
//! document_root: ./webroot
//! max_head_bytes: 8192
//! read_timeout_secs: 30
//! containment: canonical   # or name_scan
//! generator:
//!   extension: py
//!   interpreter: python3
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http::reader::{DEFAULT_MAX_HEAD_BYTES, DEFAULT_READ_TIMEOUT, ReadLimits};
use crate::resource::Containment;

/// Environment variable naming the YAML config file
pub const CONFIG_FILE_VAR: &str = "WEBROOT_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub document_root: PathBuf,
    pub max_head_bytes: usize,
    /// `None` disables the read deadline.
    pub read_timeout_secs: Option<u64>,
    pub containment: Containment,
    pub generator: GeneratorConfig,
}

/// Which files are executed instead of served, and with what.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// File extension without the dot
    pub extension: String,
    pub interpreter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:10000".to_string(),
            document_root: PathBuf::from("./webroot"),
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            read_timeout_secs: Some(DEFAULT_READ_TIMEOUT.as_secs()),
            containment: Containment::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            interpreter: "python3".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match lookup(CONFIG_FILE_VAR) {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml(&text).with_context(|| format!("invalid config file {}", path))?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Some(root) = lookup("DOCUMENT_ROOT") {
            cfg.document_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse YAML config")
    }

    pub fn read_limits(&self) -> ReadLimits {
        ReadLimits {
            max_head_bytes: self.max_head_bytes,
            read_timeout: self.read_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Checks settings that would otherwise only fail on first request.
    pub fn validate(&self) -> Result<()> {
        if self.max_head_bytes == 0 {
            anyhow::bail!("max_head_bytes must be greater than zero");
        }
        if self.generator.extension.is_empty() {
            anyhow::bail!("generator extension must not be empty");
        }

        let meta = std::fs::metadata(&self.document_root).with_context(|| {
            format!("document root {} is not accessible", self.document_root.display())
        })?;
        if !meta.is_dir() {
            anyhow::bail!("document root {} is not a directory", self.document_root.display());
        }

        Ok(())
    }
}
