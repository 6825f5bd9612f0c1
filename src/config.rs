//! `brainrot.toml` configuration.
//!
//! ```toml
//! [database]
//! url = "sqlite://brainrot.db"
//! max_connections = 5
//!
//! [aliases]
//! SELECT = ["skibidi", "toilet"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::engine::DEFAULT_MAX_CONNECTIONS;
use crate::error::{BrainrotError, BrainrotResult};
use crate::keywords::{AliasRegistry, Operation};

pub const CONFIG_FILE: &str = "brainrot.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Extra aliases per operation name, added to the standard vocabulary.
    pub aliases: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./brainrot.toml` is tried,
    /// then `brainrot/config.toml` under the user config directory, and
    /// defaults are used when neither exists.
    pub fn load(path: Option<&Path>) -> BrainrotResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> BrainrotResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = content
            .parse::<Config>()
            .map_err(|e| BrainrotError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Add the configured aliases to `registry`.
    ///
    /// Each operation's list is applied all or nothing.
    pub fn apply_aliases(&self, registry: &mut AliasRegistry) -> BrainrotResult<()> {
        for (name, aliases) in &self.aliases {
            let op: Operation = name.parse()?;
            registry.extend(op, aliases.iter().cloned())?;
        }
        Ok(())
    }

    /// The standard vocabulary plus the configured aliases.
    pub fn registry(&self) -> BrainrotResult<AliasRegistry> {
        let mut registry = AliasRegistry::standard();
        self.apply_aliases(&mut registry)?;
        Ok(registry)
    }
}

impl std::str::FromStr for Config {
    type Err = BrainrotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| BrainrotError::Config(e.to_string()))
    }
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("brainrot").join("config.toml"));
    }
    paths
}
