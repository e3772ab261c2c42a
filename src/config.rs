//! Site configuration handling.
//! Loads the optional `kiln.json`/`kiln.yml`/`kiln.yaml` file that tunes which
//! files are templated, the default include encoding and extra global bindings.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILES, DEFAULT_TEMPLATED, RESERVED_NAMES};
use crate::error::{Error, Result};
use crate::renderer::Encoding;

/// Contents of a site configuration file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Output root, relative to the working directory
    pub output: Option<PathBuf>,
    /// Glob patterns of file names evaluated as templates
    pub templated: Option<Vec<String>>,
    /// Default encoding of the inclusion helpers
    pub encoding: Option<String>,
    /// Values bound in every evaluation
    pub globals: IndexMap<String, serde_json::Value>,
}

impl SiteConfig {
    pub fn templated_patterns(&self) -> Vec<String> {
        match &self.templated {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_TEMPLATED.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn encoding(&self) -> Result<Encoding> {
        match &self.encoding {
            Some(name) => name.parse().map_err(Error::ConfigError),
            None => Ok(Encoding::default()),
        }
    }

    /// Rejects globals that would shadow a reserved identifier.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.globals.keys().find(|k| RESERVED_NAMES.contains(&k.as_str())) {
            return Err(Error::ConfigError(format!(
                "'{name}' is reserved and cannot be used as a global"
            )));
        }
        self.encoding()?;
        Ok(())
    }
}

/// Finds the first existing config file in `dir`.
pub fn find_config<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
    CONFIG_FILES.iter().map(|file| dir.as_ref().join(file)).find(|path| path.is_file())
}

/// Parses a config file as JSON or YAML depending on its extension.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigParseError` if the content does not match [`SiteConfig`]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::io("read config", path, e))?;

    let parse_error = |e: String| Error::ConfigParseError { path: path.display().to_string(), e };
    let config: SiteConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };
    config.validate()?;

    Ok(config)
}

/// Loads the site configuration.
///
/// # Arguments
/// * `base_dir` - Directory searched for [`CONFIG_FILES`]
/// * `explicit` - Config file given on the command line, which must exist
///
/// # Returns
/// * `Result<SiteConfig>` - The parsed configuration, or defaults if none exists
pub fn get_config<P: AsRef<Path>>(base_dir: P, explicit: Option<&Path>) -> Result<SiteConfig> {
    if let Some(path) = explicit {
        let path = base_dir.as_ref().join(path);
        if !path.is_file() {
            return Err(Error::ConfigError(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }
        return load_config(path);
    }

    match find_config(&base_dir) {
        Some(path) => load_config(path),
        None => {
            debug!("No config file found (tried: {})", CONFIG_FILES.join(", "));
            Ok(SiteConfig::default())
        }
    }
}
