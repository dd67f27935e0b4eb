//! Application configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! addr          = "0.0.0.0:3000"
//! static_prefix = "/assets"
//! static_dir    = "public"
//! templates_dir = "views"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Socket address the server binds to.
    pub addr: String,
    /// URL prefix reserved for static files. Requests under it bypass routing.
    pub static_prefix: String,
    /// Directory static files are read from.
    pub static_dir: PathBuf,
    /// Directory templates are loaded from.
    pub templates_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_owned(),
            static_prefix: "/static".to_owned(),
            static_dir: PathBuf::from("static"),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the values serde cannot: the static prefix must start with `/`
    /// and name at least one segment, or it would either shadow every route
    /// or never match.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason| Error::InvalidStaticPrefix { prefix: self.static_prefix.clone(), reason };

        if !self.static_prefix.starts_with('/') {
            return Err(invalid("must start with `/`"));
        }
        if self.static_prefix.trim_matches('/').is_empty() {
            return Err(invalid("must name at least one path segment"));
        }
        Ok(())
    }
}
