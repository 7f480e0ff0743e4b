// src/config/layer.rs
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::debug;

use super::ConfigKey;
use crate::error::{RenderError, Result};

/// One source of configuration (a config file or the command line).
///
/// Every key is optional: `None` means "this layer has nothing to say", so a
/// lower layer (or the built-in default) shows through.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    #[serde(alias = "read_header")]
    pub use_header: Option<bool>,
    pub delimiter: Option<String>,
    /// Signed so that a negative count is reported instead of failing to parse.
    pub skip_lines: Option<i64>,
    pub names: Option<Vec<String>>,
    pub header_prefix: Option<String>,
    pub encoding: Option<String>,
    pub output_encoding: Option<String>,
    pub parameters: Option<Map<String, JsonValue>>,
    /// Keys this tool does not understand; logged and dropped.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl ConfigLayer {
    /// Parse a YAML (or JSON) configuration document.
    pub fn from_yaml_str(text: &str, origin: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| {
            RenderError::config(format!("cannot parse config file `{}`: {}", origin, e))
        })
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            RenderError::config(format!(
                "cannot read config file `{}`: {}",
                path.display(),
                e
            ))
        })?;
        let layer = Self::from_yaml_str(&text, &path.display().to_string())?;
        debug!(path = %path.display(), "loaded config file");
        Ok(layer)
    }

    /// Whether this layer sets `key`.
    pub fn has(&self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::UseHeader => self.use_header.is_some(),
            ConfigKey::Delimiter => self.delimiter.is_some(),
            ConfigKey::SkipLines => self.skip_lines.is_some(),
            ConfigKey::Names => self.names.is_some(),
            ConfigKey::HeaderPrefix => self.header_prefix.is_some(),
            ConfigKey::Encoding => self.encoding.is_some(),
            ConfigKey::OutputEncoding => self.output_encoding.is_some(),
            ConfigKey::Parameters => self.parameters.is_some(),
        }
    }

    fn clear(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::UseHeader => self.use_header = None,
            ConfigKey::Delimiter => self.delimiter = None,
            ConfigKey::SkipLines => self.skip_lines = None,
            ConfigKey::Names => self.names = None,
            ConfigKey::HeaderPrefix => self.header_prefix = None,
            ConfigKey::Encoding => self.encoding = None,
            ConfigKey::OutputEncoding => self.output_encoding = None,
            ConfigKey::Parameters => self.parameters = None,
        }
    }

    /// Drop every key that is not in `allowed`, plus all unknown keys.
    pub fn retain_keys(mut self, allowed: &[ConfigKey]) -> Self {
        for key in ConfigKey::ALL {
            if !allowed.contains(&key) && self.has(key) {
                debug!(key = key.as_str(), "config key not mergeable here, ignored");
                self.clear(key);
            }
        }
        for name in std::mem::take(&mut self.unknown).keys() {
            debug!(key = %name, "unknown config key ignored");
        }
        self
    }

    /// Lay `upper` over `self`: every key `upper` sets replaces ours.
    /// `parameters` are combined entry by entry, `upper` winning per name.
    pub fn overlay(self, upper: ConfigLayer) -> ConfigLayer {
        let parameters = match (self.parameters, upper.parameters) {
            (Some(mut lower), Some(upper)) => {
                lower.extend(upper);
                Some(lower)
            }
            (lower, upper) => upper.or(lower),
        };

        let mut unknown = self.unknown;
        unknown.extend(upper.unknown);

        ConfigLayer {
            use_header: upper.use_header.or(self.use_header),
            delimiter: upper.delimiter.or(self.delimiter),
            skip_lines: upper.skip_lines.or(self.skip_lines),
            names: upper.names.or(self.names),
            header_prefix: upper.header_prefix.or(self.header_prefix),
            encoding: upper.encoding.or(self.encoding),
            output_encoding: upper.output_encoding.or(self.output_encoding),
            parameters,
            unknown,
        }
    }
}
