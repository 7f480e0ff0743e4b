// src/config/mod.rs
pub mod context;
pub mod layer;

pub use context::{RenderContext, DEFAULT_HEADER_PREFIX};
pub use layer::ConfigLayer;

use crate::error::Result;

/// A configuration key that a command may accept from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    UseHeader,
    Delimiter,
    SkipLines,
    Names,
    HeaderPrefix,
    Encoding,
    OutputEncoding,
    Parameters,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 8] = [
        ConfigKey::UseHeader,
        ConfigKey::Delimiter,
        ConfigKey::SkipLines,
        ConfigKey::Names,
        ConfigKey::HeaderPrefix,
        ConfigKey::Encoding,
        ConfigKey::OutputEncoding,
        ConfigKey::Parameters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::UseHeader => "use_header",
            ConfigKey::Delimiter => "delimiter",
            ConfigKey::SkipLines => "skip_lines",
            ConfigKey::Names => "names",
            ConfigKey::HeaderPrefix => "header_prefix",
            ConfigKey::Encoding => "encoding",
            ConfigKey::OutputEncoding => "output_encoding",
            ConfigKey::Parameters => "parameters",
        }
    }
}

/// Which pathway a render takes. Each kind declares the keys it lets the
/// config file supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Csv,
    Json,
}

const CSV_KEYS: &[ConfigKey] = &[
    ConfigKey::UseHeader,
    ConfigKey::Delimiter,
    ConfigKey::SkipLines,
    ConfigKey::Names,
    ConfigKey::HeaderPrefix,
    ConfigKey::Encoding,
    ConfigKey::OutputEncoding,
    ConfigKey::Parameters,
];

const JSON_KEYS: &[ConfigKey] = &[ConfigKey::OutputEncoding, ConfigKey::Parameters];

impl RenderKind {
    pub fn merge_keys(self) -> &'static [ConfigKey] {
        match self {
            RenderKind::Csv => CSV_KEYS,
            RenderKind::Json => JSON_KEYS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RenderKind::Csv => "csv",
            RenderKind::Json => "json",
        }
    }
}

/// Build the context for one render: defaults, then the file (restricted to
/// the kind's mergeable keys), then the command line.
pub fn merge(
    kind: RenderKind,
    file: Option<ConfigLayer>,
    cli: ConfigLayer,
) -> Result<RenderContext> {
    let base = file
        .map(|layer| layer.retain_keys(kind.merge_keys()))
        .unwrap_or_default();
    RenderContext::from_layer(&base.overlay(cli))
}
