// src/config/context.rs
use encoding_rs::Encoding;
use serde_json::{Map, Value as JsonValue};

use super::ConfigLayer;
use crate::error::{RenderError, Result};

pub const DEFAULT_HEADER_PREFIX: &str = "col_";
pub const DEFAULT_DELIMITER: u8 = b',';

/// Validated, read-only settings for one render pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    use_header: bool,
    delimiter: u8,
    skip_lines: usize,
    names: Vec<String>,
    header_prefix: String,
    encoding: &'static Encoding,
    output_encoding: &'static Encoding,
    parameters: Map<String, JsonValue>,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            use_header: false,
            delimiter: DEFAULT_DELIMITER,
            skip_lines: 0,
            names: Vec::new(),
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            encoding: encoding_rs::UTF_8,
            output_encoding: encoding_rs::UTF_8,
            parameters: Map::new(),
        }
    }
}

impl RenderContext {
    /// Validate a fully merged layer. Unset keys take the defaults.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let defaults = RenderContext::default();

        let skip_lines = match layer.skip_lines {
            Some(n) if n < 0 => {
                return Err(RenderError::config(format!(
                    "skip_lines must not be negative (got {})",
                    n
                )))
            }
            Some(n) => usize::try_from(n)
                .map_err(|_| RenderError::config(format!("skip_lines too large: {}", n)))?,
            None => defaults.skip_lines,
        };

        let delimiter = match layer.delimiter.as_deref() {
            Some(raw) => parse_delimiter(raw)?,
            None => defaults.delimiter,
        };

        let encoding = match layer.encoding.as_deref() {
            Some(label) => lookup_encoding(label)?,
            None => defaults.encoding,
        };
        let output_encoding = match layer.output_encoding.as_deref() {
            Some(label) => lookup_encoding(label)?,
            None => defaults.output_encoding,
        };

        Ok(RenderContext {
            use_header: layer.use_header.unwrap_or(defaults.use_header),
            delimiter,
            skip_lines,
            names: layer.names.clone().unwrap_or(defaults.names),
            header_prefix: layer
                .header_prefix
                .clone()
                .unwrap_or(defaults.header_prefix),
            encoding,
            output_encoding,
            parameters: layer.parameters.clone().unwrap_or(defaults.parameters),
        })
    }

    pub fn use_header(&self) -> bool {
        self.use_header
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    /// The delimiter as the single byte the CSV tokenizer expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
    }

    pub fn skip_lines(&self) -> usize {
        self.skip_lines
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn output_encoding(&self) -> &'static Encoding {
        self.output_encoding
    }

    pub fn parameters(&self) -> &Map<String, JsonValue> {
        &self.parameters
    }
}

/// Accepts one ASCII character, or `\t` / `tab` for a tab.
fn parse_delimiter(raw: &str) -> Result<u8> {
    if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok(b'\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => Ok(c as u8),
        _ => Err(RenderError::config(format!(
            "delimiter must be a single ASCII character other than a quote or newline (got {:?})",
            raw
        ))),
    }
}

fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| RenderError::config(format!("unknown encoding `{}`", label)))
}
