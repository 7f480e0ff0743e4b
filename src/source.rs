// src/source.rs
use encoding_rs::Encoding;
use std::{
    fmt,
    fs::File,
    io::{self, Read},
    path::PathBuf,
};
use tracing::debug;

use crate::error::{RenderError, Result};

/// Where input bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// `-` means standard input, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    pub fn origin(&self) -> String {
        self.to_string()
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            Source::Stdin => io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| RenderError::source_read(self.origin(), e))?,
            Source::Path(path) => File::open(path)
                .and_then(|mut f| f.read_to_end(&mut buf))
                .map_err(|e| RenderError::source_read(self.origin(), e))?,
        };
        debug!(source = %self, bytes = buf.len(), "source read");
        Ok(buf)
    }

    /// Read everything and decode it with `encoding`.
    pub fn read_text(&self, encoding: &'static Encoding) -> Result<String> {
        let bytes = self.read_bytes()?;
        decode(&bytes, encoding, &self.origin())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Strict decode: a BOM matching `encoding` is dropped, any malformed
/// sequence is an error rather than a replacement character.
pub fn decode(bytes: &[u8], encoding: &'static Encoding, origin: &str) -> Result<String> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            RenderError::source_read(origin, format!("input is not valid {}", encoding.name()))
        })
}
