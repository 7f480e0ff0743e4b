// src/output.rs
use encoding_rs::Encoding;
use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::{self, Write},
    path::PathBuf,
};
use tracing::debug;

use crate::error::{RenderError, Result};

/// Where rendered text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if p.as_os_str() != "-" => OutputTarget::File(p),
            _ => OutputTarget::Stdout,
        }
    }

    /// Write `text` in one go. A file target is opened only here and is
    /// closed when this returns, on success or failure. Standard output
    /// always receives UTF-8.
    pub fn write(&self, text: &str, encoding: &'static Encoding) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|_| out.flush())
                    .map_err(|e| self.write_error(e))
            }
            OutputTarget::File(path) => {
                let bytes = encode(text, encoding).map_err(|e| self.write_error(e))?;
                let mut file = File::create(path).map_err(|e| self.write_error(e))?;
                file.write_all(&bytes)
                    .and_then(|_| file.flush())
                    .map_err(|e| self.write_error(e))?;
                debug!(path = %path.display(), bytes = bytes.len(), "output written");
                Ok(())
            }
        }
    }

    fn write_error(&self, source: io::Error) -> RenderError {
        RenderError::OutputWrite {
            target: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => f.write_str("<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Characters the target encoding cannot represent are an error, not `&#NNNN;`.
/// UTF-16 has no encoder in `encoding_rs`, so it is laid out here without a BOM.
fn encode<'a>(text: &'a str, encoding: &'static Encoding) -> io::Result<Cow<'a, [u8]>> {
    if encoding == encoding_rs::UTF_16LE {
        return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()));
    }
    if encoding == encoding_rs::UTF_16BE {
        return Ok(Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()));
    }
    if encoding.output_encoding() != encoding {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} cannot be used as an output encoding", encoding.name()),
        ));
    }

    let (bytes, _, unmappable) = encoding.encode(text);
    if unmappable {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("rendered text cannot be encoded as {}", encoding.name()),
        ));
    }
    Ok(bytes)
}
