// src/rows/header.rs
use tracing::debug;

use super::RawRow;
use crate::{config::RenderContext, error::Result};

/// Field names applied, by position, to every data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSpec {
    names: Vec<String>,
}

impl HeaderSpec {
    pub fn new(names: Vec<String>) -> Self {
        HeaderSpec { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Where the header comes from, highest precedence first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSource {
    /// The first row left after skipping is the header and is not data.
    FirstRow,
    /// Names supplied by configuration; no row is consumed.
    Names(Vec<String>),
    /// No header at all; every column is auto-named.
    Generated,
}

impl HeaderSource {
    pub fn from_context(ctx: &RenderContext) -> Self {
        if ctx.use_header() {
            if !ctx.names().is_empty() {
                debug!("header row requested, configured names are ignored");
            }
            HeaderSource::FirstRow
        } else if !ctx.names().is_empty() {
            HeaderSource::Names(ctx.names().to_vec())
        } else {
            HeaderSource::Generated
        }
    }

    /// Produce the header, pulling at most one row from `rows`.
    ///
    /// An exhausted stream with [`HeaderSource::FirstRow`] gives an empty
    /// header rather than an error.
    pub fn resolve<I>(self, rows: &mut I) -> Result<HeaderSpec>
    where
        I: Iterator<Item = Result<RawRow>>,
    {
        match self {
            HeaderSource::FirstRow => match rows.next() {
                Some(row) => {
                    let header = HeaderSpec::new(row?);
                    debug!(columns = header.len(), "header taken from first row");
                    Ok(header)
                }
                None => {
                    debug!("header requested but no rows remain");
                    Ok(HeaderSpec::default())
                }
            },
            HeaderSource::Names(names) => Ok(HeaderSpec::new(names)),
            HeaderSource::Generated => Ok(HeaderSpec::default()),
        }
    }
}
