// src/error.rs
use thiserror::Error;

/// Every way a single render invocation can fail. All variants are fatal to
/// the invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source could not be opened, decoded or tokenized.
    #[error("cannot read source `{origin}`: {reason}")]
    SourceRead { origin: String, reason: String },

    /// Malformed or contradictory configuration, caught before rendering.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Template load/parse failure or an undefined binding during render.
    /// minijinja's message already carries the template name and line.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The output target could not be opened, encoded into or written.
    #[error("cannot write output `{target}`: {source}")]
    OutputWrite {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn source_read(origin: impl Into<String>, reason: impl ToString) -> Self {
        RenderError::SourceRead {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        RenderError::Configuration(message.into())
    }
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
