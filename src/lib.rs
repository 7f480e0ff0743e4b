//! Render tabular (CSV) or structured (JSON) data through a minijinja
//! template.
//!
//! The CSV pathway shapes every row into a named [`rows::Record`] before the
//! template sees it: leading rows are skipped, a header is resolved once
//! (from the first surviving row, from configured names, or not at all) and
//! columns past the header are auto-named `col_NN` by position.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod rows;
pub mod source;

pub use config::{RenderContext, RenderKind};
pub use error::{RenderError, Result};
pub use render::{Renderer, TemplateEngine};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rowplate=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
