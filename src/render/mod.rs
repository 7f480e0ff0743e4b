// src/render/mod.rs
pub mod filters;
pub mod template;

pub use template::TemplateEngine;

use minijinja::{context, Value};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::{
    config::{RenderContext, RenderKind},
    error::{RenderError, Result},
    output::OutputTarget,
    rows::{tokenize, RecordStream},
    source::Source,
};

/// One render invocation: a kind, its merged context and a loaded template.
pub struct Renderer {
    kind: RenderKind,
    context: RenderContext,
    template: TemplateEngine,
}

impl Renderer {
    pub fn new(kind: RenderKind, context: RenderContext, template: TemplateEngine) -> Self {
        Renderer {
            kind,
            context,
            template,
        }
    }

    /// Render already-decoded source text.
    pub fn render_text(&self, text: &str, origin: &str) -> Result<String> {
        let bindings = match self.kind {
            RenderKind::Csv => csv_bindings(text, &self.context, origin)?,
            RenderKind::Json => json_bindings(text, &self.context, origin)?,
        };
        self.template.render(bindings)
    }

    /// Read and decode `source`, then render it. Nothing is written.
    pub fn render(&self, source: &Source) -> Result<String> {
        let text = source.read_text(self.context.encoding())?;
        self.render_text(&text, &source.origin())
    }

    /// Full pass: render completely in memory, then write once.
    #[instrument(level = "info", skip_all, fields(kind = self.kind.as_str(), template = self.template.name(), source = %source, out = %target))]
    pub fn run(&self, source: &Source, target: &OutputTarget) -> Result<()> {
        let start = Instant::now();
        let text = self.render(source)?;
        target.write(&text, self.context.output_encoding())?;
        info!(bytes = text.len(), elapsed = ?start.elapsed(), "render complete");
        Ok(())
    }
}

/// `{rows, parameters}` for the CSV pathway.
pub fn csv_bindings(text: &str, ctx: &RenderContext, origin: &str) -> Result<Value> {
    let rows = tokenize(text, ctx.delimiter_byte(), origin);
    let stream = RecordStream::build(rows, ctx)?;
    debug!(records = stream.len(), "csv source shaped");
    Ok(context! {
        rows => stream,
        parameters => ctx.parameters(),
    })
}

/// `{data, parameters}` for the JSON pathway: the whole document is `data`.
pub fn json_bindings(text: &str, ctx: &RenderContext, origin: &str) -> Result<Value> {
    let data: JsonValue = serde_json::from_str(text)
        .map_err(|e| RenderError::source_read(origin, format!("invalid JSON: {}", e)))?;
    Ok(context! {
        data => data,
        parameters => ctx.parameters(),
    })
}
