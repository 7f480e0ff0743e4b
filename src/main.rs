use anyhow::{Context, Result};
use clap::Parser;
use rowplate::{cli::Cli, Renderer, TemplateEngine};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ─── 1) init logging (stderr, so rendered stdout stays clean) ─────
    let default_filter = if cli.verbose {
        "warn,rowplate=debug"
    } else {
        "warn"
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rowplate: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // ─── 2) merge config file + flags into one context ───────────────
    let invocation = cli
        .command
        .into_invocation()
        .context("building render context")?;
    debug!(?invocation, "invocation resolved");

    // ─── 3) load template ────────────────────────────────────────────
    let template = TemplateEngine::from_path(&invocation.template)
        .with_context(|| format!("loading template {}", invocation.template.display()))?;

    // ─── 4) render fully, then write once ────────────────────────────
    let renderer = Renderer::new(invocation.kind, invocation.context, template);
    renderer
        .run(&invocation.source, &invocation.target)
        .with_context(|| format!("rendering {}", invocation.source))?;
    Ok(())
}
