// src/cli.rs
//! Command-line surface: `rowplate csv ...` and `rowplate json ...`.

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;

use crate::{
    config::{merge, ConfigLayer, RenderContext, RenderKind},
    error::{RenderError, Result},
    output::OutputTarget,
    source::Source,
};

#[derive(Debug, Parser)]
#[command(name = "rowplate")]
#[command(about = "Render CSV or JSON data through a Jinja-style template")]
#[command(version)]
pub struct Cli {
    /// Debug logging for this tool (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render CSV rows, bound to the template as `rows`
    Csv(CsvArgs),
    /// Render a JSON document, bound to the template as `data`
    Json(CommonArgs),
}

/// Arguments every render kind accepts.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Template file
    pub template: PathBuf,

    /// Source file, `-` for standard input
    #[arg(default_value = "-")]
    pub source: String,

    /// Output file (standard output when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'c', long = "conf")]
    pub conf: Option<PathBuf>,

    /// Template parameters as key=value
    #[arg(short = 'p', long = "parameters", num_args = 1.., value_name = "KEY=VALUE")]
    pub parameters: Vec<String>,

    /// Encoding of the output file
    #[arg(long)]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CsvArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// First row (after skipping) is the header
    #[arg(short = 'H', long = "header", overrides_with = "no_header")]
    pub header: bool,

    /// First row is data, even if the config file says otherwise
    #[arg(long = "no-header", overrides_with = "header")]
    pub no_header: bool,

    /// Column delimiter (`\t` or `tab` for tab)
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Number of leading lines to skip
    #[arg(short, long, allow_negative_numbers = true)]
    pub skip_lines: Option<i64>,

    /// Column names, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,

    /// Prefix for generated column names
    #[arg(long)]
    pub header_prefix: Option<String>,

    /// Encoding of the source
    #[arg(short, long)]
    pub encoding: Option<String>,
}

impl CommonArgs {
    fn to_layer(&self) -> Result<ConfigLayer> {
        Ok(ConfigLayer {
            output_encoding: self.output_encoding.clone(),
            parameters: parse_parameters(&self.parameters)?,
            ..Default::default()
        })
    }
}

impl CsvArgs {
    fn to_layer(&self) -> Result<ConfigLayer> {
        let use_header = match (self.header, self.no_header) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Ok(ConfigLayer {
            use_header,
            delimiter: self.delimiter.clone(),
            skip_lines: self.skip_lines,
            names: self.names.clone(),
            header_prefix: self.header_prefix.clone(),
            encoding: self.encoding.clone(),
            ..self.common.to_layer()?
        })
    }
}

/// Everything `main` needs to run one render.
#[derive(Debug)]
pub struct Invocation {
    pub kind: RenderKind,
    pub context: RenderContext,
    pub template: PathBuf,
    pub source: Source,
    pub target: OutputTarget,
}

impl Command {
    fn common(&self) -> &CommonArgs {
        match self {
            Command::Csv(args) => &args.common,
            Command::Json(args) => args,
        }
    }

    /// Load the config file, merge it under the command line, validate.
    pub fn into_invocation(self) -> Result<Invocation> {
        let (kind, cli_layer) = match &self {
            Command::Csv(args) => (RenderKind::Csv, args.to_layer()?),
            Command::Json(args) => (RenderKind::Json, args.to_layer()?),
        };
        let common = self.common();
        let file_layer = common
            .conf
            .as_deref()
            .map(ConfigLayer::load)
            .transpose()?;
        let context = merge(kind, file_layer, cli_layer)?;

        Ok(Invocation {
            kind,
            context,
            template: common.template.clone(),
            source: Source::from_arg(&common.source),
            target: OutputTarget::from_option(common.out.clone()),
        })
    }
}

/// `key=value` pairs into a parameter map; values are plain strings.
fn parse_parameters(pairs: &[String]) -> Result<Option<Map<String, JsonValue>>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut map = Map::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                map.insert(key.trim().to_string(), JsonValue::String(value.to_string()));
            }
            _ => {
                return Err(RenderError::config(format!(
                    "parameter must look like key=value (got `{}`)",
                    pair
                )))
            }
        }
    }
    Ok(Some(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Result<Cli> {
        Ok(Cli::try_parse_from(args)?)
    }

    #[test]
    fn csv_flags_reach_the_context() -> Result<()> {
        let cli = parse(&[
            "rowplate", "csv", "t.tmpl", "in.csv", "-H", "-d", ";", "-s", "3", "-n", "a,b,c",
            "--header-prefix", "c", "-e", "sjis", "-o", "out.txt", "-p", "x=1", "y=2",
        ])?;
        let inv = cli.command.into_invocation()?;
        assert_eq!(inv.kind, RenderKind::Csv);
        assert!(inv.context.use_header());
        assert_eq!(inv.context.delimiter(), ';');
        assert_eq!(inv.context.skip_lines(), 3);
        assert_eq!(inv.context.names(), ["a", "b", "c"]);
        assert_eq!(inv.context.header_prefix(), "c");
        assert_eq!(inv.context.encoding(), encoding_rs::SHIFT_JIS);
        assert_eq!(inv.context.parameters()["y"], json!("2"));
        assert_eq!(inv.source, Source::Path(PathBuf::from("in.csv")));
        assert_eq!(inv.target, OutputTarget::File(PathBuf::from("out.txt")));
        Ok(())
    }

    #[test]
    fn source_defaults_to_stdin() -> Result<()> {
        let inv = parse(&["rowplate", "json", "t.tmpl"])?.command.into_invocation()?;
        assert_eq!(inv.kind, RenderKind::Json);
        assert_eq!(inv.source, Source::Stdin);
        assert_eq!(inv.target, OutputTarget::Stdout);
        Ok(())
    }

    #[test]
    fn config_file_fills_gaps_and_cli_wins() -> Result<()> {
        let dir = tempdir()?;
        let conf = dir.path().join("conf.yml");
        fs::write(
            &conf,
            "use_header: true\nskip_lines: 2\ndelimiter: \"|\"\nparameters:\n  x: file\n  z: file\n",
        )?;
        let conf_arg = conf.to_string_lossy().to_string();
        let inv = parse(&[
            "rowplate", "csv", "t.tmpl", "-c", &conf_arg, "--no-header", "-s", "0", "-p", "x=cli",
        ])?
        .command
        .into_invocation()?;
        assert!(!inv.context.use_header());
        assert_eq!(inv.context.skip_lines(), 0);
        assert_eq!(inv.context.delimiter(), '|');
        assert_eq!(inv.context.parameters()["x"], json!("cli"));
        assert_eq!(inv.context.parameters()["z"], json!("file"));
        Ok(())
    }

    #[test]
    fn negative_skip_is_a_configuration_error() -> Result<()> {
        let cli = parse(&["rowplate", "csv", "t.tmpl", "-s", "-2"])?;
        assert!(matches!(
            cli.command.into_invocation(),
            Err(RenderError::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    fn malformed_parameter_is_a_configuration_error() -> Result<()> {
        let cli = parse(&["rowplate", "json", "t.tmpl", "-p", "novalue"])?;
        assert!(matches!(
            cli.command.into_invocation(),
            Err(RenderError::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    fn parameter_values_may_contain_equals() -> Result<()> {
        let params = parse_parameters(&["expr=a=b".to_string()])?.unwrap_or_default();
        assert_eq!(params["expr"], json!("a=b"));
        Ok(())
    }
}
