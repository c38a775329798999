use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use supplygraph_core::runtime::ingest_path;
use supplygraph_core::{transform, HeaderPolicy, IngestConfig, ScopeId};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turns supply-chain tables into graph and demand artifacts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform a table and write nodes, edges, demand and summary files
    Convert(ConvertArgs),
    /// Transform a table and print its summary without writing anything
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input CSV file
    input: PathBuf,
    /// Tenant the artifacts belong to
    #[arg(long)]
    scope: String,
    /// Directory that receives `<scope>/` (defaults to SUPPLYGRAPH_OUTPUT_ROOT or `uploads`)
    #[arg(long)]
    output_root: Option<PathBuf>,
    #[command(flatten)]
    table: TableArgs,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Input CSV file
    input: PathBuf,
    #[arg(long, default_value = "preview")]
    scope: String,
    #[command(flatten)]
    table: TableArgs,
}

#[derive(Args, Debug, Default)]
struct TableArgs {
    /// Single-byte field delimiter
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,
    /// Write every record's fields instead of only the first record's
    #[arg(long)]
    union_headers: bool,
}

fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    let value = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got '{value}'")),
    }
}

fn resolve_config(table: &TableArgs, output_root: Option<PathBuf>) -> Result<IngestConfig> {
    let mut config = IngestConfig::from_env().map_err(|err| anyhow!(err))?;
    if let Some(root) = output_root {
        config = config.with_output_root(root);
    }
    if let Some(delimiter) = table.delimiter {
        config = config.with_delimiter(delimiter);
    }
    if table.union_headers {
        config = config.with_header_policy(HeaderPolicy::Union);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => {
            let scope = ScopeId::new(args.scope.as_str())?;
            let config = resolve_config(&args.table, args.output_root)?;
            let result = ingest_path(args.input.clone(), scope, config)
                .await
                .with_context(|| format!("failed to convert {}", args.input.display()))?;

            info!(
                nodes = result.summary.node_count,
                edges = result.summary.edge_count,
                demand = result.summary.demand_records,
                "conversion complete"
            );
            let report = json!({
                "scope_id": result.summary.scope_id,
                "artifacts": result.artifacts,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Inspect(args) => {
            let scope = ScopeId::new(args.scope.as_str())?;
            let config = resolve_config(&args.table, None)?;
            let file = File::open(&args.input)
                .with_context(|| format!("failed to open {}", args.input.display()))?;
            let transformed = transform(file, &scope, &config)
                .with_context(|| format!("failed to inspect {}", args.input.display()))?;

            println!("{}", serde_json::to_string_pretty(&transformed.summary)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "supplygraph",
            "convert",
            "raw.csv",
            "--scope",
            "acme",
            "--output-root",
            "out",
            "--delimiter",
            ";",
            "--union-headers",
        ])
        .expect("parse");

        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, PathBuf::from("raw.csv"));
        assert_eq!(args.scope, "acme");
        assert_eq!(args.output_root, Some(PathBuf::from("out")));
        assert_eq!(args.table.delimiter, Some(b';'));
        assert!(args.table.union_headers);
    }

    #[test]
    fn convert_requires_scope() {
        assert!(Cli::try_parse_from(["supplygraph", "convert", "raw.csv"]).is_err());
    }

    #[test]
    fn inspect_defaults_scope() {
        let cli = Cli::try_parse_from(["supplygraph", "inspect", "raw.csv"]).expect("parse");
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.scope, "preview");
        assert_eq!(args.table.delimiter, None);
    }

    #[test]
    fn delimiter_accepts_tab_alias() {
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn flags_override_config() {
        let table = TableArgs {
            delimiter: Some(b'|'),
            union_headers: true,
        };
        let config = resolve_config(&table, Some(PathBuf::from("elsewhere"))).expect("config");

        assert_eq!(config.output_root, PathBuf::from("elsewhere"));
        assert_eq!(config.delimiter, b'|');
        assert_eq!(config.header_policy, HeaderPolicy::Union);
    }
}
