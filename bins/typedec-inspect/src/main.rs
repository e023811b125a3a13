mod error;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use codec_cql::{CqlCodec, CqlCollectionDecoder};
use typedec_api::{Payload, SchemaBinder, TypeDescriptor};
use typedec_engine::{EngineConfig, Registry};

use error::InspectError;

#[derive(Parser)]
#[command(name = "typedec-inspect", about = "Decode a column payload and print its schema and value")]
struct Cli {
    /// Type descriptor, e.g. `map<text, frozen<list<int>>>`.
    #[arg(long = "type")]
    ty: String,

    /// Whole value as one base64 buffer.
    #[arg(long, conflicts_with = "cells")]
    flat: Option<String>,

    /// One base64 fragment of a multi-cell value; repeat in storage order.
    #[arg(long = "cell")]
    cells: Vec<String>,

    /// Path to TOML configuration file.
    #[arg(long, env = "TYPEDEC_CONFIG")]
    config: Option<String>,

    /// Print only the schema.
    #[arg(long)]
    schema_only: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, ty = %cli.ty, "inspection failed");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, InspectError> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!(config = %path, "loading configuration");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    let registry = Registry::from_config(
        &config,
        Arc::new(CqlCodec),
        Arc::new(CqlCollectionDecoder::new()),
        Arc::new(SchemaBinder),
    )?;

    let ty: TypeDescriptor = cli.ty.parse()?;
    let schema = registry.schema_for(&ty)?;
    let mut output = serde_json::json!({ "schema": schema });

    if !cli.schema_only {
        let value = match &cli.flat {
            Some(flat) => {
                let bytes = decode_base64("--flat", flat)?;
                registry.decode_payload(&ty, Payload::Flat(&bytes))?
            }
            None => {
                let cells = cli
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| decode_base64(&format!("--cell #{}", i + 1), cell))
                    .collect::<Result<Vec<_>, _>>()?;
                let cells: Vec<&[u8]> = cells.iter().map(Vec::as_slice).collect();
                registry.decode_payload(&ty, Payload::Cells(&cells))?
            }
        };
        output["value"] = typedec_api::json::to_json(&value);
    }

    Ok(serde_json::to_string_pretty(&output)?)
}

fn decode_base64(context: &str, text: &str) -> Result<Vec<u8>, InspectError> {
    STANDARD.decode(text.trim()).map_err(|e| InspectError::Payload {
        context: context.to_string(),
        detail: e.to_string(),
    })
}
