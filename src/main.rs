use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use txoutd::config::{DecoderConfig, InputFormat, DEFAULT_CONFIG_FILE};
use txoutd::utils::io::{parse_input, read_source};
use txoutd::{decode_varint, DecodedTxOut, TxOutStream};

#[derive(Parser)]
#[command(name = "txoutd")]
#[command(about = "Decode serialized transaction outputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    config: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Decode back-to-back transaction outputs from a file or stdin
    Decode {
        #[arg(long, help = "Input file (reads stdin if omitted)")]
        input: Option<PathBuf>,

        #[arg(long, value_enum, help = "Input encoding (overrides config)")]
        format: Option<InputFormat>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Decode a single CompactSize varint given as hex
    Varint {
        hex: String,
    },
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = DecoderConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Decode { input, format, json } => {
            let format = format.unwrap_or(config.input_format);
            let json = json || config.json_output;
            let raw = read_source(input.as_deref()).await?;
            let bytes = parse_input(&raw, format)?;
            decode(&bytes, json, config.stop_on_error)
        }
        Commands::Varint { hex } => {
            let bytes = parse_input(hex.as_bytes(), InputFormat::Hex)?;
            let (value, width) = decode_varint(&bytes).context("invalid varint")?;
            println!("{} ({} bytes)", value, width);
            Ok(())
        }
        Commands::GenerateConfig { output } => {
            DecoderConfig::default().save(&output)?;
            println!("Config written to {}", output);
            Ok(())
        }
    }
}

fn decode(bytes: &[u8], json: bool, stop_on_error: bool) -> anyhow::Result<()> {
    let mut stream = TxOutStream::new(bytes);
    let mut records: Vec<DecodedTxOut> = Vec::new();
    let mut failure = None;

    for item in stream.by_ref() {
        match item {
            Ok(decoded) => records.push(decoded),
            Err(e) => failure = Some(e),
        }
    }
    info!("Decoded {} records from {} bytes", records.len(), bytes.len());

    if json {
        let mut report = serde_json::json!({ "records": records });
        if let Some(e) = &failure {
            report["error"] = serde_json::json!({
                "offset": stream.position(),
                "field": e.field(),
                "message": e.to_string(),
            });
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (index, decoded) in records.iter().enumerate() {
            println!(
                "#{:<4} offset={:<8} size={:<6} amount={} script_length={} script={}",
                index,
                decoded.offset,
                decoded.consumed,
                decoded.tx_out.amount,
                decoded.tx_out.script_length(),
                hex::encode(&decoded.tx_out.script),
            );
        }
    }

    match failure {
        Some(e) => {
            error!("Decoding stopped at offset {}: {}", stream.position(), e);
            if stop_on_error {
                return Err(e).with_context(|| format!("malformed record at offset {}", stream.position()));
            }
            Ok(())
        }
        None => Ok(()),
    }
}
