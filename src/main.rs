use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};

use domenec::{api, decode_with, encode_json, DecodeOptions, Value, DEFAULT_MAX_DEPTH};

/// Inspect and produce bencoded files.
#[derive(Parser)]
#[command(name = "domenec", version)]
struct Cli {
    /// Reject zero padded integers and repeated dictionary keys
    #[arg(long, global = true)]
    strict: bool,

    /// Deepest container nesting accepted while decoding
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pretty print a bencoded file
    Show { file: PathBuf },
    /// Print the JSON projection of a bencoded file
    Json {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Bencode a JSON document
    Encode { input: PathBuf, output: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = if cli.strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    }
    .with_max_depth(cli.max_depth);

    match cli.command {
        Command::Show { file } => {
            let value = read_value(&file, options)?;
            println!("{}", api::show(&value)?);
        }
        Command::Json { file, pretty } => {
            let json = read_value(&file, options)?.to_json();
            let out = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            };
            println!("{}", out);
        }
        Command::Encode { input, output } => {
            let data = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let json: serde_json::Value = serde_json::from_slice(&data)
                .with_context(|| format!("{} is not valid JSON", input.display()))?;
            let encoded = encode_json(&json)
                .with_context(|| format!("{} cannot be bencoded", input.display()))?;
            fs::write(&output, &encoded).with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {} bytes to {}", encoded.len(), output.display());
        }
    }
    Ok(())
}

fn read_value(file: &Path, options: DecodeOptions) -> Result<Value> {
    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let (value, consumed) = decode_with(&data, 0, options)
        .with_context(|| format!("{} is not valid bencode", file.display()))?;
    if consumed < data.len() {
        warn!("ignoring {} trailing bytes in {}", data.len() - consumed, file.display());
    }
    Ok(value)
}
