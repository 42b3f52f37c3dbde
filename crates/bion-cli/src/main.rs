//! `bion` CLI — encode, decode, and analyze BION files from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to BION (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | bion encode -o data.bion
//!
//! # Encode from file to file
//! bion encode -i data.json -o data.bion
//!
//! # Decode BION back to pretty-printed JSON
//! bion decode -i data.bion
//!
//! # Show size statistics
//! bion stats -i data.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(name = "bion", version, about = "BION binary tree format CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to BION format
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes raw bytes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode BION back to JSON format
    Decode {
        /// Input BION file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show encoding statistics (byte counts, size reduction)
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output } => {
            let json = read_input_text(input.as_deref())?;
            let tree = bion_core::json::from_json(&json).context("Failed to parse JSON input")?;
            let bytes = bion_core::encode(&tree).context("Failed to encode tree to BION")?;
            write_output_bytes(output.as_deref(), &bytes)?;
        }
        Commands::Decode { input, output } => {
            let bytes = read_input_bytes(input.as_deref())?;
            let tree = bion_core::decode(&bytes).context("Failed to decode BION input")?;
            let json = bion_core::json::to_json(&tree).context("Failed to render JSON")?;
            // Pretty-print the JSON output
            let value: serde_json::Value = serde_json::from_str(&json)?;
            let pretty = serde_json::to_string_pretty(&value)?;
            write_output_bytes(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Stats { input } => {
            let json = read_input_text(input.as_deref())?;
            let tree = bion_core::json::from_json(&json).context("Failed to parse JSON input")?;
            let bytes = bion_core::encode(&tree).context("Failed to encode tree to BION")?;
            let json_bytes = json.len();
            let bion_bytes = bytes.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (bion_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:  {} bytes", json_bytes);
            println!("BION size:  {} bytes", bion_bytes);
            println!("Reduction:  {:.1}%", ratio);
        }
    }

    Ok(())
}

fn read_input_text(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn read_input_bytes(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output_bytes(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            io::stdout()
                .write_all(content)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
