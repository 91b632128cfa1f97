//! Bufscope - typed byte buffer inspector
//!
//! Encodes values through a typed view, decodes hex input as elements of a
//! kind, and peeks at arbitrary offsets with an explicit byte order.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use common::logging::{self, LogConfig};
use serde::Serialize;
use voltage_buffer::{BufferConfig, ByteOrder, ElementKind, Number};

use crate::commands::PeekOptions;

#[derive(Parser)]
#[command(name = "bufscope")]
#[command(about = "Bufscope - typed byte buffer inspector")]
#[command(long_about = "Bufscope - typed byte buffer inspector

Commands:
  encode      Write values through a typed view and print the bytes
  decode      Read hex bytes as elements of a kind
  peek        Read one integer or float at any offset

Examples:
  bufscope encode --kind u8-clamped 300 -10 7     # FF0007
  bufscope decode --kind int8 41801020            # 65 -128 16 32
  bufscope peek 41801020 --offset 2 --width 2     # 4128
  bufscope peek 41801020 --offset 2 --width 2 --little-endian   # 8208")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (default: config/bufscope.{toml,yaml,json} when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Also write daily log files to this directory (overrides `log_dir` in config)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write values through a typed view and print the bytes
    Encode {
        /// Element kind: int8, uint8, uint8_clamped, int16, ... float64
        #[arg(short, long)]
        kind: ElementKind,

        /// Byte order of multi-byte elements (default from config)
        #[arg(long)]
        order: Option<ByteOrder>,

        /// Values to encode
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<Number>,
    },

    /// Read hex bytes as elements of a kind
    Decode {
        #[arg(short, long)]
        kind: ElementKind,

        #[arg(long)]
        order: Option<ByteOrder>,

        /// Byte offset of the first element
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of elements (default: as many as fit)
        #[arg(long)]
        length: Option<usize>,

        /// Input bytes, e.g. "41 80 10 20" or 0x41801020
        hex: String,
    },

    /// Read one integer or float at any offset
    Peek {
        hex: String,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Width in bytes (1 to 8)
        #[arg(short, long, default_value_t = 1)]
        width: usize,

        /// Interpret as two's complement
        #[arg(short, long)]
        signed: bool,

        /// Interpret as IEEE 754 (width 4 or 8)
        #[arg(short, long, conflicts_with = "signed")]
        float: bool,

        /// Least significant byte first
        #[arg(long)]
        little_endian: bool,
    },
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config: BufferConfig =
        common::config_loader::load_config("bufscope", cli.config.as_deref())
            .context("Failed to load configuration")?;
    if let Some(dir) = cli.log_dir.take() {
        config.log_dir = Some(dir);
    }

    logging::init_with_config(LogConfig {
        service_name: "bufscope".to_string(),
        level: config.log_level.clone(),
        log_dir: config.log_dir.clone(),
        enable_ansi: !cli.no_color,
    })
    .context("Failed to initialize logging")?;
    if cli.verbose {
        logging::set_log_level("debug").context("Failed to raise log level")?;
    }

    tracing::debug!(?config, level = %logging::get_log_level(), "Configuration loaded");

    let result = run(cli.command, cli.json, &config);
    logging::flush();
    result
}

fn run(command: Commands, json: bool, config: &BufferConfig) -> Result<()> {
    match command {
        Commands::Encode {
            kind,
            order,
            values,
        } => {
            let report = commands::encode(kind, order, &values, config)?;
            output(json, &report, commands::print_view)?;
        },
        Commands::Decode {
            kind,
            order,
            offset,
            length,
            hex,
        } => {
            let bytes = common::hex::decode(&hex).context("Invalid hex input")?;
            let report = commands::decode(kind, order, bytes, offset, length, config)?;
            output(json, &report, commands::print_view)?;
        },
        Commands::Peek {
            hex,
            offset,
            width,
            signed,
            float,
            little_endian,
        } => {
            let bytes = common::hex::decode(&hex).context("Invalid hex input")?;
            let report = commands::peek(
                bytes,
                PeekOptions {
                    offset,
                    width,
                    signed,
                    float,
                    little_endian,
                },
            )?;
            output(json, &report, commands::print_peek)?;
        },
    }

    Ok(())
}

fn output<T: Serialize>(json: bool, report: &T, print: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print(report);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode_with_negative_values() {
        let cli = Cli::try_parse_from([
            "bufscope", "encode", "--kind", "u8-clamped", "300", "-10", "2.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode { kind, order, values } => {
                assert_eq!(kind, ElementKind::Uint8Clamped);
                assert_eq!(order, None);
                assert_eq!(
                    values,
                    vec![Number::Int(300), Number::Int(-10), Number::Float(2.5)]
                );
            },
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn test_parse_peek_flags() {
        let cli = Cli::try_parse_from([
            "bufscope",
            "--json",
            "peek",
            "41801020",
            "--offset",
            "2",
            "--width",
            "2",
            "--little-endian",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Peek {
                offset,
                width,
                little_endian,
                signed,
                ..
            } => {
                assert_eq!((offset, width), (2, 2));
                assert!(little_endian);
                assert!(!signed);
            },
            _ => panic!("expected peek"),
        }
    }

    #[test]
    fn test_parse_log_dir() {
        let cli =
            Cli::try_parse_from(["bufscope", "peek", "00", "--log-dir", "/tmp/bufscope-logs"])
                .unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/bufscope-logs")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["bufscope", "decode", "--kind", "uint24", "00"]).is_err());
        assert!(
            Cli::try_parse_from(["bufscope", "peek", "00", "--signed", "--float"]).is_err()
        );
    }

    #[test]
    fn test_config_file_is_honored() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bufscope.yaml");
        std::fs::write(&path, "max_byte_length: 4\nelement_order: be\nlog_dir: logs\n").unwrap();

        let config: BufferConfig = common::config_loader::load_config_from_file(&path).unwrap();
        assert_eq!(config.max_byte_length, 4);
        assert_eq!(config.element_order, ByteOrder::BigEndian);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));

        let report =
            commands::encode(ElementKind::Uint16, None, &[Number::Int(0x1234)], &config).unwrap();
        assert_eq!(report.hex, "1234");
        assert!(commands::decode(ElementKind::Uint8, None, vec![0; 5], 0, None, &config).is_err());
    }
}
