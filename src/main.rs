//! kicad-symbol-utils: pin-table extraction and symbol generation for KiCad
//!
//! Reads `.kicad_sym` libraries into pin tables, lays out new symbols on the
//! 2.54 mm grid from JSON definitions, and runs the KLC checker.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use kicad_symbol_utils::commands;
use kicad_symbol_utils::config::{self, Config};
use kicad_symbol_utils::error::ToolError;
use kicad_symbol_utils::klc::KlcChecker;
use kicad_symbol_utils::symbol::{LayoutOptions, PinFormat};

/// Pin-table extraction and grid-aligned symbol generation for KiCad.
#[derive(Parser, Debug)]
#[command(name = "kicad-symbol-utils")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and display symbol information
    Parse {
        /// Path to .kicad_sym library file
        library: PathBuf,
        /// Specific symbol to describe
        #[arg(short, long)]
        symbol: Option<String>,
        /// List all symbols
        #[arg(short, long)]
        list: bool,
        /// Show per-unit details
        #[arg(long)]
        details: bool,
    },

    /// Print the pin table of a symbol
    Pins {
        /// Path to .kicad_sym library file
        library: PathBuf,
        /// Symbol to read
        #[arg(short, long)]
        symbol: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = PinFormat::Table)]
        format: PinFormat,
    },

    /// Extract a symbol definition as JSON
    Extract {
        /// Path to .kicad_sym library file
        library: PathBuf,
        /// Symbol to extract
        #[arg(short, long)]
        symbol: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a symbol library from a JSON definition
    Generate {
        /// Path to the JSON symbol definition
        definition: PathBuf,
        /// Output library (default: <name>.kicad_sym)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep each side in definition order
        #[arg(long)]
        no_sort: bool,
    },

    /// Check a library against the KiCad Library Convention
    Validate {
        /// Path to .kicad_sym library file
        library: PathBuf,
        /// Restrict the check to one symbol
        #[arg(short, long)]
        symbol: Option<String>,
        /// Path to check_symbol.py
        #[arg(long)]
        klc_path: Option<PathBuf>,
    },
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one subcommand. `Ok(false)` means it ran but the result is a
/// failure (a KLC check that found violations).
fn run(command: Command, cfg: &Config) -> Result<bool, ToolError> {
    match command {
        Command::Parse {
            library,
            symbol,
            list,
            details,
        } => {
            let symbol = if list { None } else { symbol.as_deref() };
            print!("{}", commands::parse(&library, symbol, details)?);
        }
        Command::Pins {
            library,
            symbol,
            format,
        } => {
            print!("{}", commands::pins(&library, &symbol, format)?);
        }
        Command::Extract {
            library,
            symbol,
            output,
        } => {
            let json = commands::extract(&library, &symbol)?;
            match output {
                Some(path) => {
                    commands::write_output(&path, &json)?;
                    println!("Extracted to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Generate {
            definition,
            output,
            no_sort,
        } => {
            let options = LayoutOptions {
                sort_pins: cfg.layout.sort_pins && !no_sort,
            };
            let path = commands::generate(&definition, output.as_deref(), options, &cfg.output)?;
            println!("Generated symbol library: {}", path.display());
        }
        Command::Validate {
            library,
            symbol,
            klc_path,
        } => {
            let script = KlcChecker::resolve_script(
                klc_path.as_deref().or(cfg.klc.checker_path.as_deref()),
            );
            let checker = KlcChecker::new(&cfg.klc.python, script);
            let report = commands::validate(&checker, &library, symbol.as_deref())?;
            print!("{}", report.output);
            return Ok(report.passed());
        }
    }
    Ok(true)
}

/// Entry point for kicad-symbol-utils.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(version = env!("CARGO_PKG_VERSION"), command = ?args.command, "Starting");

    match run(args.command, &cfg) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
