//! kicad-symbol-utils: pin tables and grid-aligned symbol generation for KiCad
//!
//! This library converts between KiCad symbol libraries (`.kicad_sym`) and a
//! normalized pin table, and lays out new symbols from that table.
//!
//! # Architecture
//!
//! - **File I/O**: read/write `.kicad_sym` libraries through [`kicad::SymbolLib`]
//! - **Pin tables**: [`symbol::SymbolDefinition`], with JSON round-trip
//! - **Layout**: deterministic pin ordering and placement on the 2.54 mm grid
//! - **Extraction**: side inference from pin angles, summaries and flat tables
//!
//! Style checking is delegated to the external KLC checker through
//! [`klc::SymbolChecker`].
//!
//! # Modules
//!
//! - [`commands`] - One function per CLI subcommand
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Error types
//! - [`fsio`] - Atomic file output
//! - [`kicad`] - KiCad file format handling
//! - [`klc`] - KLC checker invocation
//! - [`symbol`] - Pin ordering, layout and extraction

pub mod commands;
pub mod config;
pub mod error;
pub mod fsio;
pub mod kicad;
pub mod klc;
pub mod symbol;
