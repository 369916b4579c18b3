//! KiCad file format handling.
//!
//! This module provides read/write capabilities for KiCad schematic symbol
//! libraries (`.kicad_sym`).
//!
//! # File Format
//!
//! KiCad libraries are UTF-8 s-expression documents. A library holds any
//! number of symbols; each symbol holds properties and one or more unit
//! sections, and each unit holds graphic items and pins.
//!
//! # Architecture
//!
//! This module is the file-format boundary. It knows nothing about pin
//! ordering or layout; the [`crate::symbol`] module builds on the types
//! defined here.

pub mod error;
pub mod sexpr;
pub mod symlib;

pub use error::{KicadError, KicadResult};
pub use symlib::{Symbol, SymbolLib};
