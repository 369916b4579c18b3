//! Pin tables and symbol layout.
//!
//! # Overview
//!
//! - [`definition`]: the layout-free pin table ([`SymbolDefinition`]) and
//!   its JSON form
//! - [`ordering`]: functional ordering of pin names and numbers
//! - [`grid`]: the 2.54 mm grid every coordinate is snapped to
//! - [`layout`]: definition → drawable [`crate::kicad::Symbol`]
//! - [`extract`]: drawable symbol → definition, summaries and flat tables
//! - [`report`]: table/CSV/JSON output
//!
//! Layout and ordering are total: any definition that passed
//! [`SymbolDefinition::validate`] lays out without error.

pub mod definition;
pub mod extract;
pub mod grid;
pub mod layout;
pub mod ordering;
pub mod report;

pub use definition::{AlternateDefinition, DefinitionError, PinDefinition, Side, SymbolDefinition};
pub use extract::{
    extract_definition, infer_sides, list_symbols, pin_table, symbol_info, PinRow, SymbolInfo,
    SymbolMetadata, UnitInfo,
};
pub use layout::{build_library, create_symbol, LayoutOptions};
pub use report::PinFormat;
