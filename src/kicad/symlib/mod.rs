//! Symbol library (`.kicad_sym`) file handling.
//!
//! This module provides read/write capabilities for KiCad schematic symbol
//! libraries.
//!
//! # File Format
//!
//! ```text
//! (kicad_symbol_lib
//!     (version 20241209)
//!     (generator "kicad_symbol_utils")
//!     (symbol "NAME"
//!         (in_bom yes) (on_board yes)
//!         (property "Reference" "U" (at 0 0 0) (effects ...))
//!         (symbol "NAME_0_1" (rectangle ...))          ; graphics shared by all units
//!         (symbol "NAME_1_1" (pin input line ...))     ; unit 1, body style 1
//!     )
//! )
//! ```
//!
//! Only the items this crate needs are decoded: properties, rectangles and
//! pins (with alternates). Other graphic items are preserved as raw
//! s-expressions so that a parsed unit can be written back out.

pub mod primitives;
pub mod reader;
pub mod writer;

use std::io::Write;
use std::path::Path;

use super::{sexpr, KicadError, KicadResult};
pub use primitives::*;

/// Default font size for property and pin text, in millimetres.
pub const DEFAULT_TEXT_SIZE: f64 = 1.27;

/// File format version written by default (KiCad 9).
pub const DEFAULT_VERSION: &str = "20241209";

/// Generator name written by default.
pub const DEFAULT_GENERATOR: &str = "kicad_symbol_utils";

/// A schematic symbol library.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolLib {
    /// Library file path (if loaded from file).
    pub filepath: Option<String>,
    /// File format version (`yyyymmdd`).
    pub version: String,
    /// Name of the program that wrote the file.
    pub generator: String,
    /// Version of the generator, if recorded.
    pub generator_version: Option<String>,
    /// Symbols in file order.
    pub symbols: Vec<Symbol>,
}

impl Default for SymbolLib {
    fn default() -> Self {
        Self {
            filepath: None,
            version: DEFAULT_VERSION.to_string(),
            generator: DEFAULT_GENERATOR.to_string(),
            generator_version: None,
            symbols: Vec::new(),
        }
    }
}

impl SymbolLib {
    /// Creates a new empty library with the default header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a `.kicad_sym` file from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn open(path: impl AsRef<Path>) -> KicadResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| KicadError::file_read(path, e))?;

        let mut lib = Self::read(&text)?;
        lib.filepath = Some(path.display().to_string());
        tracing::debug!(
            path = %path.display(),
            symbols = lib.len(),
            "Loaded symbol library"
        );
        Ok(lib)
    }

    /// Parses a library from its text representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed symbol library.
    pub fn read(text: &str) -> KicadResult<Self> {
        let root = sexpr::parse(text)?;
        reader::parse_library(&root)
    }

    /// Gets a symbol by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Returns an iterator over all symbols in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Returns the number of symbols in the library.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the library contains no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Adds a symbol, replacing any existing symbol with the same name.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        if let Some(existing) = self.symbols.iter_mut().find(|s| s.name == symbol.name) {
            *existing = symbol;
        } else {
            self.symbols.push(symbol);
        }
    }

    /// Renders the library to its text representation.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = writer::encode_library(self).to_string();
        text.push('\n');
        text
    }

    /// Saves the library to a file.
    ///
    /// The whole file is rendered in memory and written to a sibling
    /// temporary file first, which is then renamed over `path`. A failure
    /// never leaves a truncated library behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> KicadResult<()> {
        let path = path.as_ref();
        crate::fsio::write_atomic(path, self.to_text())
            .map_err(|e| KicadError::file_write(path, e))?;

        tracing::debug!(path = %path.display(), symbols = self.len(), "Saved symbol library");
        Ok(())
    }

    /// Writes the library to any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write<W: Write>(&self, mut writer: W) -> KicadResult<()> {
        writer
            .write_all(self.to_text().as_bytes())
            .map_err(|e| KicadError::file_write("<writer>", e))
    }
}

/// A schematic symbol.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)] // Flags match the file format
pub struct Symbol {
    /// Symbol name (library entry name).
    pub name: String,
    /// Parent symbol for derived symbols.
    pub extends: Option<String>,
    /// Whether the symbol is included in the BOM.
    pub in_bom: bool,
    /// Whether the symbol is exported to the board.
    pub on_board: bool,
    /// Pin name offset from the body edge; `None` places names outside.
    pub pin_names_offset: Option<f64>,
    /// Whether pin names are hidden.
    pub hide_pin_names: bool,
    /// Whether pin numbers are hidden.
    pub hide_pin_numbers: bool,
    /// Properties in file order.
    pub properties: Vec<Property>,
    /// Units in file order.
    pub units: Vec<Unit>,
}

impl Symbol {
    /// Creates a new symbol with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            in_bom: true,
            on_board: true,
            pin_names_offset: None,
            hide_pin_names: false,
            hide_pin_numbers: false,
            properties: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Returns the value of a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Adds a property.
    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Adds a unit.
    pub fn add_unit(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    /// Iterates over every pin in every unit, in file order.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.units.iter().flat_map(|u| u.pins.iter())
    }

    /// Returns the total number of pins.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.units.iter().map(|u| u.pins.len()).sum()
    }
}
