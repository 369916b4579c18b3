//! Text renderings of pin tables and symbol summaries.

use std::fmt::Write as _;
use std::io;

use super::extract::{PinRow, SymbolInfo};

/// Output format of the pin table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PinFormat {
    /// Fixed-width columns.
    #[default]
    Table,
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

/// Errors raised while rendering a pin table.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV encoding failed.
    #[error("failed to render CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders pin rows in the requested format.
///
/// # Errors
///
/// Returns an error if CSV or JSON encoding fails.
pub fn render_pins(rows: &[PinRow], format: PinFormat) -> Result<String, ReportError> {
    match format {
        PinFormat::Table => Ok(render_table(rows)),
        PinFormat::Csv => Ok(render_csv(rows)?),
        PinFormat::Json => Ok(render_json(rows)?),
    }
}

/// Renders pin rows as fixed-width columns.
#[must_use]
pub fn render_table(rows: &[PinRow]) -> String {
    let mut out = String::new();
    push_row(&mut out, ["Number", "Name", "Type", "Style", "Hidden", "Alternates"]);
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for row in rows {
        push_row(
            &mut out,
            [
                &row.number,
                &row.name,
                &row.electrical_type,
                &row.graphical_style,
                if row.hidden { "Yes" } else { "" },
                &row.alternates,
            ],
        );
    }
    out
}

fn push_row(out: &mut String, cells: [&str; 6]) {
    let [number, name, etype, style, hidden, alternates] = cells;
    let line = format!("{number:<10} {name:<20} {etype:<15} {style:<10} {hidden:<8} {alternates}");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders pin rows as CSV with a header row.
///
/// # Errors
///
/// Returns an error if a row cannot be encoded.
pub fn render_csv(rows: &[PinRow]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Renders pin rows as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn render_json(rows: &[PinRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Renders the symbol list of a library.
#[must_use]
pub fn render_symbol_list(library: &str, names: &[&str]) -> String {
    let mut out = format!("Symbols in {library}:\n");
    for name in names {
        let _ = writeln!(out, "  - {name}");
    }
    out
}

/// Renders a symbol summary; `verbose` adds per-unit details.
#[must_use]
pub fn render_symbol_info(info: &SymbolInfo, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Symbol: {}", info.name);
    let _ = writeln!(out, "  In BOM: {}", yes_no(info.in_bom));
    let _ = writeln!(out, "  On Board: {}", yes_no(info.on_board));
    let _ = writeln!(out, "  Total Pins: {}", info.total_pins);
    let _ = writeln!(out, "  Units: {}", info.units.len());

    out.push_str("\nProperties:\n");
    for (key, value) in &info.properties {
        let _ = writeln!(out, "  {key}: {value}");
    }

    if verbose {
        out.push_str("\nUnits:\n");
        for unit in &info.units {
            let _ = writeln!(
                out,
                "  {}: {} pins, {} graphics",
                unit.id, unit.pin_count, unit.graphic_items
            );
        }
    }
    out
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
