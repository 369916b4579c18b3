//! Extraction of pin tables and definitions from parsed symbols.
//!
//! This is the inverse of [`super::layout`]: pins are grouped by the side
//! their angle implies and ordered top-to-bottom or left-to-right as drawn.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;

use crate::kicad::symlib::{Pin, Property, Symbol, SymbolLib};

use super::definition::{PinDefinition, Side, SymbolDefinition};

/// Symbol metadata split out of a property list.
///
/// Well-known keys get named fields; everything else lands in `extra` in
/// file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolMetadata {
    /// `Reference`.
    pub reference: Option<String>,
    /// `Value`.
    pub value: Option<String>,
    /// `Footprint`.
    pub footprint: Option<String>,
    /// `Datasheet`.
    pub datasheet: Option<String>,
    /// `Description`, or the legacy `ki_description`.
    pub description: Option<String>,
    /// `ki_keywords`.
    pub keywords: Option<String>,
    /// `ki_fp_filters`.
    pub fp_filters: Option<String>,
    /// Unrecognised properties.
    pub extra: IndexMap<String, String>,
}

impl SymbolMetadata {
    /// Sorts a property list into named fields and a residual map.
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let mut meta = Self::default();
        let mut legacy_description = None;

        for prop in properties {
            let value = Some(prop.value.clone());
            match prop.key.as_str() {
                "Reference" => meta.reference = value,
                "Value" => meta.value = value,
                "Footprint" => meta.footprint = value,
                "Datasheet" => meta.datasheet = value,
                "Description" => meta.description = value,
                "ki_description" => legacy_description = value,
                "ki_keywords" => meta.keywords = value,
                "ki_fp_filters" => meta.fp_filters = value,
                _ => {
                    meta.extra.insert(prop.key.clone(), prop.value.clone());
                }
            }
        }

        if meta.description.is_none() {
            meta.description = legacy_description;
        }
        meta
    }
}

/// Per-unit summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitInfo {
    /// Unit entry name (`NAME_1_1`).
    pub id: String,
    /// Number of pins in the unit.
    pub pin_count: usize,
    /// Number of graphic items in the unit.
    pub graphic_items: usize,
}

/// Summary of a parsed symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    /// Symbol name.
    pub name: String,
    /// Included in the BOM.
    pub in_bom: bool,
    /// Exported to the board.
    pub on_board: bool,
    /// Properties in file order.
    pub properties: IndexMap<String, String>,
    /// Units in file order.
    pub units: Vec<UnitInfo>,
    /// Total pins over all units.
    pub total_pins: usize,
}

/// One row of a flat pin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinRow {
    /// Pin number.
    pub number: String,
    /// Pin name.
    pub name: String,
    /// Electrical type keyword.
    pub electrical_type: String,
    /// Graphical style keyword.
    pub graphical_style: String,
    /// Whether the pin is hidden.
    pub hidden: bool,
    /// Alternates as `name:type` joined by `"; "`.
    pub alternates: String,
}

impl From<&PinDefinition> for PinRow {
    fn from(pin: &PinDefinition) -> Self {
        Self {
            number: pin.number.clone(),
            name: pin.name.clone(),
            electrical_type: pin.electrical_type.to_string(),
            graphical_style: pin.graphical_style.to_string(),
            hidden: pin.hidden,
            alternates: pin.alternates_summary(),
        }
    }
}

/// Returns the symbol names of a library in file order.
#[must_use]
pub fn list_symbols(lib: &SymbolLib) -> Vec<&str> {
    lib.iter().map(|s| s.name.as_str()).collect()
}

/// Summarises a symbol.
#[must_use]
pub fn symbol_info(symbol: &Symbol) -> SymbolInfo {
    let units: Vec<UnitInfo> = symbol
        .units
        .iter()
        .map(|u| UnitInfo {
            id: u.entry_name(&symbol.name),
            pin_count: u.pins.len(),
            graphic_items: u.graphics.len(),
        })
        .collect();

    SymbolInfo {
        name: symbol.name.clone(),
        in_bom: symbol.in_bom,
        on_board: symbol.on_board,
        properties: symbol
            .properties
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect(),
        total_pins: units.iter().map(|u| u.pin_count).sum(),
        units,
    }
}

/// Flattens every pin of every unit, in file order.
#[must_use]
pub fn pin_table(symbol: &Symbol) -> Vec<PinRow> {
    symbol
        .pins()
        .map(|pin| PinRow::from(&PinDefinition::from(pin)))
        .collect()
}

/// Groups a symbol's pins by side, in display order.
///
/// Left and right pins run top to bottom (descending Y), top and bottom
/// pins left to right (ascending X). Pins at the same coordinate keep
/// their file order.
#[must_use]
pub fn infer_sides<'a>(pins: impl IntoIterator<Item = &'a Pin>) -> [Vec<&'a Pin>; 4] {
    let mut sides: [Vec<&Pin>; 4] = Default::default();
    for pin in pins {
        let index = side_index(Side::from_angle(pin.position.angle));
        sides[index].push(pin);
    }

    for side in Side::ALL {
        let group = &mut sides[side_index(side)];
        match side {
            Side::Left | Side::Right => {
                group.sort_by(|a, b| coordinate_order(b.position.y, a.position.y));
            }
            Side::Top | Side::Bottom => {
                group.sort_by(|a, b| coordinate_order(a.position.x, b.position.x));
            }
        }
    }
    sides
}

/// Orders coordinates numerically; `-0.0` equals `0.0` and NaN equals
/// everything, so stable sorts keep file order for them.
fn coordinate_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

const fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
        Side::Top => 2,
        Side::Bottom => 3,
    }
}

/// Builds a definition from a parsed symbol.
///
/// Metadata falls back to the same defaults a fresh definition has.
#[must_use]
pub fn extract_definition(symbol: &Symbol) -> SymbolDefinition {
    let meta = SymbolMetadata::from_properties(&symbol.properties);
    let mut def = SymbolDefinition::new(&symbol.name);
    if let Some(reference) = meta.reference {
        def.reference = reference;
    }
    def.footprint = meta.footprint.unwrap_or_default();
    def.datasheet = meta.datasheet.unwrap_or_default();
    def.description = meta.description.unwrap_or_default();
    def.keywords = meta.keywords.unwrap_or_default();
    def.fp_filters = meta.fp_filters.unwrap_or_default();

    let sides = infer_sides(symbol.pins());
    for side in Side::ALL {
        *def.pins_mut(side) = sides[side_index(side)]
            .iter()
            .map(|pin| PinDefinition::from(*pin))
            .collect();
    }

    tracing::debug!(
        symbol = %symbol.name,
        left = def.left_pins.len(),
        right = def.right_pins.len(),
        top = def.top_pins.len(),
        bottom = def.bottom_pins.len(),
        "Extracted symbol definition"
    );
    def
}
