//! Grid-aligned symbol layout.
//!
//! Turns a [`SymbolDefinition`] into a drawable [`Symbol`]: a filled body
//! rectangle sized from the visible pin counts, pins placed along each edge
//! at one grid step apart, and the standard property block.
//!
//! Hidden pins share the coordinate of the last visible pin on their side
//! and never advance the placement cursor, so duplicate power pins stack
//! under a single visible pin.

use crate::kicad::symlib::{
    FillType, Graphic, Pin, Position, Property, Rectangle, Symbol, SymbolLib, Unit,
};

use super::definition::{PinDefinition, Side, SymbolDefinition};
use super::grid::{snap, GRID_SIZE};
use super::ordering::sort_by_name;

/// Pin length.
pub const PIN_LENGTH: f64 = GRID_SIZE;

/// Distance between adjacent visible pins.
pub const PIN_SPACING: f64 = GRID_SIZE;

/// Minimum body height.
pub const MIN_HEIGHT: f64 = 10.16;

/// Minimum body width.
pub const MIN_WIDTH: f64 = 15.24;

/// Body outline stroke width.
pub const STROKE_WIDTH: f64 = 0.254;

/// Offset of pin names from the body edge.
pub const PIN_NAME_OFFSET: f64 = 1.016;

/// Vertical offsets of the standard properties, in placement order.
const PROPERTY_OFFSETS: [f64; 5] = [0.0, -2.54, -5.08, -7.62, -10.16];

/// Options controlling the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Reorder each side by functional pin name before placement.
    pub sort_pins: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { sort_pins: true }
    }
}

/// Half extents of the body rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    /// Half the body width.
    pub half_width: f64,
    /// Half the body height.
    pub half_height: f64,
}

impl Outline {
    /// Sizes the body for a definition from its visible pin counts.
    #[must_use]
    pub fn for_definition(def: &SymbolDefinition) -> Self {
        let left = visible_count(&def.left_pins);
        let right = visible_count(&def.right_pins);
        let top = visible_count(&def.top_pins);
        let bottom = visible_count(&def.bottom_pins);
        Self::from_counts(left.max(right), top.max(bottom))
    }

    /// Sizes the body for the given number of pin slots per vertical and
    /// horizontal edge.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(vertical: usize, horizontal: usize) -> Self {
        let height = (vertical as f64).mul_add(PIN_SPACING, 2.0 * PIN_SPACING);
        let width = (horizontal as f64).mul_add(PIN_SPACING, 4.0 * PIN_SPACING);
        Self {
            half_width: snap(width.max(MIN_WIDTH) / 2.0, GRID_SIZE),
            half_height: snap(height.max(MIN_HEIGHT) / 2.0, GRID_SIZE),
        }
    }

    /// Returns the body rectangle.
    #[must_use]
    pub fn rectangle(&self) -> Rectangle {
        let mut rect = Rectangle::new(
            -self.half_width,
            self.half_height,
            self.half_width,
            -self.half_height,
        );
        rect.stroke_width = STROKE_WIDTH;
        rect.fill = FillType::Background;
        rect
    }

    /// Returns the first pin slot on a side and the per-pin step.
    #[allow(clippy::cast_precision_loss)]
    fn start(&self, side: Side, visible: usize) -> (Position, f64, f64) {
        let angle = side.angle();
        let centred_x = snap(
            -(visible as f64) * PIN_SPACING / 2.0 + PIN_SPACING / 2.0,
            GRID_SIZE,
        );
        match side {
            Side::Left => (
                Position::new(
                    snap(-self.half_width - PIN_LENGTH, GRID_SIZE),
                    snap(self.half_height - PIN_SPACING, GRID_SIZE),
                    angle,
                ),
                0.0,
                -PIN_SPACING,
            ),
            Side::Right => (
                Position::new(
                    snap(self.half_width + PIN_LENGTH, GRID_SIZE),
                    snap(self.half_height - PIN_SPACING, GRID_SIZE),
                    angle,
                ),
                0.0,
                -PIN_SPACING,
            ),
            Side::Top => (
                Position::new(
                    centred_x,
                    snap(self.half_height + PIN_LENGTH, GRID_SIZE),
                    angle,
                ),
                PIN_SPACING,
                0.0,
            ),
            Side::Bottom => (
                Position::new(
                    centred_x,
                    snap(-self.half_height - PIN_LENGTH, GRID_SIZE),
                    angle,
                ),
                PIN_SPACING,
                0.0,
            ),
        }
    }
}

fn visible_count(pins: &[PinDefinition]) -> usize {
    pins.iter().filter(|p| !p.hidden).count()
}

/// Places the pins of one side, starting at the side's first slot.
fn place_side(outline: &Outline, side: Side, pins: &[PinDefinition]) -> Vec<Pin> {
    let (start, dx, dy) = outline.start(side, visible_count(pins));
    let mut cursor = start;
    let mut last_visible = start;

    pins.iter()
        .map(|def| {
            let position = if def.hidden {
                last_visible
            } else {
                let here = cursor;
                last_visible = here;
                cursor = Position::new(
                    snap(cursor.x + dx, GRID_SIZE),
                    snap(cursor.y + dy, GRID_SIZE),
                    cursor.angle,
                );
                here
            };
            to_pin(def, position)
        })
        .collect()
}

fn to_pin(def: &PinDefinition, position: Position) -> Pin {
    let mut pin = Pin::new(&def.name, &def.number, position, PIN_LENGTH);
    pin.electrical_type = def.electrical_type.clone();
    pin.graphical_style = def.graphical_style.clone();
    pin.hidden = def.hidden;
    pin.alternates = def.alternates.iter().map(Into::into).collect();
    pin
}

fn standard_properties(def: &SymbolDefinition) -> Vec<Property> {
    let [reference_y, value_y, footprint_y, datasheet_y, description_y] = PROPERTY_OFFSETS;
    let mut properties = vec![
        Property::new("Reference", &def.reference, 0.0, reference_y),
        Property::new("Value", &def.name, 0.0, value_y),
        Property::new("Footprint", &def.footprint, 0.0, footprint_y).hidden(),
        Property::new("Datasheet", &def.datasheet, 0.0, datasheet_y).hidden(),
        Property::new("Description", &def.description, 0.0, description_y).hidden(),
    ];
    if !def.keywords.is_empty() {
        properties.push(Property::new("ki_keywords", &def.keywords, 0.0, 0.0).hidden());
    }
    if !def.fp_filters.is_empty() {
        properties.push(Property::new("ki_fp_filters", &def.fp_filters, 0.0, 0.0).hidden());
    }
    properties
}

/// Lays out a symbol from its definition.
///
/// The definition is not modified; sorting (when enabled) works on a copy
/// of each side's pin list.
#[must_use]
pub fn create_symbol(def: &SymbolDefinition, options: LayoutOptions) -> Symbol {
    let outline = Outline::for_definition(def);

    let mut unit = Unit::new(1, 1);
    unit.graphics.push(Graphic::Rectangle(outline.rectangle()));

    for side in Side::ALL {
        let mut pins = def.pins(side).to_vec();
        if options.sort_pins {
            sort_by_name(&mut pins, |p| p.name.as_str());
        }
        unit.pins.extend(place_side(&outline, side, &pins));
    }

    tracing::debug!(
        symbol = %def.name,
        half_width = outline.half_width,
        half_height = outline.half_height,
        pins = unit.pins.len(),
        "Laid out symbol"
    );

    let mut symbol = Symbol::new(&def.name);
    symbol.pin_names_offset = Some(PIN_NAME_OFFSET);
    symbol.properties = standard_properties(def);
    symbol.add_unit(unit);
    symbol
}

/// Wraps generated symbols in a library with the given header.
#[must_use]
pub fn build_library(
    symbols: impl IntoIterator<Item = Symbol>,
    version: &str,
    generator: &str,
) -> SymbolLib {
    let mut lib = SymbolLib::new();
    lib.version = version.to_string();
    lib.generator = generator.to_string();
    for symbol in symbols {
        lib.add_symbol(symbol);
    }
    lib
}
