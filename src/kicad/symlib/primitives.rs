//! Schematic symbol primitive types for `.kicad_sym` files.
//!
//! These types represent the items that make up a symbol unit: pins,
//! alternate pin functions, rectangles and properties. Graphic items this
//! crate does not interpret are carried as raw s-expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kicad::sexpr::Sexpr;

/// Pin electrical type.
///
/// Unknown keywords are kept verbatim in [`ElectricalType::Unrecognized`]
/// so that files written by newer KiCad versions survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElectricalType {
    /// Input pin.
    Input,
    /// Output pin.
    Output,
    /// Bidirectional pin (input/output).
    #[default]
    Bidirectional,
    /// Power input (VDD, GND).
    PowerIn,
    /// Power output (regulator output).
    PowerOut,
    /// Passive component terminal.
    Passive,
    /// Tri-state output.
    TriState,
    /// Open collector output.
    OpenCollector,
    /// Open emitter output.
    OpenEmitter,
    /// Unspecified type.
    Unspecified,
    /// Pin not internally connected.
    Free,
    /// Not connected.
    NoConnect,
    /// Keyword this crate does not know.
    Unrecognized(String),
}

impl ElectricalType {
    /// Parses a KiCad electrical type keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "input" => Self::Input,
            "output" => Self::Output,
            "bidirectional" => Self::Bidirectional,
            "power_in" => Self::PowerIn,
            "power_out" => Self::PowerOut,
            "passive" => Self::Passive,
            "tri_state" => Self::TriState,
            "open_collector" => Self::OpenCollector,
            "open_emitter" => Self::OpenEmitter,
            "unspecified" => Self::Unspecified,
            "free" => Self::Free,
            "no_connect" => Self::NoConnect,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the KiCad keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Bidirectional => "bidirectional",
            Self::PowerIn => "power_in",
            Self::PowerOut => "power_out",
            Self::Passive => "passive",
            Self::TriState => "tri_state",
            Self::OpenCollector => "open_collector",
            Self::OpenEmitter => "open_emitter",
            Self::Unspecified => "unspecified",
            Self::Free => "free",
            Self::NoConnect => "no_connect",
            Self::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for ElectricalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<String> for ElectricalType {
    fn from(value: String) -> Self {
        Self::from_keyword(&value)
    }
}

impl From<ElectricalType> for String {
    fn from(value: ElectricalType) -> Self {
        value.keyword().to_string()
    }
}

/// Pin graphical style (the decoration drawn on the pin line).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GraphicalStyle {
    /// Plain line.
    #[default]
    Line,
    /// Inversion bubble.
    Inverted,
    /// Clock wedge.
    Clock,
    /// Bubble and clock wedge.
    InvertedClock,
    /// Active-low input flag.
    InputLow,
    /// Active-low clock input.
    ClockLow,
    /// Active-low output flag.
    OutputLow,
    /// Falling-edge clock.
    EdgeClockHigh,
    /// Non-logic (analog) marker.
    NonLogic,
    /// Keyword this crate does not know.
    Unrecognized(String),
}

impl GraphicalStyle {
    /// Parses a KiCad graphical style keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "line" => Self::Line,
            "inverted" => Self::Inverted,
            "clock" => Self::Clock,
            "inverted_clock" => Self::InvertedClock,
            "input_low" => Self::InputLow,
            "clock_low" => Self::ClockLow,
            "output_low" => Self::OutputLow,
            "edge_clock_high" => Self::EdgeClockHigh,
            "non_logic" => Self::NonLogic,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the KiCad keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Line => "line",
            Self::Inverted => "inverted",
            Self::Clock => "clock",
            Self::InvertedClock => "inverted_clock",
            Self::InputLow => "input_low",
            Self::ClockLow => "clock_low",
            Self::OutputLow => "output_low",
            Self::EdgeClockHigh => "edge_clock_high",
            Self::NonLogic => "non_logic",
            Self::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for GraphicalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<String> for GraphicalStyle {
    fn from(value: String) -> Self {
        Self::from_keyword(&value)
    }
}

impl From<GraphicalStyle> for String {
    fn from(value: GraphicalStyle) -> Self {
        value.keyword().to_string()
    }
}

/// A position with rotation, in millimetres and degrees.
///
/// KiCad's symbol editor uses a Y-up coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Rotation in degrees.
    pub angle: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }
}

/// An alternate function of a pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternatePin {
    /// Alternate pin name.
    pub name: String,
    /// Electrical type when the alternate is selected.
    pub electrical_type: ElectricalType,
    /// Graphical style when the alternate is selected.
    pub graphical_style: GraphicalStyle,
}

/// A schematic symbol pin.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    /// Electrical type.
    pub electrical_type: ElectricalType,
    /// Graphical style.
    pub graphical_style: GraphicalStyle,
    /// Connection point and direction. The angle points from the
    /// connection point toward the symbol body.
    pub position: Position,
    /// Pin length in millimetres.
    pub length: f64,
    /// Pin name (e.g. "VDD", "~{RESET}").
    pub name: String,
    /// Pin number (e.g. "1", "A1").
    pub number: String,
    /// Whether the pin is hidden.
    pub hidden: bool,
    /// Alternate pin functions.
    pub alternates: Vec<AlternatePin>,
    /// Font size used for both name and number.
    pub text_size: f64,
}

impl Pin {
    /// Creates a visible bidirectional pin with default text size.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        position: Position,
        length: f64,
    ) -> Self {
        Self {
            electrical_type: ElectricalType::Bidirectional,
            graphical_style: GraphicalStyle::Line,
            position,
            length,
            name: name.into(),
            number: number.into(),
            hidden: false,
            alternates: Vec::new(),
            text_size: super::DEFAULT_TEXT_SIZE,
        }
    }
}

/// Rectangle fill type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillType {
    /// Unfilled.
    #[default]
    None,
    /// Filled with the outline colour.
    Outline,
    /// Filled with the body background colour.
    Background,
}

impl FillType {
    /// Parses a fill keyword; unknown keywords read as unfilled.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "outline" => Self::Outline,
            "background" => Self::Background,
            _ => Self::None,
        }
    }

    /// Returns the KiCad keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Outline => "outline",
            Self::Background => "background",
        }
    }
}

/// A rectangle shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Start X coordinate.
    pub start_x: f64,
    /// Start Y coordinate.
    pub start_y: f64,
    /// End X coordinate.
    pub end_x: f64,
    /// End Y coordinate.
    pub end_y: f64,
    /// Stroke width in millimetres (0 means the default width).
    pub stroke_width: f64,
    /// Fill type.
    pub fill: FillType,
}

impl Rectangle {
    /// Creates an unfilled rectangle with default stroke.
    #[must_use]
    pub const fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
            stroke_width: 0.0,
            fill: FillType::None,
        }
    }
}

/// A graphic item inside a unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Graphic {
    /// Rectangle body.
    Rectangle(Rectangle),
    /// Any other item (polyline, arc, circle, text), kept verbatim.
    Other(Sexpr),
}

/// A symbol property (Reference, Value, Footprint, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
    /// Text anchor.
    pub position: Position,
    /// Whether the property text is hidden.
    pub hidden: bool,
    /// Legacy numeric property id (KiCad 6/7 files only).
    pub id: Option<u32>,
    /// Font size.
    pub text_size: f64,
}

impl Property {
    /// Creates a visible property at the given position.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            position: Position::new(x, y, 0.0),
            hidden: false,
            id: None,
            text_size: super::DEFAULT_TEXT_SIZE,
        }
    }

    /// Marks the property as hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// One unit/body-style section of a symbol (`(symbol "NAME_1_1" ...)`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    /// Unit number (0 means common to all units).
    pub unit_id: u32,
    /// Body style (1 is the normal body, 2 the De Morgan alternate).
    pub style_id: u32,
    /// Graphic items.
    pub graphics: Vec<Graphic>,
    /// Pins.
    pub pins: Vec<Pin>,
}

impl Unit {
    /// Creates an empty unit.
    #[must_use]
    pub const fn new(unit_id: u32, style_id: u32) -> Self {
        Self {
            unit_id,
            style_id,
            graphics: Vec::new(),
            pins: Vec::new(),
        }
    }

    /// Returns the unit's entry name for a symbol (`NAME_1_1`).
    #[must_use]
    pub fn entry_name(&self, symbol_name: &str) -> String {
        format!("{symbol_name}_{}_{}", self.unit_id, self.style_id)
    }

    /// Iterates over the rectangles in this unit.
    pub fn rectangles(&self) -> impl Iterator<Item = &Rectangle> {
        self.graphics.iter().filter_map(|g| match g {
            Graphic::Rectangle(r) => Some(r),
            Graphic::Other(_) => None,
        })
    }
}
