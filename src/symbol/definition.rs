//! Pin table and symbol definition value objects.
//!
//! A [`SymbolDefinition`] is the normalized, layout-free description of a
//! symbol: metadata plus four ordered pin lists keyed by side. It is the
//! JSON format accepted by `generate` and produced by `extract`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kicad::symlib::{AlternatePin, ElectricalType, GraphicalStyle, Pin};

/// Errors raised while loading a symbol definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The definition file could not be read.
    #[error("failed to read symbol definition: {path}")]
    Read {
        /// Path to the definition file.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The JSON is malformed or a required field is missing.
    #[error("invalid symbol definition: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A required field is present but empty.
    #[error("invalid symbol definition: {field} must not be empty")]
    EmptyField {
        /// Dotted path of the field (e.g. `left_pins[2].number`).
        field: String,
    },
}

/// The edge of the symbol body a pin protrudes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left edge, pin points right (0°).
    Left,
    /// Right edge, pin points left (180°).
    Right,
    /// Top edge, pin points down (270°).
    Top,
    /// Bottom edge, pin points up (90°).
    Bottom,
}

impl Side {
    /// All sides in definition order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Infers the side from a pin angle.
    ///
    /// Only the four exact angles are recognised; anything else is treated
    /// as a left-side pin.
    #[must_use]
    #[allow(clippy::float_cmp)] // Angles are read verbatim from the file
    pub fn from_angle(angle: f64) -> Self {
        if angle == 180.0 {
            Self::Right
        } else if angle == 270.0 {
            Self::Top
        } else if angle == 90.0 {
            Self::Bottom
        } else {
            Self::Left
        }
    }

    /// Returns the pin angle for pins on this side.
    #[must_use]
    pub const fn angle(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Right => 180.0,
            Self::Top => 270.0,
            Self::Bottom => 90.0,
        }
    }

    /// Returns the JSON key of this side's pin list.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Left => "left_pins",
            Self::Right => "right_pins",
            Self::Top => "top_pins",
            Self::Bottom => "bottom_pins",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        })
    }
}

/// An alternate function of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternateDefinition {
    /// Alternate pin name.
    pub name: String,
    /// Electrical type when selected.
    #[serde(default)]
    pub electrical_type: ElectricalType,
    /// Graphical style when selected.
    #[serde(default)]
    pub graphical_style: GraphicalStyle,
}

impl From<&AlternatePin> for AlternateDefinition {
    fn from(alt: &AlternatePin) -> Self {
        Self {
            name: alt.name.clone(),
            electrical_type: alt.electrical_type.clone(),
            graphical_style: alt.graphical_style.clone(),
        }
    }
}

impl From<&AlternateDefinition> for AlternatePin {
    fn from(alt: &AlternateDefinition) -> Self {
        Self {
            name: alt.name.clone(),
            electrical_type: alt.electrical_type.clone(),
            graphical_style: alt.graphical_style.clone(),
        }
    }
}

/// A single pin in a pin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinDefinition {
    /// Pin number (e.g. "1", "A1").
    pub number: String,
    /// Pin name (e.g. "VDD", "~{RESET}").
    pub name: String,
    /// Electrical type.
    #[serde(default)]
    pub electrical_type: ElectricalType,
    /// Graphical style.
    #[serde(default)]
    pub graphical_style: GraphicalStyle,
    /// Hidden pins stack on the previous visible pin of their side.
    #[serde(default)]
    pub hidden: bool,
    /// Alternate pin functions.
    #[serde(default)]
    pub alternates: Vec<AlternateDefinition>,
}

impl PinDefinition {
    /// Creates a visible bidirectional pin.
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            electrical_type: ElectricalType::default(),
            graphical_style: GraphicalStyle::default(),
            hidden: false,
            alternates: Vec::new(),
        }
    }

    /// Sets the electrical type.
    #[must_use]
    pub fn with_type(mut self, electrical_type: ElectricalType) -> Self {
        self.electrical_type = electrical_type;
        self
    }

    /// Marks the pin as hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Renders the alternates as `name:type` joined by `"; "`.
    #[must_use]
    pub fn alternates_summary(&self) -> String {
        self.alternates
            .iter()
            .map(|a| format!("{}:{}", a.name, a.electrical_type))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl From<&Pin> for PinDefinition {
    fn from(pin: &Pin) -> Self {
        Self {
            number: pin.number.clone(),
            name: pin.name.clone(),
            electrical_type: pin.electrical_type.clone(),
            graphical_style: pin.graphical_style.clone(),
            hidden: pin.hidden,
            alternates: pin.alternates.iter().map(AlternateDefinition::from).collect(),
        }
    }
}

fn default_reference() -> String {
    "U".to_string()
}

/// A complete symbol definition for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDefinition {
    /// Symbol name; also used as the Value property.
    pub name: String,
    /// Reference designator prefix.
    #[serde(default = "default_reference")]
    pub reference: String,
    /// Default footprint (`Library:Footprint`).
    #[serde(default)]
    pub footprint: String,
    /// Datasheet URL.
    #[serde(default)]
    pub datasheet: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Search keywords.
    #[serde(default)]
    pub keywords: String,
    /// Footprint filter patterns.
    #[serde(default)]
    pub fp_filters: String,
    /// Pins on the left edge, top to bottom.
    #[serde(default)]
    pub left_pins: Vec<PinDefinition>,
    /// Pins on the right edge, top to bottom.
    #[serde(default)]
    pub right_pins: Vec<PinDefinition>,
    /// Pins on the top edge, left to right.
    #[serde(default)]
    pub top_pins: Vec<PinDefinition>,
    /// Pins on the bottom edge, left to right.
    #[serde(default)]
    pub bottom_pins: Vec<PinDefinition>,
}

impl SymbolDefinition {
    /// Creates an empty definition with default metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: default_reference(),
            footprint: String::new(),
            datasheet: String::new(),
            description: String::new(),
            keywords: String::new(),
            fp_filters: String::new(),
            left_pins: Vec::new(),
            right_pins: Vec::new(),
            top_pins: Vec::new(),
            bottom_pins: Vec::new(),
        }
    }

    /// Parses and validates a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, `name` is missing, or a
    /// required field is empty.
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        let definition: Self = serde_json::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Loads and validates a definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// definition.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DefinitionError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&text)
    }

    /// Serialises the definition as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::EmptyField`] for an empty symbol name or
    /// an empty pin number/name.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyField {
                field: "name".to_string(),
            });
        }
        for side in Side::ALL {
            for (i, pin) in self.pins(side).iter().enumerate() {
                for (field, value) in [("number", &pin.number), ("name", &pin.name)] {
                    if value.trim().is_empty() {
                        return Err(DefinitionError::EmptyField {
                            field: format!("{}[{i}].{field}", side.field_name()),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the pins on one side.
    #[must_use]
    pub fn pins(&self, side: Side) -> &[PinDefinition] {
        match side {
            Side::Left => &self.left_pins,
            Side::Right => &self.right_pins,
            Side::Top => &self.top_pins,
            Side::Bottom => &self.bottom_pins,
        }
    }

    /// Returns a mutable reference to the pins on one side.
    pub fn pins_mut(&mut self, side: Side) -> &mut Vec<PinDefinition> {
        match side {
            Side::Left => &mut self.left_pins,
            Side::Right => &mut self.right_pins,
            Side::Top => &mut self.top_pins,
            Side::Bottom => &mut self.bottom_pins,
        }
    }

    /// Returns the total number of pins across all sides.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        Side::ALL.iter().map(|s| self.pins(*s).len()).sum()
    }
}
