//! Decoder from s-expression trees to symbol library types.
//!
//! Accepts both the KiCad 6/7 spellings (bare `hide` atoms, property
//! `(id N)`) and the KiCad 8+ spellings (`(hide yes)`, no ids).

use super::primitives::{
    AlternatePin, ElectricalType, FillType, Graphic, GraphicalStyle, Pin, Position, Property,
    Rectangle, Unit,
};
use super::{Symbol, SymbolLib, DEFAULT_TEXT_SIZE, DEFAULT_VERSION};
use crate::kicad::sexpr::Sexpr;
use crate::kicad::{KicadError, KicadResult};

/// Default pin length when a pin omits `(length ...)`.
const DEFAULT_PIN_LENGTH: f64 = 2.54;

/// Decodes a `(kicad_symbol_lib ...)` root node.
///
/// # Errors
///
/// Returns an error if the root is not a symbol library or a symbol is
/// missing required fields.
pub fn parse_library(root: &Sexpr) -> KicadResult<SymbolLib> {
    match root.head() {
        Some("kicad_symbol_lib") => {}
        other => {
            return Err(KicadError::wrong_file_type(
                "kicad_symbol_lib",
                other.unwrap_or("<none>"),
            ))
        }
    }

    let mut lib = SymbolLib {
        version: child_atom(root, "version").unwrap_or(DEFAULT_VERSION).to_string(),
        generator: child_atom(root, "generator").unwrap_or_default().to_string(),
        generator_version: child_atom(root, "generator_version").map(str::to_string),
        ..SymbolLib::default()
    };

    for node in root.children("symbol") {
        let symbol = parse_symbol(node)?;
        tracing::trace!(symbol = %symbol.name, pins = symbol.pin_count(), "Parsed symbol");
        lib.symbols.push(symbol);
    }

    Ok(lib)
}

/// Decodes a top-level `(symbol "NAME" ...)` node.
fn parse_symbol(node: &Sexpr) -> KicadResult<Symbol> {
    let name = node
        .atom_at(1)
        .ok_or_else(|| KicadError::invalid_structure("symbol", "missing name"))?;

    let mut symbol = Symbol::new(name);
    symbol.extends = child_atom(node, "extends").map(str::to_string);
    symbol.in_bom = node.flag_value("in_bom").unwrap_or(true);
    symbol.on_board = node.flag_value("on_board").unwrap_or(true);

    if let Some(pin_names) = node.child("pin_names") {
        symbol.pin_names_offset = pin_names.child("offset").and_then(|o| o.number_at(1));
        symbol.hide_pin_names = pin_names.has_flag("hide");
    }
    if let Some(pin_numbers) = node.child("pin_numbers") {
        symbol.hide_pin_numbers = pin_numbers.has_flag("hide");
    }

    for prop in node.children("property") {
        symbol.add_property(parse_property(prop)?);
    }

    for unit_node in node.children("symbol") {
        symbol.add_unit(parse_unit(unit_node, name)?);
    }

    Ok(symbol)
}

/// Decodes a nested `(symbol "NAME_U_S" ...)` unit node.
fn parse_unit(node: &Sexpr, symbol_name: &str) -> KicadResult<Unit> {
    let entry = node
        .atom_at(1)
        .ok_or_else(|| KicadError::invalid_structure("unit", "missing name"))?;

    let (unit_id, style_id) = parse_unit_suffix(entry).unwrap_or_else(|| {
        tracing::warn!(
            symbol = symbol_name,
            unit = entry,
            "Unit name has no _<unit>_<style> suffix, treating as unit 1"
        );
        (1, 1)
    });

    let mut unit = Unit::new(unit_id, style_id);
    for item in node.as_list().unwrap_or_default().iter().skip(2) {
        match item.head() {
            Some("pin") => unit.pins.push(parse_pin(item)?),
            Some("rectangle") => unit.graphics.push(Graphic::Rectangle(parse_rectangle(item)?)),
            Some("unit_name") => {}
            Some(_) => unit.graphics.push(Graphic::Other(item.clone())),
            None => {
                tracing::debug!(unit = entry, item = %item, "Skipping stray atom in unit");
            }
        }
    }

    Ok(unit)
}

/// Splits `NAME_1_2` into `(1, 2)`.
fn parse_unit_suffix(entry: &str) -> Option<(u32, u32)> {
    let mut parts = entry.rsplitn(3, '_');
    let style = parts.next()?.parse().ok()?;
    let unit = parts.next()?.parse().ok()?;
    parts.next()?;
    Some((unit, style))
}

/// Decodes `(pin TYPE STYLE (at X Y A) (length L) (name ...) (number ...) ...)`.
fn parse_pin(node: &Sexpr) -> KicadResult<Pin> {
    let electrical_type = node
        .atom_at(1)
        .map(ElectricalType::from_keyword)
        .ok_or_else(|| KicadError::invalid_structure("pin", "missing electrical type"))?;
    let graphical_style = node
        .atom_at(2)
        .map_or(GraphicalStyle::Line, GraphicalStyle::from_keyword);

    let position = node
        .child("at")
        .map(parse_position)
        .ok_or_else(|| KicadError::invalid_structure("pin", "missing (at ...)"))?;

    let name_node = node
        .child("name")
        .ok_or_else(|| KicadError::invalid_structure("pin", "missing (name ...)"))?;
    let number_node = node
        .child("number")
        .ok_or_else(|| KicadError::invalid_structure("pin", "missing (number ...)"))?;

    let alternates = node
        .children("alternate")
        .filter_map(|alt| {
            let name = alt.atom_at(1)?;
            Some(AlternatePin {
                name: name.to_string(),
                electrical_type: alt
                    .atom_at(2)
                    .map_or_else(ElectricalType::default, ElectricalType::from_keyword),
                graphical_style: alt
                    .atom_at(3)
                    .map_or(GraphicalStyle::Line, GraphicalStyle::from_keyword),
            })
        })
        .collect();

    Ok(Pin {
        electrical_type,
        graphical_style,
        position,
        length: node
            .child("length")
            .and_then(|l| l.number_at(1))
            .unwrap_or(DEFAULT_PIN_LENGTH),
        name: name_node.atom_at(1).unwrap_or_default().to_string(),
        number: number_node.atom_at(1).unwrap_or_default().to_string(),
        hidden: node.has_flag("hide"),
        alternates,
        text_size: text_size(name_node),
    })
}

/// Decodes `(property "KEY" "VALUE" (at ...) (effects ...))`.
fn parse_property(node: &Sexpr) -> KicadResult<Property> {
    let (Some(key), Some(value)) = (node.atom_at(1), node.atom_at(2)) else {
        return Err(KicadError::invalid_structure(
            "property",
            "expected key and value",
        ));
    };

    let effects = node.child("effects");
    Ok(Property {
        key: key.to_string(),
        value: value.to_string(),
        position: node.child("at").map(parse_position).unwrap_or_default(),
        hidden: node.has_flag("hide") || effects.is_some_and(|e| e.has_flag("hide")),
        id: node
            .child("id")
            .and_then(|id| id.atom_at(1))
            .and_then(|id| id.parse().ok()),
        text_size: text_size(node),
    })
}

/// Decodes `(rectangle (start X Y) (end X Y) (stroke ...) (fill ...))`.
fn parse_rectangle(node: &Sexpr) -> KicadResult<Rectangle> {
    let corner = |name: &str| -> KicadResult<(f64, f64)> {
        let c = node.child(name).ok_or_else(|| {
            KicadError::invalid_structure("rectangle", format!("missing ({name} ...)"))
        })?;
        Ok((c.number_at(1).unwrap_or(0.0), c.number_at(2).unwrap_or(0.0)))
    };
    let (start_x, start_y) = corner("start")?;
    let (end_x, end_y) = corner("end")?;

    Ok(Rectangle {
        start_x,
        start_y,
        end_x,
        end_y,
        stroke_width: node
            .child("stroke")
            .and_then(|s| s.child("width"))
            .and_then(|w| w.number_at(1))
            .unwrap_or(0.0),
        fill: node
            .child("fill")
            .and_then(|f| child_atom(f, "type"))
            .map_or(FillType::None, FillType::from_keyword),
    })
}

/// Reads `(at X Y A)`; a written `-0` reads as `0`.
fn parse_position(at: &Sexpr) -> Position {
    let coord = |index| at.number_at(index).unwrap_or(0.0) + 0.0;
    Position::new(coord(1), coord(2), coord(3))
}

/// Reads `(effects (font (size H W)))` below `node`, defaulting to 1.27.
fn text_size(node: &Sexpr) -> f64 {
    node.child("effects")
        .and_then(|e| e.child("font"))
        .and_then(|f| f.child("size"))
        .and_then(|s| s.number_at(1))
        .unwrap_or(DEFAULT_TEXT_SIZE)
}

fn child_atom<'a>(node: &'a Sexpr, name: &str) -> Option<&'a str> {
    node.child(name).and_then(|c| c.atom_at(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicad::sexpr::parse;

    const KICAD7_LIB: &str = r#"(kicad_symbol_lib (version 20220914) (generator kicad_symbol_editor)
  (symbol "nRF52805-CAXX" (pin_names (offset 1.016)) (in_bom yes) (on_board yes)
    (property "Reference" "U" (id 0) (at 0 0 0)
      (effects (font (size 1.27 1.27)))
    )
    (property "Footprint" "Nordic:WLCSP-28" (id 2) (at 0 -5.08 0)
      (effects (font (size 1.27 1.27)) hide)
    )
    (property "ki_description" "Legacy description" (id 4) (at 0 0 0)
      (effects (font (size 1.27 1.27)) hide)
    )
    (symbol "nRF52805-CAXX_0_1"
      (rectangle (start -12.7 15.24) (end 12.7 -15.24)
        (stroke (width 0.254) (type default))
        (fill (type background))
      )
      (polyline (pts (xy 0 0) (xy 1 1)) (stroke (width 0) (type default)) (fill (type none)))
    )
    (symbol "nRF52805-CAXX_1_1"
      (pin power_in line (at -15.24 12.7 0) (length 2.54)
        (name "VDD" (effects (font (size 1.27 1.27))))
        (number "A1" (effects (font (size 1.27 1.27))))
      )
      (pin power_in line (at -15.24 12.7 0) (length 2.54) hide
        (name "VDD" (effects (font (size 1.27 1.27))))
        (number "B1" (effects (font (size 1.27 1.27))))
      )
      (pin bidirectional line (at 15.24 10.16 180) (length 2.54)
        (name "P0.00/XL1" (effects (font (size 1.27 1.27))))
        (number "C3" (effects (font (size 1.27 1.27))))
        (alternate "XL1" input line)
        (alternate "AIN0" input non_logic)
      )
    )
  )
)"#;

    #[test]
    fn parse_kicad7_library() {
        let lib = parse_library(&parse(KICAD7_LIB).unwrap()).unwrap();

        assert_eq!(lib.version, "20220914");
        assert_eq!(lib.generator, "kicad_symbol_editor");
        assert_eq!(lib.len(), 1);

        let symbol = lib.get("nRF52805-CAXX").unwrap();
        assert_eq!(symbol.pin_names_offset, Some(1.016));
        assert_eq!(symbol.properties.len(), 3);
        assert_eq!(symbol.properties[0].id, Some(0));
        assert!(!symbol.properties[0].hidden);
        assert!(symbol.properties[1].hidden);
        assert_eq!(symbol.property("Footprint"), Some("Nordic:WLCSP-28"));

        assert_eq!(symbol.units.len(), 2);
        let body = &symbol.units[0];
        assert_eq!((body.unit_id, body.style_id), (0, 1));
        assert_eq!(body.graphics.len(), 2);
        let rect = body.rectangles().next().unwrap();
        assert!((rect.stroke_width - 0.254).abs() < f64::EPSILON);
        assert_eq!(rect.fill, FillType::Background);

        let pins = &symbol.units[1].pins;
        assert_eq!(pins.len(), 3);
        assert_eq!(pins[0].electrical_type, ElectricalType::PowerIn);
        assert!(!pins[0].hidden);
        assert!(pins[1].hidden);
        assert_eq!(pins[2].position, Position::new(15.24, 10.16, 180.0));
        assert_eq!(pins[2].alternates.len(), 2);
        assert_eq!(pins[2].alternates[1].graphical_style, GraphicalStyle::NonLogic);
    }

    #[test]
    fn parse_kicad8_hide_spelling() {
        let text = r#"(kicad_symbol_lib (version 20231120) (generator "kicad_symbol_editor") (generator_version "8.0")
  (symbol "X" (exclude_from_sim no) (in_bom no) (on_board yes)
    (property "Datasheet" "" (at 0 0 0) (effects (font (size 1.27 1.27)) (hide yes)))
    (symbol "X_1_1"
      (pin passive line (at 0 0 90) (length 2.54) (hide yes)
        (name "~" (effects (font (size 1.27 1.27))))
        (number "1" (effects (font (size 1.27 1.27))))
      )
    )
  )
)"#;
        let lib = parse_library(&parse(text).unwrap()).unwrap();
        assert_eq!(lib.generator_version.as_deref(), Some("8.0"));

        let symbol = lib.get("X").unwrap();
        assert!(!symbol.in_bom);
        assert!(symbol.properties[0].hidden);
        assert!(symbol.units[0].pins[0].hidden);
    }

    #[test]
    fn rejects_footprint_file() {
        let err = parse_library(&parse("(footprint \"R_0603\")").unwrap()).unwrap_err();
        assert!(matches!(err, KicadError::WrongFileType { .. }));
    }

    #[test]
    fn pin_without_number_is_an_error() {
        let text = r#"(kicad_symbol_lib (symbol "X" (symbol "X_1_1" (pin input line (at 0 0 0) (name "A")))))"#;
        let err = parse_library(&parse(text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        let at = parse("(at 5.08 -0 -0)").unwrap();
        let position = parse_position(&at);
        assert!(position.y.is_sign_positive());
        assert!(position.angle.is_sign_positive());
        assert_eq!(position, Position::new(5.08, 0.0, 0.0));
    }

    #[test]
    fn unit_suffix_parsing() {
        assert_eq!(parse_unit_suffix("R_1_1"), Some((1, 1)));
        assert_eq!(parse_unit_suffix("My_Part_2_1"), Some((2, 1)));
        assert_eq!(parse_unit_suffix("Part_0_1"), Some((0, 1)));
        assert_eq!(parse_unit_suffix("Part"), None);
        assert_eq!(parse_unit_suffix("1_1"), None);
    }
}
