//! Encoder from symbol library types to s-expression trees.
//!
//! Output follows the KiCad 8+ spelling: `(hide yes)` flags, no property
//! ids unless the property was read with one.

use super::primitives::{AlternatePin, Graphic, Pin, Position, Property, Rectangle, Unit};
use super::{Symbol, SymbolLib};
use crate::kicad::sexpr::Sexpr;

/// Encodes a whole library.
#[must_use]
pub fn encode_library(lib: &SymbolLib) -> Sexpr {
    let mut items = vec![
        Sexpr::node("version", [Sexpr::symbol(&lib.version)]),
        Sexpr::node("generator", [Sexpr::string(&lib.generator)]),
    ];
    if let Some(version) = &lib.generator_version {
        items.push(Sexpr::node("generator_version", [Sexpr::string(version)]));
    }
    items.extend(lib.symbols.iter().map(encode_symbol));
    Sexpr::node("kicad_symbol_lib", items)
}

/// Encodes one symbol with its properties and units.
#[must_use]
pub fn encode_symbol(symbol: &Symbol) -> Sexpr {
    let mut items = vec![Sexpr::string(&symbol.name)];

    if let Some(parent) = &symbol.extends {
        items.push(Sexpr::node("extends", [Sexpr::string(parent)]));
    }
    if symbol.hide_pin_numbers {
        items.push(Sexpr::node("pin_numbers", [Sexpr::flag("hide", true)]));
    }
    if symbol.pin_names_offset.is_some() || symbol.hide_pin_names {
        let mut pin_names = Vec::new();
        if let Some(offset) = symbol.pin_names_offset {
            pin_names.push(Sexpr::node("offset", [Sexpr::number(offset)]));
        }
        if symbol.hide_pin_names {
            pin_names.push(Sexpr::flag("hide", true));
        }
        items.push(Sexpr::node("pin_names", pin_names));
    }
    items.push(Sexpr::flag("exclude_from_sim", false));
    items.push(Sexpr::flag("in_bom", symbol.in_bom));
    items.push(Sexpr::flag("on_board", symbol.on_board));

    items.extend(symbol.properties.iter().map(encode_property));
    items.extend(symbol.units.iter().map(|u| encode_unit(u, &symbol.name)));

    Sexpr::node("symbol", items)
}

fn encode_unit(unit: &Unit, symbol_name: &str) -> Sexpr {
    let mut items = vec![Sexpr::string(unit.entry_name(symbol_name))];
    for graphic in &unit.graphics {
        items.push(match graphic {
            Graphic::Rectangle(rect) => encode_rectangle(rect),
            Graphic::Other(raw) => raw.clone(),
        });
    }
    items.extend(unit.pins.iter().map(encode_pin));
    Sexpr::node("symbol", items)
}

fn encode_property(prop: &Property) -> Sexpr {
    let mut items = vec![Sexpr::string(&prop.key), Sexpr::string(&prop.value)];
    if let Some(id) = prop.id {
        items.push(Sexpr::node("id", [Sexpr::symbol(id.to_string())]));
    }
    items.push(encode_at(prop.position));

    let mut effects = vec![encode_font(prop.text_size)];
    if prop.hidden {
        effects.push(Sexpr::flag("hide", true));
    }
    items.push(Sexpr::node("effects", effects));
    Sexpr::node("property", items)
}

fn encode_rectangle(rect: &Rectangle) -> Sexpr {
    Sexpr::node(
        "rectangle",
        [
            Sexpr::node(
                "start",
                [Sexpr::number(rect.start_x), Sexpr::number(rect.start_y)],
            ),
            Sexpr::node("end", [Sexpr::number(rect.end_x), Sexpr::number(rect.end_y)]),
            Sexpr::node(
                "stroke",
                [
                    Sexpr::node("width", [Sexpr::number(rect.stroke_width)]),
                    Sexpr::node("type", [Sexpr::symbol("default")]),
                ],
            ),
            Sexpr::node(
                "fill",
                [Sexpr::node("type", [Sexpr::symbol(rect.fill.keyword())])],
            ),
        ],
    )
}

fn encode_pin(pin: &Pin) -> Sexpr {
    let mut items = vec![
        Sexpr::symbol(pin.electrical_type.keyword()),
        Sexpr::symbol(pin.graphical_style.keyword()),
        encode_at(pin.position),
        Sexpr::node("length", [Sexpr::number(pin.length)]),
    ];
    if pin.hidden {
        items.push(Sexpr::flag("hide", true));
    }
    items.push(Sexpr::node(
        "name",
        [
            Sexpr::string(&pin.name),
            Sexpr::node("effects", [encode_font(pin.text_size)]),
        ],
    ));
    items.push(Sexpr::node(
        "number",
        [
            Sexpr::string(&pin.number),
            Sexpr::node("effects", [encode_font(pin.text_size)]),
        ],
    ));
    items.extend(pin.alternates.iter().map(encode_alternate));
    Sexpr::node("pin", items)
}

fn encode_alternate(alt: &AlternatePin) -> Sexpr {
    Sexpr::node(
        "alternate",
        [
            Sexpr::string(&alt.name),
            Sexpr::symbol(alt.electrical_type.keyword()),
            Sexpr::symbol(alt.graphical_style.keyword()),
        ],
    )
}

fn encode_at(position: Position) -> Sexpr {
    Sexpr::node(
        "at",
        [
            Sexpr::number(position.x),
            Sexpr::number(position.y),
            Sexpr::number(position.angle),
        ],
    )
}

fn encode_font(size: f64) -> Sexpr {
    Sexpr::node(
        "font",
        [Sexpr::node("size", [Sexpr::number(size), Sexpr::number(size)])],
    )
}
