//! File I/O roundtrip tests for `SymbolLib`.
//!
//! These tests verify that libraries can be written to files and read back
//! with all data preserved, and that files in the KiCad 7 and KiCad 8
//! spellings load the same way.

use kicad_symbol_utils::kicad::symlib::{
    AlternatePin, ElectricalType, FillType, Graphic, GraphicalStyle, Pin, Position, Property,
    Rectangle, Symbol, SymbolLib, Unit,
};
use kicad_symbol_utils::kicad::KicadError;
use tempfile::TempDir;

fn test_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to compare floats with tolerance.
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn regulator() -> Symbol {
    let mut symbol = Symbol::new("LDO-3V3");
    symbol.pin_names_offset = Some(0.254);
    symbol.add_property(Property::new("Reference", "U", 0.0, 3.81));
    symbol.add_property(Property::new("Value", "LDO-3V3", 0.0, -3.81));
    symbol.add_property(
        Property::new("Footprint", "Package_TO_SOT_SMD:SOT-23", 0.0, 0.0).hidden(),
    );

    let mut body = Unit::new(0, 1);
    let mut rect = Rectangle::new(-5.08, 2.54, 5.08, -2.54);
    rect.stroke_width = 0.254;
    rect.fill = FillType::Background;
    body.graphics.push(Graphic::Rectangle(rect));
    symbol.add_unit(body);

    let mut unit = Unit::new(1, 1);
    let mut vin = Pin::new("VIN", "1", Position::new(-7.62, 0.0, 0.0), 2.54);
    vin.electrical_type = ElectricalType::PowerIn;
    let mut gnd = Pin::new("GND", "2", Position::new(0.0, -5.08, 90.0), 2.54);
    gnd.electrical_type = ElectricalType::PowerIn;
    let mut vout = Pin::new("VOUT", "3", Position::new(7.62, 0.0, 180.0), 2.54);
    vout.electrical_type = ElectricalType::PowerOut;
    let mut tab = Pin::new("GND", "4", Position::new(0.0, -5.08, 90.0), 2.54);
    tab.electrical_type = ElectricalType::Passive;
    tab.hidden = true;
    unit.pins.extend([vin, gnd, vout, tab]);
    symbol.add_unit(unit);
    symbol
}

// =============================================================================
// Write → Read Roundtrip Tests
// =============================================================================

#[test]
fn symlib_file_roundtrip_simple_symbol() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("regulators.kicad_sym");

    let mut lib = SymbolLib::new();
    lib.add_symbol(regulator());
    lib.save(&file_path).expect("Failed to write");

    let read_lib = SymbolLib::open(&file_path).expect("Failed to read");
    assert_eq!(
        read_lib.filepath.as_deref(),
        Some(file_path.display().to_string().as_str())
    );
    assert_eq!(read_lib.len(), 1);
    assert_eq!(read_lib.get("LDO-3V3"), Some(&regulator()));
}

#[test]
fn symlib_file_roundtrip_multiple_symbols() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("multi.kicad_sym");

    let mut lib = SymbolLib::new();
    for name in ["C", "A", "B"] {
        let mut symbol = regulator();
        symbol.name = name.to_string();
        lib.add_symbol(symbol);
    }
    lib.save(&file_path).expect("Failed to write");

    let read_lib = SymbolLib::open(&file_path).expect("Failed to read");
    let names: Vec<&str> = read_lib.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["C", "A", "B"]);
    assert_eq!(read_lib.get("B").map(Symbol::pin_count), Some(4));
}

#[test]
fn symlib_file_roundtrip_pin_types() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("pin_types.kicad_sym");

    let types = [
        ElectricalType::Input,
        ElectricalType::Output,
        ElectricalType::Bidirectional,
        ElectricalType::PowerIn,
        ElectricalType::PowerOut,
        ElectricalType::Passive,
        ElectricalType::TriState,
        ElectricalType::OpenCollector,
        ElectricalType::OpenEmitter,
        ElectricalType::Unspecified,
        ElectricalType::Free,
        ElectricalType::NoConnect,
    ];
    let styles = [
        GraphicalStyle::Line,
        GraphicalStyle::Inverted,
        GraphicalStyle::Clock,
        GraphicalStyle::InvertedClock,
        GraphicalStyle::InputLow,
        GraphicalStyle::ClockLow,
        GraphicalStyle::OutputLow,
        GraphicalStyle::EdgeClockHigh,
        GraphicalStyle::NonLogic,
    ];

    let mut symbol = Symbol::new("TYPES");
    let mut unit = Unit::new(1, 1);
    for (i, etype) in types.iter().enumerate() {
        let y = -2.54 * f64::from(u32::try_from(i).unwrap());
        let position = Position::new(-5.08, y, 0.0);
        let mut pin = Pin::new(format!("P{i}"), (i + 1).to_string(), position, 2.54);
        pin.electrical_type = etype.clone();
        pin.graphical_style = styles[i % styles.len()].clone();
        unit.pins.push(pin);
    }
    symbol.add_unit(unit);

    let mut lib = SymbolLib::new();
    lib.add_symbol(symbol.clone());
    lib.save(&file_path).expect("Failed to write");

    let read_lib = SymbolLib::open(&file_path).expect("Failed to read");
    let read = read_lib.get("TYPES").expect("Symbol not found");
    for (expected, actual) in symbol.pins().zip(read.pins()) {
        assert_eq!(expected.electrical_type, actual.electrical_type);
        assert_eq!(expected.graphical_style, actual.graphical_style);
    }
}

#[test]
fn symlib_file_roundtrip_alternates() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("alternates.kicad_sym");

    let mut symbol = Symbol::new("MCU");
    let mut unit = Unit::new(1, 1);
    let mut pin = Pin::new("P0.02", "4", Position::new(-10.16, 0.0, 0.0), 2.54);
    pin.alternates = vec![
        AlternatePin {
            name: "AIN0".to_string(),
            electrical_type: ElectricalType::Input,
            graphical_style: GraphicalStyle::Line,
        },
        AlternatePin {
            name: "NFC1".to_string(),
            electrical_type: ElectricalType::Passive,
            graphical_style: GraphicalStyle::NonLogic,
        },
    ];
    unit.pins.push(pin);
    symbol.add_unit(unit);

    let mut lib = SymbolLib::new();
    lib.add_symbol(symbol);
    lib.save(&file_path).expect("Failed to write");

    let read_lib = SymbolLib::open(&file_path).expect("Failed to read");
    let alternates = &read_lib.get("MCU").unwrap().units[0].pins[0].alternates;
    assert_eq!(alternates.len(), 2);
    assert_eq!(alternates[1].name, "NFC1");
    assert_eq!(alternates[1].graphical_style, GraphicalStyle::NonLogic);
}

#[test]
fn save_overwrites_existing_file_without_leftovers() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("overwrite.kicad_sym");
    std::fs::write(&file_path, "garbage").unwrap();

    let mut lib = SymbolLib::new();
    lib.add_symbol(regulator());
    lib.save(&file_path).expect("Failed to write");

    assert!(SymbolLib::open(&file_path).is_ok());
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

// =============================================================================
// Reading Files Written by KiCad
// =============================================================================

const KICAD7_LIBRARY: &str = r#"(kicad_symbol_lib (version 20220914) (generator kicad_symbol_editor)
  (symbol "NE555" (pin_names (offset 1.016)) (in_bom yes) (on_board yes)
    (property "Reference" "U" (id 0) (at -10.16 8.89 0)
      (effects (font (size 1.27 1.27)) (justify left))
    )
    (property "Value" "NE555" (id 1) (at 2.54 8.89 0)
      (effects (font (size 1.27 1.27)) (justify left))
    )
    (property "Footprint" "" (id 2) (at 0 0 0)
      (effects (font (size 1.27 1.27)) hide)
    )
    (property "ki_description" "Precision Timers, 555 compatible" (id 4) (at 0 0 0)
      (effects (font (size 1.27 1.27)) hide)
    )
    (symbol "NE555_0_0"
      (pin power_in line (at 0 -10.16 90) (length 2.54)
        (name "GND" (effects (font (size 1.27 1.27))))
        (number "1" (effects (font (size 1.27 1.27))))
      )
    )
    (symbol "NE555_0_1"
      (rectangle (start -8.89 -7.62) (end 8.89 7.62)
        (stroke (width 0.254) (type default))
        (fill (type background))
      )
      (polyline (pts (xy 0 0) (xy 1 1)) (stroke (width 0) (type default)) (fill (type none)))
    )
    (symbol "NE555_1_1"
      (pin input line (at -12.7 -5.08 0) (length 2.54)
        (name "TR" (effects (font (size 1.27 1.27))))
        (number "2" (effects (font (size 1.27 1.27))))
      )
      (pin input inverted (at -12.7 5.08 0) (length 2.54)
        (name "R" (effects (font (size 1.27 1.27))))
        (number "4" (effects (font (size 1.27 1.27))))
      )
      (pin power_in line (at 0 10.16 270) (length 2.54) hide
        (name "VCC" (effects (font (size 1.27 1.27))))
        (number "8" (effects (font (size 1.27 1.27))))
      )
    )
  )
)
"#;

#[test]
fn read_kicad7_library() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("timer.kicad_sym");
    std::fs::write(&file_path, KICAD7_LIBRARY).unwrap();

    let lib = SymbolLib::open(&file_path).expect("Failed to read");
    assert_eq!(lib.version, "20220914");
    assert_eq!(lib.generator, "kicad_symbol_editor");

    let symbol = lib.get("NE555").expect("Symbol not found");
    assert_eq!(symbol.units.len(), 3);
    assert_eq!(symbol.pin_count(), 4);
    assert!(approx_eq(symbol.pin_names_offset.unwrap(), 1.016));

    let footprint = &symbol.properties[2];
    assert!(footprint.hidden);
    assert_eq!(footprint.id, Some(2));

    let vcc = symbol.pins().find(|p| p.number == "8").unwrap();
    assert!(vcc.hidden);
    assert!(approx_eq(vcc.position.angle, 270.0));

    let reset = symbol.pins().find(|p| p.number == "4").unwrap();
    assert_eq!(reset.graphical_style, GraphicalStyle::Inverted);

    let body = &symbol.units[1];
    assert_eq!(body.rectangles().count(), 1);
    assert!(matches!(body.graphics[1], Graphic::Other(_)));
}

#[test]
fn kicad7_library_survives_rewrite() {
    let temp_dir = test_temp_dir();
    let file_path = temp_dir.path().join("timer.kicad_sym");

    let lib = SymbolLib::read(KICAD7_LIBRARY).expect("Failed to read");
    lib.save(&file_path).expect("Failed to write");

    let reread = SymbolLib::open(&file_path).expect("Failed to re-read");
    assert_eq!(reread.symbols, lib.symbols);

    let text = std::fs::read_to_string(&file_path).unwrap();
    assert!(text.contains("(polyline"));
    assert!(text.contains("(hide yes)"));
}

#[test]
fn reject_non_symbol_library() {
    let err = SymbolLib::read("(kicad_pcb (version 20240108))").unwrap_err();
    assert!(matches!(err, KicadError::WrongFileType { .. }));
}

#[test]
fn reject_truncated_file() {
    let truncated = &KICAD7_LIBRARY[..KICAD7_LIBRARY.len() / 2];
    assert!(matches!(
        SymbolLib::read(truncated),
        Err(KicadError::Syntax { .. })
    ));
}

#[test]
fn missing_file_reports_path() {
    let err = SymbolLib::open("/nonexistent/lib.kicad_sym").unwrap_err();
    assert!(matches!(err, KicadError::FileRead { .. }));
    assert!(err.to_string().contains("/nonexistent/lib.kicad_sym"));
}
