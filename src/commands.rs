//! One function per CLI subcommand.
//!
//! Commands return the text to print (or the path written) and leave
//! printing, logging setup and exit codes to the binary.

use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::ToolError;
use crate::fsio;
use crate::kicad::{Symbol, SymbolLib};
use crate::klc::{CheckReport, SymbolChecker};
use crate::symbol::report::{self, PinFormat};
use crate::symbol::{self as sym, LayoutOptions, SymbolDefinition};

fn find_symbol<'a>(lib: &'a SymbolLib, library: &Path, name: &str) -> Result<&'a Symbol, ToolError> {
    lib.get(name).ok_or_else(|| ToolError::SymbolNotFound {
        symbol: name.to_string(),
        library: library.display().to_string(),
    })
}

/// Lists a library's symbols, or summarises one symbol.
///
/// # Errors
///
/// Returns an error if the library cannot be read or the symbol is absent.
pub fn parse(library: &Path, symbol: Option<&str>, verbose: bool) -> Result<String, ToolError> {
    let lib = SymbolLib::open(library)?;
    match symbol {
        Some(name) => {
            let info = sym::symbol_info(find_symbol(&lib, library, name)?);
            Ok(report::render_symbol_info(&info, verbose))
        }
        None => Ok(report::render_symbol_list(
            &library.display().to_string(),
            &sym::list_symbols(&lib),
        )),
    }
}

/// Renders a symbol's pin table.
///
/// # Errors
///
/// Returns [`ToolError::SymbolNotFound`] for an absent symbol and
/// [`ToolError::NoPins`] for a symbol without pins.
pub fn pins(library: &Path, symbol: &str, format: PinFormat) -> Result<String, ToolError> {
    let lib = SymbolLib::open(library)?;
    let rows = sym::pin_table(find_symbol(&lib, library, symbol)?);
    if rows.is_empty() {
        return Err(ToolError::NoPins {
            symbol: symbol.to_string(),
        });
    }
    tracing::info!(symbol, pins = rows.len(), "Extracted pin table");
    Ok(report::render_pins(&rows, format)?)
}

/// Extracts a symbol definition as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the library cannot be read or the symbol is absent.
pub fn extract(library: &Path, symbol: &str) -> Result<String, ToolError> {
    let lib = SymbolLib::open(library)?;
    let def = sym::extract_definition(find_symbol(&lib, library, symbol)?);
    Ok(def.to_json()?)
}

/// Lays out a symbol from a definition file and writes a new library.
///
/// Returns the path written; without `output` this is `<name>.kicad_sym`
/// in the current directory.
///
/// # Errors
///
/// Returns an error if the definition is invalid or the library cannot be
/// written. Nothing is written for an invalid definition.
pub fn generate(
    definition: &Path,
    output: Option<&Path>,
    options: LayoutOptions,
    header: &OutputConfig,
) -> Result<PathBuf, ToolError> {
    let def = SymbolDefinition::load(definition)?;
    let symbol = sym::create_symbol(&def, options);
    let lib = sym::build_library([symbol], &header.library_version, &header.generator);

    let path = output.map_or_else(
        || PathBuf::from(format!("{}.kicad_sym", def.name)),
        Path::to_path_buf,
    );
    lib.save(&path)?;
    tracing::info!(symbol = %def.name, path = %path.display(), "Generated symbol library");
    Ok(path)
}

/// Runs a KLC check on a library.
///
/// # Errors
///
/// Returns an error if the checker cannot be run. A check that runs and
/// fails is reported through [`CheckReport::passed`].
pub fn validate(
    checker: &dyn SymbolChecker,
    library: &Path,
    symbol: Option<&str>,
) -> Result<CheckReport, ToolError> {
    Ok(checker.check(library, symbol)?)
}

/// Writes text to a file via a sibling temporary file and a rename.
///
/// # Errors
///
/// Returns an error if either step fails; the temporary file is removed.
pub fn write_output(path: &Path, text: &str) -> Result<(), ToolError> {
    fsio::write_atomic(path, text).map_err(|e| ToolError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::klc::KlcError;
    use crate::symbol::PinDefinition;

    const LIBRARY: &str = r##"(kicad_symbol_lib
	(version 20241209)
	(generator "test")
	(symbol "CHIP"
		(in_bom yes)
		(on_board yes)
		(property "Reference" "U" (at 0 0 0) (effects (font (size 1.27 1.27))))
		(symbol "CHIP_1_1"
			(pin power_in line (at -10.16 2.54 0) (length 2.54)
				(name "VDD" (effects (font (size 1.27 1.27))))
				(number "1" (effects (font (size 1.27 1.27)))))
			(pin output line (at 10.16 2.54 180) (length 2.54)
				(name "OUT" (effects (font (size 1.27 1.27))))
				(number "2" (effects (font (size 1.27 1.27)))))
		)
	)
	(symbol "EMPTY"
		(property "Reference" "#PWR" (at 0 0 0) (effects (font (size 1.27 1.27))))
	)
)
"##;

    fn library_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.kicad_sym");
        std::fs::write(&path, LIBRARY).unwrap();
        (dir, path)
    }

    #[test]
    fn parse_lists_symbols() {
        let (_dir, path) = library_file();
        let text = parse(&path, None, false).unwrap();
        assert!(text.contains("  - CHIP\n  - EMPTY\n"));
    }

    #[test]
    fn parse_power_symbol_reference() {
        let (_dir, path) = library_file();
        let text = parse(&path, Some("EMPTY"), false).unwrap();
        assert!(text.contains("#PWR"));
    }

    #[test]
    fn parse_missing_symbol() {
        let (_dir, path) = library_file();
        let err = parse(&path, Some("NOPE"), false).unwrap_err();
        assert!(matches!(err, ToolError::SymbolNotFound { .. }));
    }

    #[test]
    fn pins_distinguishes_empty_from_missing() {
        let (_dir, path) = library_file();
        assert!(matches!(
            pins(&path, "EMPTY", PinFormat::Table),
            Err(ToolError::NoPins { .. })
        ));
        assert!(matches!(
            pins(&path, "GONE", PinFormat::Table),
            Err(ToolError::SymbolNotFound { .. })
        ));

        let csv = pins(&path, "CHIP", PinFormat::Csv).unwrap();
        assert!(csv.contains("1,VDD,power_in,line,false,"));
    }

    #[test]
    fn extract_groups_by_side() {
        let (_dir, path) = library_file();
        let json = extract(&path, "CHIP").unwrap();
        let def = SymbolDefinition::from_json(&json).unwrap();
        assert_eq!(def.left_pins[0].name, "VDD");
        assert_eq!(def.right_pins[0].name, "OUT");
    }

    #[test]
    fn generate_writes_library() {
        let dir = tempfile::tempdir().unwrap();
        let def_path = dir.path().join("def.json");
        let mut def = SymbolDefinition::new("GEN");
        def.left_pins.push(PinDefinition::new("1", "IN"));
        std::fs::write(&def_path, def.to_json().unwrap()).unwrap();

        let out = dir.path().join("out.kicad_sym");
        let written = generate(
            &def_path,
            Some(&out),
            LayoutOptions::default(),
            &OutputConfig::default(),
        )
        .unwrap();
        assert_eq!(written, out);

        let lib = SymbolLib::open(&out).unwrap();
        assert_eq!(lib.generator, "kicad_symbol_utils");
        assert_eq!(lib.get("GEN").unwrap().pin_count(), 1);
        assert!(!dir.path().join("out.kicad_sym.tmp").exists());
    }

    #[test]
    fn generate_rejects_invalid_definition_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let def_path = dir.path().join("def.json");
        std::fs::write(&def_path, r#"{"reference": "U"}"#).unwrap();

        let out = dir.path().join("out.kicad_sym");
        let err = generate(
            &def_path,
            Some(&out),
            LayoutOptions::default(),
            &OutputConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Definition(_)));
        assert!(!out.exists());
    }

    struct FakeChecker {
        status: Option<i32>,
        calls: RefCell<Vec<(PathBuf, Option<String>)>>,
    }

    impl SymbolChecker for FakeChecker {
        fn check(&self, library: &Path, symbol: Option<&str>) -> Result<CheckReport, KlcError> {
            self.calls
                .borrow_mut()
                .push((library.to_path_buf(), symbol.map(str::to_string)));
            match self.status {
                Some(status) => Ok(CheckReport {
                    status: Some(status),
                    output: format!("{status} violations"),
                }),
                None => Err(KlcError::CheckerNotFound {
                    path: PathBuf::from("check_symbol.py"),
                }),
            }
        }
    }

    #[test]
    fn validate_passes_through_checker() {
        let checker = FakeChecker {
            status: Some(2),
            calls: RefCell::new(Vec::new()),
        };
        let report = validate(&checker, Path::new("lib.kicad_sym"), Some("CHIP")).unwrap();
        assert!(!report.passed());
        assert_eq!(
            checker.calls.borrow()[0],
            (PathBuf::from("lib.kicad_sym"), Some("CHIP".to_string()))
        );
    }

    #[test]
    fn validate_unavailable_checker_is_an_error() {
        let checker = FakeChecker {
            status: None,
            calls: RefCell::new(Vec::new()),
        };
        let err = validate(&checker, Path::new("lib.kicad_sym"), None).unwrap_err();
        assert!(matches!(err, ToolError::Checker(_)));
    }

    #[test]
    fn write_output_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "old").unwrap();
        write_output(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_output_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(
            write_output(&path, "x"),
            Err(ToolError::Write { .. })
        ));
    }
}
