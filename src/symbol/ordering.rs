//! Deterministic pin ordering.
//!
//! Two independent keys:
//!
//! - [`name_rank`] groups pins by function so that generated symbols read
//!   the same way across a device family: crystal pins first, then GPIO by
//!   port, antenna, debug, power, decoupling, ground, and everything else.
//! - [`number_rank`] orders pin numbers, with plain numbers before BGA-style
//!   grid identifiers (`A1`, `B12`, `AA3`).
//!
//! Both keys are used with stable sorts, so pins that compare equal keep
//! their input order.

use std::sync::OnceLock;

use regex::Regex;

/// Debug/programming pins in display order.
const DEBUG_PINS: [&str; 4] = ["RESET", "SWDIO", "SWDCLK", "SWO"];

/// Known decoupling pins in display order. Other `DEC*`/`CFLY*` names follow.
const DECOUPLING_PINS: [&str; 6] = ["DECRF", "DECA", "DECB", "DECD", "CFLYL", "CFLYH"];

/// Functional category of a pin name, in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameCategory {
    /// Crystal/oscillator pins (`XC1`, `XL2`).
    Crystal = 0,
    /// GPIO port 1 (`P1.<n>`).
    GpioPort1 = 1,
    /// GPIO port 0 (`P0.<n>`).
    GpioPort0 = 2,
    /// Any other GPIO port (`P<k>.<n>`).
    GpioOther = 3,
    /// Antenna (`ANT`).
    Antenna = 4,
    /// Reset and SWD pins.
    Debug = 5,
    /// Supply pins (`VDD*`, `DCC`).
    Power = 6,
    /// Decoupling and flying-capacitor pins (`DEC*`, `CFLY*`).
    Decoupling = 7,
    /// Ground pins (`VSS*`).
    Ground = 8,
    /// Everything else.
    Other = 9,
}

/// Sort key for a pin name.
///
/// `major`/`minor` only order pins within the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameRank {
    /// Functional category.
    pub category: NameCategory,
    /// First tie-breaker (GPIO port, crystal index, sub-order).
    pub major: u64,
    /// Second tie-breaker (GPIO pin).
    pub minor: u64,
}

impl NameRank {
    const fn new(category: NameCategory, major: u64, minor: u64) -> Self {
        Self {
            category,
            major,
            minor,
        }
    }
}

/// Whether a pin number is purely numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumberKind {
    /// Decimal digits only.
    Numeric,
    /// Anything containing a non-digit.
    Alpha,
}

/// Sort key for a pin number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumberRank {
    /// Numeric before alphanumeric.
    pub kind: NumberKind,
    /// Integer value, or `row * 100 + column` for grid identifiers.
    pub value: u64,
    /// Letter prefix for grid identifiers, the full text for unparsed ones.
    pub text: String,
}

fn gpio_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^P([0-9]+)\.([0-9]+)").expect("static regex"))
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static regex"))
}

fn grid_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+)([0-9]+)$").expect("static regex"))
}

/// Parses a run of decimal digits, saturating on overflow.
fn parse_digits(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Removes an active-low overbar from a pin name.
///
/// Handles the KiCad 6+ `~{NAME}` form and the KiCad 5 `~NAME` / `~NAME~`
/// toggles.
#[must_use]
pub fn strip_inversion(name: &str) -> &str {
    let name = name.trim();
    if let Some(inner) = name.strip_prefix("~{").and_then(|s| s.strip_suffix('}')) {
        return inner;
    }
    let name = name.strip_prefix('~').unwrap_or(name);
    name.strip_suffix('~').unwrap_or(name)
}

/// Classifies a pin name into its sort key.
///
/// Matching is case-insensitive and ignores inversion markers.
///
/// # Examples
///
/// ```
/// use kicad_symbol_utils::symbol::ordering::{name_rank, NameCategory};
///
/// assert_eq!(name_rank("P0.05/AIN3").category, NameCategory::GpioPort0);
/// assert!(name_rank("XC1") < name_rank("~{RESET}"));
/// ```
#[must_use]
pub fn name_rank(name: &str) -> NameRank {
    let upper = strip_inversion(name).to_uppercase();
    let upper = upper.as_str();

    if upper.starts_with("XC") || upper.starts_with("XL") {
        let index = integer_regex()
            .find(upper)
            .map_or(0, |m| parse_digits(m.as_str()));
        return NameRank::new(NameCategory::Crystal, index, 0);
    }

    if let Some(caps) = gpio_regex().captures(upper) {
        let port = parse_digits(&caps[1]);
        let pin = parse_digits(&caps[2]);
        let category = match port {
            1 => NameCategory::GpioPort1,
            0 => NameCategory::GpioPort0,
            _ => NameCategory::GpioOther,
        };
        return NameRank::new(category, port, pin);
    }

    if upper == "ANT" {
        return NameRank::new(NameCategory::Antenna, 0, 0);
    }

    if let Some(index) = DEBUG_PINS.iter().position(|p| *p == upper) {
        return NameRank::new(NameCategory::Debug, index as u64, 0);
    }

    if upper.starts_with("VDD") {
        return NameRank::new(NameCategory::Power, 0, 0);
    }
    if upper == "DCC" {
        return NameRank::new(NameCategory::Power, 1, 0);
    }

    if upper.starts_with("DEC") || upper.starts_with("CFLY") {
        let index = DECOUPLING_PINS
            .iter()
            .position(|p| *p == upper)
            .unwrap_or(DECOUPLING_PINS.len());
        return NameRank::new(NameCategory::Decoupling, index as u64, 0);
    }

    if upper.starts_with("VSS") {
        return NameRank::new(NameCategory::Ground, 0, 0);
    }

    NameRank::new(NameCategory::Other, 0, 0)
}

/// Builds the sort key for a pin number.
///
/// # Examples
///
/// ```
/// use kicad_symbol_utils::symbol::ordering::number_rank;
///
/// assert!(number_rank("10") < number_rank("A1"));
/// assert!(number_rank("A12") < number_rank("B1"));
/// ```
#[must_use]
pub fn number_rank(number: &str) -> NumberRank {
    if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) {
        return NumberRank {
            kind: NumberKind::Numeric,
            value: parse_digits(number),
            text: String::new(),
        };
    }

    if let Some(caps) = grid_number_regex().captures(number) {
        let letters = &caps[1];
        let row = letters.bytes().fold(0_u64, |acc, b| {
            acc.saturating_mul(26).saturating_add(u64::from(b - b'A'))
        });
        return NumberRank {
            kind: NumberKind::Alpha,
            value: row.saturating_mul(100).saturating_add(parse_digits(&caps[2])),
            text: letters.to_string(),
        };
    }

    NumberRank {
        kind: NumberKind::Alpha,
        value: 0,
        text: number.to_string(),
    }
}

/// Stable-sorts `items` by the functional rank of the name `key` returns.
pub fn sort_by_name<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| name_rank(key(item)));
}

/// Stable-sorts `items` by the rank of the pin number `key` returns.
pub fn sort_by_number<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| number_rank(key(item)));
}
