//! Grid snapping.
//!
//! KLC S4.1 requires pin endpoints on the 100 mil (2.54 mm) grid. Every
//! coordinate the layout engine emits goes through [`snap`].

/// The 100 mil schematic grid, in millimetres.
pub const GRID_SIZE: f64 = 2.54;

/// Returns the multiple of `grid` nearest to `value`.
///
/// Exact halves round to the even multiple. The quotient is first rounded to
/// six decimals so that a computed half height such as
/// `(9.0 * 2.54 + 5.08) / 2.0`, which comes out as 5.499999999999999 grid
/// steps in binary floating point, is treated as the exact half it is.
///
/// # Examples
///
/// ```
/// use kicad_symbol_utils::symbol::grid::{snap, GRID_SIZE};
///
/// assert_eq!(snap(3.0, GRID_SIZE), 2.54);
/// assert_eq!(snap(-1.3, GRID_SIZE), -2.54);
/// ```
#[must_use]
pub fn snap(value: f64, grid: f64) -> f64 {
    let steps = ((value / grid) * 1_000_000.0).round() / 1_000_000.0;
    let snapped = steps.round_ties_even() * grid;
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// Returns true if `value` is an integer multiple of `grid`.
#[must_use]
pub fn is_on_grid(value: f64, grid: f64) -> bool {
    let steps = value / grid;
    (steps - steps.round()).abs() < 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_to_nearest_multiple() {
        assert!((snap(2.0, GRID_SIZE) - 2.54).abs() < 1e-9);
        assert!((snap(1.0, GRID_SIZE)).abs() < 1e-9);
        assert!((snap(7.62, GRID_SIZE) - 7.62).abs() < 1e-9);
        assert!((snap(-8.0, GRID_SIZE) + 7.62).abs() < 1e-9);
    }

    #[test]
    fn exact_halves_round_to_even() {
        // 6.35 = 2.5 grid steps, 8.89 = 3.5 grid steps
        assert!((snap(6.35, GRID_SIZE) - 5.08).abs() < 1e-9);
        assert!((snap(8.89, GRID_SIZE) - 10.16).abs() < 1e-9);
        assert!((snap(-1.27, GRID_SIZE)).abs() < 1e-9);
    }

    #[test]
    fn halves_below_by_float_error_still_tie() {
        // 5.499999999999999 and 6.500000000000001 grid steps before cleanup
        assert!((snap(13.969_999_999_999_999, GRID_SIZE) - 15.24).abs() < 1e-9);
        assert!((snap(16.51, GRID_SIZE) - 15.24).abs() < 1e-9);
    }

    #[test]
    fn never_returns_negative_zero() {
        let zero = snap(-0.1, GRID_SIZE);
        assert!(zero.is_sign_positive());
    }

    #[test]
    fn on_grid_check() {
        assert!(is_on_grid(snap(123.456, GRID_SIZE), GRID_SIZE));
        assert!(is_on_grid(-15.24, GRID_SIZE));
        assert!(!is_on_grid(6.35, GRID_SIZE));
        assert!(is_on_grid(0.0, GRID_SIZE));
    }

    #[test]
    fn custom_grid() {
        assert!((snap(1.0, 1.27) - 1.27).abs() < 1e-9);
        assert!((snap(0.6, 0.5) - 0.5).abs() < 1e-9);
    }
}
