//! Piecewise-linear AQI interpolation over a breakpoint table.

use crate::pollutant::{Breakpoint, MAX_INDEX};

fn interpolate(concentration: f64, segment: &Breakpoint) -> f64 {
    (segment.i_high - segment.i_low) / (segment.c_high - segment.c_low)
        * (concentration - segment.c_low)
        + segment.i_low
}

/// Index value for a normalized concentration.
///
/// Rounding (half away from zero) happens once, on the interpolated index.
/// Concentrations above the table are extrapolated along the last segment
/// and clamped to [`MAX_INDEX`]. A concentration below the table, one that
/// falls between one segment's upper bound and the next segment's lower
/// bound, or a non-finite value has no index.
pub fn compute_index(concentration: f64, breakpoints: &[Breakpoint]) -> Option<u16> {
    if !concentration.is_finite() {
        return None;
    }
    if let Some(segment) = breakpoints
        .iter()
        .find(|s| concentration >= s.c_low && concentration <= s.c_high)
    {
        return Some(interpolate(concentration, segment).round() as u16);
    }
    let last = breakpoints.last()?;
    if concentration > last.c_high {
        let extrapolated = interpolate(concentration, last).min(MAX_INDEX as f64);
        return Some(extrapolated.round() as u16);
    }
    None
}
