//! State abstraction: position + nearest target -> [`StateKey`].
//!
//! The encoding is deliberately lossy. Positions snap to a half-unit grid and
//! only the single nearest target is kept, so many world configurations
//! share one row of the value table.

use crate::{identifiers::StateKey, types::Position};

/// Grid resolution on each planar axis.
pub const GRID_STEP: f64 = 0.5;

/// Snap to the nearest multiple of [`GRID_STEP`]; halves round toward +inf.
pub fn snap(value: f64) -> f64 {
    let snapped = (value / GRID_STEP + 0.5).floor() * GRID_STEP;
    // normalize -0.0 so "-0" never appears in a key
    snapped + 0.0
}

/// Index and planar distance of the nearest target.
///
/// Ties keep the first target in list order. Returns `None` for an empty list.
pub fn nearest_target(position: &Position, targets: &[Position]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, target) in targets.iter().enumerate() {
        let dist = position.planar_distance(target);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best
}

/// Planar distance to the nearest target, if any.
pub fn nearest_distance(position: &Position, targets: &[Position]) -> Option<f64> {
    nearest_target(position, targets).map(|(_, dist)| dist)
}

/// Render a number the way the browser game wrote it into keys: shortest
/// round-trip digits, switching to exponent form below `1e-6` and from
/// `1e21` upward.
pub fn format_coordinate(value: f64) -> String {
    let value = value + 0.0;
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

/// Build the table key for `position` given the remaining `targets`.
///
/// Distances use the unsnapped position; the nearest target's coordinates
/// are written at full precision.
pub fn encode(position: &Position, targets: &[Position]) -> StateKey {
    let x = format_coordinate(snap(position.x));
    let z = format_coordinate(snap(position.z));

    match nearest_target(position, targets) {
        Some((idx, _)) => {
            let target = &targets[idx];
            StateKey::new(format!(
                "{x},{z}:{},{}",
                format_coordinate(target.x),
                format_coordinate(target.z)
            ))
        }
        None => StateKey::new(format!("{x},{z}:{}", StateKey::NO_TARGET)),
    }
}
