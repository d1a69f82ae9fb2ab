//! Presentation-side easing between old and new node positions. The core
//! writes final resting positions synchronously; this tween only decides
//! what is drawn each frame.

use eframe::egui::Vec2;

/// Distance below which a display position snaps onto its target.
const SNAP_DISTANCE: f32 = 0.25;
/// Seconds for the remaining distance to halve.
const HALF_LIFE_SECS: f32 = 0.09;

/// Frame-rate independent exponential approach toward `target`.
pub(super) fn approach(current: Vec2, target: Vec2, delta_seconds: f32) -> Vec2 {
    let delta = target - current;
    if delta.length() <= SNAP_DISTANCE {
        return target;
    }
    let remaining = 0.5_f32.powf(delta_seconds / HALF_LIFE_SECS);
    target - delta * remaining
}
