//! Pixel-space vector aliases and small geometry helpers.
//!
//! World coordinates are screen-style: +X right, +Y down. Headings are in
//! degrees, counter-clockwise from +X as seen on screen.

use serde::{Deserialize, Serialize};

pub type Vec2f = bevy_math::Vec2;
pub type Vec2i = bevy_math::IVec2;

/// Wrap a heading into `[0, 360)`.
#[inline]
pub fn normalize_heading(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let h = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Point reached from `origin` after moving `distance` along `heading_deg`.
/// Each axis moves by whole pixels only, truncated toward zero, so a body
/// slower than one pixel per frame holds its place.
#[inline]
pub fn advance_along_heading(origin: Vec2f, heading_deg: f32, distance: f32) -> Vec2f {
    let rad = (-heading_deg).to_radians();
    let delta = Vec2f::new(distance * rad.cos(), distance * rad.sin());
    origin + delta.trunc()
}

/// Linear remap, Arduino `map()` style. No clamping.
#[inline]
pub fn range_value(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    (value - in_min) / span * (out_max - out_min) + out_min
}

/// Integer axis-aligned rectangle in pixel space, `min` inclusive, `size` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub min: Vec2i,
    pub size: Vec2i,
}

impl PixelRect {
    pub const fn new(min: Vec2i, size: Vec2i) -> Self { Self { min, size } }

    /// Rect of `size` whose center lands on `center`, using floor division so
    /// odd sizes bias toward the top-left like a blit rect.
    pub fn centered_at(center: Vec2f, size: Vec2i) -> Self {
        let c = center.floor().as_ivec2();
        Self { min: c - size / 2, size }
    }

    pub fn max_exclusive(&self) -> Vec2i { self.min + self.size }

    pub fn is_empty(&self) -> bool { self.size.x <= 0 || self.size.y <= 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_wraps_both_directions() {
        assert!((normalize_heading(370.0) - 10.0).abs() < 1e-4);
        assert!((normalize_heading(-30.0) - 330.0).abs() < 1e-4);
        assert_eq!(normalize_heading(360.0), 0.0);
        let tiny = normalize_heading(-1e-7);
        assert!((0.0..360.0).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn heading_90_moves_up_screen() {
        let p = advance_along_heading(Vec2f::new(10.0, 10.0), 90.0, 5.0);
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!((p.y - 5.0).abs() < 1e-4, "y should decrease, got {}", p.y);
    }

    #[test]
    fn fractional_steps_truncate_toward_zero() {
        let origin = Vec2f::new(100.0, 100.0);
        assert_eq!(advance_along_heading(origin, 0.0, 0.9), origin);
        assert_eq!(advance_along_heading(origin, 0.0, 2.7), Vec2f::new(102.0, 100.0));
        assert_eq!(advance_along_heading(origin, 180.0, 2.7), Vec2f::new(98.0, 100.0));
        // 45 degrees: 2.5 * cos = 1.77 right, 1.77 up
        assert_eq!(advance_along_heading(origin, 45.0, 2.5), Vec2f::new(101.0, 99.0));
    }

    #[test]
    fn centered_rect_biases_top_left() {
        let r = PixelRect::centered_at(Vec2f::new(10.0, 10.0), Vec2i::new(5, 4));
        assert_eq!(r.min, Vec2i::new(8, 8));
        assert_eq!(r.max_exclusive(), Vec2i::new(13, 12));
    }
}
