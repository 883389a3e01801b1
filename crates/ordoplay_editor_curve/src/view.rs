// SPDX-License-Identifier: MIT OR Apache-2.0
//! View transform between curve space and widget pixels.
//!
//! Curve space is `(time, value)`, widget space is pixels relative to the
//! widget's top-left corner with Y pointing down. Screen space is egui's
//! absolute coordinates; the view remembers its last screen rectangle so
//! regions coming from other widgets can be mapped back.

use crate::settings::UseMode;
use egui::{Pos2, Rect, Vec2};

/// Pixels covered by one curve unit at zoom 1.0
pub const PIXELS_PER_UNIT: f32 = 100.0;

const FIT_MARGIN: f32 = 0.1;

/// Offset, zoom and viewport of one curve editor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveView {
    /// Curve-space point at the bottom-left corner of the widget
    pub offset: Vec2,
    /// Zoom factor per axis
    pub scale: Vec2,
    /// Last screen rectangle the widget occupied
    pub screen_rect: Rect,
}

impl Default for CurveView {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: Vec2::splat(1.0),
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 200.0)),
        }
    }
}

impl CurveView {
    /// Widget size in pixels
    pub fn size(&self) -> Vec2 {
        self.screen_rect.size()
    }

    /// Pixels per curve unit on each axis
    pub fn pixels_per_unit(&self) -> Vec2 {
        self.scale * PIXELS_PER_UNIT
    }

    /// Map a curve point into widget pixels
    pub fn curve_to_view(&self, time: f32, value: f32) -> Pos2 {
        let ppu = self.pixels_per_unit();
        Pos2::new(
            (time - self.offset.x) * ppu.x,
            self.size().y - (value - self.offset.y) * ppu.y,
        )
    }

    /// Map widget pixels back to `(time, value)`
    pub fn view_to_curve(&self, pos: Pos2) -> (f32, f32) {
        let ppu = self.pixels_per_unit();
        (
            pos.x / ppu.x + self.offset.x,
            (self.size().y - pos.y) / ppu.y + self.offset.y,
        )
    }

    /// Convert a screen position into widget pixels
    pub fn screen_to_view(&self, pos: Pos2) -> Pos2 {
        pos - self.screen_rect.min.to_vec2()
    }

    /// Convert widget pixels into a screen position
    pub fn view_to_screen(&self, pos: Pos2) -> Pos2 {
        pos + self.screen_rect.min.to_vec2()
    }

    /// Visible time range
    pub fn visible_times(&self) -> (f32, f32) {
        let (start, _) = self.view_to_curve(Pos2::ZERO);
        let (end, _) = self.view_to_curve(Pos2::new(self.size().x, 0.0));
        (start, end)
    }

    /// Visible value range, bottom to top
    pub fn visible_values(&self) -> (f32, f32) {
        let (_, bottom) = self.view_to_curve(Pos2::new(0.0, self.size().y));
        let (_, top) = self.view_to_curve(Pos2::ZERO);
        (bottom, top)
    }

    /// Pan by a pixel delta (drag direction)
    pub fn pan_by(&mut self, delta: Vec2, panning: UseMode) {
        let ppu = self.pixels_per_unit();
        if panning.horizontal() {
            self.offset.x -= delta.x / ppu.x;
        }
        if panning.vertical() {
            self.offset.y += delta.y / ppu.y;
        }
    }

    /// Zoom by `factor` keeping the curve point under `anchor` (widget pixels) fixed
    pub fn zoom_at(
        &mut self,
        anchor: Pos2,
        factor: Vec2,
        zoom: UseMode,
        panning: UseMode,
        scale_range: (f32, f32),
    ) {
        let (time, value) = self.view_to_curve(anchor);
        let (min_scale, max_scale) = scale_range;
        if zoom.horizontal() {
            self.scale.x = (self.scale.x * factor.x).clamp(min_scale, max_scale);
            if panning.horizontal() {
                self.offset.x = time - anchor.x / self.pixels_per_unit().x;
            }
        }
        if zoom.vertical() {
            self.scale.y = (self.scale.y * factor.y).clamp(min_scale, max_scale);
            if panning.vertical() {
                self.offset.y = value - (self.size().y - anchor.y) / self.pixels_per_unit().y;
            }
        }
    }

    /// Fit the given time and value ranges into the viewport with a margin
    pub fn fit(&mut self, times: (f32, f32), values: (f32, f32), scale_range: (f32, f32)) {
        let size = self.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let (min_scale, max_scale) = scale_range;
        let (start, end) = widen(times);
        let (low, high) = widen(values);

        let time_span = (end - start) * (1.0 + 2.0 * FIT_MARGIN);
        let value_span = (high - low) * (1.0 + 2.0 * FIT_MARGIN);
        self.scale.x = (size.x / (time_span * PIXELS_PER_UNIT)).clamp(min_scale, max_scale);
        self.scale.y = (size.y / (value_span * PIXELS_PER_UNIT)).clamp(min_scale, max_scale);

        // Center the ranges, which also keeps them centered when the scale clamps
        let visible = size / self.pixels_per_unit();
        self.offset.x = (start + end) * 0.5 - visible.x * 0.5;
        self.offset.y = (low + high) * 0.5 - visible.y * 0.5;
    }

    /// Reset axes that cannot be zoomed or panned to their defaults
    pub fn apply_masks(&mut self, zoom: UseMode, panning: UseMode) {
        if !zoom.horizontal() {
            self.scale.x = 1.0;
        }
        if !zoom.vertical() {
            self.scale.y = 1.0;
        }
        if !panning.horizontal() {
            self.offset.x = 0.0;
        }
        if !panning.vertical() {
            self.offset.y = 0.0;
        }
    }
}

// Degenerate ranges get one unit of room
fn widen((min, max): (f32, f32)) -> (f32, f32) {
    if max - min > f32::EPSILON {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Grid spacing in curve units so lines are at least `min_pixels` apart
pub fn grid_step(pixels_per_unit: f32, min_pixels: f32) -> f32 {
    if pixels_per_unit <= 0.0 || !pixels_per_unit.is_finite() {
        return 1.0;
    }
    let raw = min_pixels / pixels_per_unit;
    let magnitude = 10f32.powf(raw.log10().floor());
    for multiplier in [1.0, 2.0, 5.0, 10.0] {
        let step = magnitude * multiplier;
        // `powf` can land just under an exact decade
        if step >= raw * (1.0 - 1e-5) {
            return step;
        }
    }
    magnitude * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: f32, height: f32) -> CurveView {
        CurveView {
            screen_rect: Rect::from_min_size(Pos2::new(50.0, 20.0), Vec2::new(width, height)),
            ..Default::default()
        }
    }

    #[test]
    fn test_curve_to_view_round_trip() {
        let mut v = view(400.0, 200.0);
        v.offset = Vec2::new(-1.0, 2.0);
        v.scale = Vec2::new(2.0, 0.5);
        let pos = v.curve_to_view(1.5, 3.0);
        let (time, value) = v.view_to_curve(pos);
        assert!((time - 1.5).abs() < 1e-4);
        assert!((value - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_values_grow_upwards() {
        let v = view(400.0, 200.0);
        assert_eq!(v.curve_to_view(0.0, 0.0), Pos2::new(0.0, 200.0));
        assert!(v.curve_to_view(0.0, 1.0).y < v.curve_to_view(0.0, 0.0).y);
    }

    #[test]
    fn test_screen_conversion() {
        let v = view(400.0, 200.0);
        assert_eq!(v.screen_to_view(Pos2::new(60.0, 30.0)), Pos2::new(10.0, 10.0));
        assert_eq!(v.view_to_screen(Pos2::new(10.0, 10.0)), Pos2::new(60.0, 30.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut v = view(400.0, 200.0);
        let anchor = Pos2::new(120.0, 80.0);
        let before = v.view_to_curve(anchor);
        v.zoom_at(anchor, Vec2::new(2.0, 1.5), UseMode::On, UseMode::On, (0.01, 100.0));
        let after = v.view_to_curve(anchor);
        assert!((before.0 - after.0).abs() < 1e-4);
        assert!((before.1 - after.1).abs() < 1e-4);
        assert_eq!(v.scale, Vec2::new(2.0, 1.5));
    }

    #[test]
    fn test_masked_axes_do_not_move() {
        let mut v = view(400.0, 200.0);
        v.zoom_at(Pos2::new(10.0, 10.0), Vec2::splat(3.0), UseMode::Horizontal, UseMode::On, (0.01, 100.0));
        assert_eq!(v.scale.y, 1.0);
        v.pan_by(Vec2::new(50.0, 50.0), UseMode::Vertical);
        let offset_x = v.offset.x;
        v.pan_by(Vec2::new(50.0, 50.0), UseMode::Vertical);
        assert_eq!(v.offset.x, offset_x);
    }

    #[test]
    fn test_fit_shows_ranges() {
        let mut v = view(400.0, 200.0);
        v.fit((1.0, 3.0), (-2.0, 2.0), (0.001, 1000.0));
        let (start, end) = v.visible_times();
        let (low, high) = v.visible_values();
        assert!(start < 1.0 && end > 3.0);
        assert!(low < -2.0 && high > 2.0);
    }

    #[test]
    fn test_apply_masks_pins_axes() {
        let mut v = view(400.0, 200.0);
        v.offset = Vec2::new(3.0, 4.0);
        v.scale = Vec2::new(2.0, 2.0);
        v.apply_masks(UseMode::Vertical, UseMode::Horizontal);
        assert_eq!(v.scale, Vec2::new(1.0, 2.0));
        assert_eq!(v.offset, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_grid_step_is_readable() {
        assert!((grid_step(100.0, 50.0) - 0.5).abs() < 1e-5);
        assert!((grid_step(10.0, 50.0) - 5.0).abs() < 1e-4);
        assert!((grid_step(1000.0, 50.0) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_grid_step_exact_decades() {
        for (ppu, expected) in [(1000.0, 0.05), (10_000.0, 0.005), (50.0, 1.0), (5.0, 10.0), (2.5, 20.0)] {
            let step = grid_step(ppu, 50.0);
            assert!((step - expected).abs() < expected * 1e-4, "ppu {ppu}: {step}");
            assert!(step * ppu >= 50.0 * (1.0 - 1e-4));
        }
    }
}
