// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve editor UI rendering.
//!
//! Features:
//! - Background grid with time/value labels
//! - One polyline per value component
//! - Keyframe points with selection highlight
//! - Click/box selection, drag to move, double-click to add
//! - Tangent handles on selected bezier keyframes
//! - Scroll zoom and middle-mouse pan
//! - Copy/paste through the system clipboard

use crate::access::KeyframeAccess;
use crate::context::{KeyframesClipboard, KeyframesRequest};
use crate::editor::{CurveEditor, CurveEditorBase, TangentHandle};
use crate::error::CurveError;
use crate::view::grid_step;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

const POINT_RADIUS: f32 = 4.0;
const HIT_RADIUS: f32 = 7.0;
const SAMPLE_SPACING: f32 = 4.0;
const GRID_MIN_PIXELS: f32 = 60.0;
const ZOOM_SPEED: f32 = 0.01;
const MIN_SIZE: f32 = 64.0;
const MAX_TICKS: i64 = 512;

const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 200, 100);
const TANGENT_COLOR: Color32 = Color32::from_gray(180);
const TANGENT_RADIUS: f32 = 3.0;

/// Drag operation state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum DragState {
    /// Not dragging
    #[default]
    None,
    /// Moving selected keyframes
    Move,
    /// Box selection
    BoxSelect {
        /// Where the box started (screen space)
        start: Pos2,
        /// Current corner (screen space)
        current: Pos2,
        /// Keep the previous selection
        additive: bool,
    },
    /// Dragging a tangent handle
    Tangent(TangentHandle),
    /// Panning the view
    Pan,
}

/// Result of drawing a curve editor
pub struct CurveEditorResponse {
    /// Widget response
    pub response: egui::Response,
    /// Requests to broadcast through the shared context (empty when unshared)
    pub requests: Vec<KeyframesRequest>,
}

/// Line color of a component
pub fn component_color(component_count: usize, component: usize) -> Color32 {
    if component_count == 1 {
        return Color32::from_rgb(100, 200, 255);
    }
    match component {
        0 => Color32::from_rgb(230, 80, 80),
        1 => Color32::from_rgb(100, 200, 100),
        2 => Color32::from_rgb(90, 140, 255),
        _ => Color32::from_gray(200),
    }
}

// Grid tick indices covering `[start, end]`
fn ticks(start: f32, end: f32, step: f32) -> std::ops::RangeInclusive<i64> {
    let first = (start / step).floor() as i64;
    let last = (end / step).ceil() as i64;
    first..=last.min(first.saturating_add(MAX_TICKS))
}

fn format_label(value: f32, step: f32) -> String {
    if step >= 1.0 {
        format!("{:.0}", value)
    } else if step >= 0.1 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

impl<T: KeyframeAccess> CurveEditor<T> {
    /// Render the editor, filling the available space
    pub fn ui(&mut self, ui: &mut egui::Ui) -> CurveEditorResponse {
        let size = ui.available_size_before_wrap().max(Vec2::splat(MIN_SIZE));
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        self.set_viewport(rect);

        let painter = ui.painter_at(rect);
        if self.settings.show_background {
            painter.rect_filled(rect, 0.0, Color32::from_gray(30));
        }
        self.render_grid(&painter, rect);
        if self.settings.show_start_end_lines {
            self.render_start_end_lines(&painter, rect);
        }
        self.render_curves(&painter);
        self.render_points(&painter, rect);

        self.handle_input(ui, &response);

        if let DragState::BoxSelect { start, current, .. } = self.drag {
            let selection_rect = Rect::from_two_pos(start, current);
            painter.rect_filled(selection_rect, 0.0, Color32::from_rgba_unmultiplied(100, 150, 255, 30));
            painter.rect_stroke(selection_rect, 0.0, Stroke::new(1.0, Color32::from_rgb(100, 150, 255)));
        }

        CurveEditorResponse {
            response,
            requests: self.take_requests(),
        }
    }

    /// Render grid lines and axis labels
    fn render_grid(&self, painter: &egui::Painter, rect: Rect) {
        let ppu = self.view.pixels_per_unit();
        let line_stroke = Stroke::new(1.0, Color32::from_gray(45));
        let label_color = Color32::from_gray(140);
        let font = egui::FontId::monospace(10.0);

        if self.settings.show_axes.horizontal() {
            let step = grid_step(ppu.x, GRID_MIN_PIXELS);
            let (start, end) = self.view.visible_times();
            for tick in ticks(start, end, step) {
                let time = tick as f32 * step;
                let x = self.view.view_to_screen(self.view.curve_to_view(time, 0.0)).x;
                painter.line_segment([Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)], line_stroke);
                painter.text(
                    Pos2::new(x + 2.0, rect.max.y - 2.0),
                    egui::Align2::LEFT_BOTTOM,
                    format_label(time, step),
                    font.clone(),
                    label_color,
                );
            }
        }

        if self.settings.show_axes.vertical() {
            let step = grid_step(ppu.y, GRID_MIN_PIXELS);
            let (bottom, top) = self.view.visible_values();
            for tick in ticks(bottom, top, step) {
                let value = tick as f32 * step;
                let y = self.view.view_to_screen(self.view.curve_to_view(0.0, value)).y;
                let stroke = if value.abs() < step * 0.5 {
                    Stroke::new(1.0, Color32::from_gray(70))
                } else {
                    line_stroke
                };
                painter.line_segment([Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)], stroke);
                painter.text(
                    Pos2::new(rect.min.x + 2.0, y - 2.0),
                    egui::Align2::LEFT_BOTTOM,
                    format_label(value, step),
                    font.clone(),
                    label_color,
                );
            }
        }
    }

    /// Render lines at the first and last keyframe
    fn render_start_end_lines(&self, painter: &egui::Painter, rect: Rect) {
        let stroke = Stroke::new(1.0, Color32::from_rgb(255, 100, 100));
        for time in [self.curve.start_time(), self.curve.end_time()].into_iter().flatten() {
            let x = self.view.view_to_screen(self.view.curve_to_view(time, 0.0)).x;
            painter.line_segment([Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)], stroke);
        }
    }

    /// Render one sampled polyline per component
    fn render_curves(&self, painter: &egui::Painter) {
        if self.curve.is_empty() {
            return;
        }
        let width = self.view.size().x;
        let samples = (width / SAMPLE_SPACING).ceil() as usize + 1;
        let count = T::component_count();

        let values: Vec<(f32, T)> = (0..samples)
            .map(|i| {
                let x = (i as f32 * SAMPLE_SPACING).min(width);
                let (time, _) = self.view.view_to_curve(Pos2::new(x, 0.0));
                (time, self.curve.evaluate(time, false))
            })
            .collect();

        for component in 0..count {
            let points: Vec<Pos2> = values
                .iter()
                .filter_map(|(time, value)| {
                    let v = value.project(component).ok()?;
                    Some(self.view.view_to_screen(self.view.curve_to_view(*time, v)))
                })
                .collect();
            if points.len() >= 2 {
                painter.add(egui::Shape::line(
                    points,
                    Stroke::new(2.0, component_color(count, component)),
                ));
            }
        }
    }

    /// Render keyframe points
    fn render_points(&self, painter: &egui::Painter, rect: Rect) {
        let count = T::component_count();
        for keyframe in self.curve.keyframes() {
            for component in 0..count {
                let Some(pos) = self.point_position(keyframe, component) else {
                    continue;
                };
                let pos = self.view.view_to_screen(pos);
                if !rect.expand(POINT_RADIUS).contains(pos) {
                    continue;
                }
                let point = crate::editor::KeyframePoint {
                    keyframe: keyframe.id,
                    component,
                };
                let fill = if self.is_selected(point) {
                    SELECTED_COLOR
                } else {
                    component_color(count, component)
                };
                painter.circle_filled(pos, POINT_RADIUS, fill);
                painter.circle_stroke(pos, POINT_RADIUS, Stroke::new(1.0, Color32::from_gray(80)));
            }
        }
        self.render_tangents(painter);
    }

    /// Render tangent handles of selected bezier points
    fn render_tangents(&self, painter: &egui::Painter) {
        let stroke = Stroke::new(1.0, TANGENT_COLOR);
        for handle in self.tangent_handles() {
            let Some(index) = self.curve.index_of(handle.point.keyframe) else {
                continue;
            };
            let anchor = self.point_position(&self.curve.keyframes()[index], handle.point.component);
            let Some((anchor, end)) = anchor.zip(self.tangent_handle_position(handle)) else {
                continue;
            };
            let anchor = self.view.view_to_screen(anchor);
            let end = self.view.view_to_screen(end);
            painter.line_segment([anchor, end], stroke);
            painter.circle_filled(end, TANGENT_RADIUS, TANGENT_COLOR);
        }
    }

    /// Handle input events
    fn handle_input(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let shift = ui.input(|i| i.modifiers.shift);
        let primary = egui::PointerButton::Primary;

        if response.clicked() || response.drag_started() {
            response.request_focus();
        }

        // Primary drag: tangent handles, then points, then box select.
        // The press origin is where the user aimed, before the drag threshold.
        if response.drag_started_by(primary) {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = origin {
                let local = self.view.screen_to_view(pos);
                if let Some(handle) = self.tangent_handle_at(local, HIT_RADIUS) {
                    self.drag = DragState::Tangent(handle);
                    self.begin_tangent_drag(handle);
                } else {
                    self.start_primary_drag(pos, local, shift);
                }
            }
        }

        if response.dragged_by(primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                match self.drag {
                    DragState::Move => self.request(KeyframesRequest::Move {
                        location: pos,
                        is_start: false,
                        is_end: false,
                    }),
                    DragState::BoxSelect { start, additive, .. } => {
                        self.drag = DragState::BoxSelect {
                            start,
                            current: pos,
                            additive,
                        };
                        if !additive {
                            self.request(KeyframesRequest::Deselect);
                        }
                        self.request(KeyframesRequest::Selection {
                            region: Rect::from_two_pos(start, pos),
                        });
                    }
                    DragState::Tangent(handle) => {
                        if let Err(err) = self.drag_tangent(handle, self.view.screen_to_view(pos)) {
                            tracing::warn!("Curve '{}' tangent drag failed: {}", self.name, err);
                        }
                    }
                    DragState::None | DragState::Pan => {}
                }
            }
        }

        if response.drag_stopped_by(primary) {
            if self.drag == DragState::Move {
                let location = response
                    .interact_pointer_pos()
                    .or_else(|| ui.input(|i| i.pointer.latest_pos()))
                    .unwrap_or_default();
                self.request(KeyframesRequest::Move {
                    location,
                    is_start: false,
                    is_end: true,
                });
            }
            if let DragState::Tangent(_) = self.drag {
                self.end_tangent_drag();
            }
            self.drag = DragState::None;
        }

        // Click selects, double-click adds
        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = self.view.screen_to_view(pos);
                if self.point_at(local, HIT_RADIUS).is_none() {
                    self.add_at(local);
                }
            }
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = self.view.screen_to_view(pos);
                if self.tangent_handle_at(local, HIT_RADIUS).is_some() {
                    // Clicking a handle keeps the selection it belongs to
                } else if self.point_at(local, HIT_RADIUS).is_some() {
                    self.click_point(pos, shift);
                } else if !shift {
                    self.request(KeyframesRequest::Deselect);
                }
            }
        }

        // Middle mouse pan
        if response.drag_started_by(egui::PointerButton::Middle) {
            self.drag = DragState::Pan;
        }
        if response.dragged_by(egui::PointerButton::Middle) && self.drag == DragState::Pan {
            self.view.pan_by(response.drag_delta(), self.settings.enable_panning);
        }
        if response.drag_stopped_by(egui::PointerButton::Middle) && self.drag == DragState::Pan {
            self.drag = DragState::None;
        }

        // Scroll wheel zoom at the cursor
        if response.hovered() {
            let (scroll, hover) = ui.input(|i| (i.smooth_scroll_delta, i.pointer.hover_pos()));
            if let Some(hover) = hover.filter(|_| scroll.y != 0.0) {
                let factor = (1.0 + scroll.y * ZOOM_SPEED).max(0.1);
                let factor = if shift {
                    Vec2::new(factor, 1.0)
                } else {
                    Vec2::splat(factor)
                };
                self.view.zoom_at(
                    self.view.screen_to_view(hover),
                    factor,
                    self.settings.enable_zoom,
                    self.settings.enable_panning,
                    (self.settings.min_scale, self.settings.max_scale),
                );
            }
        }

        if response.has_focus() || response.hovered() {
            self.handle_keys(ui, response);
        }
    }

    /// Keyboard shortcuts and clipboard events
    fn handle_keys(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let (delete, fit, select_all, copy, pasted) = ui.input(|input| {
            let pasted = input.events.iter().find_map(|event| match event {
                egui::Event::Paste(text) => Some(text.clone()),
                _ => None,
            });
            (
                input.key_pressed(egui::Key::Delete) || input.key_pressed(egui::Key::Backspace),
                input.key_pressed(egui::Key::F),
                input.modifiers.command && input.key_pressed(egui::Key::A),
                input.events.iter().any(|event| matches!(event, egui::Event::Copy)),
                pasted,
            )
        });

        if delete {
            self.request(KeyframesRequest::Delete);
        }
        if fit {
            self.show_whole_curve();
        }
        if select_all {
            self.select_all();
        }
        if copy {
            self.copy_to_clipboard(ui.ctx());
        }
        if let Some(text) = pasted {
            match KeyframesClipboard::from_ron(&text) {
                Ok(clipboard) => {
                    let time_offset = response
                        .hover_pos()
                        .map(|pos| self.view.view_to_curve(self.view.screen_to_view(pos)).0)
                        .or(self.curve.end_time())
                        .unwrap_or(0.0);
                    self.request(KeyframesRequest::Paste {
                        time_offset: self.curve.quantize_time(time_offset),
                        clipboard,
                    });
                }
                Err(err) => tracing::debug!("Clipboard does not hold keyframes: {}", err),
            }
        }
    }

    fn copy_to_clipboard(&mut self, ctx: &egui::Context) {
        if self.shared_selection {
            self.request(KeyframesRequest::Copy);
            return;
        }
        let mut clipboard = KeyframesClipboard {
            tracks: vec![self.copy_selection()],
        };
        if clipboard.is_empty() {
            return;
        }
        if let Some(origin) = clipboard.start_time() {
            clipboard.rebase(origin);
        }
        match clipboard.to_ron() {
            Ok(text) => ctx.copy_text(text),
            Err(err) => tracing::warn!("Failed to copy keyframes: {}", err),
        }
    }

    /// Start moving the point under `pos`, or a box selection when there is none
    fn start_primary_drag(&mut self, pos: Pos2, local: Pos2, additive: bool) {
        match self.point_at(local, HIT_RADIUS) {
            Some(point) => {
                if !self.is_selected(point) {
                    self.click_point(pos, additive);
                }
                self.drag = DragState::Move;
                self.request(KeyframesRequest::Move {
                    location: pos,
                    is_start: true,
                    is_end: false,
                });
            }
            None => {
                self.drag = DragState::BoxSelect {
                    start: pos,
                    current: pos,
                    additive,
                };
            }
        }
    }

    /// Select the point under a screen position
    fn click_point(&mut self, pos: Pos2, additive: bool) {
        if !additive {
            self.request(KeyframesRequest::Deselect);
        }
        self.request(KeyframesRequest::Selection {
            region: Rect::from_center_size(pos, Vec2::splat(HIT_RADIUS * 2.0)),
        });
    }

    /// Add a keyframe under a widget-space position
    fn add_at(&mut self, local: Pos2) {
        let (time, value) = self.view.view_to_curve(local);
        let mut new_value = self.curve.evaluate(time, false);
        if T::component_count() == 1 {
            match new_value.inject(value, 0) {
                Ok(v) => new_value = v,
                Err(err) => tracing::warn!("Cannot place keyframe value: {}", err),
            }
        }
        match self.add(time, new_value) {
            Ok(_) => {}
            // A full curve refuses silently; `insert_keyframe` logs it
            Err(CurveError::CapacityExceeded { .. }) => {}
            Err(err) => tracing::warn!("Cannot add keyframe to '{}': {}", self.name, err),
        }
    }
}

impl crate::context::KeyframesEditorContext {
    /// Broadcast a widget's requests, putting copies on the system clipboard
    pub fn dispatch_ui(
        &self,
        ctx: &egui::Context,
        source: crate::editor::EditorId,
        requests: Vec<KeyframesRequest>,
    ) {
        for request in requests {
            let Some(clipboard) = self.dispatch(source, request) else {
                continue;
            };
            if clipboard.is_empty() {
                continue;
            }
            match clipboard.to_ron() {
                Ok(text) => ctx.copy_text(text),
                Err(err) => tracing::warn!("Failed to copy keyframes: {}", err),
            }
        }
    }
}
