// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve editor state and its type-erased contract.
//!
//! [`CurveEditor`] owns one [`Curve`] and is its only mutator. Host tooling
//! that must not know the value type talks to it through
//! [`CurveEditorBase`], passing values as [`KeyframeValue`].

use crate::access::KeyframeAccess;
use crate::context::{ClipboardTrack, KeyframeSetItem, KeyframesClipboard, KeyframesEditor, KeyframesRequest};
use crate::curve::Curve;
use crate::error::{CurveError, Result};
use crate::keyframe::{InterpolationMode, Keyframe, KeyframeData, KeyframeId};
use crate::settings::CurveEditorSettings;
use crate::snapshot::CurveSnapshot;
use crate::ui::DragState;
use crate::value::{KeyframeValue, ValueKind};
use crate::view::CurveView;
use egui::{Pos2, Rect, Vec2};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an editor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(pub Uuid);

impl EditorId {
    /// Create a new random editor ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EditorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Notification sent to editor listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEditorEvent {
    /// An interactive gesture began
    EditingStart,
    /// Curve data changed
    Edited,
    /// An interactive gesture finished
    EditingEnd,
}

/// One editable point: a component of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyframePoint {
    /// Keyframe identity
    pub keyframe: KeyframeId,
    /// Component index
    pub component: usize,
}

/// Distance in pixels from a keyframe point to its tangent handles
pub const TANGENT_HANDLE_LENGTH: f32 = 40.0;

/// Which tangent of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TangentSide {
    /// Slope arriving at the keyframe
    In,
    /// Slope leaving the keyframe
    Out,
}

impl TangentSide {
    fn sign(self) -> f32 {
        match self {
            Self::In => -1.0,
            Self::Out => 1.0,
        }
    }
}

/// Tangent handle of one selected point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TangentHandle {
    /// Point the handle belongs to
    pub point: KeyframePoint,
    /// Which tangent it edits
    pub side: TangentSide,
}

/// Operations every curve editor supports, whatever its value type
pub trait CurveEditorBase {
    /// Editor identity
    fn id(&self) -> EditorId;

    /// Kind of value stored by the curve
    fn value_kind(&self) -> ValueKind;

    /// Current keyframe count
    fn keyframe_count(&self) -> usize;

    /// Keyframe limit
    fn max_keyframes(&self) -> usize;

    /// Add a keyframe with default tangents, returning its sorted index
    fn add_keyframe(&mut self, time: f32, value: KeyframeValue) -> Result<usize>;

    /// Add a keyframe with tangents, returning its sorted index
    fn add_keyframe_with_tangents(
        &mut self,
        time: f32,
        value: KeyframeValue,
        tangent_in: KeyframeValue,
        tangent_out: KeyframeValue,
    ) -> Result<usize>;

    /// Read a keyframe
    fn keyframe(&self, index: usize) -> Result<KeyframeData>;

    /// Replace a keyframe's value
    fn set_keyframe_value(&mut self, index: usize, value: KeyframeValue) -> Result<()>;

    /// Replace a keyframe's value and tangents
    fn set_keyframe_value_with_tangents(
        &mut self,
        index: usize,
        value: KeyframeValue,
        tangent_in: KeyframeValue,
        tangent_out: KeyframeValue,
    ) -> Result<()>;

    /// Move a keyframe in time, returning its new index
    fn set_keyframe_time(&mut self, index: usize, time: f32) -> Result<usize>;

    /// Remove a keyframe
    fn remove_keyframe(&mut self, index: usize) -> Result<()>;

    /// Replace every keyframe
    fn set_keyframes(&mut self, keyframes: Vec<KeyframeData>) -> Result<()>;

    /// Evaluate the curve
    fn evaluate(&self, time: f32, looped: bool) -> KeyframeValue;

    /// Fit the view around all keyframes
    fn show_whole_curve(&mut self);

    /// View offset as `(time, value)` at the bottom-left corner
    fn view_offset(&self) -> Vec2;

    /// Set the view offset; pinned axes are ignored
    fn set_view_offset(&mut self, offset: Vec2);

    /// View zoom factor per axis
    fn view_scale(&self) -> Vec2;

    /// Set the view zoom; pinned axes are ignored
    fn set_view_scale(&mut self, scale: Vec2);

    /// Deselect everything in this editor
    fn clear_selection(&mut self);

    /// Number of selected keyframes
    fn selection_count(&self) -> usize;

    /// Capture the keyframes for undo
    fn snapshot(&self) -> Result<CurveSnapshot>;

    /// Restore keyframes from a snapshot
    fn restore(&mut self, snapshot: &CurveSnapshot) -> Result<()>;
}

struct MovedKeyframe<T: KeyframeAccess> {
    id: KeyframeId,
    time: f32,
    value: T,
    components: Vec<usize>,
}

struct MoveGesture<T: KeyframeAccess> {
    start: Pos2,
    keyframes: Vec<MovedKeyframe<T>>,
}

/// Listener invoked for editor events
pub type CurveEditorListener = Box<dyn FnMut(CurveEditorEvent)>;

/// Editing widget state for a curve of `T`
pub struct CurveEditor<T: KeyframeAccess> {
    id: EditorId,
    /// Track name reported to the shared context
    pub name: String,
    pub(crate) curve: Curve<T>,
    pub(crate) settings: CurveEditorSettings,
    pub(crate) view: CurveView,
    pub(crate) selection: IndexSet<KeyframePoint>,
    listeners: Vec<CurveEditorListener>,
    pub(crate) shared_selection: bool,
    pub(crate) pending: Vec<KeyframesRequest>,
    pub(crate) drag: DragState,
    gesture: Option<MoveGesture<T>>,
}

impl<T: KeyframeAccess> CurveEditor<T> {
    /// Create an editor with an empty curve
    pub fn new(name: impl Into<String>, settings: CurveEditorSettings) -> Self {
        let curve = Curve::new(settings.interpolation).with_fps(settings.fps);
        let mut view = CurveView::default();
        view.apply_masks(settings.enable_zoom, settings.enable_panning);
        Self {
            id: EditorId::new(),
            name: name.into(),
            curve,
            settings,
            view,
            selection: IndexSet::new(),
            listeners: Vec::new(),
            shared_selection: false,
            pending: Vec::new(),
            drag: DragState::None,
            gesture: None,
        }
    }

    /// Create an editor around existing keyframes
    pub fn with_keyframes(
        name: impl Into<String>,
        settings: CurveEditorSettings,
        keyframes: Vec<Keyframe<T>>,
    ) -> Result<Self> {
        let mut editor = Self::new(name, settings);
        editor.check_capacity(keyframes.len())?;
        editor.curve.replace(keyframes);
        Ok(editor)
    }

    /// The edited curve
    pub fn curve(&self) -> &Curve<T> {
        &self.curve
    }

    /// Editor settings
    pub fn settings(&self) -> &CurveEditorSettings {
        &self.settings
    }

    /// Replace the settings, re-quantizing and re-pinning as needed
    pub fn set_settings(&mut self, settings: CurveEditorSettings) {
        self.curve.interpolation = settings.interpolation;
        self.curve.set_fps(settings.fps);
        self.settings = settings;
        self.view.apply_masks(self.settings.enable_zoom, self.settings.enable_panning);
    }

    /// Current view transform
    pub fn view(&self) -> &CurveView {
        &self.view
    }

    /// Set the screen rectangle the editor occupies
    pub fn set_viewport(&mut self, rect: Rect) {
        self.view.screen_rect = rect;
    }

    /// Whether the editor broadcasts through a shared context
    pub fn uses_shared_selection(&self) -> bool {
        self.shared_selection
    }

    /// Take requests raised by the widget for the shared context
    pub fn take_requests(&mut self) -> Vec<KeyframesRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Register an event listener; listeners run in registration order
    pub fn on_event(&mut self, listener: impl FnMut(CurveEditorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn notify(&mut self, event: CurveEditorEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn check_capacity(&self, count: usize) -> Result<()> {
        if count > self.settings.max_keyframes {
            return Err(CurveError::CapacityExceeded {
                max: self.settings.max_keyframes,
            });
        }
        Ok(())
    }

    /// Insert a keyframe, refusing when the curve is full
    pub fn insert_keyframe(&mut self, keyframe: Keyframe<T>) -> Result<usize> {
        if let Err(err) = self.check_capacity(self.curve.len() + 1) {
            tracing::debug!("Curve '{}' refused keyframe at {}: {}", self.name, keyframe.time, err);
            return Err(err);
        }
        let index = self.curve.insert(keyframe);
        self.notify(CurveEditorEvent::Edited);
        Ok(index)
    }

    /// Add a typed keyframe
    pub fn add(&mut self, time: f32, value: T) -> Result<usize> {
        self.insert_keyframe(Keyframe::new(time, value))
    }

    /// Evaluate the curve with its concrete type
    pub fn evaluate_typed(&self, time: f32, looped: bool) -> T {
        self.curve.evaluate(time, looped)
    }

    /// Whether a point is selected
    pub fn is_selected(&self, point: KeyframePoint) -> bool {
        self.selection.contains(&point)
    }

    /// Selected points in selection order
    pub fn selected_points(&self) -> impl Iterator<Item = &KeyframePoint> {
        self.selection.iter()
    }

    /// Select a point, optionally keeping the current selection
    pub fn select_point(&mut self, point: KeyframePoint, additive: bool) {
        if !additive {
            self.selection.clear();
        }
        if self.curve.index_of(point.keyframe).is_some() && point.component < T::component_count() {
            self.selection.insert(point);
        }
    }

    /// Remove a point from the selection
    pub fn deselect_point(&mut self, point: KeyframePoint) {
        self.selection.shift_remove(&point);
    }

    /// Select every component of every keyframe
    pub fn select_all(&mut self) {
        for keyframe in self.curve.keyframes() {
            for component in 0..T::component_count() {
                self.selection.insert(KeyframePoint {
                    keyframe: keyframe.id,
                    component,
                });
            }
        }
    }

    fn selected_keyframes(&self) -> IndexSet<KeyframeId> {
        self.selection.iter().map(|p| p.keyframe).collect()
    }

    /// Widget-space position of a point
    pub fn point_position(&self, keyframe: &Keyframe<T>, component: usize) -> Option<Pos2> {
        let value = keyframe.value.project(component).ok()?;
        Some(self.view.curve_to_view(keyframe.time, value))
    }

    /// Point under a widget-space position, nearest first
    pub fn point_at(&self, pos: Pos2, radius: f32) -> Option<KeyframePoint> {
        let mut best: Option<(f32, KeyframePoint)> = None;
        for keyframe in self.curve.keyframes() {
            for component in 0..T::component_count() {
                let Some(point_pos) = self.point_position(keyframe, component) else {
                    continue;
                };
                let distance = point_pos.distance(pos);
                if distance <= radius && best.map_or(true, |(d, _)| distance < d) {
                    best = Some((
                        distance,
                        KeyframePoint {
                            keyframe: keyframe.id,
                            component,
                        },
                    ));
                }
            }
        }
        best.map(|(_, point)| point)
    }

    /// Add points inside a widget-space rectangle to the selection
    pub fn select_in_view_rect(&mut self, rect: Rect) {
        let mut hits = Vec::new();
        for keyframe in self.curve.keyframes() {
            for component in 0..T::component_count() {
                if let Some(pos) = self.point_position(keyframe, component) {
                    if rect.contains(pos) {
                        hits.push(KeyframePoint {
                            keyframe: keyframe.id,
                            component,
                        });
                    }
                }
            }
        }
        self.selection.extend(hits);
    }

    /// Delete keyframes with any selected component
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selected_keyframes();
        self.selection.clear();
        if ids.is_empty() {
            return 0;
        }
        let removed = self.curve.remove_where(|k| ids.contains(&k.id));
        if removed > 0 {
            self.notify(CurveEditorEvent::Edited);
        }
        removed
    }

    /// Selected keyframes as a clipboard track with absolute times
    pub fn copy_selection(&self) -> ClipboardTrack {
        let ids = self.selected_keyframes();
        let keyframes = self
            .curve
            .keyframes()
            .iter()
            .filter(|k| ids.contains(&k.id))
            .map(Keyframe::to_data)
            .collect();
        ClipboardTrack {
            name: self.name.clone(),
            kind: T::KIND,
            keyframes,
        }
    }

    /// Insert a clipboard track at `time_offset` and select the new keyframes.
    ///
    /// Keyframes beyond the limit are dropped. Returns how many were added.
    pub fn paste_track(&mut self, track: &ClipboardTrack, time_offset: f32) -> usize {
        if track.kind != T::KIND {
            tracing::warn!(
                "Cannot paste {} keyframes into curve '{}' of {}",
                track.kind.name(),
                self.name,
                T::KIND.name()
            );
            return 0;
        }
        self.selection.clear();
        let mut added = 0;
        for data in &track.keyframes {
            let mut keyframe = match Keyframe::<T>::from_data(data) {
                Ok(keyframe) => keyframe,
                Err(err) => {
                    tracing::warn!("Skipped pasted keyframe in '{}': {}", self.name, err);
                    continue;
                }
            };
            keyframe.time += time_offset;
            if self.check_capacity(self.curve.len() + 1).is_err() {
                tracing::debug!("Curve '{}' is full, paste truncated", self.name);
                break;
            }
            let id = keyframe.id;
            self.curve.insert(keyframe);
            for component in 0..T::component_count() {
                self.selection.insert(KeyframePoint { keyframe: id, component });
            }
            added += 1;
        }
        if added > 0 {
            self.notify(CurveEditorEvent::Edited);
        }
        added
    }

    /// Whether tangent handles are shown and editable
    pub fn shows_tangents(&self) -> bool {
        self.curve.interpolation == InterpolationMode::Bezier
    }

    /// Handles of the selected points, empty unless the curve is bezier
    pub fn tangent_handles(&self) -> Vec<TangentHandle> {
        if !self.shows_tangents() {
            return Vec::new();
        }
        self.selection
            .iter()
            .flat_map(|&point| [TangentSide::In, TangentSide::Out].map(|side| TangentHandle { point, side }))
            .collect()
    }

    /// Widget-space position of a tangent handle
    pub fn tangent_handle_position(&self, handle: TangentHandle) -> Option<Pos2> {
        let keyframe = self.curve.get(self.curve.index_of(handle.point.keyframe)?).ok()?;
        let component = handle.point.component;
        let value = keyframe.value.project(component).ok()?;
        let tangent = match handle.side {
            TangentSide::In => keyframe.tangent_in,
            TangentSide::Out => keyframe.tangent_out,
        };
        let slope = tangent.project(component).ok()?;
        let sign = handle.side.sign();
        let anchor = self.view.curve_to_view(keyframe.time, value);
        let toward = self.view.curve_to_view(keyframe.time + sign, value + slope * sign);
        Some(anchor + (toward - anchor).normalized() * TANGENT_HANDLE_LENGTH)
    }

    /// Tangent handle under a widget-space position, nearest first
    pub fn tangent_handle_at(&self, pos: Pos2, radius: f32) -> Option<TangentHandle> {
        self.tangent_handles()
            .into_iter()
            .filter_map(|handle| Some((self.tangent_handle_position(handle)?.distance(pos), handle)))
            .filter(|(distance, _)| *distance <= radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, handle)| handle)
    }

    /// Start dragging a tangent handle
    pub fn begin_tangent_drag(&mut self, handle: TangentHandle) {
        tracing::debug!("Curve '{}' tangent drag started ({:?})", self.name, handle.side);
        self.notify(CurveEditorEvent::EditingStart);
    }

    /// Aim a tangent handle at a widget-space position.
    ///
    /// The tangent becomes the slope from the keyframe to `pos`. Positions on
    /// the wrong side of the keyframe in time are ignored. Returns whether the
    /// tangent changed.
    pub fn drag_tangent(&mut self, handle: TangentHandle, pos: Pos2) -> Result<bool> {
        let Some(index) = self.curve.index_of(handle.point.keyframe) else {
            return Ok(false);
        };
        let keyframe = *self.curve.get(index)?;
        let component = handle.point.component;
        let (time, value) = self.view.view_to_curve(pos);
        let dt = time - keyframe.time;
        if dt * handle.side.sign() <= f32::EPSILON {
            return Ok(false);
        }
        let slope = (value - keyframe.value.project(component)?) / dt;

        let (mut tangent_in, mut tangent_out) = (keyframe.tangent_in, keyframe.tangent_out);
        match handle.side {
            TangentSide::In => tangent_in = tangent_in.inject(slope, component)?,
            TangentSide::Out => tangent_out = tangent_out.inject(slope, component)?,
        }
        if tangent_in == keyframe.tangent_in && tangent_out == keyframe.tangent_out {
            return Ok(false);
        }
        self.curve.set_tangents(index, tangent_in, tangent_out)?;
        self.notify(CurveEditorEvent::Edited);
        Ok(true)
    }

    /// Finish a tangent drag
    pub fn end_tangent_drag(&mut self) {
        tracing::debug!("Curve '{}' tangent drag finished", self.name);
        self.notify(CurveEditorEvent::EditingEnd);
    }

    /// Route a widget request to the shared context or handle it here
    pub(crate) fn request(&mut self, request: KeyframesRequest) {
        if self.shared_selection {
            self.pending.push(request);
            return;
        }
        let source = self.id;
        match request {
            KeyframesRequest::Deselect => self.on_keyframes_deselect(source),
            KeyframesRequest::Selection { region } => self.on_keyframes_selection(source, region),
            KeyframesRequest::Delete => self.on_keyframes_delete(source),
            KeyframesRequest::Move { location, is_start, is_end } => {
                self.on_keyframes_move(source, location, is_start, is_end);
            }
            // The widget writes local copies to the system clipboard itself
            KeyframesRequest::Copy => {}
            KeyframesRequest::Paste { time_offset, clipboard } => {
                self.on_keyframes_paste(source, time_offset, &clipboard, &mut 0);
            }
        }
    }

    fn begin_move(&mut self, location: Pos2) {
        let mut keyframes: Vec<MovedKeyframe<T>> = Vec::new();
        for point in &self.selection {
            if let Some(moved) = keyframes.iter_mut().find(|k| k.id == point.keyframe) {
                moved.components.push(point.component);
                continue;
            }
            let Some(index) = self.curve.index_of(point.keyframe) else {
                continue;
            };
            let keyframe = &self.curve.keyframes()[index];
            keyframes.push(MovedKeyframe {
                id: keyframe.id,
                time: keyframe.time,
                value: keyframe.value,
                components: vec![point.component],
            });
        }
        self.gesture = Some(MoveGesture {
            start: location,
            keyframes,
        });
    }

    fn apply_move(&mut self, location: Pos2, move_values: bool) -> Result<bool> {
        let Some(gesture) = &self.gesture else {
            return Ok(false);
        };
        let start = self.view.view_to_curve(self.view.screen_to_view(gesture.start));
        let current = self.view.view_to_curve(self.view.screen_to_view(location));
        let time_delta = current.0 - start.0;
        let value_delta = if move_values { current.1 - start.1 } else { 0.0 };

        let mut updates = Vec::with_capacity(gesture.keyframes.len());
        for moved in &gesture.keyframes {
            let mut value = moved.value;
            for &component in &moved.components {
                let original = moved.value.project(component)?;
                value = value.inject(original + value_delta, component)?;
            }
            updates.push((moved.id, moved.time + time_delta, value));
        }

        let mut changed = false;
        for (id, time, value) in updates {
            let Some(index) = self.curve.index_of(id) else {
                continue;
            };
            let keyframe = &self.curve.keyframes()[index];
            if keyframe.value == value && keyframe.time == self.curve.quantize_time(time) {
                continue;
            }
            self.curve.set_value(index, value)?;
            self.curve.set_time(index, time)?;
            changed = true;
        }
        Ok(changed)
    }

    fn to_typed(&self, value: KeyframeValue) -> Result<T> {
        T::from_value(value)
    }
}

impl<T: KeyframeAccess> CurveEditorBase for CurveEditor<T> {
    fn id(&self) -> EditorId {
        self.id
    }

    fn value_kind(&self) -> ValueKind {
        T::KIND
    }

    fn keyframe_count(&self) -> usize {
        self.curve.len()
    }

    fn max_keyframes(&self) -> usize {
        self.settings.max_keyframes
    }

    fn add_keyframe(&mut self, time: f32, value: KeyframeValue) -> Result<usize> {
        let value = self.to_typed(value)?;
        self.insert_keyframe(Keyframe::new(time, value))
    }

    fn add_keyframe_with_tangents(
        &mut self,
        time: f32,
        value: KeyframeValue,
        tangent_in: KeyframeValue,
        tangent_out: KeyframeValue,
    ) -> Result<usize> {
        let keyframe = Keyframe::new(time, self.to_typed(value)?)
            .with_tangents(self.to_typed(tangent_in)?, self.to_typed(tangent_out)?);
        self.insert_keyframe(keyframe)
    }

    fn keyframe(&self, index: usize) -> Result<KeyframeData> {
        Ok(self.curve.get(index)?.to_data())
    }

    fn set_keyframe_value(&mut self, index: usize, value: KeyframeValue) -> Result<()> {
        let value = self.to_typed(value)?;
        self.curve.set_value(index, value)?;
        self.notify(CurveEditorEvent::Edited);
        Ok(())
    }

    fn set_keyframe_value_with_tangents(
        &mut self,
        index: usize,
        value: KeyframeValue,
        tangent_in: KeyframeValue,
        tangent_out: KeyframeValue,
    ) -> Result<()> {
        let value = self.to_typed(value)?;
        let tangent_in = self.to_typed(tangent_in)?;
        let tangent_out = self.to_typed(tangent_out)?;
        self.curve.get(index)?;
        self.curve.set_value(index, value)?;
        self.curve.set_tangents(index, tangent_in, tangent_out)?;
        self.notify(CurveEditorEvent::Edited);
        Ok(())
    }

    fn set_keyframe_time(&mut self, index: usize, time: f32) -> Result<usize> {
        let index = self.curve.set_time(index, time)?;
        self.notify(CurveEditorEvent::Edited);
        Ok(index)
    }

    fn remove_keyframe(&mut self, index: usize) -> Result<()> {
        let removed = self.curve.remove(index)?;
        self.selection.retain(|p| p.keyframe != removed.id);
        self.notify(CurveEditorEvent::Edited);
        Ok(())
    }

    fn set_keyframes(&mut self, keyframes: Vec<KeyframeData>) -> Result<()> {
        self.check_capacity(keyframes.len())?;
        let keyframes = keyframes
            .iter()
            .map(Keyframe::<T>::from_data)
            .collect::<Result<Vec<_>>>()?;
        self.curve.replace(keyframes);
        self.selection.clear();
        self.gesture = None;
        self.notify(CurveEditorEvent::Edited);
        Ok(())
    }

    fn evaluate(&self, time: f32, looped: bool) -> KeyframeValue {
        self.curve.evaluate(time, looped).into_value()
    }

    fn show_whole_curve(&mut self) {
        let times = match (self.curve.start_time(), self.curve.end_time()) {
            (Some(start), Some(end)) => (start, end),
            _ => (0.0, 1.0),
        };
        let values = self.curve.value_range().unwrap_or((0.0, 1.0));
        self.view.fit(times, values, (self.settings.min_scale, self.settings.max_scale));
        self.view.apply_masks(self.settings.enable_zoom, self.settings.enable_panning);
    }

    fn view_offset(&self) -> Vec2 {
        self.view.offset
    }

    fn set_view_offset(&mut self, offset: Vec2) {
        self.view.offset = offset;
        self.view.apply_masks(self.settings.enable_zoom, self.settings.enable_panning);
    }

    fn view_scale(&self) -> Vec2 {
        self.view.scale
    }

    fn set_view_scale(&mut self, scale: Vec2) {
        let (min, max) = (self.settings.min_scale, self.settings.max_scale);
        self.view.scale = Vec2::new(scale.x.clamp(min, max), scale.y.clamp(min, max));
        self.view.apply_masks(self.settings.enable_zoom, self.settings.enable_panning);
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn selection_count(&self) -> usize {
        self.selected_keyframes().len()
    }

    fn snapshot(&self) -> Result<CurveSnapshot> {
        let keyframes: Vec<KeyframeData> = self.curve.keyframes().iter().map(Keyframe::to_data).collect();
        CurveSnapshot::capture(T::KIND, &keyframes)
    }

    fn restore(&mut self, snapshot: &CurveSnapshot) -> Result<()> {
        if snapshot.kind() != T::KIND {
            return Err(CurveError::TypeMismatch {
                expected: T::KIND,
                found: snapshot.kind(),
            });
        }
        self.set_keyframes(snapshot.keyframes()?)
    }
}

impl<T: KeyframeAccess> KeyframesEditor for CurveEditor<T> {
    fn editor_id(&self) -> EditorId {
        self.id
    }

    fn on_context_attached(&mut self, attached: bool) {
        self.shared_selection = attached;
    }

    fn on_keyframes_deselect(&mut self, _source: EditorId) {
        self.clear_selection();
    }

    fn on_keyframes_selection(&mut self, _source: EditorId, region: Rect) {
        let min = self.view.screen_to_view(region.min);
        let max = self.view.screen_to_view(region.max);
        self.select_in_view_rect(Rect::from_two_pos(min, max));
    }

    fn on_keyframes_selection_count(&self) -> usize {
        self.selection_count()
    }

    fn on_keyframes_delete(&mut self, _source: EditorId) {
        self.delete_selection();
    }

    // Values only move in the editor under the pointer; siblings follow in time
    fn on_keyframes_move(&mut self, source: EditorId, location: Pos2, is_start: bool, is_end: bool) {
        if is_start {
            if self.selection.is_empty() {
                self.gesture = None;
                return;
            }
            self.begin_move(location);
            tracing::debug!("Curve '{}' move started", self.name);
            self.notify(CurveEditorEvent::EditingStart);
        }
        if self.gesture.is_none() {
            return;
        }

        match self.apply_move(location, source == self.id) {
            Ok(true) => {
                tracing::trace!("Curve '{}' moved keyframes to {:?}", self.name, location);
                self.notify(CurveEditorEvent::Edited);
            }
            Ok(false) => {}
            Err(err) => tracing::warn!("Curve '{}' move failed: {}", self.name, err),
        }

        if is_end {
            self.gesture = None;
            tracing::debug!("Curve '{}' move finished", self.name);
            self.notify(CurveEditorEvent::EditingEnd);
        }
    }

    fn on_keyframes_copy(&mut self, _source: EditorId, clipboard: &mut KeyframesClipboard) {
        clipboard.tracks.push(self.copy_selection());
    }

    fn on_keyframes_paste(
        &mut self,
        _source: EditorId,
        time_offset: f32,
        clipboard: &KeyframesClipboard,
        cursor: &mut usize,
    ) {
        let Some(track) = clipboard.tracks.get(*cursor) else {
            return;
        };
        *cursor += 1;
        if !track.keyframes.is_empty() {
            self.paste_track(track, time_offset);
        }
    }

    fn on_keyframes_get(
        &self,
        track_name: Option<&str>,
        visitor: &mut dyn FnMut(&str, usize, &KeyframeData),
    ) {
        if track_name.is_some_and(|name| name != self.name) {
            return;
        }
        let ids = self.selected_keyframes();
        for (index, keyframe) in self.curve.keyframes().iter().enumerate() {
            if ids.contains(&keyframe.id) {
                visitor(&self.name, index, &keyframe.to_data());
            }
        }
    }

    // Indices refer to the curve as reported by `on_keyframes_get`, so they
    // are resolved to IDs before anything moves
    fn on_keyframes_set(&mut self, items: &[KeyframeSetItem]) {
        let mut updates: Vec<(KeyframeId, Keyframe<T>)> = Vec::new();
        for item in items.iter().filter(|item| item.track_name == self.name) {
            let resolved = item.data.check_kind(T::KIND).and_then(|()| {
                let target = self.curve.get(item.index)?.id;
                Ok((target, Keyframe::<T>::from_data(&item.data)?))
            });
            match resolved {
                Ok(update) => updates.push(update),
                Err(err) => tracing::warn!("Ignored keyframe set for '{}': {}", self.name, err),
            }
        }
        if updates.is_empty() {
            return;
        }

        let mut keyframes = self.curve.keyframes().to_vec();
        for (id, update) in updates {
            if let Some(keyframe) = keyframes.iter_mut().find(|k| k.id == id) {
                keyframe.time = update.time;
                keyframe.value = update.value;
                keyframe.tangent_in = update.tangent_in;
                keyframe.tangent_out = update.tangent_out;
            }
        }
        self.curve.replace(keyframes);
        self.notify(CurveEditorEvent::Edited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::KeyframesEditorContext;
    use crate::settings::UseMode;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn float_editor(points: &[(f32, f32)]) -> CurveEditor<f32> {
        let mut editor = CurveEditor::new("value", CurveEditorSettings::default());
        for &(time, value) in points {
            editor.add(time, value).unwrap();
        }
        editor
    }

    fn record_events<T: KeyframeAccess>(editor: &mut CurveEditor<T>) -> Rc<RefCell<Vec<CurveEditorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        editor.on_event(move |event| sink.borrow_mut().push(event));
        events
    }

    fn point(editor: &CurveEditor<f32>, index: usize) -> KeyframePoint {
        KeyframePoint {
            keyframe: editor.curve().keyframes()[index].id,
            component: 0,
        }
    }

    #[test]
    fn test_add_returns_sorted_index() {
        let mut editor = float_editor(&[(0.0, 0.0), (2.0, 2.0)]);
        let index = editor.add_keyframe(1.0, KeyframeValue::Float(5.0)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(editor.keyframe(1).unwrap().value, KeyframeValue::Float(5.0));
        let times: Vec<f32> = (0..3).map(|i| editor.keyframe(i).unwrap().time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_add_at_capacity_is_refused() {
        let settings = CurveEditorSettings {
            max_keyframes: 2,
            ..Default::default()
        };
        let mut editor = CurveEditor::<f32>::new("capped", settings);
        editor.add(0.0, 1.0).unwrap();
        editor.add(1.0, 1.0).unwrap();
        let err = editor.add_keyframe(0.5, KeyframeValue::Float(3.0)).unwrap_err();
        assert!(matches!(err, CurveError::CapacityExceeded { max: 2 }));
        assert_eq!(editor.keyframe_count(), 2);
    }

    #[test]
    fn test_fps_quantizes_added_keyframes() {
        let settings = CurveEditorSettings {
            fps: Some(4.0),
            ..Default::default()
        };
        let mut editor = CurveEditor::<f32>::new("stepped", settings);
        let index = editor.add(0.3, 1.0).unwrap();
        assert_eq!(editor.keyframe(index).unwrap().time, 0.25);
    }

    #[test]
    fn test_type_mismatch_and_bounds() {
        let mut editor = float_editor(&[(0.0, 0.0)]);
        assert!(matches!(
            editor.add_keyframe(1.0, KeyframeValue::Bool(true)),
            Err(CurveError::TypeMismatch { expected: ValueKind::Float, found: ValueKind::Bool })
        ));
        assert!(matches!(editor.keyframe(4), Err(CurveError::IndexOutOfRange { index: 4, count: 1 })));
        assert!(editor.set_keyframe_value(1, KeyframeValue::Float(1.0)).is_err());
        assert!(editor.remove_keyframe(1).is_err());
        assert_eq!(editor.keyframe_count(), 1);
    }

    #[test]
    fn test_evaluate_through_base() {
        let editor = CurveEditor::<Vec3>::new("position", CurveEditorSettings::default());
        assert_eq!(editor.evaluate(3.0, true), KeyframeValue::Float3(Vec3::ZERO));
        let editor = float_editor(&[(1.0, 4.0)]);
        assert_eq!(editor.evaluate(-2.0, false), KeyframeValue::Float(4.0));
        assert_eq!(editor.evaluate(9.0, true), KeyframeValue::Float(4.0));
    }

    #[test]
    fn test_mutations_fire_edited() {
        let mut editor = float_editor(&[]);
        let events = record_events(&mut editor);
        editor.add(0.0, 1.0).unwrap();
        editor.set_keyframe_value(0, KeyframeValue::Float(2.0)).unwrap();
        editor.set_keyframe_time(0, 1.0).unwrap();
        editor.remove_keyframe(0).unwrap();
        assert_eq!(*events.borrow(), vec![CurveEditorEvent::Edited; 4]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut editor = float_editor(&[]);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = order.clone();
            editor.on_event(move |_| order.borrow_mut().push(tag));
        }
        editor.add(0.0, 0.0).unwrap();
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_set_keyframes_replaces_and_checks() {
        let mut editor = float_editor(&[(0.0, 0.0)]);
        editor.select_all();
        let data = vec![
            KeyframeData::new(2.0, KeyframeValue::Float(1.0)),
            KeyframeData::new(1.0, KeyframeValue::Float(3.0)),
        ];
        editor.set_keyframes(data).unwrap();
        assert_eq!(editor.keyframe_count(), 2);
        assert_eq!(editor.keyframe(0).unwrap().time, 1.0);
        assert_eq!(editor.selection_count(), 0);
        assert!(editor
            .set_keyframes(vec![KeyframeData::new(0.0, KeyframeValue::Int(1))])
            .is_err());
        assert_eq!(editor.keyframe_count(), 2);
    }

    #[test]
    fn test_view_axes_pinned_when_disabled() {
        let settings = CurveEditorSettings {
            enable_zoom: UseMode::Horizontal,
            enable_panning: UseMode::Horizontal,
            ..Default::default()
        };
        let mut editor = CurveEditor::<f32>::new("pinned", settings);
        editor.set_view_offset(Vec2::new(2.0, 5.0));
        editor.set_view_scale(Vec2::new(3.0, 3.0));
        assert_eq!(editor.view_offset(), Vec2::new(2.0, 0.0));
        assert_eq!(editor.view_scale(), Vec2::new(3.0, 1.0));

        editor.add(0.0, -40.0).unwrap();
        editor.add(10.0, 40.0).unwrap();
        editor.show_whole_curve();
        assert_eq!(editor.view_offset().y, 0.0);
        assert_eq!(editor.view_scale().y, 1.0);
        assert!(editor.view_offset().x < 0.0);
    }

    #[test]
    fn test_show_whole_curve_leaves_data_alone() {
        let mut editor = float_editor(&[(0.0, 0.0), (4.0, 8.0)]);
        let before = editor.snapshot().unwrap();
        editor.show_whole_curve();
        assert_eq!(editor.snapshot().unwrap(), before);
        let (start, end) = editor.view().visible_times();
        assert!(start < 0.0 && end > 4.0);
    }

    #[test]
    fn test_point_selection_and_delete() {
        let mut editor = float_editor(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)]);
        let first = point(&editor, 0);
        let last = point(&editor, 2);
        editor.select_point(first, false);
        editor.select_point(last, true);
        assert_eq!(editor.selection_count(), 2);
        let events = record_events(&mut editor);
        assert_eq!(editor.delete_selection(), 2);
        assert_eq!(editor.keyframe_count(), 1);
        assert_eq!(editor.keyframe(0).unwrap().time, 1.0);
        assert_eq!(*events.borrow(), vec![CurveEditorEvent::Edited]);
    }

    #[test]
    fn test_point_at_finds_nearest() {
        let editor = float_editor(&[(0.5, 0.5), (1.0, 1.0)]);
        let pos = editor.view().curve_to_view(1.0, 1.0);
        assert_eq!(editor.point_at(pos + Vec2::new(2.0, 0.0), 6.0), Some(point(&editor, 1)));
        assert_eq!(editor.point_at(Pos2::new(390.0, 5.0), 6.0), None);
    }

    #[test]
    fn test_move_gesture_brackets_edits() {
        let mut editor = float_editor(&[(0.0, 0.0), (1.0, 1.0)]);
        let moved = point(&editor, 0);
        editor.select_point(moved, false);
        let events = record_events(&mut editor);
        let source = editor.id();
        let start = editor.view().view_to_screen(editor.view().curve_to_view(0.0, 0.0));

        editor.on_keyframes_move(source, start, true, false);
        editor.on_keyframes_move(source, start + Vec2::new(50.0, -50.0), false, false);
        editor.on_keyframes_move(source, start + Vec2::new(150.0, -50.0), false, true);

        use CurveEditorEvent::*;
        assert_eq!(*events.borrow(), vec![EditingStart, Edited, Edited, EditingEnd]);
        let index = editor.curve().index_of(moved.keyframe).unwrap();
        let keyframe = editor.keyframe(index).unwrap();
        assert!((keyframe.time - 1.5).abs() < 1e-4);
        assert_eq!(keyframe.value, KeyframeValue::Float(0.5));
        assert_eq!(index, 1);
    }

    #[test]
    fn test_sibling_move_keeps_values() {
        let mut editor = float_editor(&[(0.0, 2.0)]);
        editor.select_all();
        let start = Pos2::new(0.0, 100.0);
        let other = EditorId::new();
        editor.on_keyframes_move(other, start, true, false);
        editor.on_keyframes_move(other, start + Vec2::new(100.0, 80.0), false, true);
        let keyframe = editor.keyframe(0).unwrap();
        assert!((keyframe.time - 1.0).abs() < 1e-4);
        assert_eq!(keyframe.value, KeyframeValue::Float(2.0));
    }

    #[test]
    fn test_move_without_selection_is_silent() {
        let mut editor = float_editor(&[(0.0, 0.0)]);
        let events = record_events(&mut editor);
        let source = editor.id();
        editor.on_keyframes_move(source, Pos2::ZERO, true, false);
        editor.on_keyframes_move(source, Pos2::new(10.0, 0.0), false, true);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_vector_components_move_independently() {
        let mut editor = CurveEditor::<Vec3>::new("position", CurveEditorSettings::default());
        editor.add(0.0, Vec3::new(0.0, 0.0, 0.0)).unwrap();
        let id = editor.curve().keyframes()[0].id;
        editor.select_point(KeyframePoint { keyframe: id, component: 1 }, false);
        let source = editor.id();
        let start = Pos2::new(0.0, 200.0);
        editor.on_keyframes_move(source, start, true, false);
        editor.on_keyframes_move(source, start - Vec2::new(0.0, 100.0), false, true);
        assert_eq!(editor.curve().keyframes()[0].value, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_shared_context_delete_and_selection() {
        let mut context = KeyframesEditorContext::new();
        let x = Rc::new(RefCell::new(float_editor(&[(0.0, 0.0), (1.0, 1.0)])));
        let y = Rc::new(RefCell::new(float_editor(&[(0.0, 0.0), (1.0, 1.0)])));
        context.register(&x);
        context.register(&y);
        assert!(x.borrow().uses_shared_selection());

        // Both editors occupy the default rectangle, so one region hits both
        let region = Rect::from_min_max(Pos2::new(-5.0, 95.0), Pos2::new(105.0, 205.0));
        let source = x.borrow().id();
        context.selection(source, region);
        assert_eq!(context.selection_count(), 4);

        context.delete(source);
        assert_eq!(x.borrow().keyframe_count(), 0);
        assert_eq!(y.borrow().keyframe_count(), 0);
    }

    #[test]
    fn test_shared_copy_paste_through_ron() {
        let mut context = KeyframesEditorContext::new();
        let x = Rc::new(RefCell::new(float_editor(&[(1.0, 1.0), (2.0, 4.0)])));
        let y = Rc::new(RefCell::new(float_editor(&[(0.0, 3.0)])));
        context.register(&x);
        context.register(&y);
        x.borrow_mut().select_all();
        y.borrow_mut().select_all();

        let source = x.borrow().id();
        let clipboard = context.copy(source, None);
        assert_eq!(clipboard.tracks.len(), 2);
        assert_eq!(clipboard.tracks[0].keyframes[0].time, 1.0);
        assert_eq!(clipboard.tracks[1].keyframes[0].time, 0.0);

        let text = clipboard.to_ron().unwrap();
        let restored = KeyframesClipboard::from_ron(&text).unwrap();
        context.paste(source, 10.0, &restored);

        let x = x.borrow();
        assert_eq!(x.keyframe_count(), 4);
        assert_eq!(x.keyframe(2).unwrap().time, 11.0);
        assert_eq!(x.keyframe(3).unwrap().value, KeyframeValue::Float(4.0));
        assert_eq!(x.selection_count(), 2);
        let y = y.borrow();
        assert_eq!(y.keyframe_count(), 2);
        assert_eq!(y.keyframe(1).unwrap().time, 10.0);
    }

    #[test]
    fn test_paste_skips_mismatched_kind() {
        let mut editor = float_editor(&[]);
        let track = ClipboardTrack {
            name: "flag".to_string(),
            kind: ValueKind::Bool,
            keyframes: vec![KeyframeData::new(0.0, KeyframeValue::Bool(true))],
        };
        assert_eq!(editor.paste_track(&track, 0.0), 0);
        assert_eq!(editor.keyframe_count(), 0);
    }

    #[test]
    fn test_paste_stops_at_capacity() {
        let settings = CurveEditorSettings {
            max_keyframes: 1,
            ..Default::default()
        };
        let mut editor = CurveEditor::<f32>::new("capped", settings);
        let mut source = float_editor(&[(0.0, 1.0), (1.0, 2.0)]);
        source.select_all();
        assert_eq!(editor.paste_track(&source.copy_selection(), 0.0), 1);
        assert_eq!(editor.keyframe_count(), 1);
    }

    #[test]
    fn test_get_and_set_by_track_name() {
        let mut context = KeyframesEditorContext::new();
        let x = Rc::new(RefCell::new(float_editor(&[(0.0, 1.0), (1.0, 2.0)])));
        x.borrow_mut().name = "alpha".to_string();
        context.register(&x);
        let second = point(&x.borrow(), 1);
        x.borrow_mut().select_point(second, false);

        let mut items = Vec::new();
        context.get(Some("alpha"), &mut |name, index, data| {
            items.push(KeyframeSetItem {
                track_name: name.to_string(),
                index,
                data: KeyframeData { value: KeyframeValue::Float(9.0), ..*data },
            });
        });
        assert_eq!(items.len(), 1);
        context.get(Some("beta"), &mut |_, _, _| panic!("filtered track visited"));

        context.set(&items);
        assert_eq!(x.borrow().keyframe(1).unwrap().value, KeyframeValue::Float(9.0));
    }

    fn bezier_editor(points: &[(f32, f32)]) -> CurveEditor<f32> {
        let settings = CurveEditorSettings {
            interpolation: InterpolationMode::Bezier,
            ..Default::default()
        };
        let mut editor = CurveEditor::new("value", settings);
        for &(time, value) in points {
            editor.add(time, value).unwrap();
        }
        editor
    }

    #[test]
    fn test_tangent_handles_need_bezier_and_selection() {
        let mut linear = float_editor(&[(0.0, 0.0)]);
        linear.select_all();
        assert!(linear.tangent_handles().is_empty());

        let mut editor = bezier_editor(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(editor.tangent_handles().is_empty());
        let first = point(&editor, 0);
        editor.select_point(first, false);
        assert_eq!(editor.tangent_handles().len(), 2);

        // Flat tangents put the handles level with the point
        let anchor = editor.point_position(editor.curve().get(0).unwrap(), 0).unwrap();
        let out = TangentHandle { point: first, side: TangentSide::Out };
        let pos = editor.tangent_handle_position(out).unwrap();
        assert!((pos.x - anchor.x - TANGENT_HANDLE_LENGTH).abs() < 1e-3);
        assert!((pos.y - anchor.y).abs() < 1e-3);
        assert_eq!(editor.tangent_handle_at(pos, 2.0), Some(out));
    }

    #[test]
    fn test_tangent_drag_sets_slope() {
        let mut editor = bezier_editor(&[(0.0, 0.0), (2.0, 0.0)]);
        let first = point(&editor, 0);
        editor.select_point(first, false);
        let events = record_events(&mut editor);

        let out = TangentHandle { point: first, side: TangentSide::Out };
        editor.begin_tangent_drag(out);
        let target = editor.view().curve_to_view(1.0, 2.0);
        assert!(editor.drag_tangent(out, target).unwrap());
        editor.end_tangent_drag();

        let keyframe = editor.curve().get(0).unwrap();
        assert!((keyframe.tangent_out - 2.0).abs() < 1e-3);
        assert_eq!(keyframe.tangent_in, 0.0);
        assert_eq!(keyframe.value, 0.0);
        assert!(editor.evaluate_typed(0.5, false) > 0.0);
        assert_eq!(
            *events.borrow(),
            vec![
                CurveEditorEvent::EditingStart,
                CurveEditorEvent::Edited,
                CurveEditorEvent::EditingEnd,
            ]
        );

        // The incoming handle only accepts positions before the keyframe
        let incoming = TangentHandle { point: first, side: TangentSide::In };
        let ahead = editor.view().curve_to_view(1.0, 5.0);
        assert!(!editor.drag_tangent(incoming, ahead).unwrap());
        let behind = editor.view().curve_to_view(-1.0, 3.0);
        assert!(editor.drag_tangent(incoming, behind).unwrap());
        assert!((editor.curve().get(0).unwrap().tangent_in + 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_shifts_every_selected_keyframe() {
        let mut context = KeyframesEditorContext::new();
        let x = Rc::new(RefCell::new(float_editor(&[(0.0, 10.0), (1.0, 11.0), (2.0, 12.0)])));
        context.register(&x);
        x.borrow_mut().select_all();

        let mut items = Vec::new();
        context.get(None, &mut |name, index, data| {
            items.push(KeyframeSetItem {
                track_name: name.to_string(),
                index,
                data: KeyframeData { time: data.time + 5.0, ..*data },
            });
        });
        assert_eq!(items.len(), 3);
        context.set(&items);

        let x = x.borrow();
        let keyframes: Vec<(f32, KeyframeValue)> = (0..x.keyframe_count())
            .map(|i| {
                let data = x.keyframe(i).unwrap();
                (data.time, data.value)
            })
            .collect();
        assert_eq!(
            keyframes,
            vec![
                (5.0, KeyframeValue::Float(10.0)),
                (6.0, KeyframeValue::Float(11.0)),
                (7.0, KeyframeValue::Float(12.0)),
            ]
        );
        assert_eq!(x.selection_count(), 3);
    }

    #[test]
    fn test_set_ignores_stale_index() {
        let mut editor = float_editor(&[(0.0, 1.0)]);
        let events = record_events(&mut editor);
        editor.on_keyframes_set(&[KeyframeSetItem {
            track_name: "value".to_string(),
            index: 4,
            data: KeyframeData::new(3.0, KeyframeValue::Float(2.0)),
        }]);
        assert_eq!(editor.keyframe(0).unwrap().time, 0.0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_local_requests_apply_immediately() {
        let mut editor = float_editor(&[(0.0, 0.0)]);
        editor.select_all();
        editor.request(KeyframesRequest::Delete);
        assert_eq!(editor.keyframe_count(), 0);
        assert!(editor.take_requests().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut editor = float_editor(&[(0.0, 0.0), (1.0, 1.0)]);
        let before = editor.snapshot().unwrap();
        editor.remove_keyframe(0).unwrap();
        assert_ne!(editor.snapshot().unwrap(), before);
        editor.restore(&before).unwrap();
        assert_eq!(editor.snapshot().unwrap(), before);

        let other = CurveEditor::<bool>::new("flag", CurveEditorSettings::default());
        assert!(editor.restore(&other.snapshot().unwrap()).is_err());
    }
}
