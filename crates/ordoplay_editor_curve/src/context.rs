// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared keyframe selection across several editors.
//!
//! Curve editors shown together (one per vector axis, one per timeline
//! track) register with a [`KeyframesEditorContext`]. Selection, deletion,
//! moves and clipboard operations started in one editor are broadcast to
//! every registered editor, in registration order, before the call returns.
//!
//! Regions and locations are in egui screen coordinates; each editor maps
//! them through its own view.

use crate::editor::EditorId;
use crate::error::Result;
use crate::keyframe::KeyframeData;
use crate::value::ValueKind;
use egui::{Pos2, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Keyframes copied from one editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardTrack {
    /// Name of the editor the keyframes came from
    pub name: String,
    /// Value kind of the keyframes
    pub kind: ValueKind,
    /// Copied keyframes, times relative to the copy origin
    pub keyframes: Vec<KeyframeData>,
}

/// Keyframes copied from a set of editors, one track per editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframesClipboard {
    /// Tracks in editor registration order
    pub tracks: Vec<ClipboardTrack>,
}

impl KeyframesClipboard {
    /// Total copied keyframes
    pub fn keyframe_count(&self) -> usize {
        self.tracks.iter().map(|t| t.keyframes.len()).sum()
    }

    /// Whether nothing was copied
    pub fn is_empty(&self) -> bool {
        self.keyframe_count() == 0
    }

    /// Shift every keyframe so times are relative to `origin`
    pub fn rebase(&mut self, origin: f32) {
        for track in &mut self.tracks {
            for keyframe in &mut track.keyframes {
                keyframe.time -= origin;
            }
        }
    }

    /// Earliest copied keyframe time
    pub fn start_time(&self) -> Option<f32> {
        self.tracks
            .iter()
            .flat_map(|t| t.keyframes.iter().map(|k| k.time))
            .min_by(f32::total_cmp)
    }

    /// Serialize as RON text for the system clipboard
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string(self)?)
    }

    /// Parse RON text produced by [`Self::to_ron`]
    pub fn from_ron(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }
}

/// A keyframe assignment addressed by track name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSetItem {
    /// Target editor name
    pub track_name: String,
    /// Keyframe index within that editor
    pub index: usize,
    /// New keyframe contents
    pub data: KeyframeData,
}

/// Callbacks an editor implements to take part in a shared selection
pub trait KeyframesEditor {
    /// Identity used for registration and as broadcast source
    fn editor_id(&self) -> EditorId;

    /// Called when the editor joins (`true`) or leaves (`false`) a context
    fn on_context_attached(&mut self, attached: bool);

    /// Clear the selection
    fn on_keyframes_deselect(&mut self, source: EditorId);

    /// Add keyframes inside `region` (screen space) to the selection
    fn on_keyframes_selection(&mut self, source: EditorId, region: Rect);

    /// Number of selected keyframes
    fn on_keyframes_selection_count(&self) -> usize;

    /// Delete selected keyframes
    fn on_keyframes_delete(&mut self, source: EditorId);

    /// Move selected keyframes following `location` (screen space)
    fn on_keyframes_move(&mut self, source: EditorId, location: Pos2, is_start: bool, is_end: bool);

    /// Append this editor's selected keyframes (absolute times) to `clipboard`
    fn on_keyframes_copy(&mut self, source: EditorId, clipboard: &mut KeyframesClipboard);

    /// Consume the track at `cursor` and insert it at `time_offset`
    fn on_keyframes_paste(
        &mut self,
        source: EditorId,
        time_offset: f32,
        clipboard: &KeyframesClipboard,
        cursor: &mut usize,
    );

    /// Report selected keyframes as `(track name, index, data)`
    fn on_keyframes_get(
        &self,
        track_name: Option<&str>,
        visitor: &mut dyn FnMut(&str, usize, &KeyframeData),
    );

    /// Apply items addressed to this editor
    fn on_keyframes_set(&mut self, items: &[KeyframeSetItem]);
}

/// Operation raised by an editor's widget, to be broadcast by the context
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframesRequest {
    /// Clear every selection
    Deselect,
    /// Add keyframes inside a screen-space region to the selection
    Selection {
        /// Selected region
        region: Rect,
    },
    /// Delete selected keyframes
    Delete,
    /// Move selected keyframes
    Move {
        /// Pointer location
        location: Pos2,
        /// First event of the gesture
        is_start: bool,
        /// Last event of the gesture
        is_end: bool,
    },
    /// Copy selected keyframes
    Copy,
    /// Paste keyframes at a time
    Paste {
        /// Time the clipboard origin lands on
        time_offset: f32,
        /// Keyframes to paste
        clipboard: KeyframesClipboard,
    },
}

/// Shared editor reference held by a context
pub type SharedKeyframesEditor = Rc<RefCell<dyn KeyframesEditor>>;

/// Fan-out registry of editors sharing one selection
#[derive(Default)]
pub struct KeyframesEditorContext {
    editors: IndexMap<EditorId, SharedKeyframesEditor>,
}

impl KeyframesEditorContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an editor; it will receive every broadcast from now on
    pub fn register<E: KeyframesEditor + 'static>(&mut self, editor: &Rc<RefCell<E>>) -> EditorId {
        let shared: SharedKeyframesEditor = editor.clone();
        let id = {
            let mut editor = shared.borrow_mut();
            editor.on_context_attached(true);
            editor.editor_id()
        };
        self.editors.insert(id, shared);
        id
    }

    /// Remove an editor from the context
    pub fn unregister(&mut self, id: EditorId) -> bool {
        match self.editors.shift_remove(&id) {
            Some(editor) => {
                if let Ok(mut editor) = editor.try_borrow_mut() {
                    editor.on_context_attached(false);
                }
                true
            }
            None => false,
        }
    }

    /// Number of registered editors
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Whether no editor is registered
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Whether an editor is registered
    pub fn contains(&self, id: EditorId) -> bool {
        self.editors.contains_key(&id)
    }

    fn for_each_mut(&self, mut f: impl FnMut(&mut dyn KeyframesEditor)) {
        for (id, editor) in &self.editors {
            match editor.try_borrow_mut() {
                Ok(mut editor) => f(&mut *editor),
                Err(_) => tracing::warn!("Keyframes editor {:?} is busy, broadcast skipped", id),
            }
        }
    }

    fn for_each(&self, mut f: impl FnMut(&dyn KeyframesEditor)) {
        for (id, editor) in &self.editors {
            match editor.try_borrow() {
                Ok(editor) => f(&*editor),
                Err(_) => tracing::warn!("Keyframes editor {:?} is busy, broadcast skipped", id),
            }
        }
    }

    /// Clear the selection of every editor
    pub fn deselect(&self, source: EditorId) {
        self.for_each_mut(|editor| editor.on_keyframes_deselect(source));
    }

    /// Add keyframes inside `region` to the selection of every editor
    pub fn selection(&self, source: EditorId, region: Rect) {
        self.for_each_mut(|editor| editor.on_keyframes_selection(source, region));
    }

    /// Total selected keyframes across editors
    pub fn selection_count(&self) -> usize {
        let mut count = 0;
        self.for_each(|editor| count += editor.on_keyframes_selection_count());
        count
    }

    /// Delete selected keyframes in every editor
    pub fn delete(&self, source: EditorId) {
        self.for_each_mut(|editor| editor.on_keyframes_delete(source));
    }

    /// Move selected keyframes in every editor
    pub fn move_keyframes(&self, source: EditorId, location: Pos2, is_start: bool, is_end: bool) {
        self.for_each_mut(|editor| editor.on_keyframes_move(source, location, is_start, is_end));
    }

    /// Copy selected keyframes of every editor.
    ///
    /// Times are made relative to `time_offset`, or to the earliest copied
    /// keyframe when no offset is given.
    pub fn copy(&self, source: EditorId, time_offset: Option<f32>) -> KeyframesClipboard {
        let mut clipboard = KeyframesClipboard::default();
        self.for_each_mut(|editor| editor.on_keyframes_copy(source, &mut clipboard));
        if let Some(origin) = time_offset.or_else(|| clipboard.start_time()) {
            clipboard.rebase(origin);
        }
        clipboard
    }

    /// Paste clipboard tracks into editors, one track per editor in order
    pub fn paste(&self, source: EditorId, time_offset: f32, clipboard: &KeyframesClipboard) {
        let mut cursor = 0;
        self.for_each_mut(|editor| editor.on_keyframes_paste(source, time_offset, clipboard, &mut cursor));
    }

    /// Visit selected keyframes, optionally only those of one track
    pub fn get(&self, track_name: Option<&str>, visitor: &mut dyn FnMut(&str, usize, &KeyframeData)) {
        self.for_each(|editor| editor.on_keyframes_get(track_name, &mut *visitor));
    }

    /// Apply keyframe assignments addressed by track name
    pub fn set(&self, items: &[KeyframeSetItem]) {
        self.for_each_mut(|editor| editor.on_keyframes_set(items));
    }

    /// Broadcast a request raised by an editor's widget.
    ///
    /// Returns the clipboard for [`KeyframesRequest::Copy`].
    pub fn dispatch(&self, source: EditorId, request: KeyframesRequest) -> Option<KeyframesClipboard> {
        match request {
            KeyframesRequest::Deselect => self.deselect(source),
            KeyframesRequest::Selection { region } => self.selection(source, region),
            KeyframesRequest::Delete => self.delete(source),
            KeyframesRequest::Move { location, is_start, is_end } => {
                self.move_keyframes(source, location, is_start, is_end);
            }
            KeyframesRequest::Copy => return Some(self.copy(source, None)),
            KeyframesRequest::Paste { time_offset, clipboard } => {
                self.paste(source, time_offset, &clipboard);
            }
        }
        None
    }
}
