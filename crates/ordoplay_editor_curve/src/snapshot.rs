// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve snapshots for the host undo system.
//!
//! The editor never records undo steps itself. It brackets gestures with
//! `EditingStart`/`EditingEnd`; the host captures a snapshot on each side
//! and hands both to its recorder. Byte equality of the encoded keyframes
//! decides whether anything changed.

use crate::editor::{CurveEditorBase, EditorId};
use crate::error::Result;
use crate::keyframe::KeyframeData;
use crate::value::ValueKind;
use serde::{Deserialize, Serialize};

/// Encoded keyframes of one curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    kind: ValueKind,
    data: Vec<u8>,
}

impl CurveSnapshot {
    /// Encode keyframes of the given kind
    pub fn capture(kind: ValueKind, keyframes: &[KeyframeData]) -> Result<Self> {
        Ok(Self {
            kind,
            data: bincode::serialize(keyframes)?,
        })
    }

    /// Value kind of the captured curve
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Decode the keyframes
    pub fn keyframes(&self) -> Result<Vec<KeyframeData>> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Receives reversible curve edits
pub trait UndoRecorder {
    /// Record an edit of `editor` from `before` to `after`
    fn record(&mut self, editor: EditorId, description: &str, before: CurveSnapshot, after: CurveSnapshot);
}

/// Collects one gesture's edits into a single undo step
#[derive(Debug, Default)]
pub struct EditBatch {
    before: Option<CurveSnapshot>,
}

impl EditBatch {
    /// Create an idle batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is being collected
    pub fn is_active(&self) -> bool {
        self.before.is_some()
    }

    /// Capture the state before the gesture (on `EditingStart`)
    pub fn begin(&mut self, editor: &dyn CurveEditorBase) -> Result<()> {
        self.before = Some(editor.snapshot()?);
        Ok(())
    }

    /// Capture the state after the gesture (on `EditingEnd`) and record it
    /// if anything changed. Returns whether an undo step was recorded.
    pub fn finish(
        &mut self,
        editor: &dyn CurveEditorBase,
        recorder: &mut dyn UndoRecorder,
        description: &str,
    ) -> Result<bool> {
        let Some(before) = self.before.take() else {
            return Ok(false);
        };
        let after = editor.snapshot()?;
        if before == after {
            tracing::debug!("Edit '{}' changed nothing, not recorded", description);
            return Ok(false);
        }
        recorder.record(editor.id(), description, before, after);
        Ok(true)
    }

    /// Drop the captured state without recording
    pub fn cancel(&mut self) {
        self.before = None;
    }
}
