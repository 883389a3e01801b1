// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe curve editing for OrdoPlay Editor.
//!
//! This crate lets editor tooling manipulate keyframed animation data of any
//! supported value type without knowing that type at compile time:
//! - Scalars (bool, int, float, double)
//! - Float and double vectors (2, 3 and 4 components)
//! - Quaternions (edited as Euler angles)
//! - 8-bit and float colors
//!
//! ## Architecture
//!
//! The curve editor is built on:
//! - A per-type access table splitting values into float components
//! - Sorted, optionally frame-quantized keyframe curves
//! - A type-erased editor contract for host tooling
//! - A shared selection context for editors displayed together
//! - Snapshots for the host undo system

pub mod access;
pub mod context;
pub mod curve;
pub mod editor;
pub mod error;
pub mod keyframe;
pub mod settings;
pub mod snapshot;
pub mod ui;
pub mod value;
pub mod view;

pub use access::{KeyframeAccess, ValueAccess, QUATERNION_EULER_ORDER};
pub use context::{
    ClipboardTrack, KeyframeSetItem, KeyframesClipboard, KeyframesEditor, KeyframesEditorContext,
    KeyframesRequest, SharedKeyframesEditor,
};
pub use curve::Curve;
pub use editor::{
    CurveEditor, CurveEditorBase, CurveEditorEvent, CurveEditorListener, EditorId, KeyframePoint, TangentHandle,
    TangentSide, TANGENT_HANDLE_LENGTH,
};
pub use error::{CurveError, Result};
pub use keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeData, KeyframeId};
pub use settings::{CurveEditorSettings, UseMode};
pub use snapshot::{CurveSnapshot, EditBatch, UndoRecorder};
pub use ui::{component_color, CurveEditorResponse};
pub use value::{Color, Color32, KeyframeValue, ValueKind};
pub use view::CurveView;
