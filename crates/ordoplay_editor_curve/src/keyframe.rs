// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for curves.

use crate::access::KeyframeAccess;
use crate::error::{CurveError, Result};
use crate::value::{KeyframeValue, ValueKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum InterpolationMode {
    /// Constant (step)
    Constant,
    /// Linear interpolation, tangents ignored
    #[default]
    Linear,
    /// Cubic bezier using keyframe tangents
    Bezier,
}

/// A keyframe in a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: KeyframeAccess")]
pub struct Keyframe<T: KeyframeAccess> {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: T,
    /// Incoming tangent (bezier curves)
    pub tangent_in: T,
    /// Outgoing tangent (bezier curves)
    pub tangent_out: T,
}

impl<T: KeyframeAccess> Keyframe<T> {
    /// Create a new keyframe with default tangents
    pub fn new(time: f32, value: T) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            tangent_in: T::default_value(),
            tangent_out: T::default_value(),
        }
    }

    /// Set tangents for bezier interpolation
    pub fn with_tangents(mut self, tangent_in: T, tangent_out: T) -> Self {
        self.tangent_in = tangent_in;
        self.tangent_out = tangent_out;
        self
    }

    /// Convert to the type-erased form
    pub fn to_data(&self) -> KeyframeData {
        KeyframeData {
            time: self.time,
            value: self.value.into_value(),
            tangent_in: self.tangent_in.into_value(),
            tangent_out: self.tangent_out.into_value(),
        }
    }

    /// Build from the type-erased form, assigning a fresh ID
    pub fn from_data(data: &KeyframeData) -> Result<Self> {
        Ok(Self::new(data.time, T::from_value(data.value)?)
            .with_tangents(T::from_value(data.tangent_in)?, T::from_value(data.tangent_out)?))
    }
}

/// Keyframe contents with the value type erased
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeData {
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: KeyframeValue,
    /// Incoming tangent
    pub tangent_in: KeyframeValue,
    /// Outgoing tangent
    pub tangent_out: KeyframeValue,
}

impl KeyframeData {
    /// Keyframe with default tangents for the value's kind
    pub fn new(time: f32, value: KeyframeValue) -> Self {
        let tangent = value.kind().default_value();
        Self {
            time,
            value,
            tangent_in: tangent,
            tangent_out: tangent,
        }
    }

    /// Kind of the stored value
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Check that value and tangents all share `kind`
    pub fn check_kind(&self, kind: ValueKind) -> Result<()> {
        for found in [self.value.kind(), self.tangent_in.kind(), self.tangent_out.kind()] {
            if found != kind {
                return Err(CurveError::TypeMismatch { expected: kind, found });
            }
        }
        Ok(())
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }

    /// Cubic bezier over any value type (de Casteljau on [`KeyframeAccess::lerp`])
    pub fn bezier_value<T: KeyframeAccess>(p0: &T, p1: &T, p2: &T, p3: &T, t: f32) -> T {
        let a = T::lerp(p0, p1, t);
        let b = T::lerp(p1, p2, t);
        let c = T::lerp(p2, p3, t);
        let d = T::lerp(&a, &b, t);
        let e = T::lerp(&b, &c, t);
        T::lerp(&d, &e, t)
    }

    /// Interpolate between two keyframes using `mode`
    pub fn segment<T: KeyframeAccess>(
        a: &Keyframe<T>,
        b: &Keyframe<T>,
        t: f32,
        mode: InterpolationMode,
    ) -> T {
        match mode {
            InterpolationMode::Constant => a.value,
            InterpolationMode::Linear => T::lerp(&a.value, &b.value, t),
            InterpolationMode::Bezier => {
                let tangent_scale = (b.time - a.time) / 3.0;
                let p1 = T::offset(&a.value, &a.tangent_out, tangent_scale);
                let p2 = T::offset(&b.value, &b.tangent_in, tangent_scale);
                Self::bezier_value(&a.value, &p1, &p2, &b.value, t)
            }
        }
    }
}
