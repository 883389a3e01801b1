// SPDX-License-Identifier: MIT OR Apache-2.0
//! Closed set of keyframe value kinds.

use glam::{DVec2, DVec3, DVec4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color32 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color32 {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an array in RGBA order
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from an RGBA array
    pub fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Floating point RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Create a color from its channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as an array in RGBA order
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from an RGBA array
    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Runtime tag of a keyframe value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// 2-component float vector
    Float2,
    /// 3-component float vector
    Float3,
    /// 4-component float vector
    Float4,
    /// 2-component double vector
    Double2,
    /// 3-component double vector
    Double3,
    /// 4-component double vector
    Double4,
    /// Rotation quaternion
    Quaternion,
    /// 8-bit RGBA color
    Color32,
    /// Floating point RGBA color
    Color,
}

impl ValueKind {
    /// Every supported kind, in declaration order
    pub const ALL: [ValueKind; 13] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Float2,
        ValueKind::Float3,
        ValueKind::Float4,
        ValueKind::Double2,
        ValueKind::Double3,
        ValueKind::Double4,
        ValueKind::Quaternion,
        ValueKind::Color32,
        ValueKind::Color,
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Float2 => "Float2",
            Self::Float3 => "Float3",
            Self::Float4 => "Float4",
            Self::Double2 => "Double2",
            Self::Double3 => "Double3",
            Self::Double4 => "Double4",
            Self::Quaternion => "Quaternion",
            Self::Color32 => "Color32",
            Self::Color => "Color",
        }
    }

    /// Number of editable float components
    pub const fn component_count(&self) -> usize {
        match self {
            Self::Bool | Self::Int | Self::Float | Self::Double => 1,
            Self::Float2 | Self::Double2 => 2,
            Self::Float3 | Self::Double3 | Self::Quaternion => 3,
            Self::Float4 | Self::Double4 | Self::Color32 | Self::Color => 4,
        }
    }

    /// Canonical zero/identity value of this kind
    pub fn default_value(&self) -> KeyframeValue {
        match self {
            Self::Bool => KeyframeValue::Bool(false),
            Self::Int => KeyframeValue::Int(0),
            Self::Float => KeyframeValue::Float(0.0),
            Self::Double => KeyframeValue::Double(0.0),
            Self::Float2 => KeyframeValue::Float2(Vec2::ZERO),
            Self::Float3 => KeyframeValue::Float3(Vec3::ZERO),
            Self::Float4 => KeyframeValue::Float4(Vec4::ZERO),
            Self::Double2 => KeyframeValue::Double2(DVec2::ZERO),
            Self::Double3 => KeyframeValue::Double3(DVec3::ZERO),
            Self::Double4 => KeyframeValue::Double4(DVec4::ZERO),
            Self::Quaternion => KeyframeValue::Quaternion(Quat::IDENTITY),
            Self::Color32 => KeyframeValue::Color32(Color32::default()),
            Self::Color => KeyframeValue::Color(Color::default()),
        }
    }
}

/// A keyframe value of any supported kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeyframeValue {
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// Float value
    Float(f32),
    /// Double value
    Double(f64),
    /// 2D float vector
    Float2(Vec2),
    /// 3D float vector
    Float3(Vec3),
    /// 4D float vector
    Float4(Vec4),
    /// 2D double vector
    Double2(DVec2),
    /// 3D double vector
    Double3(DVec3),
    /// 4D double vector
    Double4(DVec4),
    /// Rotation
    Quaternion(Quat),
    /// 8-bit color
    Color32(Color32),
    /// Float color
    Color(Color),
}

impl KeyframeValue {
    /// Get the runtime kind tag
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Float2(_) => ValueKind::Float2,
            Self::Float3(_) => ValueKind::Float3,
            Self::Float4(_) => ValueKind::Float4,
            Self::Double2(_) => ValueKind::Double2,
            Self::Double3(_) => ValueKind::Double3,
            Self::Double4(_) => ValueKind::Double4,
            Self::Quaternion(_) => ValueKind::Quaternion,
            Self::Color32(_) => ValueKind::Color32,
            Self::Color(_) => ValueKind::Color,
        }
    }

    /// Number of editable float components
    pub fn component_count(&self) -> usize {
        self.kind().component_count()
    }

    /// Get as float if possible
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as Vec3 if possible
    pub fn as_float3(&self) -> Option<Vec3> {
        match self {
            Self::Float3(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as quaternion if possible
    pub fn as_quaternion(&self) -> Option<Quat> {
        match self {
            Self::Quaternion(v) => Some(*v),
            _ => None,
        }
    }
}
