// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-type keyframe access.
//!
//! The curve editor works on "a value with N float components". Each
//! concrete value type describes how it splits into those components through
//! [`KeyframeAccess`]. [`ValueAccess`] is the same contract erased behind the
//! [`ValueKind`] tag, looked up from a static table.

use crate::error::{CurveError, Result};
use crate::value::{Color, Color32, KeyframeValue, ValueKind};
use glam::{DVec2, DVec3, DVec4, EulerRot, Quat, Vec2, Vec3, Vec4};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Euler order used to expose quaternions as three editable angles.
///
/// Component 0 is X (pitch), 1 is Y (yaw), 2 is Z (roll), all in degrees.
pub const QUATERNION_EULER_ORDER: EulerRot = EulerRot::YXZ;

/// Maps a concrete value type to editable float components
pub trait KeyframeAccess:
    Copy + PartialEq + Debug + Serialize + DeserializeOwned + 'static
{
    /// Runtime tag of this type
    const KIND: ValueKind;

    /// Canonical zero/identity value
    fn default_value() -> Self;

    /// Number of editable components
    fn component_count() -> usize {
        Self::KIND.component_count()
    }

    /// Extract one component as a curve value
    fn project(&self, component: usize) -> Result<f32>;

    /// Write one component back, returning the updated value
    fn inject(&self, curve_value: f32, component: usize) -> Result<Self>;

    /// Unwrap from the tagged variant
    fn from_value(value: KeyframeValue) -> Result<Self>;

    /// Wrap into the tagged variant
    fn into_value(self) -> KeyframeValue;

    /// Interpolate between two values
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        let mut out = *a;
        for component in 0..Self::component_count() {
            if let (Ok(va), Ok(vb)) = (a.project(component), b.project(component)) {
                if let Ok(v) = out.inject(va + (vb - va) * t, component) {
                    out = v;
                }
            }
        }
        out
    }

    /// Offset a value along a tangent, used to place bezier control points
    fn offset(value: &Self, tangent: &Self, scale: f32) -> Self {
        let mut out = *value;
        for component in 0..Self::component_count() {
            if let (Ok(v), Ok(d)) = (value.project(component), tangent.project(component)) {
                if let Ok(next) = out.inject(v + d * scale, component) {
                    out = next;
                }
            }
        }
        out
    }
}

fn check_component(kind: ValueKind, component: usize) -> Result<()> {
    let count = kind.component_count();
    if component < count {
        Ok(())
    } else {
        Err(CurveError::InvalidComponent { component, count })
    }
}

fn mismatch(expected: ValueKind, found: &KeyframeValue) -> CurveError {
    CurveError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl KeyframeAccess for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn default_value() -> Self {
        false
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(if *self { 1.0 } else { 0.0 })
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        Ok(curve_value >= 0.5)
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Bool(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Bool(self)
    }

    // Booleans hold until the next keyframe
    fn lerp(a: &Self, _b: &Self, _t: f32) -> Self {
        *a
    }
}

impl KeyframeAccess for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn default_value() -> Self {
        0
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(*self as f32)
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        // An unchanged projection keeps integers above 2^24 exact
        if curve_value == *self as f32 {
            return Ok(*self);
        }
        // `as` saturates and truncates toward zero
        Ok(curve_value as i32)
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Int(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Int(self)
    }
}

impl KeyframeAccess for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn default_value() -> Self {
        0.0
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(*self)
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        Ok(curve_value)
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Float(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Float(self)
    }
}

impl KeyframeAccess for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn default_value() -> Self {
        0.0
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(*self as f32)
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        if curve_value == *self as f32 {
            return Ok(*self);
        }
        Ok(f64::from(curve_value))
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Double(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Double(self)
    }
}

macro_rules! impl_vector_access {
    ($ty:ty, $kind:ident, $scalar:ty) => {
        impl KeyframeAccess for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn default_value() -> Self {
                <$ty>::ZERO
            }

            #[allow(clippy::unnecessary_cast)]
            fn project(&self, component: usize) -> Result<f32> {
                check_component(Self::KIND, component)?;
                Ok(self[component] as f32)
            }

            #[allow(clippy::unnecessary_cast)]
            fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
                check_component(Self::KIND, component)?;
                let mut value = *self;
                if curve_value == value[component] as f32 {
                    return Ok(value);
                }
                value[component] = curve_value as $scalar;
                Ok(value)
            }

            fn from_value(value: KeyframeValue) -> Result<Self> {
                match value {
                    KeyframeValue::$kind(v) => Ok(v),
                    other => Err(mismatch(Self::KIND, &other)),
                }
            }

            fn into_value(self) -> KeyframeValue {
                KeyframeValue::$kind(self)
            }
        }
    };
}

impl_vector_access!(Vec2, Float2, f32);
impl_vector_access!(Vec3, Float3, f32);
impl_vector_access!(Vec4, Float4, f32);
impl_vector_access!(DVec2, Double2, f64);
impl_vector_access!(DVec3, Double3, f64);
impl_vector_access!(DVec4, Double4, f64);

/// Euler angles (degrees) of a rotation, indexed by component
pub fn quaternion_to_euler_degrees(rotation: Quat) -> [f32; 3] {
    let (yaw, pitch, roll) = rotation.to_euler(QUATERNION_EULER_ORDER);
    [pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees()]
}

/// Rotation built from Euler angles (degrees) indexed by component
pub fn quaternion_from_euler_degrees(euler: [f32; 3]) -> Quat {
    Quat::from_euler(
        QUATERNION_EULER_ORDER,
        euler[1].to_radians(),
        euler[0].to_radians(),
        euler[2].to_radians(),
    )
    .normalize()
}

impl KeyframeAccess for Quat {
    const KIND: ValueKind = ValueKind::Quaternion;

    fn default_value() -> Self {
        Quat::IDENTITY
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(quaternion_to_euler_degrees(*self)[component])
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        let mut euler = quaternion_to_euler_degrees(*self);
        euler[component] = curve_value;
        Ok(quaternion_from_euler_degrees(euler))
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Quaternion(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Quaternion(self)
    }

    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        a.slerp(*b, t)
    }

    // Tangent is an angular rate; identity means no offset
    fn offset(value: &Self, tangent: &Self, scale: f32) -> Self {
        let step = Quat::from_scaled_axis(tangent.to_scaled_axis() * scale);
        (*value * step).normalize()
    }
}

impl KeyframeAccess for Color32 {
    const KIND: ValueKind = ValueKind::Color32;

    fn default_value() -> Self {
        Color32::default()
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(f32::from(self.to_array()[component]))
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        let mut channels = self.to_array();
        channels[component] = curve_value.round().clamp(0.0, 255.0) as u8;
        Ok(Color32::from_array(channels))
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Color32(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Color32(self)
    }
}

impl KeyframeAccess for Color {
    const KIND: ValueKind = ValueKind::Color;

    fn default_value() -> Self {
        Color::default()
    }

    fn project(&self, component: usize) -> Result<f32> {
        check_component(Self::KIND, component)?;
        Ok(self.to_array()[component])
    }

    fn inject(&self, curve_value: f32, component: usize) -> Result<Self> {
        check_component(Self::KIND, component)?;
        let mut channels = self.to_array();
        channels[component] = curve_value;
        Ok(Color::from_array(channels))
    }

    fn from_value(value: KeyframeValue) -> Result<Self> {
        match value {
            KeyframeValue::Color(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn into_value(self) -> KeyframeValue {
        KeyframeValue::Color(self)
    }
}

/// Type-erased access strategy for one [`ValueKind`]
#[derive(Debug, Clone, Copy)]
pub struct ValueAccess {
    /// Kind this entry serves
    pub kind: ValueKind,
    /// Number of editable components
    pub component_count: usize,
    default_value: fn() -> KeyframeValue,
    project: fn(&KeyframeValue, usize) -> Result<f32>,
    inject: fn(f32, &KeyframeValue, usize) -> Result<KeyframeValue>,
    lerp: fn(&KeyframeValue, &KeyframeValue, f32) -> Result<KeyframeValue>,
}

fn erased_default<T: KeyframeAccess>() -> KeyframeValue {
    T::default_value().into_value()
}

fn erased_project<T: KeyframeAccess>(value: &KeyframeValue, component: usize) -> Result<f32> {
    T::from_value(*value)?.project(component)
}

fn erased_inject<T: KeyframeAccess>(
    curve_value: f32,
    value: &KeyframeValue,
    component: usize,
) -> Result<KeyframeValue> {
    Ok(T::from_value(*value)?.inject(curve_value, component)?.into_value())
}

fn erased_lerp<T: KeyframeAccess>(
    a: &KeyframeValue,
    b: &KeyframeValue,
    t: f32,
) -> Result<KeyframeValue> {
    Ok(T::lerp(&T::from_value(*a)?, &T::from_value(*b)?, t).into_value())
}

impl ValueAccess {
    const fn of<T: KeyframeAccess>() -> Self {
        Self {
            kind: T::KIND,
            component_count: T::KIND.component_count(),
            default_value: erased_default::<T>,
            project: erased_project::<T>,
            inject: erased_inject::<T>,
            lerp: erased_lerp::<T>,
        }
    }

    /// Canonical zero/identity value
    pub fn default_value(&self) -> KeyframeValue {
        (self.default_value)()
    }

    /// Extract one component; `TypeMismatch` if `value` is another kind
    pub fn project(&self, value: &KeyframeValue, component: usize) -> Result<f32> {
        (self.project)(value, component)
    }

    /// Write one component back into `value`
    pub fn inject(
        &self,
        curve_value: f32,
        value: &KeyframeValue,
        component: usize,
    ) -> Result<KeyframeValue> {
        (self.inject)(curve_value, value, component)
    }

    /// Interpolate between two values of this kind
    pub fn lerp(&self, a: &KeyframeValue, b: &KeyframeValue, t: f32) -> Result<KeyframeValue> {
        (self.lerp)(a, b, t)
    }
}

/// Dispatch table, indexed by `ValueKind` discriminant
static VALUE_ACCESS: [ValueAccess; 13] = [
    ValueAccess::of::<bool>(),
    ValueAccess::of::<i32>(),
    ValueAccess::of::<f32>(),
    ValueAccess::of::<f64>(),
    ValueAccess::of::<Vec2>(),
    ValueAccess::of::<Vec3>(),
    ValueAccess::of::<Vec4>(),
    ValueAccess::of::<DVec2>(),
    ValueAccess::of::<DVec3>(),
    ValueAccess::of::<DVec4>(),
    ValueAccess::of::<Quat>(),
    ValueAccess::of::<Color32>(),
    ValueAccess::of::<Color>(),
];

impl ValueKind {
    /// Look up the access strategy for this kind
    pub fn access(self) -> &'static ValueAccess {
        &VALUE_ACCESS[self as usize]
    }
}

impl KeyframeValue {
    /// Extract one component as a curve value
    pub fn project(&self, component: usize) -> Result<f32> {
        self.kind().access().project(self, component)
    }

    /// Write one component back, returning the updated value
    pub fn inject(&self, curve_value: f32, component: usize) -> Result<KeyframeValue> {
        self.kind().access().inject(curve_value, self, component)
    }

    /// Interpolate toward `other`; `TypeMismatch` if the kinds differ
    pub fn lerp(&self, other: &KeyframeValue, t: f32) -> Result<KeyframeValue> {
        self.kind().access().lerp(self, other, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip<T: KeyframeAccess>(value: T) {
        for component in 0..T::component_count() {
            let projected = value.project(component).unwrap();
            assert_eq!(value.inject(projected, component).unwrap(), value, "component {component}");
        }
    }

    #[test]
    fn test_round_trip_exact_kinds() {
        assert_round_trip(true);
        assert_round_trip(false);
        assert_round_trip(-42i32);
        assert_round_trip(3.25f32);
        assert_round_trip(2.5f64);
        assert_round_trip(Vec2::new(1.0, -2.0));
        assert_round_trip(Vec3::new(1.0, -2.0, 3.5));
        assert_round_trip(Vec4::new(1.0, -2.0, 3.5, 0.125));
        assert_round_trip(DVec2::new(1.0, -2.0));
        assert_round_trip(DVec3::new(1.0, -2.0, 3.5));
        assert_round_trip(DVec4::new(1.0, -2.0, 3.5, 0.125));
        assert_round_trip(Color32::new(10, 128, 255, 3));
        assert_round_trip(Color::new(0.25, 0.5, 1.5, 1.0));
    }

    #[test]
    fn test_round_trip_keeps_wide_values_exact() {
        assert_round_trip(16_777_217i32);
        assert_round_trip(i32::MAX);
        assert_round_trip(0.1f64);
        assert_round_trip(DVec3::splat(0.1));
        assert_round_trip(DVec4::new(0.1, 1.0e-12, -3.3, 1.0e20));

        // A real edit still writes through
        assert_eq!(16_777_217i32.inject(5.0, 0).unwrap(), 5);
        assert_eq!(DVec2::splat(0.1).inject(2.0, 1).unwrap(), DVec2::new(0.1, 2.0));
    }

    #[test]
    fn test_quaternion_round_trip_within_tolerance() {
        let rotation = quaternion_from_euler_degrees([30.0, 45.0, -20.0]);
        for component in 0..3 {
            let projected = rotation.project(component).unwrap();
            let back = rotation.inject(projected, component).unwrap();
            assert!(back.dot(rotation).abs() > 0.9999, "component {component}");
        }
    }

    #[test]
    fn test_quaternion_projects_euler_degrees() {
        let rotation = quaternion_from_euler_degrees([30.0, 45.0, -20.0]);
        assert!((rotation.project(0).unwrap() - 30.0).abs() < 1e-3);
        assert!((rotation.project(1).unwrap() - 45.0).abs() < 1e-3);
        assert!((rotation.project(2).unwrap() + 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_quaternion_inject_changes_only_target_axis() {
        let rotation = quaternion_from_euler_degrees([10.0, 20.0, 30.0]);
        let edited = rotation.inject(60.0, 1).unwrap();
        let euler = quaternion_to_euler_degrees(edited);
        assert!((euler[0] - 10.0).abs() < 1e-3);
        assert!((euler[1] - 60.0).abs() < 1e-3);
        assert!((euler[2] - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_color32_channel_clamps() {
        let color = Color32::new(1, 2, 3, 4);
        assert_eq!(color.inject(300.0, 0).unwrap().r, 255);
        assert_eq!(color.inject(-10.0, 2).unwrap().b, 0);
        assert_eq!(color.inject(127.6, 3).unwrap().a, 128);
    }

    #[test]
    fn test_bool_threshold() {
        assert!(!false.inject(0.49, 0).unwrap());
        assert!(false.inject(0.50, 0).unwrap());
    }

    #[test]
    fn test_invalid_component() {
        let err = Vec3::ONE.project(3).unwrap_err();
        assert!(matches!(err, CurveError::InvalidComponent { component: 3, count: 3 }));
        assert!(matches!(
            1.0f32.inject(0.0, 1),
            Err(CurveError::InvalidComponent { component: 1, count: 1 })
        ));
        assert!(Quat::IDENTITY.project(3).is_err());
    }

    #[test]
    fn test_table_matches_kinds() {
        for kind in ValueKind::ALL {
            let access = kind.access();
            assert_eq!(access.kind, kind);
            assert_eq!(access.component_count, kind.component_count());
            assert_eq!(access.default_value(), kind.default_value());
        }
    }

    #[test]
    fn test_erased_project_and_inject() {
        let value = KeyframeValue::Float3(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(value.project(1).unwrap(), 2.0);
        let edited = value.inject(9.0, 2).unwrap();
        assert_eq!(edited, KeyframeValue::Float3(Vec3::new(1.0, 2.0, 9.0)));
    }

    #[test]
    fn test_erased_type_mismatch() {
        let access = ValueKind::Float.access();
        let err = access.project(&KeyframeValue::Bool(true), 0).unwrap_err();
        assert!(matches!(
            err,
            CurveError::TypeMismatch { expected: ValueKind::Float, found: ValueKind::Bool }
        ));
        assert!(KeyframeValue::Float(1.0).lerp(&KeyframeValue::Int(2), 0.5).is_err());
    }

    #[test]
    fn test_default_lerp_is_component_wise() {
        let a = Vec2::new(0.0, 10.0);
        let b = Vec2::new(2.0, 20.0);
        assert_eq!(<Vec2 as KeyframeAccess>::lerp(&a, &b, 0.5), Vec2::new(1.0, 15.0));
        let black = Color32::new(0, 0, 0, 0);
        let target = Color32::new(200, 100, 50, 10);
        assert_eq!(Color32::lerp(&black, &target, 0.5), Color32::new(100, 50, 25, 5));
    }
}
