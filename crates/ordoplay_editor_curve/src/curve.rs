// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframed curves.

use crate::access::KeyframeAccess;
use crate::error::{CurveError, Result};
use crate::keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeId};
use serde::{Deserialize, Serialize};

/// An ordered sequence of keyframes of one value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: KeyframeAccess")]
pub struct Curve<T: KeyframeAccess> {
    /// Keyframes sorted by non-decreasing time
    keyframes: Vec<Keyframe<T>>,
    /// Interpolation law between keyframes
    pub interpolation: InterpolationMode,
    /// Time quantization rate; keyframe times snap to multiples of `1 / fps`
    fps: Option<f32>,
}

impl<T: KeyframeAccess> Curve<T> {
    /// Create an empty curve
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self {
            keyframes: Vec::new(),
            interpolation,
            fps: None,
        }
    }

    /// Set the quantization rate
    pub fn with_fps(mut self, fps: Option<f32>) -> Self {
        self.set_fps(fps);
        self
    }

    /// Get the quantization rate
    pub fn fps(&self) -> Option<f32> {
        self.fps
    }

    /// Change the quantization rate, snapping existing keyframes to the new grid
    pub fn set_fps(&mut self, fps: Option<f32>) {
        self.fps = fps.filter(|f| f.is_finite() && *f > 0.0);
        for i in 0..self.keyframes.len() {
            self.keyframes[i].time = self.quantize_time(self.keyframes[i].time);
        }
        self.sort_keyframes();
    }

    /// Snap a time to the quantization grid (non-finite times become zero)
    pub fn quantize_time(&self, time: f32) -> f32 {
        let time = if time.is_finite() { time } else { 0.0 };
        match self.fps {
            Some(fps) => (time * fps).round() / fps,
            None => time,
        }
    }

    /// Sort keyframes by time, keeping the order of equal times
    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the curve has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    /// Get a keyframe by index
    pub fn get(&self, index: usize) -> Result<&Keyframe<T>> {
        self.keyframes.get(index).ok_or(CurveError::IndexOutOfRange {
            index,
            count: self.keyframes.len(),
        })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Keyframe<T>> {
        let count = self.keyframes.len();
        self.keyframes
            .get_mut(index)
            .ok_or(CurveError::IndexOutOfRange { index, count })
    }

    /// Find the index of a keyframe by ID
    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    /// Insert a keyframe, returning its index in the sorted sequence.
    ///
    /// A keyframe at an existing time lands after the keyframes already there.
    pub fn insert(&mut self, mut keyframe: Keyframe<T>) -> usize {
        keyframe.time = self.quantize_time(keyframe.time);
        let index = self.keyframes.partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(index, keyframe);
        index
    }

    /// Remove a keyframe by index
    pub fn remove(&mut self, index: usize) -> Result<Keyframe<T>> {
        self.get(index)?;
        Ok(self.keyframes.remove(index))
    }

    /// Remove every keyframe matching the predicate, returning how many were removed
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Keyframe<T>) -> bool) -> usize {
        let before = self.keyframes.len();
        self.keyframes.retain(|k| !predicate(k));
        before - self.keyframes.len()
    }

    /// Set the value of a keyframe
    pub fn set_value(&mut self, index: usize, value: T) -> Result<()> {
        self.get_mut(index)?.value = value;
        Ok(())
    }

    /// Set the tangents of a keyframe
    pub fn set_tangents(&mut self, index: usize, tangent_in: T, tangent_out: T) -> Result<()> {
        let keyframe = self.get_mut(index)?;
        keyframe.tangent_in = tangent_in;
        keyframe.tangent_out = tangent_out;
        Ok(())
    }

    /// Move a keyframe to a new time, returning its new index
    pub fn set_time(&mut self, index: usize, time: f32) -> Result<usize> {
        let mut keyframe = self.remove(index)?;
        keyframe.time = time;
        Ok(self.insert(keyframe))
    }

    /// Replace all keyframes, quantizing and sorting them
    pub fn replace(&mut self, keyframes: Vec<Keyframe<T>>) {
        self.keyframes = keyframes;
        for i in 0..self.keyframes.len() {
            self.keyframes[i].time = self.quantize_time(self.keyframes[i].time);
        }
        self.sort_keyframes();
    }

    /// Remove all keyframes
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Time of the first keyframe
    pub fn start_time(&self) -> Option<f32> {
        self.keyframes.first().map(|k| k.time)
    }

    /// Time of the last keyframe
    pub fn end_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }

    /// Span between first and last keyframe
    pub fn duration(&self) -> f32 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Minimum and maximum component value over all keyframes
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for keyframe in &self.keyframes {
            for component in 0..T::component_count() {
                let Ok(v) = keyframe.value.project(component) else {
                    continue;
                };
                range = Some(match range {
                    Some((min, max)) => (min.min(v), max.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }

    /// Evaluate the curve at a given time.
    ///
    /// With `looped` the time wraps into `[start, end]`, otherwise it clamps
    /// to the boundary keyframes. Empty curves evaluate to the default value.
    pub fn evaluate(&self, time: f32, looped: bool) -> T {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return T::default_value(),
        };

        let start = first.time;
        let end = last.time;
        let duration = end - start;
        let time = if looped && duration > 0.0 {
            start + (time - start).rem_euclid(duration)
        } else {
            time
        };

        if time.is_nan() || time <= start {
            return first.value;
        }
        if time >= end {
            return last.value;
        }

        // First keyframe strictly after `time`; start < time < end keeps it in 1..len
        let next = self.keyframes.partition_point(|k| k.time <= time);
        let a = &self.keyframes[next - 1];
        let b = &self.keyframes[next];
        let t = (time - a.time) / (b.time - a.time);
        Interpolation::segment(a, b, t, self.interpolation)
    }
}

impl<T: KeyframeAccess> Default for Curve<T> {
    fn default() -> Self {
        Self::new(InterpolationMode::default())
    }
}
