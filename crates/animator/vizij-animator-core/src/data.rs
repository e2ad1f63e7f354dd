//! Plain data shared by the table, the clock and properties.

use serde::{Deserialize, Serialize};

/// 2D vector used for facing directions and per-orientation directions.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unsigned angle in radians between `self` and `other`, in `[0, PI]`.
    ///
    /// Degenerate (zero-length) inputs yield `0.0` so orientation selection
    /// stays deterministic when the facing direction is unset.
    pub fn angle_to(self, other: Vec2) -> f32 {
        let denom = self.length() * other.length();
        if denom <= f32::EPSILON {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Owned snapshot of one animation row of the [`AnimationTable`](crate::AnimationTable).
///
/// Used to seed a table and to inspect a single animation without borrowing
/// every column.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationSlot {
    pub name: String,
    #[serde(rename = "frameRate")]
    pub frame_rate: f32,
    #[serde(default)]
    pub looping: bool,
    #[serde(rename = "frameCount", default)]
    pub frame_count: usize,
    /// One direction per orientation; its length is the orientation count.
    #[serde(rename = "orientationDirections", default)]
    pub orientation_directions: Vec<Vec2>,
}

impl AnimationSlot {
    pub fn new(name: impl Into<String>, frame_rate: f32, looping: bool) -> Self {
        Self {
            name: name.into(),
            frame_rate,
            looping,
            frame_count: 0,
            orientation_directions: Vec::new(),
        }
    }

    pub fn with_frames(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    pub fn with_orientations(mut self, directions: impl IntoIterator<Item = Vec2>) -> Self {
        self.orientation_directions = directions.into_iter().collect();
        self
    }

    #[inline]
    pub fn orientation_count(&self) -> usize {
        self.orientation_directions.len()
    }

    /// Total duration of one pass through the animation, in seconds.
    pub fn duration(&self) -> f32 {
        if self.frame_rate > 0.0 {
            self.frame_count as f32 / self.frame_rate
        } else {
            0.0
        }
    }
}
