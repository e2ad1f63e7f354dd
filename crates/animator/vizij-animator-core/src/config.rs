//! Core configuration for vizij-animator-core.

use serde::{Deserialize, Serialize};

use crate::data::{AnimationSlot, Vec2};
use crate::error::AnimatorError;

/// Configuration for an [`AnimatorBody`](crate::AnimatorBody).
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Template for animations created by `add_animation_at`.
    pub new_animation: AnimationDefaults,
    /// Direction stored for orientations created by `add_orientation_at`.
    pub new_orientation_direction: Vec2,
    /// Facing direction of a freshly built body.
    pub initial_direction: Vec2,

    /// Maximum events kept in the outgoing queue before new ones are dropped.
    pub max_pending_events: usize,
    /// Queue playback transitions as [`AnimatorEvent`](crate::AnimatorEvent)s.
    pub record_events: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDefaults {
    pub name: String,
    pub frame_rate: f32,
    pub looping: bool,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            name: "animation".to_string(),
            frame_rate: 12.0,
            looping: true,
        }
    }
}

impl AnimationDefaults {
    /// Empty slot (no frames, no orientations) built from these defaults.
    pub fn slot(&self) -> AnimationSlot {
        AnimationSlot::new(self.name.clone(), self.frame_rate, self.looping)
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            new_animation: AnimationDefaults::default(),
            new_orientation_direction: Vec2::DOWN,
            initial_direction: Vec2::DOWN,
            max_pending_events: 1024,
            record_events: true,
        }
    }
}

impl AnimatorConfig {
    pub fn from_json(json: &str) -> Result<Self, AnimatorError> {
        serde_json::from_str(json).map_err(|e| AnimatorError::Config(e.to_string()))
    }
}
