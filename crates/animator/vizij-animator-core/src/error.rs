//! Error types for the animator.

use serde::{Deserialize, Serialize};

/// Errors surfaced by table seeding, configuration parsing and body start-up.
///
/// Lookups that miss (unknown animation name, unknown property id) are not
/// errors; they return `Option`/`bool` or log and do nothing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimatorError {
    /// The body was started without a single animation; playback stays idle.
    #[error("Animator has no animations; playback is disabled")]
    NoAnimations,

    /// A seeded animation carries a frame rate that cannot drive playback.
    #[error("Invalid frame rate {frame_rate} for animation {index}")]
    InvalidFrameRate { index: usize, frame_rate: f32 },

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}
