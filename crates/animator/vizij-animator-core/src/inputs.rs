//! Input contracts for the animator.
//!
//! Hosts that drive playback from data (scripts, network, tests) build these
//! and pass them to `AnimatorBody::apply`. Commands run in order, exactly as
//! the equivalent method calls would.

use serde::{Deserialize, Serialize};

use crate::data::Vec2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimatorCommand {
    Play { index: usize },
    PlayByName { name: String },
    PlayEmpty,
    SetDirection { direction: Vec2 },
    SetPaused { paused: bool },
    SetActive { active: bool },
}
