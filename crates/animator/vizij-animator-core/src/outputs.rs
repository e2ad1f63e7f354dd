//! Output contracts from the animator.
//!
//! Playback transitions are mirrored as semantic events so hosts that do not
//! implement properties (UI, networking, tests) can still follow playback.
//! Events queue up until the host drains them with `take_outputs`.

use serde::{Deserialize, Serialize};

/// Discrete semantic signals emitted during playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimatorEvent {
    AnimationEntered {
        anim: usize,
        name: String,
        forced: bool,
    },
    AnimationExited {
        anim: usize,
    },
    FrameEntered {
        anim: usize,
        frame: usize,
        loops_elapsed: u32,
    },
    OrientationEntered {
        anim: usize,
        frame: usize,
        orient: usize,
    },
    /// A non-looping animation finished and every property agreed.
    Completed {
        anim: usize,
        elapsed: f32,
    },
    Paused,
    Resumed,
}

/// Pending events, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<AnimatorEvent>,
    /// Events discarded because the queue was full.
    #[serde(default)]
    pub dropped: usize,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }

    /// Queue `event` unless `capacity` is reached. Returns false when dropped.
    #[inline]
    pub fn push_event(&mut self, event: AnimatorEvent, capacity: usize) -> bool {
        if self.events.len() >= capacity {
            self.dropped += 1;
            return false;
        }
        self.events.push(event);
        true
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
