//! Playback clock: elapsed time, facing direction and the derived
//! (animation, frame, orientation) address.
//!
//! The clock only derives; diffing the derived address against the entered
//! one and broadcasting transitions is the body's job.

use serde::{Deserialize, Serialize};

use crate::data::Vec2;
use crate::table::AnimationTable;

/// Coarse state of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockState {
    /// No animation selected; every derived index is undefined.
    Idle,
    /// An animation is selected.
    Playing,
}

/// Entered frame, remembered with the animation it belongs to so exits are
/// addressed correctly after the animation index has already moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameKey {
    pub anim: usize,
    pub frame: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrientationKey {
    pub anim: usize,
    pub frame: usize,
    pub orient: usize,
}

impl FrameKey {
    #[inline]
    pub fn with_orientation(self, orient: usize) -> OrientationKey {
        OrientationKey {
            anim: self.anim,
            frame: self.frame,
            orient,
        }
    }
}

/// Whole frames elapsed at `elapsed` seconds for a given frame rate.
#[inline]
pub fn frames_elapsed(elapsed: f32, frame_rate: f32) -> usize {
    // float -> usize casts saturate, so negative or NaN products land on 0
    (elapsed * frame_rate).floor() as usize
}

/// Frame shown at `elapsed`: wraps when looping, holds the last frame otherwise.
pub fn frame_at(frame_count: usize, frame_rate: f32, looping: bool, elapsed: f32) -> Option<usize> {
    if frame_count == 0 {
        return None;
    }
    let frames = frames_elapsed(elapsed, frame_rate);
    Some(if looping {
        frames % frame_count
    } else {
        frames.min(frame_count - 1)
    })
}

/// Complete passes through an animation of `frame_count` frames.
pub fn loops_elapsed(frame_count: usize, frame_rate: f32, elapsed: f32) -> u32 {
    if frame_count == 0 || frame_rate <= 0.0 {
        return 0;
    }
    let duration = frame_count as f32 / frame_rate;
    (elapsed / duration).floor().max(0.0) as u32
}

/// Index of the direction with the smallest angle to `facing`.
///
/// Comparison is strict, so on equal angles the lowest index wins.
pub fn select_orientation(directions: &[Vec2], facing: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, dir) in directions.iter().enumerate() {
        let angle = dir.angle_to(facing);
        match best {
            Some((_, best_angle)) if angle >= best_angle => {}
            _ => best = Some((i, angle)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    played_animation: Option<usize>,
    elapsed: f32,
    direction: Vec2,

    // Entered address. Kept in sync by the body as it broadcasts.
    curr_animation: Option<usize>,
    curr_frame: Option<FrameKey>,
    curr_orientation: Option<OrientationKey>,
}

impl PlaybackClock {
    pub fn new(direction: Vec2) -> Self {
        Self {
            played_animation: None,
            elapsed: 0.0,
            direction,
            curr_animation: None,
            curr_frame: None,
            curr_orientation: None,
        }
    }

    pub fn state(&self) -> ClockState {
        if self.played_animation.is_some() {
            ClockState::Playing
        } else {
            ClockState::Idle
        }
    }

    /// Select `anim` (or nothing) and rewind to zero.
    pub fn restart(&mut self, anim: Option<usize>) {
        self.played_animation = anim;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).max(0.0);
    }

    #[inline]
    pub fn played_animation(&self) -> Option<usize> {
        self.played_animation
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction;
    }

    #[inline]
    pub fn current_animation(&self) -> Option<usize> {
        self.curr_animation
    }

    #[inline]
    pub fn current_frame(&self) -> Option<FrameKey> {
        self.curr_frame
    }

    #[inline]
    pub fn current_orientation(&self) -> Option<OrientationKey> {
        self.curr_orientation
    }

    pub(crate) fn set_current_animation(&mut self, anim: Option<usize>) {
        self.curr_animation = anim;
    }

    pub(crate) fn set_current_frame(&mut self, key: Option<FrameKey>) {
        self.curr_frame = key;
    }

    pub(crate) fn set_current_orientation(&mut self, key: Option<OrientationKey>) {
        self.curr_orientation = key;
    }

    // --- derivation ---

    /// Played animation, if it exists in `table`.
    pub fn derive_animation(&self, table: &AnimationTable) -> Option<usize> {
        self.played_animation.filter(|&a| a < table.len())
    }

    pub fn derive_frame(&self, table: &AnimationTable, anim: usize) -> Option<usize> {
        frame_at(
            table.frame_count(anim),
            table.frame_rate(anim),
            table.looping(anim),
            self.elapsed,
        )
    }

    pub fn derive_loops(&self, table: &AnimationTable, anim: usize) -> u32 {
        loops_elapsed(table.frame_count(anim), table.frame_rate(anim), self.elapsed)
    }

    pub fn derive_orientation(&self, table: &AnimationTable, anim: usize) -> Option<usize> {
        select_orientation(table.orientation_directions(anim), self.direction)
    }

    /// Non-looping animation has run for its whole duration.
    pub fn reached_end(&self, table: &AnimationTable, anim: usize) -> bool {
        !table.looping(anim) && self.elapsed >= table.duration(anim)
    }

    // --- structural shifts ---
    //
    // Property storage shifts on every insert/remove; the played index and the
    // entered address shift the same way so they keep naming the same data.
    // An entered entity that gets removed is forgotten without an exit.

    pub fn on_animation_added(&mut self, index: usize) {
        let shift = |a: &mut usize| {
            if *a >= index {
                *a += 1;
            }
        };
        if let Some(a) = self.played_animation.as_mut() {
            shift(a);
        }
        if let Some(a) = self.curr_animation.as_mut() {
            shift(a);
        }
        if let Some(k) = self.curr_frame.as_mut() {
            shift(&mut k.anim);
        }
        if let Some(k) = self.curr_orientation.as_mut() {
            shift(&mut k.anim);
        }
    }

    /// Returns true when the played animation itself was removed.
    pub fn on_animation_removed(&mut self, index: usize) -> bool {
        fn shift(slot: &mut Option<usize>, index: usize) {
            match *slot {
                Some(a) if a == index => *slot = None,
                Some(a) if a > index => *slot = Some(a - 1),
                _ => {}
            }
        }
        let played_removed = self.played_animation == Some(index);
        shift(&mut self.played_animation, index);
        shift(&mut self.curr_animation, index);
        self.curr_frame = self.curr_frame.and_then(|k| match k.anim {
            a if a == index => None,
            a if a > index => Some(FrameKey { anim: a - 1, ..k }),
            _ => Some(k),
        });
        self.curr_orientation = self.curr_orientation.and_then(|k| match k.anim {
            a if a == index => None,
            a if a > index => Some(OrientationKey { anim: a - 1, ..k }),
            _ => Some(k),
        });
        played_removed
    }

    pub fn on_frame_added(&mut self, anim: usize, frame: usize) {
        if let Some(k) = self.curr_frame.as_mut() {
            if k.anim == anim && k.frame >= frame {
                k.frame += 1;
            }
        }
        if let Some(k) = self.curr_orientation.as_mut() {
            if k.anim == anim && k.frame >= frame {
                k.frame += 1;
            }
        }
    }

    pub fn on_frame_removed(&mut self, anim: usize, frame: usize) {
        self.curr_frame = self.curr_frame.and_then(|k| match k.frame {
            f if k.anim != anim || f < frame => Some(k),
            f if f == frame => None,
            f => Some(FrameKey { frame: f - 1, ..k }),
        });
        self.curr_orientation = self.curr_orientation.and_then(|k| match k.frame {
            f if k.anim != anim || f < frame => Some(k),
            f if f == frame => None,
            f => Some(OrientationKey { frame: f - 1, ..k }),
        });
    }

    pub fn on_orientation_added(&mut self, anim: usize, orient: usize) {
        if let Some(k) = self.curr_orientation.as_mut() {
            if k.anim == anim && k.orient >= orient {
                k.orient += 1;
            }
        }
    }

    pub fn on_orientation_removed(&mut self, anim: usize, orient: usize) {
        self.curr_orientation = self.curr_orientation.and_then(|k| match k.orient {
            o if k.anim != anim || o < orient => Some(k),
            o if o == orient => None,
            o => Some(OrientationKey { orient: o - 1, ..k }),
        });
    }
}
