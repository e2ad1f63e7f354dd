//! Per-animation metadata stored as parallel columns.
//!
//! Every column is indexed by animation index and every insert/remove touches
//! all of them, so they never diverge in length. Out-of-range indices are a
//! caller bug and panic through slice indexing.

use crate::data::{AnimationSlot, Vec2};
use crate::error::AnimatorError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationTable {
    names: Vec<String>,
    frame_rates: Vec<f32>,
    loopings: Vec<bool>,
    frame_counts: Vec<usize>,
    orientation_counts: Vec<usize>,
    orientation_directions: Vec<Vec<Vec2>>,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from owned slots, rejecting frame rates that cannot drive playback.
    pub fn from_slots(slots: impl IntoIterator<Item = AnimationSlot>) -> Result<Self, AnimatorError> {
        let mut table = Self::new();
        for (index, slot) in slots.into_iter().enumerate() {
            if !slot.frame_rate.is_finite() || slot.frame_rate <= 0.0 {
                return Err(AnimatorError::InvalidFrameRate {
                    index,
                    frame_rate: slot.frame_rate,
                });
            }
            table.insert_slot(index, slot);
        }
        Ok(table)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when every column has the same length and orientation counts
    /// match their direction lists.
    pub fn is_consistent(&self) -> bool {
        let n = self.names.len();
        self.frame_rates.len() == n
            && self.loopings.len() == n
            && self.frame_counts.len() == n
            && self.orientation_counts.len() == n
            && self.orientation_directions.len() == n
            && self
                .orientation_counts
                .iter()
                .zip(&self.orientation_directions)
                .all(|(count, dirs)| *count == dirs.len())
    }

    // --- animations ---

    /// Insert `slot` at `index`, shifting later animations up by one.
    pub fn insert_slot(&mut self, index: usize, slot: AnimationSlot) {
        debug_assert!(index <= self.len(), "animation index {index} out of range");
        self.names.insert(index, slot.name);
        self.frame_rates.insert(index, slot.frame_rate);
        self.loopings.insert(index, slot.looping);
        self.frame_counts.insert(index, slot.frame_count);
        self.orientation_counts
            .insert(index, slot.orientation_directions.len());
        self.orientation_directions
            .insert(index, slot.orientation_directions);
        debug_assert!(self.is_consistent());
    }

    /// Remove the animation at `index`, shifting later animations down by one.
    pub fn remove_slot(&mut self, index: usize) -> AnimationSlot {
        let slot = AnimationSlot {
            name: self.names.remove(index),
            frame_rate: self.frame_rates.remove(index),
            looping: self.loopings.remove(index),
            frame_count: self.frame_counts.remove(index),
            orientation_directions: self.orientation_directions.remove(index),
        };
        self.orientation_counts.remove(index);
        debug_assert!(self.is_consistent());
        slot
    }

    /// Owned copy of one animation row.
    pub fn slot(&self, index: usize) -> AnimationSlot {
        AnimationSlot {
            name: self.names[index].clone(),
            frame_rate: self.frame_rates[index],
            looping: self.loopings[index],
            frame_count: self.frame_counts[index],
            orientation_directions: self.orientation_directions[index].clone(),
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = AnimationSlot> + '_ {
        (0..self.len()).map(move |i| self.slot(i))
    }

    /// First animation whose name equals `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    // --- frames ---

    /// Account for a frame inserted at `frame` in animation `anim`.
    pub fn add_frame(&mut self, anim: usize, frame: usize) {
        debug_assert!(frame <= self.frame_counts[anim], "frame index {frame} out of range");
        self.frame_counts[anim] += 1;
    }

    /// Account for the frame at `frame` removed from animation `anim`.
    pub fn remove_frame(&mut self, anim: usize, frame: usize) {
        debug_assert!(frame < self.frame_counts[anim], "frame index {frame} out of range");
        self.frame_counts[anim] -= 1;
    }

    // --- orientations ---

    pub fn add_orientation(&mut self, anim: usize, orient: usize, direction: Vec2) {
        self.orientation_directions[anim].insert(orient, direction);
        self.orientation_counts[anim] += 1;
    }

    pub fn remove_orientation(&mut self, anim: usize, orient: usize) -> Vec2 {
        let direction = self.orientation_directions[anim].remove(orient);
        self.orientation_counts[anim] -= 1;
        direction
    }

    // --- column accessors ---

    #[inline]
    pub fn name(&self, anim: usize) -> &str {
        &self.names[anim]
    }

    pub fn set_name(&mut self, anim: usize, name: impl Into<String>) {
        self.names[anim] = name.into();
    }

    #[inline]
    pub fn frame_rate(&self, anim: usize) -> f32 {
        self.frame_rates[anim]
    }

    pub fn set_frame_rate(&mut self, anim: usize, frame_rate: f32) {
        self.frame_rates[anim] = frame_rate;
    }

    #[inline]
    pub fn looping(&self, anim: usize) -> bool {
        self.loopings[anim]
    }

    pub fn set_looping(&mut self, anim: usize, looping: bool) {
        self.loopings[anim] = looping;
    }

    #[inline]
    pub fn frame_count(&self, anim: usize) -> usize {
        self.frame_counts[anim]
    }

    #[inline]
    pub fn orientation_count(&self, anim: usize) -> usize {
        self.orientation_counts[anim]
    }

    #[inline]
    pub fn orientation_direction(&self, anim: usize, orient: usize) -> Vec2 {
        self.orientation_directions[anim][orient]
    }

    pub fn set_orientation_direction(&mut self, anim: usize, orient: usize, direction: Vec2) {
        self.orientation_directions[anim][orient] = direction;
    }

    #[inline]
    pub fn orientation_directions(&self, anim: usize) -> &[Vec2] {
        &self.orientation_directions[anim]
    }

    /// Length in seconds of one pass through animation `anim`.
    pub fn duration(&self, anim: usize) -> f32 {
        let rate = self.frame_rates[anim];
        if rate > 0.0 {
            self.frame_counts[anim] as f32 / rate
        } else {
            0.0
        }
    }
}
