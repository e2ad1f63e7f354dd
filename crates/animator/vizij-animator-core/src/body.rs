//! AnimatorBody: owns the animation table, the property tree and the clock,
//! and turns every edit and every tick into the matching broadcasts.
//!
//! Methods:
//! - lifecycle: new, start, set_active, set_paused, tick
//! - playback: play, play_with_callback, play_by_name, play_empty, set_direction, apply
//! - editing: animation/frame/orientation add/remove/set, copy/paste
//! - introspection: properties, properties_of, property, depth_of
//!
//! Everything runs synchronously on the caller's thread. Broadcasts finish
//! before the call that triggered them returns, and completion callbacks run
//! only after the tick's broadcasts are done.

use log::{debug, error, trace, warn};

use crate::clipboard::{ClipAddress, Clipboard};
use crate::clock::{ClockState, FrameKey, PlaybackClock};
use crate::config::AnimatorConfig;
use crate::data::{AnimationSlot, Vec2};
use crate::error::AnimatorError;
use crate::ids::PropertyId;
use crate::inputs::AnimatorCommand;
use crate::outputs::{AnimatorEvent, Outputs};
use crate::property::{AnimatorProperty, PropertyTree};
use crate::table::AnimationTable;

/// One-shot callback run when a non-looping animation completes.
pub type CompletionCallback = Box<dyn FnOnce(&mut AnimatorBody)>;

pub struct AnimatorBody {
    cfg: AnimatorConfig,
    table: AnimationTable,
    tree: PropertyTree,
    clock: PlaybackClock,
    on_complete: Option<CompletionCallback>,

    started: bool,
    /// Set when start-up failed; playback never runs afterwards.
    inert: bool,
    active: bool,
    paused: bool,
    /// A play issued while not animating; its forced restart runs on the next tick.
    pending_restart: bool,
    completion_reported: bool,

    outputs: Outputs,
}

impl std::fmt::Debug for AnimatorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatorBody")
            .field("table", &self.table)
            .field("tree", &self.tree)
            .field("clock", &self.clock)
            .field("has_on_complete", &self.on_complete.is_some())
            .field("started", &self.started)
            .field("inert", &self.inert)
            .field("active", &self.active)
            .field("paused", &self.paused)
            .finish()
    }
}

impl AnimatorBody {
    /// Create a body over `table` and `tree`. Nothing is broadcast until [`start`](Self::start).
    pub fn new(cfg: AnimatorConfig, table: AnimationTable, tree: PropertyTree) -> Self {
        Self {
            clock: PlaybackClock::new(cfg.initial_direction),
            cfg,
            table,
            tree,
            on_complete: None,
            started: false,
            inert: false,
            active: true,
            paused: false,
            pending_restart: false,
            completion_reported: false,
            outputs: Outputs::default(),
        }
    }

    /// Initialize every property once, then check the body can play.
    ///
    /// With no animations the body is marked inert: it keeps accepting edits
    /// but playback stays idle for good.
    pub fn start(&mut self) -> Result<(), AnimatorError> {
        if self.started {
            return if self.inert {
                Err(AnimatorError::NoAnimations)
            } else {
                Ok(())
            };
        }
        self.started = true;
        let table = &self.table;
        self.tree.broadcast(|p| p.initialize(table));

        if self.table.is_empty() {
            error!("animator has no animations; playback disabled");
            self.inert = true;
            return Err(AnimatorError::NoAnimations);
        }
        if self.is_animating() {
            let forced = std::mem::take(&mut self.pending_restart);
            self.refresh_animation(forced);
        }
        Ok(())
    }

    /// Started, not inert, active and unpaused.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.started && !self.inert && self.active && !self.paused
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Host visibility flag; an inactive body neither ticks nor cascades.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[inline]
    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        let table = &self.table;
        if paused {
            self.tree.broadcast(|p| p.paused(table));
            self.emit(AnimatorEvent::Paused);
        } else {
            self.tree.broadcast(|p| p.unpaused(table));
            self.emit(AnimatorEvent::Resumed);
        }
    }

    // --- playback ---

    /// Play animation `index` from the start.
    pub fn play(&mut self, index: usize) {
        self.restart(Some(index), None);
    }

    /// Play animation `index` and run `on_complete` once it finishes
    /// (non-looping animations only).
    pub fn play_with_callback(
        &mut self,
        index: usize,
        on_complete: impl FnOnce(&mut AnimatorBody) + 'static,
    ) {
        self.restart(Some(index), Some(Box::new(on_complete)));
    }

    /// Play the first animation called `name`. Unknown names log a warning
    /// and leave playback untouched.
    pub fn play_by_name(&mut self, name: &str) -> bool {
        match self.table.index_of(name) {
            Some(index) => {
                self.play(index);
                true
            }
            None => {
                warn!("play_by_name: no animation named '{name}'");
                false
            }
        }
    }

    /// Stop showing anything; exits whatever was entered.
    pub fn play_empty(&mut self) {
        self.restart(None, None);
    }

    fn restart(&mut self, anim: Option<usize>, on_complete: Option<CompletionCallback>) {
        self.clock.restart(anim);
        self.on_complete = on_complete;
        self.completion_reported = false;
        if self.is_animating() {
            self.pending_restart = false;
            self.refresh_animation(true);
        } else {
            self.pending_restart = true;
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.clock.direction()
    }

    /// Update the facing direction; the orientation follows immediately.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.clock.set_direction(direction);
        if self.is_animating() {
            self.refresh_orientation(false);
        }
    }

    /// Advance playback by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_animating() {
            return;
        }
        let forced = std::mem::take(&mut self.pending_restart);
        self.refresh_animation(forced);

        self.clock.advance(dt);
        trace!("tick: dt={dt} elapsed={}", self.clock.elapsed());
        self.refresh_frame(false);
        self.check_completion();
    }

    /// Apply host commands in order.
    pub fn apply(&mut self, commands: impl IntoIterator<Item = AnimatorCommand>) {
        for cmd in commands {
            match cmd {
                AnimatorCommand::Play { index } => self.play(index),
                AnimatorCommand::PlayByName { name } => {
                    self.play_by_name(&name);
                }
                AnimatorCommand::PlayEmpty => self.play_empty(),
                AnimatorCommand::SetDirection { direction } => self.set_direction(direction),
                AnimatorCommand::SetPaused { paused } => self.set_paused(paused),
                AnimatorCommand::SetActive { active } => self.set_active(active),
            }
        }
    }

    /// Drain queued events.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // --- playback state ---

    #[inline]
    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    #[inline]
    pub fn played_animation(&self) -> Option<usize> {
        self.clock.played_animation()
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    #[inline]
    pub fn current_animation(&self) -> Option<usize> {
        self.clock.current_animation()
    }

    #[inline]
    pub fn current_frame(&self) -> Option<usize> {
        self.clock.current_frame().map(|k| k.frame)
    }

    #[inline]
    pub fn current_orientation(&self) -> Option<usize> {
        self.clock.current_orientation().map(|k| k.orient)
    }

    #[inline]
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    // --- transitions ---

    fn refresh_animation(&mut self, forced: bool) {
        let next = self.clock.derive_animation(&self.table);
        let prev = self.clock.current_animation();
        if !forced && next == prev {
            return;
        }
        let table = &self.table;
        if let Some(prev) = prev {
            self.tree.broadcast(|p| p.animation_exit(table, prev));
            self.emit(AnimatorEvent::AnimationExited { anim: prev });
        }
        self.clock.set_current_animation(next);
        if let Some(anim) = next {
            let elapsed = self.clock.elapsed();
            let table = &self.table;
            self.tree.broadcast(|p| p.pre_animation_setup(table, anim, forced));
            self.tree.broadcast(|p| p.animation_enter(table, anim, elapsed));
            debug!("animation entered: {anim} '{}' forced={forced}", table.name(anim));
            self.emit(AnimatorEvent::AnimationEntered {
                anim,
                name: self.table.name(anim).to_string(),
                forced,
            });
        }
        self.refresh_frame(true);
    }

    fn refresh_frame(&mut self, forced: bool) {
        let next = self.clock.current_animation().and_then(|anim| {
            self.clock
                .derive_frame(&self.table, anim)
                .map(|frame| FrameKey { anim, frame })
        });
        let prev = self.clock.current_frame();
        if !forced && next == prev {
            self.refresh_orientation(false);
            return;
        }
        let table = &self.table;
        if let Some(prev) = prev {
            self.tree
                .broadcast(|p| p.set_frame_exit(table, prev.anim, prev.frame));
        }
        self.clock.set_current_frame(next);
        if let Some(key) = next {
            let elapsed = self.clock.elapsed();
            let loops = self.clock.derive_loops(table, key.anim);
            self.tree
                .broadcast(|p| p.set_frame_enter(table, key.anim, key.frame, elapsed, loops));
            debug!("frame entered: {}:{} loops={loops}", key.anim, key.frame);
            self.emit(AnimatorEvent::FrameEntered {
                anim: key.anim,
                frame: key.frame,
                loops_elapsed: loops,
            });
        }
        self.refresh_orientation(true);
    }

    fn refresh_orientation(&mut self, forced: bool) {
        let next = self.clock.current_frame().and_then(|key| {
            self.clock
                .derive_orientation(&self.table, key.anim)
                .map(|orient| key.with_orientation(orient))
        });
        let prev = self.clock.current_orientation();
        if !forced && next == prev {
            return;
        }
        let table = &self.table;
        if let Some(prev) = prev {
            self.tree
                .broadcast(|p| p.orient_frame_exit(table, prev.anim, prev.frame, prev.orient));
        }
        self.clock.set_current_orientation(next);
        if let Some(key) = next {
            let elapsed = self.clock.elapsed();
            self.tree.broadcast(|p| {
                p.orient_frame_enter(table, key.anim, key.frame, key.orient, elapsed)
            });
            debug!("orientation entered: {}:{}:{}", key.anim, key.frame, key.orient);
            self.emit(AnimatorEvent::OrientationEntered {
                anim: key.anim,
                frame: key.frame,
                orient: key.orient,
            });
        }
    }

    fn check_completion(&mut self) {
        if self.completion_reported {
            return;
        }
        let Some(anim) = self.clock.current_animation() else {
            return;
        };
        if !self.clock.reached_end(&self.table, anim) {
            return;
        }
        let elapsed = self.clock.elapsed();
        let table = &self.table;
        if !self
            .tree
            .all(|p| p.is_completed_at_end_of_animation(table, anim, elapsed))
        {
            return;
        }
        self.completion_reported = true;
        debug!("animation completed: {anim} at {elapsed}s");
        self.emit(AnimatorEvent::Completed { anim, elapsed });
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(self);
        }
    }

    /// Re-derive after an edit so the entered address stays valid.
    fn revalidate(&mut self) {
        if self.is_animating() {
            self.refresh_animation(false);
            self.refresh_frame(false);
        }
    }

    fn emit(&mut self, event: AnimatorEvent) {
        if !self.cfg.record_events {
            return;
        }
        if !self.outputs.push_event(event, self.cfg.max_pending_events) && self.outputs.dropped == 1 {
            warn!(
                "animator event queue full ({} events); dropping until drained",
                self.cfg.max_pending_events
            );
        }
    }

    // --- animations ---

    #[inline]
    pub fn table(&self) -> &AnimationTable {
        &self.table
    }

    #[inline]
    pub fn config(&self) -> &AnimatorConfig {
        &self.cfg
    }

    #[inline]
    pub fn animation_count(&self) -> usize {
        self.table.len()
    }

    pub fn animation_index_of(&self, name: &str) -> Option<usize> {
        self.table.index_of(name)
    }

    /// Insert an empty animation built from the configured defaults.
    pub fn add_animation_at(&mut self, index: usize) {
        self.table.insert_slot(index, self.cfg.new_animation.slot());
        self.clock.on_animation_added(index);
        let table = &self.table;
        self.tree.broadcast(|p| p.animation_added_at(table, index));
        debug!("animation added at {index}");
        self.revalidate();
    }

    /// Insert an animation shaped like `slot`. Frames and orientations are
    /// added one at a time so every property sees each of them.
    pub fn insert_animation(&mut self, index: usize, slot: AnimationSlot) {
        self.add_animation_at(index);
        self.table.set_name(index, slot.name);
        self.table.set_frame_rate(index, slot.frame_rate);
        self.table.set_looping(index, slot.looping);
        self.set_frame_count(index, slot.frame_count);
        for (orient, direction) in slot.orientation_directions.into_iter().enumerate() {
            self.add_orientation_with_direction(index, orient, direction);
        }
    }

    pub fn remove_animation_at(&mut self, index: usize) {
        self.table.remove_slot(index);
        if self.clock.on_animation_removed(index) {
            self.on_complete = None;
        }
        let table = &self.table;
        self.tree.broadcast(|p| p.animation_removed_at(table, index));
        debug!("animation removed at {index}");
        self.revalidate();
    }

    pub fn animation_name(&self, anim: usize) -> &str {
        self.table.name(anim)
    }

    pub fn set_animation_name(&mut self, anim: usize, name: impl Into<String>) {
        self.table.set_name(anim, name);
    }

    pub fn frame_rate(&self, anim: usize) -> f32 {
        self.table.frame_rate(anim)
    }

    pub fn set_frame_rate(&mut self, anim: usize, frame_rate: f32) {
        self.table.set_frame_rate(anim, frame_rate);
        self.revalidate();
    }

    pub fn looping(&self, anim: usize) -> bool {
        self.table.looping(anim)
    }

    pub fn set_looping(&mut self, anim: usize, looping: bool) {
        self.table.set_looping(anim, looping);
        self.revalidate();
    }

    // --- frames ---

    pub fn frame_count(&self, anim: usize) -> usize {
        self.table.frame_count(anim)
    }

    pub fn add_frame_at(&mut self, anim: usize, frame: usize) {
        self.table.add_frame(anim, frame);
        self.clock.on_frame_added(anim, frame);
        let table = &self.table;
        self.tree.broadcast(|p| p.frame_added_at(table, anim, frame));
        self.revalidate();
    }

    pub fn remove_frame_at(&mut self, anim: usize, frame: usize) {
        self.table.remove_frame(anim, frame);
        self.clock.on_frame_removed(anim, frame);
        let table = &self.table;
        self.tree.broadcast(|p| p.frame_removed_at(table, anim, frame));
        self.revalidate();
    }

    /// Grow or shrink at the end, one frame (and one broadcast) at a time.
    pub fn set_frame_count(&mut self, anim: usize, count: usize) {
        while self.table.frame_count(anim) < count {
            let frame = self.table.frame_count(anim);
            self.add_frame_at(anim, frame);
        }
        while self.table.frame_count(anim) > count {
            let frame = self.table.frame_count(anim) - 1;
            self.remove_frame_at(anim, frame);
        }
    }

    // --- orientations ---

    pub fn orientation_count(&self, anim: usize) -> usize {
        self.table.orientation_count(anim)
    }

    pub fn add_orientation_at(&mut self, anim: usize, orient: usize) {
        self.add_orientation_with_direction(anim, orient, self.cfg.new_orientation_direction);
    }

    /// Insert an orientation; properties hear about it once per existing frame.
    pub fn add_orientation_with_direction(&mut self, anim: usize, orient: usize, direction: Vec2) {
        self.table.add_orientation(anim, orient, direction);
        self.clock.on_orientation_added(anim, orient);
        let table = &self.table;
        for frame in 0..table.frame_count(anim) {
            self.tree
                .broadcast(|p| p.orientation_added_at(table, anim, frame, orient));
        }
        self.revalidate();
    }

    pub fn remove_orientation_at(&mut self, anim: usize, orient: usize) {
        self.table.remove_orientation(anim, orient);
        self.clock.on_orientation_removed(anim, orient);
        let table = &self.table;
        for frame in 0..table.frame_count(anim) {
            self.tree
                .broadcast(|p| p.orientation_removed_at(table, anim, frame, orient));
        }
        self.revalidate();
    }

    /// Grow or shrink at the end, one orientation at a time.
    pub fn set_orientation_count(&mut self, anim: usize, count: usize) {
        while self.table.orientation_count(anim) < count {
            let orient = self.table.orientation_count(anim);
            self.add_orientation_at(anim, orient);
        }
        while self.table.orientation_count(anim) > count {
            let orient = self.table.orientation_count(anim) - 1;
            self.remove_orientation_at(anim, orient);
        }
    }

    pub fn orientation_direction(&self, anim: usize, orient: usize) -> Vec2 {
        self.table.orientation_direction(anim, orient)
    }

    pub fn set_orientation_direction(&mut self, anim: usize, orient: usize, direction: Vec2) {
        self.table.set_orientation_direction(anim, orient, direction);
        if self.is_animating() {
            self.refresh_orientation(false);
        }
    }

    // --- copy/paste ---

    /// Snapshot property data at `from`, for the whole tree or one property.
    pub fn copy(&self, from: ClipAddress, property: Option<PropertyId>) -> Clipboard {
        Clipboard::capture(&self.tree, &self.table, from, property)
    }

    /// Paste a snapshot taken from this or another body with the same tree
    /// shape. Returns false when `to` is a different kind of address.
    pub fn paste(&mut self, clipboard: &Clipboard, to: ClipAddress) -> bool {
        if !clipboard.source().same_scope(to) {
            warn!(
                "paste: cannot paste {:?} clipboard at {:?}",
                clipboard.source(),
                to
            );
            return false;
        }
        clipboard.paste(&mut self.tree, &self.table, to);
        true
    }

    /// Copy then paste within this body.
    pub fn copy_paste(&mut self, from: ClipAddress, to: ClipAddress, property: Option<PropertyId>) -> bool {
        let clipboard = self.copy(from, property);
        self.paste(&clipboard, to)
    }

    pub fn copy_paste_animation(&mut self, src_anim: usize, dst_anim: usize) {
        self.copy_paste(
            ClipAddress::Animation(src_anim),
            ClipAddress::Animation(dst_anim),
            None,
        );
    }

    pub fn copy_paste_all_frames(&mut self, src_anim: usize, dst_anim: usize) {
        self.copy_paste(
            ClipAddress::AllFrames(src_anim),
            ClipAddress::AllFrames(dst_anim),
            None,
        );
    }

    pub fn copy_paste_frame(&mut self, src_anim: usize, src_frame: usize, dst_anim: usize, dst_frame: usize) {
        self.copy_paste(
            ClipAddress::Frame {
                anim: src_anim,
                frame: src_frame,
            },
            ClipAddress::Frame {
                anim: dst_anim,
                frame: dst_frame,
            },
            None,
        );
    }

    pub fn copy_paste_orientation(
        &mut self,
        src_anim: usize,
        src_orient: usize,
        dst_anim: usize,
        dst_orient: usize,
    ) {
        self.copy_paste(
            ClipAddress::Orientation {
                anim: src_anim,
                orient: src_orient,
            },
            ClipAddress::Orientation {
                anim: dst_anim,
                orient: dst_orient,
            },
            None,
        );
    }

    // --- property tree ---

    #[inline]
    pub fn tree(&self) -> &PropertyTree {
        &self.tree
    }

    /// Every property in pre-order.
    pub fn properties(&self) -> impl Iterator<Item = (PropertyId, &dyn AnimatorProperty)> + '_ {
        self.tree.iter()
    }

    pub fn properties_of<T: AnimatorProperty>(&self) -> impl Iterator<Item = &T> + '_ {
        self.tree.of_type::<T>()
    }

    /// Mutable access for authoring tools editing property data in place.
    pub fn properties_of_mut<T: AnimatorProperty>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.tree.of_type_mut::<T>()
    }

    pub fn property(&self, id: PropertyId) -> Option<&dyn AnimatorProperty> {
        self.tree.get(id)
    }

    pub fn property_mut(&mut self, id: PropertyId) -> Option<&mut dyn AnimatorProperty> {
        self.tree.get_mut(id)
    }

    pub fn depth_of(&self, id: PropertyId) -> Option<usize> {
        self.tree.depth_of(id)
    }
}
