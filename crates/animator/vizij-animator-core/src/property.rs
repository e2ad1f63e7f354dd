//! Animator properties and the tree that broadcasts to them.
//!
//! A property owns whatever per-animation, per-frame and per-orientation data
//! its behaviour needs (sprite handles, hitboxes, sorting layers, ...). The
//! engine never looks at that data; it only keeps it in step with the
//! [`AnimationTable`] by broadcasting structural edits, and drives it with
//! playback transitions.
//!
//! Hooks receive the table read-only. Properties must not try to reach back
//! into the owning [`AnimatorBody`](crate::AnimatorBody): re-entrant playback
//! or structural calls from inside a hook are not supported.

use std::any::Any;
use std::fmt;

use crate::ids::{IdAllocator, PropertyId};
use crate::table::AnimationTable;

/// Opaque payload produced by a `copy_*` hook and consumed by the matching
/// `paste_*` hook. Properties downcast it to their own type.
pub type PropertyClip = Box<dyn Any>;

/// Upcast helper so trait objects can be filtered by concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Contract every node of the property tree implements.
///
/// All hooks default to doing nothing, so an implementation only overrides
/// what it stores. Address arguments are `(animation, frame, orientation)`
/// indices that are valid in `table` at the time of the call.
#[allow(unused_variables)]
pub trait AnimatorProperty: AsAny {
    /// Human readable type tag used in logs and tree dumps.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    // --- lifecycle ---

    /// Called once when the owning body starts.
    fn initialize(&mut self, table: &AnimationTable) {}
    fn paused(&mut self, table: &AnimationTable) {}
    fn unpaused(&mut self, table: &AnimationTable) {}

    // --- structural edits (table already reflects the edit) ---

    fn animation_added_at(&mut self, table: &AnimationTable, anim: usize) {}
    fn animation_removed_at(&mut self, table: &AnimationTable, anim: usize) {}
    fn frame_added_at(&mut self, table: &AnimationTable, anim: usize, frame: usize) {}
    fn frame_removed_at(&mut self, table: &AnimationTable, anim: usize, frame: usize) {}
    /// Sent once for every existing frame of `anim`.
    fn orientation_added_at(
        &mut self,
        table: &AnimationTable,
        anim: usize,
        frame: usize,
        orient: usize,
    ) {
    }
    /// Sent once for every existing frame of `anim`.
    fn orientation_removed_at(
        &mut self,
        table: &AnimationTable,
        anim: usize,
        frame: usize,
        orient: usize,
    ) {
    }

    // --- playback transitions ---

    fn animation_exit(&mut self, table: &AnimationTable, anim: usize) {}
    /// `forced` is true when the animation was (re)started by an explicit play.
    fn pre_animation_setup(&mut self, table: &AnimationTable, anim: usize, forced: bool) {}
    fn animation_enter(&mut self, table: &AnimationTable, anim: usize, elapsed: f32) {}
    fn set_frame_exit(&mut self, table: &AnimationTable, anim: usize, frame: usize) {}
    /// `loops_elapsed` counts completed passes through the animation, which
    /// separates the first visit of a frame from a looped revisit.
    fn set_frame_enter(
        &mut self,
        table: &AnimationTable,
        anim: usize,
        frame: usize,
        elapsed: f32,
        loops_elapsed: u32,
    ) {
    }
    fn orient_frame_exit(&mut self, table: &AnimationTable, anim: usize, frame: usize, orient: usize) {}
    fn orient_frame_enter(
        &mut self,
        table: &AnimationTable,
        anim: usize,
        frame: usize,
        orient: usize,
        elapsed: f32,
    ) {
    }

    /// Whether this property is done once a non-looping animation has run
    /// its full duration. Properties with trailing effects return `false`
    /// until those finish; completion waits for every node.
    fn is_completed_at_end_of_animation(&self, table: &AnimationTable, anim: usize, elapsed: f32) -> bool {
        true
    }

    // --- copy/paste ---

    fn copy_animation(&self, table: &AnimationTable, anim: usize) -> Option<PropertyClip> {
        None
    }
    fn paste_animation(&mut self, table: &AnimationTable, clip: &dyn Any, anim: usize) {}
    fn copy_frame(&self, table: &AnimationTable, anim: usize, frame: usize) -> Option<PropertyClip> {
        None
    }
    fn paste_frame(&mut self, table: &AnimationTable, clip: &dyn Any, anim: usize, frame: usize) {}
    fn copy_orientation(
        &self,
        table: &AnimationTable,
        anim: usize,
        frame: usize,
        orient: usize,
    ) -> Option<PropertyClip> {
        None
    }
    fn paste_orientation(
        &mut self,
        table: &AnimationTable,
        clip: &dyn Any,
        anim: usize,
        frame: usize,
        orient: usize,
    ) {
    }
}

/// Builder form of a tree node: a property and its children in declaration order.
pub struct PropertyNode {
    property: Box<dyn AnimatorProperty>,
    children: Vec<PropertyNode>,
}

impl PropertyNode {
    pub fn new(property: impl AnimatorProperty) -> Self {
        Self::boxed(Box::new(property))
    }

    pub fn boxed(property: Box<dyn AnimatorProperty>) -> Self {
        Self {
            property,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: PropertyNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = PropertyNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl<P: AnimatorProperty> From<P> for PropertyNode {
    fn from(property: P) -> Self {
        Self::new(property)
    }
}

struct Entry {
    property: Box<dyn AnimatorProperty>,
    parent: Option<PropertyId>,
    depth: usize,
    children: Vec<PropertyId>,
}

impl Entry {
    fn property(&self) -> &dyn AnimatorProperty {
        self.property.as_ref()
    }

    fn property_mut(&mut self) -> &mut dyn AnimatorProperty {
        self.property.as_mut()
    }
}

/// Fixed-shape tree of properties, stored flat in pre-order.
///
/// Iterating the storage front to back is the depth-first pre-order walk
/// (root, then each child subtree in declaration order), so a parent always
/// handles a broadcast before any of its descendants.
pub struct PropertyTree {
    entries: Vec<Entry>,
}

impl PropertyTree {
    pub fn new(root: impl Into<PropertyNode>) -> Self {
        let mut ids = IdAllocator::new();
        let mut entries = Vec::new();
        flatten(root.into(), None, 0, &mut ids, &mut entries);
        debug_assert_eq!(ids.allocated(), entries.len());
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A tree always holds at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn root(&self) -> PropertyId {
        PropertyId(0)
    }

    /// Apply `hook` to every property, root first, depth-first pre-order.
    pub fn broadcast(&mut self, mut hook: impl FnMut(&mut dyn AnimatorProperty)) {
        for entry in &mut self.entries {
            hook(entry.property_mut());
        }
    }

    /// Logical AND of `check` over every property. Every node is asked,
    /// even after one has answered `false`.
    pub fn all(&self, mut check: impl FnMut(&dyn AnimatorProperty) -> bool) -> bool {
        self.entries
            .iter()
            .fold(true, |acc, entry| check(entry.property()) & acc)
    }

    /// Properties in pre-order, paired with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &dyn AnimatorProperty)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (PropertyId(i as u32), e.property()))
    }

    pub fn get(&self, id: PropertyId) -> Option<&dyn AnimatorProperty> {
        self.entries.get(id.index()).map(Entry::property)
    }

    pub fn get_mut(&mut self, id: PropertyId) -> Option<&mut dyn AnimatorProperty> {
        self.entries.get_mut(id.index()).map(Entry::property_mut)
    }

    /// Properties of concrete type `T`, in pre-order.
    pub fn of_type<T: AnimatorProperty>(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.property().as_any().downcast_ref::<T>())
    }

    pub fn of_type_mut<T: AnimatorProperty>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries
            .iter_mut()
            .filter_map(|e| e.property_mut().as_any_mut().downcast_mut::<T>())
    }

    /// Distance from the root (root = 0).
    pub fn depth_of(&self, id: PropertyId) -> Option<usize> {
        self.entries.get(id.index()).map(|e| e.depth)
    }

    pub fn parent_of(&self, id: PropertyId) -> Option<PropertyId> {
        self.entries.get(id.index()).and_then(|e| e.parent)
    }

    pub fn children_of(&self, id: PropertyId) -> &[PropertyId] {
        self.entries
            .get(id.index())
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }
}

fn flatten(
    node: PropertyNode,
    parent: Option<PropertyId>,
    depth: usize,
    ids: &mut IdAllocator,
    out: &mut Vec<Entry>,
) -> PropertyId {
    let id = ids.alloc_property();
    out.push(Entry {
        property: node.property,
        parent,
        depth,
        children: Vec::with_capacity(node.children.len()),
    });
    for child in node.children {
        let child_id = flatten(child, Some(id), depth + 1, ids, out);
        out[id.index()].children.push(child_id);
    }
    id
}

impl fmt::Debug for PropertyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|e| format!("{}{}", "  ".repeat(e.depth), e.property().type_name())),
            )
            .finish()
    }
}
