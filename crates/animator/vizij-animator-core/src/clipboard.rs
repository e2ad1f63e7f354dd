//! Copy/paste of authored property data between animations, frames and
//! orientations, within one body or across bodies with the same tree shape.
//!
//! Copying snapshots every selected property into opaque clips first, then
//! pasting replays them, so source and destination may be the same node.
//! Nodes are paired by [`PropertyId`] (pre-order position).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::PropertyId;
use crate::property::{AnimatorProperty, PropertyClip, PropertyTree};
use crate::table::AnimationTable;

/// Source or destination of a copy/paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipAddress {
    /// Animation-level data plus every frame and orientation.
    Animation(usize),
    /// Every frame (and its orientations), without animation-level data.
    AllFrames(usize),
    /// One frame and its orientations.
    Frame { anim: usize, frame: usize },
    /// One orientation across every frame.
    Orientation { anim: usize, orient: usize },
}

impl ClipAddress {
    #[inline]
    pub fn anim(self) -> usize {
        match self {
            Self::Animation(a) | Self::AllFrames(a) => a,
            Self::Frame { anim, .. } | Self::Orientation { anim, .. } => anim,
        }
    }

    /// Whether a clip copied from `self` can be pasted at `other`.
    pub fn same_scope(self, other: ClipAddress) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

#[derive(Default)]
struct FrameClip {
    frame: Option<PropertyClip>,
    orientations: Vec<Option<PropertyClip>>,
}

struct NodeClip {
    id: PropertyId,
    animation: Option<PropertyClip>,
    frames: Vec<FrameClip>,
}

/// Snapshot produced by [`AnimatorBody::copy`](crate::AnimatorBody::copy).
pub struct Clipboard {
    source: ClipAddress,
    frame_count: usize,
    orientation_count: usize,
    nodes: Vec<NodeClip>,
}

impl fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clipboard")
            .field("source", &self.source)
            .field("frame_count", &self.frame_count)
            .field("orientation_count", &self.orientation_count)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl Clipboard {
    #[inline]
    pub fn source(&self) -> ClipAddress {
        self.source
    }

    /// Number of property nodes captured.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot `source` from `tree`, limited to `only` when given.
    pub(crate) fn capture(
        tree: &PropertyTree,
        table: &AnimationTable,
        source: ClipAddress,
        only: Option<PropertyId>,
    ) -> Self {
        let anim = source.anim();
        let frame_count = table.frame_count(anim);
        let orientation_count = table.orientation_count(anim);
        let nodes = tree
            .iter()
            .filter(|(id, _)| only.map_or(true, |o| o == *id))
            .map(|(id, prop)| NodeClip {
                id,
                animation: match source {
                    ClipAddress::Animation(a) => prop.copy_animation(table, a),
                    _ => None,
                },
                frames: capture_frames(prop, table, source, frame_count, orientation_count),
            })
            .collect();
        Self {
            source,
            frame_count,
            orientation_count,
            nodes,
        }
    }

    /// Replay the snapshot into `tree` at `dest`. Frame and orientation
    /// iteration stops at the smaller of the source and destination counts.
    pub(crate) fn paste(&self, tree: &mut PropertyTree, table: &AnimationTable, dest: ClipAddress) {
        let anim = dest.anim();
        let frames = self.frame_count.min(table.frame_count(anim));
        let orients = self.orientation_count.min(table.orientation_count(anim));

        for node in &self.nodes {
            let Some(prop) = tree.get_mut(node.id) else {
                continue;
            };
            if let Some(clip) = &node.animation {
                prop.paste_animation(table, clip.as_ref(), anim);
            }
            match dest {
                ClipAddress::Animation(_) | ClipAddress::AllFrames(_) => {
                    for (frame, fc) in node.frames.iter().enumerate().take(frames) {
                        paste_frame(prop, table, fc, anim, frame, orients);
                    }
                }
                ClipAddress::Frame { frame, .. } => {
                    if let Some(fc) = node.frames.first() {
                        paste_frame(prop, table, fc, anim, frame, orients);
                    }
                }
                ClipAddress::Orientation { orient, .. } => {
                    for (frame, fc) in node.frames.iter().enumerate().take(frames) {
                        if let Some(Some(clip)) = fc.orientations.first() {
                            prop.paste_orientation(table, clip.as_ref(), anim, frame, orient);
                        }
                    }
                }
            }
        }
    }
}

fn capture_frames(
    prop: &dyn AnimatorProperty,
    table: &AnimationTable,
    source: ClipAddress,
    frame_count: usize,
    orientation_count: usize,
) -> Vec<FrameClip> {
    let whole_frame = |anim: usize, frame: usize| FrameClip {
        frame: prop.copy_frame(table, anim, frame),
        orientations: (0..orientation_count)
            .map(|o| prop.copy_orientation(table, anim, frame, o))
            .collect(),
    };
    match source {
        ClipAddress::Animation(anim) | ClipAddress::AllFrames(anim) => {
            (0..frame_count).map(|f| whole_frame(anim, f)).collect()
        }
        ClipAddress::Frame { anim, frame } => vec![whole_frame(anim, frame)],
        ClipAddress::Orientation { anim, orient } => (0..frame_count)
            .map(|f| FrameClip {
                frame: None,
                orientations: vec![prop.copy_orientation(table, anim, f, orient)],
            })
            .collect(),
    }
}

fn paste_frame(
    prop: &mut dyn AnimatorProperty,
    table: &AnimationTable,
    clip: &FrameClip,
    anim: usize,
    frame: usize,
    orients: usize,
) {
    if let Some(c) = &clip.frame {
        prop.paste_frame(table, c.as_ref(), anim, frame);
    }
    for (orient, oc) in clip.orientations.iter().enumerate().take(orients) {
        if let Some(c) = oc {
            prop.paste_orientation(table, c.as_ref(), anim, frame, orient);
        }
    }
}
