#![allow(dead_code)]
//! Test properties shared by the integration tests.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use vizij_animator_core::{
    AnimationSlot, AnimationTable, AnimatorBody, AnimatorConfig, AnimatorProperty, PropertyClip,
    PropertyNode, PropertyTree, Vec2,
};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Writes every hook call into a shared log as `tag.hook(args)`.
pub struct Recorder {
    pub tag: &'static str,
    pub log: Log,
    /// Elapsed time from which this node reports itself complete.
    pub done_at: f32,
}

impl Recorder {
    pub fn node(tag: &'static str, log: &Log) -> PropertyNode {
        Self::finishing_at(tag, log, 0.0)
    }

    pub fn finishing_at(tag: &'static str, log: &Log, done_at: f32) -> PropertyNode {
        PropertyNode::new(Recorder {
            tag,
            log: log.clone(),
            done_at,
        })
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(format!("{}.{}", self.tag, entry));
    }
}

impl AnimatorProperty for Recorder {
    fn initialize(&mut self, _table: &AnimationTable) {
        self.push("initialize".into());
    }
    fn paused(&mut self, _table: &AnimationTable) {
        self.push("paused".into());
    }
    fn unpaused(&mut self, _table: &AnimationTable) {
        self.push("unpaused".into());
    }
    fn animation_added_at(&mut self, _table: &AnimationTable, anim: usize) {
        self.push(format!("animation_added_at({anim})"));
    }
    fn animation_removed_at(&mut self, _table: &AnimationTable, anim: usize) {
        self.push(format!("animation_removed_at({anim})"));
    }
    fn frame_added_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize) {
        self.push(format!("frame_added_at({anim},{frame})"));
    }
    fn frame_removed_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize) {
        self.push(format!("frame_removed_at({anim},{frame})"));
    }
    fn orientation_added_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) {
        self.push(format!("orientation_added_at({anim},{frame},{orient})"));
    }
    fn orientation_removed_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) {
        self.push(format!("orientation_removed_at({anim},{frame},{orient})"));
    }
    fn animation_exit(&mut self, _table: &AnimationTable, anim: usize) {
        self.push(format!("animation_exit({anim})"));
    }
    fn pre_animation_setup(&mut self, _table: &AnimationTable, anim: usize, forced: bool) {
        self.push(format!("pre_animation_setup({anim},{forced})"));
    }
    fn animation_enter(&mut self, _table: &AnimationTable, anim: usize, _elapsed: f32) {
        self.push(format!("animation_enter({anim})"));
    }
    fn set_frame_exit(&mut self, _table: &AnimationTable, anim: usize, frame: usize) {
        self.push(format!("set_frame_exit({anim},{frame})"));
    }
    fn set_frame_enter(&mut self, _table: &AnimationTable, anim: usize, frame: usize, _elapsed: f32, loops: u32) {
        self.push(format!("set_frame_enter({anim},{frame},{loops})"));
    }
    fn orient_frame_exit(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) {
        self.push(format!("orient_frame_exit({anim},{frame},{orient})"));
    }
    fn orient_frame_enter(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize, _elapsed: f32) {
        self.push(format!("orient_frame_enter({anim},{frame},{orient})"));
    }
    fn is_completed_at_end_of_animation(&self, _table: &AnimationTable, _anim: usize, elapsed: f32) -> bool {
        elapsed >= self.done_at
    }
}

/// Stores a label per animation, per frame and per orientation, mirroring
/// every structural edit; supports copy/paste of those labels.
#[derive(Debug, Default)]
pub struct Grid {
    pub anims: Vec<AnimCells>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnimCells {
    pub label: String,
    pub frames: Vec<FrameCells>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameCells {
    pub label: String,
    pub orients: Vec<String>,
}

impl Grid {
    pub fn frame_label(&self, anim: usize, frame: usize) -> &str {
        &self.anims[anim].frames[frame].label
    }

    pub fn orient_label(&self, anim: usize, frame: usize, orient: usize) -> &str {
        &self.anims[anim].frames[frame].orients[orient]
    }

    /// Label every cell with its own address so moves are easy to spot.
    pub fn paint_addresses(&mut self, prefix: &str) {
        for (a, anim) in self.anims.iter_mut().enumerate() {
            anim.label = format!("{prefix}a{a}");
            for (f, frame) in anim.frames.iter_mut().enumerate() {
                frame.label = format!("{prefix}a{a}f{f}");
                for (o, orient) in frame.orients.iter_mut().enumerate() {
                    *orient = format!("{prefix}a{a}f{f}o{o}");
                }
            }
        }
    }
}

fn label_clip(label: &str) -> Option<PropertyClip> {
    Some(Box::new(label.to_string()))
}

fn clip_label(clip: &dyn Any) -> Option<String> {
    clip.downcast_ref::<String>().cloned()
}

impl AnimatorProperty for Grid {
    fn initialize(&mut self, table: &AnimationTable) {
        self.anims = (0..table.len())
            .map(|a| AnimCells {
                label: String::new(),
                frames: vec![
                    FrameCells {
                        label: String::new(),
                        orients: vec![String::new(); table.orientation_count(a)],
                    };
                    table.frame_count(a)
                ],
            })
            .collect();
    }
    fn animation_added_at(&mut self, _table: &AnimationTable, anim: usize) {
        self.anims.insert(anim, AnimCells::default());
    }
    fn animation_removed_at(&mut self, _table: &AnimationTable, anim: usize) {
        self.anims.remove(anim);
    }
    fn frame_added_at(&mut self, table: &AnimationTable, anim: usize, frame: usize) {
        self.anims[anim].frames.insert(
            frame,
            FrameCells {
                label: String::new(),
                orients: vec![String::new(); table.orientation_count(anim)],
            },
        );
    }
    fn frame_removed_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize) {
        self.anims[anim].frames.remove(frame);
    }
    fn orientation_added_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) {
        self.anims[anim].frames[frame].orients.insert(orient, String::new());
    }
    fn orientation_removed_at(&mut self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) {
        self.anims[anim].frames[frame].orients.remove(orient);
    }

    fn copy_animation(&self, _table: &AnimationTable, anim: usize) -> Option<PropertyClip> {
        label_clip(&self.anims[anim].label)
    }
    fn paste_animation(&mut self, _table: &AnimationTable, clip: &dyn Any, anim: usize) {
        if let Some(label) = clip_label(clip) {
            self.anims[anim].label = label;
        }
    }
    fn copy_frame(&self, _table: &AnimationTable, anim: usize, frame: usize) -> Option<PropertyClip> {
        label_clip(self.frame_label(anim, frame))
    }
    fn paste_frame(&mut self, _table: &AnimationTable, clip: &dyn Any, anim: usize, frame: usize) {
        if let Some(label) = clip_label(clip) {
            self.anims[anim].frames[frame].label = label;
        }
    }
    fn copy_orientation(&self, _table: &AnimationTable, anim: usize, frame: usize, orient: usize) -> Option<PropertyClip> {
        label_clip(self.orient_label(anim, frame, orient))
    }
    fn paste_orientation(
        &mut self,
        _table: &AnimationTable,
        clip: &dyn Any,
        anim: usize,
        frame: usize,
        orient: usize,
    ) {
        if let Some(label) = clip_label(clip) {
            self.anims[anim].frames[frame].orients[orient] = label;
        }
    }
}

pub fn four_way() -> Vec<Vec2> {
    vec![Vec2::RIGHT, Vec2::UP, Vec2::LEFT, Vec2::DOWN]
}

/// 4 frames at 2 fps (0.5 s per frame), four orientations.
pub fn walk_slot(looping: bool) -> AnimationSlot {
    AnimationSlot::new("walk", 2.0, looping)
        .with_frames(4)
        .with_orientations(four_way())
}

pub fn started_body(slots: Vec<AnimationSlot>, tree: PropertyTree) -> AnimatorBody {
    let table = AnimationTable::from_slots(slots).expect("valid slots");
    let mut body = AnimatorBody::new(AnimatorConfig::default(), table, tree);
    body.start().expect("body starts");
    body
}
