mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{four_way, new_log, started_body, take, walk_slot, Recorder};
use vizij_animator_core::{
    AnimationSlot, AnimatorCommand, AnimatorEvent, ClockState, PropertyTree, Vec2,
};

/// walk (looping, 4 frames @ 2 fps, 4-way) and attack (one-shot, 4 frames @ 2 fps, 2-way).
fn slots() -> Vec<AnimationSlot> {
    vec![
        walk_slot(true),
        AnimationSlot::new("attack", 2.0, false)
            .with_frames(4)
            .with_orientations([Vec2::RIGHT, Vec2::LEFT]),
    ]
}

fn pair(log: &common::Log) -> PropertyTree {
    PropertyTree::new(Recorder::node("root", log).with_child(Recorder::node("child", log)))
}

#[test]
fn play_fires_full_enter_cascade_synchronously() {
    let log = new_log();
    let mut body = started_body(slots(), pair(&log));
    take(&log);

    body.play(0);
    assert_eq!(
        take(&log),
        [
            "root.pre_animation_setup(0,true)",
            "child.pre_animation_setup(0,true)",
            "root.animation_enter(0)",
            "child.animation_enter(0)",
            "root.set_frame_enter(0,0,0)",
            "child.set_frame_enter(0,0,0)",
            "root.orient_frame_enter(0,0,3)",
            "child.orient_frame_enter(0,0,3)",
        ]
    );
    assert_eq!(body.state(), ClockState::Playing);
    assert_eq!(body.current_animation(), Some(0));
    assert_eq!(body.current_frame(), Some(0));
    assert_eq!(body.current_orientation(), Some(3));
}

#[test]
fn switching_animation_exits_every_level_in_order() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.tick(0.6);
    assert_eq!(body.current_frame(), Some(1));
    take(&log);

    body.play(1);
    assert_eq!(
        take(&log),
        [
            "p.animation_exit(0)",
            "p.pre_animation_setup(1,true)",
            "p.animation_enter(1)",
            "p.set_frame_exit(0,1)",
            "p.set_frame_enter(1,0,0)",
            "p.orient_frame_exit(0,1,3)",
            // facing down is 90 degrees from both right and left; lowest index wins
            "p.orient_frame_enter(1,0,0)",
        ]
    );
    assert_eq!(body.elapsed(), 0.0);
}

#[test]
fn replaying_same_animation_restarts_it() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.tick(1.2);
    take(&log);

    body.play(0);
    let calls = take(&log);
    assert_eq!(calls[0], "p.animation_exit(0)");
    assert_eq!(calls[1], "p.pre_animation_setup(0,true)");
    assert!(calls.contains(&"p.set_frame_exit(0,2)".to_string()));
    assert!(calls.contains(&"p.set_frame_enter(0,0,0)".to_string()));
    assert_eq!(body.current_frame(), Some(0));
}

#[test]
fn looping_frames_wrap_and_count_loops() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);

    body.tick(1.8);
    assert_eq!(body.current_frame(), Some(3));
    take(&log);

    body.tick(0.5);
    assert_eq!(body.current_frame(), Some(0));
    let calls = take(&log);
    assert!(calls.contains(&"p.set_frame_exit(0,3)".to_string()));
    assert!(calls.contains(&"p.set_frame_enter(0,0,1)".to_string()));
}

#[test]
fn unchanged_frame_broadcasts_nothing() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    take(&log);

    body.tick(0.1);
    body.tick(0.1);
    assert!(take(&log).is_empty());
    assert_eq!(body.current_frame(), Some(0));
}

#[test]
fn one_shot_holds_last_frame() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(1);
    body.tick(10.0);
    assert_eq!(body.current_frame(), Some(3));
    take(&log);
    body.tick(5.0);
    assert!(take(&log).is_empty());
    assert_eq!(body.current_frame(), Some(3));
}

#[test]
fn direction_change_reorients_immediately() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    take(&log);

    body.set_direction(Vec2::new(0.9, 0.1));
    assert_eq!(
        take(&log),
        ["p.orient_frame_exit(0,0,3)", "p.orient_frame_enter(0,0,0)"]
    );
    assert_eq!(body.current_orientation(), Some(0));

    // still closest to right
    body.set_direction(Vec2::new(1.0, 0.05));
    assert!(take(&log).is_empty());

    // (-1,-1) ties left and down; left has the lower index
    body.set_direction(Vec2::new(-1.0, -1.0));
    assert_eq!(body.current_orientation(), Some(2));
}

#[test]
fn direction_change_while_paused_applies_on_next_tick() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.set_paused(true);
    take(&log);

    body.set_direction(Vec2::UP);
    assert!(take(&log).is_empty());
    assert_eq!(body.current_orientation(), Some(3));

    body.set_paused(false);
    body.tick(0.0);
    assert_eq!(
        take(&log),
        [
            "p.unpaused",
            "p.orient_frame_exit(0,0,3)",
            "p.orient_frame_enter(0,0,1)"
        ]
    );
}

#[test]
fn play_while_paused_is_deferred_to_next_tick() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.set_paused(true);
    take(&log);

    body.play(0);
    assert!(take(&log).is_empty());
    assert_eq!(body.played_animation(), Some(0));
    assert_eq!(body.current_animation(), None);

    body.set_paused(false);
    body.tick(0.0);
    let calls = take(&log);
    assert!(calls.contains(&"p.pre_animation_setup(0,true)".to_string()));
    assert_eq!(body.current_animation(), Some(0));
}

#[test]
fn inactive_body_does_not_advance() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.set_active(false);
    body.tick(1.0);
    assert_eq!(body.elapsed(), 0.0);
    body.set_active(true);
    body.tick(1.0);
    assert_eq!(body.current_frame(), Some(2));
}

#[test]
fn play_empty_exits_everything() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.tick(0.5);
    take(&log);

    body.play_empty();
    assert_eq!(
        take(&log),
        [
            "p.animation_exit(0)",
            "p.set_frame_exit(0,1)",
            "p.orient_frame_exit(0,1,3)"
        ]
    );
    assert_eq!(body.state(), ClockState::Idle);
    assert_eq!(body.current_animation(), None);
    assert_eq!(body.current_frame(), None);
    assert_eq!(body.current_orientation(), None);
}

#[test]
fn play_by_name_unknown_is_noop() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    take(&log);
    assert!(!body.play_by_name("dance"));
    assert!(take(&log).is_empty());
    assert_eq!(body.played_animation(), None);

    assert!(body.play_by_name("attack"));
    assert_eq!(body.current_animation(), Some(1));
}

#[test]
fn completion_waits_for_slowest_property_and_fires_once() {
    let log = new_log();
    let tree = PropertyTree::new(
        Recorder::finishing_at("fast", &log, 2.0)
            .with_child(Recorder::finishing_at("slow", &log, 2.5)),
    );
    let mut body = started_body(slots(), tree);

    let fired = Rc::new(Cell::new(0));
    let fired_cb = fired.clone();
    body.play_with_callback(1, move |_| fired_cb.set(fired_cb.get() + 1));

    for _ in 0..4 {
        body.tick(0.5);
    }
    common::approx(body.elapsed(), 2.0, 1e-6);
    assert_eq!(fired.get(), 0, "slow property has not finished at 2.0s");

    body.tick(0.5);
    assert_eq!(fired.get(), 1);

    body.tick(0.5);
    assert_eq!(fired.get(), 1, "callback is cleared after firing");

    let completions = body
        .take_outputs()
        .events
        .into_iter()
        .filter(|e| matches!(e, AnimatorEvent::Completed { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn looping_animation_never_completes() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    let fired = Rc::new(Cell::new(false));
    let fired_cb = fired.clone();
    body.play_with_callback(0, move |_| fired_cb.set(true));
    for _ in 0..20 {
        body.tick(0.5);
    }
    assert!(!fired.get());
}

#[test]
fn completion_callback_can_chain_next_animation() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play_with_callback(1, |body| body.play(0));
    body.tick(2.0);
    assert_eq!(body.current_animation(), Some(0));
    assert_eq!(body.elapsed(), 0.0);
}

#[test]
fn events_mirror_transitions() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.take_outputs();

    body.play(0);
    let out = body.take_outputs();
    assert_eq!(
        out.events,
        vec![
            AnimatorEvent::AnimationEntered {
                anim: 0,
                name: "walk".into(),
                forced: true
            },
            AnimatorEvent::FrameEntered {
                anim: 0,
                frame: 0,
                loops_elapsed: 0
            },
            AnimatorEvent::OrientationEntered {
                anim: 0,
                frame: 0,
                orient: 3
            },
        ]
    );
    assert!(body.take_outputs().is_empty());
}

#[test]
fn commands_apply_in_order() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.apply([
        AnimatorCommand::PlayByName {
            name: "walk".into(),
        },
        AnimatorCommand::SetDirection {
            direction: Vec2::LEFT,
        },
        AnimatorCommand::SetPaused { paused: true },
    ]);
    assert_eq!(body.current_animation(), Some(0));
    assert_eq!(body.current_orientation(), Some(2));
    assert!(body.paused());

    body.apply([AnimatorCommand::SetPaused { paused: false }, AnimatorCommand::PlayEmpty]);
    assert_eq!(body.state(), ClockState::Idle);
}

#[test]
fn removing_frame_before_current_keeps_exit_addresses_valid() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    body.tick(1.0);
    assert_eq!(body.current_frame(), Some(2));
    take(&log);

    // entered frame 2 becomes frame 1; 3 frames at elapsed 1.0 derive frame 2
    body.remove_frame_at(0, 0);
    assert_eq!(
        take(&log),
        [
            "p.frame_removed_at(0,0)",
            "p.set_frame_exit(0,1)",
            "p.set_frame_enter(0,2,0)",
            "p.orient_frame_exit(0,1,3)",
            "p.orient_frame_enter(0,2,3)",
        ]
    );
}

#[test]
fn removing_played_animation_goes_idle_silently() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(0);
    take(&log);

    body.remove_animation_at(0);
    assert_eq!(take(&log), ["p.animation_removed_at(0)"]);
    assert_eq!(body.state(), ClockState::Idle);
    assert_eq!(body.current_animation(), None);
    assert_eq!(body.animation_name(0), "attack");
}

#[test]
fn inserting_before_played_animation_shifts_it() {
    let log = new_log();
    let mut body = started_body(slots(), PropertyTree::new(Recorder::node("p", &log)));
    body.play(1);
    take(&log);

    body.add_animation_at(0);
    assert_eq!(take(&log), ["p.animation_added_at(0)"]);
    assert_eq!(body.played_animation(), Some(2));
    assert_eq!(body.current_animation(), Some(2));
    assert_eq!(body.animation_name(2), "attack");
}

#[test]
fn orientation_direction_edit_reorients() {
    let log = new_log();
    let mut body = started_body(
        vec![AnimationSlot::new("a", 1.0, true)
            .with_frames(1)
            .with_orientations(four_way())],
        PropertyTree::new(Recorder::node("p", &log)),
    );
    body.play(0);
    assert_eq!(body.current_orientation(), Some(3));

    // point orientation 0 straight down as well; 0 wins the tie
    body.set_orientation_direction(0, 0, Vec2::DOWN);
    assert_eq!(body.current_orientation(), Some(0));
}
