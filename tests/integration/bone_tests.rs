//! Bone puzzle unit against the mock board: LED outputs and reed switch
//! polling.

use std::cell::RefCell;
use std::rc::Rc;

use xray::component::Component;
use xray::puzzle::bone::{Bone, BoneEvent, BonePins, Lifecycle};

use xray::pins::{BONE_1_GREEN, BONE_1_RED, BONE_1_REED};

use crate::mock_board::{level, set_input, MockBoard, SharedBench};

fn bound_bone() -> (Bone, SharedBench) {
    let mut board = MockBoard::new();
    let bench = board.bench();
    let mut bone = Bone::new(
        "bone-1",
        "Bone #1",
        BonePins {
            green: BONE_1_GREEN,
            red: BONE_1_RED,
            reed_switch: BONE_1_REED,
        },
    );
    bone.bind(&mut board).unwrap();
    (bone, bench)
}

#[test]
fn activation_lights_red_only() {
    let (mut bone, bench) = bound_bone();
    bone.activate();
    assert_eq!(level(&bench, BONE_1_RED), Some(true));
    assert_eq!(level(&bench, BONE_1_GREEN), Some(false));
}

#[test]
fn polled_close_completes_and_notifies_once() {
    let (mut bone, bench) = bound_bone();
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&snapshots);
    bone.on(BoneEvent::Complete, move |state| s.borrow_mut().push(state.clone()));

    bone.activate();
    bone.poll();
    assert!(snapshots.borrow().is_empty());

    set_input(&bench, BONE_1_REED, true);
    bone.poll();
    bone.poll();

    assert_eq!(snapshots.borrow().len(), 1);
    let snapshot = snapshots.borrow()[0].clone();
    assert_eq!(snapshot.id, "bone-1");
    assert_eq!(snapshot.payload.lifecycle, Lifecycle::Complete);
    assert_eq!(level(&bench, BONE_1_GREEN), Some(true));
    assert_eq!(level(&bench, BONE_1_RED), Some(false));
}

#[test]
fn polled_close_while_inactive_is_ignored() {
    let (mut bone, bench) = bound_bone();
    let fired = Rc::new(RefCell::new(0));
    let f = Rc::clone(&fired);
    bone.on(BoneEvent::Complete, move |_| *f.borrow_mut() += 1);

    bone.activate();
    bone.make_inactive();
    set_input(&bench, BONE_1_REED, true);
    bone.poll();

    assert_eq!(*fired.borrow(), 0);
    assert_eq!(level(&bench, BONE_1_RED), Some(false));
    assert_eq!(level(&bench, BONE_1_GREEN), Some(false));
}

/// Deactivating a completed bone keeps `complete` until the next
/// activation resets it.
#[test]
fn completed_lifecycle_survives_deactivation() {
    let (mut bone, bench) = bound_bone();
    bone.activate();
    set_input(&bench, BONE_1_REED, true);
    bone.poll();
    bone.deactivate();
    assert_eq!(bone.state().payload.lifecycle, Lifecycle::Complete);
    assert!(!bone.state().payload.is_active);
}

#[test]
fn binds_leds_and_switch() {
    let (_, bench) = bound_bone();
    assert_eq!(bench.borrow().bound, vec![BONE_1_GREEN, BONE_1_RED, BONE_1_REED]);
}
