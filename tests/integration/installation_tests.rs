//! Integration tests for the Installation → Bone / fixture pipeline.
//!
//! Connect, round-robin selection, completion via polled reed switches,
//! the command surface and the state snapshot, all against the mock
//! board.

use xray::app::installation::ComponentSnapshot;
use xray::config::InstallationConfig;
use xray::drivers::button::ButtonState;
use xray::error::{BoardError, CommandError, Error};
use xray::pins::{self, PinId};
use xray::{Color, GameState, Installation, Status};

use crate::mock_board::{duties, level, set_input, MockBoard, SharedBench};

fn connected() -> (Installation<MockBoard>, SharedBench) {
    let board = MockBoard::new();
    let bench = board.bench();
    let mut inst = Installation::new(&InstallationConfig::default(), board);
    inst.connect().unwrap();
    (inst, bench)
}

fn active_count(inst: &Installation<MockBoard>) -> usize {
    inst.bones().iter().filter(|b| b.is_active()).count()
}

// ── connect ───────────────────────────────────────────────────

#[test]
fn connect_binds_and_idles_hardware() {
    let (inst, bench) = connected();
    assert!(inst.is_connected());
    assert_eq!(inst.board().connects, 1);

    // 3 PWM + button + 3 × (2 LEDs + switch)
    assert_eq!(bench.borrow().bound.len(), 13);
    assert_eq!(duties(&bench, pins::STRIP_R_PWM), vec![0]);
    assert_eq!(level(&bench, pins::BONE_2_RED), Some(false));
    assert_eq!(inst.fixture().current_color(), Color::OFF);
}

#[test]
fn failed_handshake_stays_disconnected() {
    let mut inst = Installation::new(
        &InstallationConfig::default(),
        MockBoard::failing(BoardError::NotResponding),
    );
    let err = inst.connect().unwrap_err();
    assert_eq!(err, Error::BoardConnection(BoardError::NotResponding));
    assert!(!inst.is_connected());
    assert!(inst.board().bench.borrow().bound.is_empty());
}

// ── Round-robin selection ─────────────────────────────────────

#[test]
fn selection_is_round_robin_with_one_active() {
    let (mut inst, _) = connected();
    let mut picked = Vec::new();
    for _ in 0..7 {
        inst.activate_next_unit();
        picked.push(inst.selected_unit_index().unwrap());
        assert_eq!(active_count(&inst), 1);
    }
    assert_eq!(picked, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn completion_handler_registers_once_per_bone() {
    let (mut inst, _) = connected();
    for _ in 0..6 {
        inst.activate_next_unit();
    }
    for bone in inst.bones() {
        assert_eq!(bone.subscriber_count(xray::puzzle::bone::BoneEvent::Complete), 1);
    }
}

// ── Game flow ─────────────────────────────────────────────────

#[test]
fn closing_the_selected_bone_completes_the_game() {
    let (mut inst, bench) = connected();
    inst.activate_next_unit();
    assert_eq!(inst.game_state(), GameState::Incomplete);

    set_input(&bench, pins::BONE_1_REED, true);
    inst.advance(33.0);

    assert_eq!(inst.game_state(), GameState::Complete);
    assert_eq!(level(&bench, pins::BONE_1_GREEN), Some(true));
}

#[test]
fn closing_an_unselected_bone_does_nothing() {
    let (mut inst, bench) = connected();
    inst.activate_next_unit();
    set_input(&bench, pins::BONE_2_REED, true);
    inst.advance(33.0);
    assert_eq!(inst.game_state(), GameState::Incomplete);
}

#[test]
fn next_round_resets_game_state() {
    let (mut inst, _) = connected();
    inst.activate_next_unit();
    assert!(inst.handle_input(pins::BONE_1_REED, true));
    assert_eq!(inst.game_state(), GameState::Complete);

    inst.activate_next_unit();
    assert_eq!(inst.game_state(), GameState::Incomplete);
    assert!(inst.handle_input(pins::BONE_2_REED, true));
    assert_eq!(inst.game_state(), GameState::Complete);
}

#[test]
fn unwired_input_is_not_routed() {
    let (mut inst, _) = connected();
    assert!(!inst.handle_input(PinId(2), true));
}

#[test]
fn heart_button_press_is_visible_in_snapshot() {
    let (mut inst, bench) = connected();
    set_input(&bench, pins::HEART_BUTTON, true);
    inst.advance(33.0);

    let state = inst.state();
    let Some(ComponentSnapshot::Button(button)) = state.components.last() else {
        panic!("heart button missing from snapshot");
    };
    assert_eq!(button.payload, ButtonState::Press);
}

// ── Lifecycle & commands ──────────────────────────────────────

#[test]
fn lifecycle_commands_update_status() {
    let (mut inst, _) = connected();
    inst.invoke("/danny/start").unwrap();
    assert_eq!(inst.status(), Status::Started);
    inst.invoke("/danny/restart").unwrap();
    assert_eq!(inst.status(), Status::Started);
    inst.invoke("/danny/stop").unwrap();
    assert_eq!(inst.status(), Status::Stopped);
}

#[test]
fn stop_turns_everything_off() {
    let (mut inst, bench) = connected();
    inst.start();
    inst.invoke("/danny/led-strip/turn-on").unwrap();
    inst.invoke("/danny/activate-next-bone").unwrap();
    let handle = inst.fixture_mut().transition_to(Color::BLUE, 1000.0);
    inst.stop();

    assert!(handle.is_settled());
    assert_eq!(inst.fixture().current_color(), Color::OFF);
    assert_eq!(active_count(&inst), 0);
    assert_eq!(duties(&bench, pins::STRIP_B_PWM).last(), Some(&0));
}

#[test]
fn catalog_keys_drive_components() {
    let (mut inst, bench) = connected();
    inst.invoke("/bones/bone-3/set-to-green").unwrap();
    assert_eq!(level(&bench, pins::BONE_3_GREEN), Some(true));
    inst.invoke("/bones/bone-3/activate").unwrap();
    assert_eq!(level(&bench, pins::BONE_3_RED), Some(true));
    inst.invoke("/buttons/heart-button/press").unwrap();
    inst.invoke("/led-strip/turn-on").unwrap();
    assert_eq!(duties(&bench, pins::STRIP_G_PWM).last(), Some(&255));
}

#[test]
fn every_catalog_operation_is_invokable() {
    let (mut inst, _) = connected();
    let state = serde_json::to_value(inst.state()).unwrap();
    let keys: Vec<String> = state["components"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| c["operations"].as_array().cloned().unwrap_or_default())
        .map(|op| op["invoke"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(keys.len(), 2 + 3 * 4 + 2);
    for key in keys {
        inst.invoke(&key).unwrap_or_else(|e| panic!("{key}: {e}"));
    }
}

#[test]
fn unknown_keys_fail_with_typed_errors() {
    let (mut inst, _) = connected();
    assert_eq!(
        inst.invoke("/danny/dance"),
        Err(Error::Command(CommandError::UnknownRoute("/danny/dance".into())))
    );
    assert_eq!(
        inst.invoke("/bones/bone-7/activate"),
        Err(Error::Command(CommandError::UnknownComponent("bone-7".into())))
    );
}

// ── Snapshot ──────────────────────────────────────────────────

#[test]
fn snapshot_serializes_for_the_web_layer() {
    let (mut inst, _) = connected();
    inst.start();
    inst.activate_next_unit();
    let json = serde_json::to_value(inst.state()).unwrap();

    assert_eq!(json["name"], "Danny the Dinosaur");
    assert_eq!(json["status"], "started");
    assert_eq!(json["isConnected"], true);
    assert_eq!(json["gameState"], "incomplete");
    assert_eq!(json["selectedUnitIndex"], 0);
    assert_eq!(json["components"][0]["type"], "analog-led-strip");
    assert_eq!(json["components"][1]["state"]["isActive"], true);
    assert_eq!(json["components"][1]["state"]["redLed"]["state"], "on");
    assert_eq!(json["components"][4]["state"], "hold");
    assert!(json.get("logs").is_none());
}

#[test]
fn snapshot_sees_the_latest_call() {
    let (mut inst, _) = connected();
    inst.heart_button_mut().press();
    let first = inst.state();
    inst.heart_button_mut().reset();
    let second = inst.state();
    assert_ne!(first, second);
}
