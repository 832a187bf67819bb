//! Fixture driver against the mock board: PWM output, transition
//! cancellation and behaviour with failing channels.

use xray::component::Component;
use xray::drivers::fixture::{AnalogRgbFixture, RgbPins, TransitionOutcome};
use xray::pins::{PinId, STRIP_B_PWM, STRIP_G_PWM, STRIP_R_PWM};
use xray::{color, Color};

use crate::mock_board::{duties, MockBoard, SharedBench};

const PINS: RgbPins = RgbPins {
    r: STRIP_R_PWM,
    g: STRIP_G_PWM,
    b: STRIP_B_PWM,
};

fn bound_fixture(refresh_ms: f32) -> (AnalogRgbFixture, SharedBench) {
    let mut board = MockBoard::new();
    let bench = board.bench();
    let mut fixture = AnalogRgbFixture::new("analog-led-strip", "RGB LED Strip", PINS, refresh_ms);
    fixture.bind(&mut board).unwrap();
    fixture.set_color(Color::OFF);
    (fixture, bench)
}

// ── Red ramp scenario ─────────────────────────────────────────

#[test]
fn red_ramp_drives_pwm_each_tick() {
    let (mut fixture, bench) = bound_fixture(25.0);
    let handle = fixture.transition_to(Color::RED, 100.0);

    for _ in 0..4 {
        fixture.advance(25.0);
    }

    assert_eq!(duties(&bench, STRIP_R_PWM), vec![0, 64, 128, 191, 255]);
    assert_eq!(duties(&bench, STRIP_G_PWM), vec![0; 5]);
    assert_eq!(fixture.current_color(), Color::RED);
    assert_eq!(handle.take_outcome(), Some(TransitionOutcome::Completed));
}

#[test]
fn one_large_advance_runs_every_due_tick() {
    let (mut fixture, bench) = bound_fixture(25.0);
    let _ = fixture.transition_to(Color::BLUE, 100.0);
    fixture.advance(1000.0);
    assert_eq!(duties(&bench, STRIP_B_PWM).len(), 5);
    assert_eq!(fixture.current_color(), Color::BLUE);
}

// ── Cancellation ──────────────────────────────────────────────

#[test]
fn only_the_latest_target_is_reached() {
    let (mut fixture, bench) = bound_fixture(10.0);
    let first = fixture.transition_to(color(200.0, 0.0, 0.0), 500.0);
    fixture.advance(100.0);
    let second = fixture.transition_to(color(0.0, 0.0, 100.0), 200.0);
    fixture.advance(5000.0);

    assert_eq!(first.take_outcome(), Some(TransitionOutcome::Cancelled));
    assert_eq!(second.take_outcome(), Some(TransitionOutcome::Completed));
    assert_eq!(fixture.current_color(), color(0.0, 0.0, 100.0));
    assert_eq!(duties(&bench, STRIP_R_PWM).last(), Some(&0));
}

#[test]
fn degenerate_duration_writes_target_once() {
    let (mut fixture, bench) = bound_fixture(25.0);
    let handle = fixture.transition_to(Color::GREEN, 25.0);
    assert_eq!(handle.take_outcome(), Some(TransitionOutcome::Completed));
    assert_eq!(duties(&bench, STRIP_G_PWM), vec![0, 255]);
    fixture.advance(1000.0);
    assert_eq!(duties(&bench, STRIP_G_PWM), vec![0, 255]);
}

// ── Hardware failures ─────────────────────────────────────────

#[test]
fn broken_channel_keeps_in_memory_state() {
    let (mut fixture, bench) = bound_fixture(25.0);
    bench.borrow_mut().broken.push(STRIP_R_PWM);

    fixture.turn_on();

    assert_eq!(fixture.current_color(), Color::WHITE);
    assert!(fixture.state().payload.is_powered);
    assert!(duties(&bench, STRIP_G_PWM).ends_with(&[0]));
}

#[test]
fn binding_claims_the_three_pwm_pins() {
    let (_, bench) = bound_fixture(25.0);
    assert_eq!(bench.borrow().bound, vec![PinId(3), PinId(5), PinId(6)]);
}
