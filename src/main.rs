//! `xray-sim`: runs the installation against a simulated board.
//!
//! Walks the visitor step script the way the sequencer UI would: plays
//! (logs) the audio cues, invokes the API steps, and satisfies each
//! `wait:until` step by closing the matching simulated contact.
//!
//! ```text
//!  ┌────────────────────────── LocalExecutor ──────────────────────────┐
//!  │  control_loop: advance(tick) ─▶ fixture timer · input polling     │
//!  │  visitor:      step script   ─▶ invoke / probe.set_input / wait   │
//!  └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! **Usage:**
//! ```text
//! xray-sim [--config <path>] [--rounds <n>] [--tick-ms <ms>] [--log-level <level>]
//! ```

#![deny(unused_must_use)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_io_mini::Timer;
use clap::Parser;
use log::{info, LevelFilter};
use serde_json::Value;

use xray::adapters::log_sink;
use xray::adapters::sim::{SimBoard, SimProbe};
use xray::app::setup::{SetupStep, StepOperation};
use xray::config::InstallationConfig;
use xray::drivers::fixture::TransitionOutcome;
use xray::{color, GameState, Installation};

/// Give up on a `wait:until` step after this long.
const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the X-ray installation against a simulated board.
#[derive(Parser)]
#[command(name = "xray-sim", about = "Simulate the Danny the Dinosaur installation")]
struct Args {
    /// JSON installation config (default: the shipped installation).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Visitor rounds to simulate.
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Control loop period in milliseconds.
    #[arg(long, default_value_t = 33)]
    tick_ms: u64,

    /// Log verbosity.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

type Shared = Rc<RefCell<Installation<SimBoard>>>;

fn main() -> Result<()> {
    let args = Args::parse();
    let logger = log_sink::init(args.log_level).context("installing logger")?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            InstallationConfig::from_json(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => InstallationConfig::default(),
    };
    if args.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    info!("xray-sim v{}", env!("CARGO_PKG_VERSION"));

    let board = SimBoard::new();
    let probe = board.probe();
    let mut installation = Installation::new(&config, board);
    installation.connect().context("connecting to simulated board")?;
    installation.start();
    let installation: Shared = Rc::new(RefCell::new(installation));

    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
    executor
        .spawn(control_loop(installation.clone(), Duration::from_millis(args.tick_ms)))
        .detach();

    let visitor = visit(installation.clone(), probe, args.rounds, Duration::from_millis(args.tick_ms));
    futures_lite::future::block_on(executor.run(visitor))?;

    let state = serde_json::to_string_pretty(&installation.borrow().state())?;
    println!("{state}");
    info!("{} log lines retained", logger.lines().len());
    Ok(())
}

/// Advance the installation once per tick, forever.
async fn control_loop(installation: Shared, tick: Duration) {
    let tick_ms = tick.as_secs_f32() * 1000.0;
    loop {
        installation.borrow_mut().advance(tick_ms);
        Timer::after(tick).await;
    }
}

/// Play the step script `rounds` times.
async fn visit(installation: Shared, probe: SimProbe, rounds: u32, tick: Duration) -> Result<()> {
    let steps = installation.borrow().setup().steps;

    // Fade up from dark before the first visitor arrives.
    let fade = {
        let mut inst = installation.borrow_mut();
        inst.fixture_mut().turn_off();
        inst.fixture_mut().transition_to(color(60.0, 40.0, 25.0), 1000.0)
    };
    if fade.wait().await == TransitionOutcome::Completed {
        info!("Ambient fade complete");
    }

    for round in 1..=rounds {
        info!("── Visitor {round}/{rounds} ──");
        for step in steps {
            run_step(&installation, &probe, step, tick).await?;
        }
        installation.borrow_mut().invoke("/danny/start")?;
    }
    Ok(())
}

async fn run_step(installation: &Shared, probe: &SimProbe, step: &SetupStep, tick: Duration) -> Result<()> {
    info!("Step {}: {}", step.id, step.name);
    match step.operation {
        StepOperation::PlayAudio => {
            info!("Playing {}", step.value);
            Timer::after(tick * 3).await;
        }
        StepOperation::InvokeApi => {
            installation
                .borrow_mut()
                .invoke(step.value)
                .with_context(|| format!("step {}", step.id))?;
        }
        StepOperation::WaitUntil => {
            let pin = visitor_contact(&installation.borrow(), step.value)?;
            probe.set_input(pin, true);
            let waited = wait_until(installation, step.value, tick).await;
            probe.set_input(pin, false);
            waited?;
        }
    }
    Ok(())
}

/// The contact a visitor would close to satisfy `condition`.
fn visitor_contact(installation: &Installation<SimBoard>, condition: &str) -> Result<xray::pins::PinId> {
    if condition.starts_with("components:#") {
        return Ok(xray::pins::HEART_BUTTON);
    }
    if condition == "gameState:complete" {
        let Some(index) = installation.selected_unit_index() else {
            bail!("no bone selected while waiting for {condition}");
        };
        return Ok(installation.bones()[index].reed_switch_pin());
    }
    bail!("unsupported wait condition '{condition}'")
}

async fn wait_until(installation: &Shared, condition: &str, tick: Duration) -> Result<()> {
    let mut waited = Duration::ZERO;
    loop {
        let holds = {
            let inst = installation.borrow();
            condition_holds(&inst, condition)?
        };
        if holds {
            return Ok(());
        }
        if waited >= WAIT_TIMEOUT {
            bail!("timed out waiting for {condition}");
        }
        Timer::after(tick).await;
        waited += tick;
    }
}

/// Evaluate a sequencer condition against the installation snapshot.
///
/// `gameState:<value>` or `components:#<id>:state:<value>`.
fn condition_holds(installation: &Installation<SimBoard>, condition: &str) -> Result<bool> {
    if let Some(expected) = condition.strip_prefix("gameState:") {
        let actual = match installation.game_state() {
            GameState::Inactive => "inactive",
            GameState::Incomplete => "incomplete",
            GameState::Complete => "complete",
        };
        return Ok(actual == expected);
    }

    let Some(rest) = condition.strip_prefix("components:#") else {
        bail!("unsupported wait condition '{condition}'");
    };
    let Some((id, expected)) = rest.split_once(":state:") else {
        bail!("malformed component condition '{condition}'");
    };
    let state = serde_json::to_value(installation.state())?;
    let matched = state["components"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|c| c["id"] == id)
        .is_some_and(|c| c["state"] == Value::from(expected));
    Ok(matched)
}
