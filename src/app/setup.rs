//! Visitor-facing step script.
//!
//! The external sequencer UI walks these steps in order: it plays the
//! audio clips, forwards `invoke:api` values to
//! [`Installation::invoke`](super::installation::Installation::invoke)
//! and polls the state query path until each `wait:until` condition
//! holds. The controller only publishes the script.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOperation {
    #[serde(rename = "play:audio")]
    PlayAudio,
    #[serde(rename = "invoke:api")]
    InvokeApi,
    #[serde(rename = "wait:until")]
    WaitUntil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetupStep {
    pub id: u8,
    pub name: &'static str,
    pub operation: StepOperation,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationSetup {
    pub query_state: &'static str,
    pub steps: &'static [SetupStep],
}

const fn step(id: u8, name: &'static str, operation: StepOperation, value: &'static str) -> SetupStep {
    SetupStep {
        id,
        name,
        operation,
        value,
    }
}

use StepOperation::{InvokeApi, PlayAudio, WaitUntil};

const STEPS: &[SetupStep] = &[
    step(1, "Introduction", PlayAudio, "/audio/1-introduction.wav"),
    step(2, "Light Up LED Strip", InvokeApi, "/danny/led-strip/turn-on"),
    step(3, "Have You Found It", PlayAudio, "/audio/2-have-you-found-it.wav"),
    step(4, "Danny is Hurt", PlayAudio, "/audio/3-danny-is-hurt.wav"),
    step(5, "Waiting for heart button.", WaitUntil, "components:#heart-button:state:press"),
    step(6, "Instructions", PlayAudio, "/audio/4-instructions.wav"),
    step(7, "Activating Next Bone", InvokeApi, "/danny/activate-next-bone"),
    step(8, "Waiting to Complete Task", WaitUntil, "gameState:complete"),
    step(9, "Next steps", PlayAudio, "/audio/6-next-steps.wav"),
    step(10, "Help Another Dinosaur", PlayAudio, "/audio/7-one-more.wav"),
    step(11, "Good Bye", InvokeApi, "/danny/stop"),
];

/// The installation's step script.
pub fn setup() -> InstallationSetup {
    InstallationSetup {
        query_state: "/danny/state",
        steps: STEPS,
    }
}
