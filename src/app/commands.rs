//! Inbound commands to the installation.
//!
//! Every operation in a component catalog carries an invocation key
//! (`/bones/bone-1/activate`). The external web layer forwards those
//! keys verbatim; [`Command::parse`] turns them into a typed command
//! that [`Installation::handle_command`](super::installation::Installation::handle_command)
//! executes.

use core::str::FromStr;

use crate::error::CommandError;

/// Installation-level key prefix.
pub const INSTALLATION_PREFIX: &str = "/danny";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneAction {
    Activate,
    Deactivate,
    SetToRed,
    SetToGreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Reset,
}

/// Commands that external adapters can send into the installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Restart,
    ActivateNextBone,
    FixtureOn,
    FixtureOff,
    Bone { id: String, action: BoneAction },
    Button { id: String, action: ButtonAction },
}

impl Command {
    /// Resolve an invocation key.
    pub fn parse(key: &str) -> Result<Self, CommandError> {
        let unknown = || CommandError::UnknownRoute(key.to_owned());
        let path = key.strip_suffix('/').unwrap_or(key);
        let path = path.strip_prefix(INSTALLATION_PREFIX).unwrap_or(path);
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

        let command = match segments.as_slice() {
            ["start"] => Self::Start,
            ["stop"] => Self::Stop,
            ["restart"] => Self::Restart,
            ["activate-next-bone"] => Self::ActivateNextBone,
            ["led-strip", "turn-on"] => Self::FixtureOn,
            ["led-strip", "turn-off"] => Self::FixtureOff,
            ["bones", id, action] if !id.is_empty() => Self::Bone {
                id: (*id).to_owned(),
                action: match *action {
                    "activate" => BoneAction::Activate,
                    "deactivate" => BoneAction::Deactivate,
                    "set-to-red" => BoneAction::SetToRed,
                    "set-to-green" => BoneAction::SetToGreen,
                    _ => return Err(unknown()),
                },
            },
            ["buttons", id, action] if !id.is_empty() => Self::Button {
                id: (*id).to_owned(),
                action: match *action {
                    "press" => ButtonAction::Press,
                    "reset" => ButtonAction::Reset,
                    _ => return Err(unknown()),
                },
            },
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
