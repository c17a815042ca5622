//! JSON protocol for headless maze communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller (presentation layer or
//! oracle bridge)
//! **Output (stdout):** Responses, one or more per command
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0",...}`
//! 2. Controller loads a map (unless one was given on the command line)
//! 3. Controller sends moves, command text, or asks for autoplay
//! 4. Runner reports executed steps and the run status
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","map":null}
//! -> {"cmd":"load_preset","name":"classroom"}
//! <- {"type":"ack","cmd":"load_preset"}
//! -> {"cmd":"solve"}
//! <- {"type":"path","commands":"RRRRRDDDDD","length":10}
//! -> {"cmd":"run","commands":"down, down, right"}
//! <- {"type":"steps","records":[...],"status":"in_progress"}
//! -> {"cmd":"query"}
//! <- {"type":"state","position":{"x":2,"y":3},"status":"in_progress","history_len":3}
//! -> {"cmd":"quit"}
//! <- {"type":"bye"}
//! ```

use maze_core::commands::CommandPolicy;
use maze_core::grid::{Coord, Direction};
use maze_core::movement::{RunStatus, StepRecord};
use serde::{Deserialize, Serialize};

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Load a map file (RON or JSON) and start a fresh session on it.
    LoadMap { path: String },

    /// Load a built-in map by name.
    LoadPreset { name: String },

    /// Plan a route from the current position to the goal without moving.
    Solve,

    /// Apply a single move.
    Step { direction: Direction },

    /// Validate oracle text and execute it.
    Run {
        commands: String,
        /// Overrides the runner's configured policy for this command.
        #[serde(default)]
        policy: Option<CommandPolicy>,
    },

    /// Plan from the current position and execute the plan.
    Autoplay,

    /// Return the robot to the start cell and clear the history.
    Reset,

    /// Report the current state without moving.
    Query,

    /// Quit the runner.
    Quit,
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        version: String,
        /// Name of the map loaded at startup, if any.
        map: Option<String>,
    },

    /// Acknowledgment of a command with no other output.
    Ack { cmd: String },

    /// Error processing a command.
    Error {
        message: String,
        cmd: Option<String>,
    },

    /// A planned route.
    Path {
        /// Compact route, e.g. `"RRDD"`.
        commands: String,
        length: usize,
    },

    /// The goal is unreachable from the current position.
    NoPath,

    /// Steps executed by `step`, `run` or `autoplay`.
    Steps {
        records: Vec<StepRecord>,
        status: RunStatus,
    },

    /// Current session state.
    State {
        position: Coord,
        status: RunStatus,
        history_len: usize,
    },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(map: Option<String>) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            map,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","message":"Serialization failed: {}"}}"#,
                e
            )
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadMap { .. } => "load_map",
            Self::LoadPreset { .. } => "load_preset",
            Self::Solve => "solve",
            Self::Step { .. } => "step",
            Self::Run { .. } => "run",
            Self::Autoplay => "autoplay",
            Self::Reset => "reset",
            Self::Query => "query",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::movement::MovementOutcome;

    #[test]
    fn test_parse_step_command() {
        let cmd = Command::from_json(r#"{"cmd":"step","direction":"left"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Step {
                direction: Direction::Left
            }
        );
        assert_eq!(cmd.name(), "step");
    }

    #[test]
    fn test_parse_run_command_default_policy() {
        let cmd = Command::from_json(r#"{"cmd":"run","commands":"RRD"}"#).unwrap();
        assert!(matches!(
            cmd,
            Command::Run { ref commands, policy: None } if commands == "RRD"
        ));

        let cmd =
            Command::from_json(r#"{"cmd":"run","commands":"RRD","policy":"strict"}"#).unwrap();
        assert!(matches!(
            cmd,
            Command::Run {
                policy: Some(CommandPolicy::Strict),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Command::from_json(r#"{"cmd":"teleport","x":3}"#).is_err());
        assert!(Command::from_json(r#"{"cmd":"step","direction":"north"}"#).is_err());
    }

    #[test]
    fn test_serialize_steps_response() {
        let resp = Response::Steps {
            records: vec![StepRecord {
                direction: Direction::Right,
                from: Coord::new(0, 0),
                to: Coord::new(1, 0),
                outcome: MovementOutcome::ReachedGoal,
            }],
            status: RunStatus::Won,
        };
        let json = resp.to_json_line();
        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""type":"steps""#));
        assert!(json.contains(r#""outcome":"reached_goal""#));
        assert!(json.contains(r#""status":"won""#));
    }

    #[test]
    fn test_serialize_state_response() {
        let json = Response::State {
            position: Coord::new(2, 3),
            status: RunStatus::InProgress,
            history_len: 4,
        }
        .to_json_line();
        assert_eq!(
            json,
            "{\"type\":\"state\",\"position\":{\"x\":2,\"y\":3},\"status\":\"in_progress\",\"history_len\":4}\n"
        );
    }

    #[test]
    fn test_unit_responses() {
        assert_eq!(Response::NoPath.to_json_line(), "{\"type\":\"no_path\"}\n");
        assert_eq!(Response::Bye.to_json_line(), "{\"type\":\"bye\"}\n");
    }
}
