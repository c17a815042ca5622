//! Headless maze runner implementation.
//!
//! Holds at most one [`Session`] and answers protocol commands against it.
//! Reading and writing are generic over `BufRead`/`Write` so tests can drive
//! the runner from memory.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use maze_core::commands::{parse_commands, CommandPolicy};
use maze_core::error::MazeError;
use maze_core::grid::Path;
use maze_core::map::MapDescription;
use maze_core::pathfinding::find_path;
use maze_core::session::Session;
use thiserror::Error;

use crate::protocol::{Command, Response};

/// Errors surfaced while handling a command.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// A command needs a map but none is loaded.
    #[error("No map loaded; send load_map or load_preset first")]
    NoMapLoaded,

    /// `load_preset` named a map that does not exist.
    #[error("Unknown preset map: {0}")]
    UnknownPreset(String),

    /// Error from the navigation core.
    #[error(transparent)]
    Core(#[from] MazeError),

    /// Reading commands or writing responses failed.
    #[error("Protocol IO error: {0}")]
    Io(#[from] io::Error),
}

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Map file to load on startup.
    pub map_path: Option<PathBuf>,
    /// Built-in map to load on startup when no file is given.
    pub preset: Option<String>,
    /// How oracle text is validated when a `run` command sets no policy.
    pub policy: CommandPolicy,
    /// Output state after every command that moves the robot.
    pub auto_state_output: bool,
}

/// Headless runner for externally controlled navigation.
#[derive(Debug, Default)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    map_name: Option<String>,
    session: Option<Session>,
}

impl HeadlessRunner {
    /// Create a runner with default config and no map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner and load the configured startup map, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the startup map cannot be loaded.
    pub fn with_config(config: HeadlessConfig) -> Result<Self, HeadlessError> {
        let mut runner = Self {
            config,
            map_name: None,
            session: None,
        };
        if let Some(path) = runner.config.map_path.clone() {
            runner.load(MapDescription::load(path)?)?;
        } else if let Some(name) = runner.config.preset.clone() {
            runner.load_preset(&name)?;
        }
        Ok(runner)
    }

    /// Name of the loaded map.
    pub fn map_name(&self) -> Option<&str> {
        self.map_name.as_deref()
    }

    /// The active session, if a map is loaded.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Run the protocol loop until `quit` or end of input.
    ///
    /// Reads JSON commands from `input`, writes responses to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading or writing fails; malformed or
    /// failing commands are reported on `output` and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), HeadlessError> {
        write_response(&mut output, &Response::ready(self.map_name.clone()))?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let cmd = match Command::from_json(line) {
                Ok(cmd) => cmd,
                Err(e) => {
                    tracing::debug!(%line, "Rejected protocol line");
                    write_response(&mut output, &Response::error(format!("Parse error: {e}"), None))?;
                    continue;
                }
            };

            let quit = matches!(cmd, Command::Quit);
            for response in self.handle(cmd) {
                write_response(&mut output, &response)?;
            }
            if quit {
                tracing::info!("Quit requested");
                return Ok(());
            }
        }

        tracing::info!("Input closed");
        Ok(())
    }

    /// Handle one command and return the responses to send.
    ///
    /// Failures become a single `error` response naming the command.
    pub fn handle(&mut self, cmd: Command) -> Vec<Response> {
        let name = cmd.name();
        tracing::debug!(cmd = name, "Handling command");
        let moves = matches!(
            cmd,
            Command::Step { .. } | Command::Run { .. } | Command::Autoplay | Command::Reset
        );

        match self.dispatch(cmd) {
            Ok(mut responses) => {
                if moves && self.config.auto_state_output {
                    if let Some(state) = self.state() {
                        responses.push(state);
                    }
                }
                responses
            }
            Err(e) => {
                tracing::debug!(cmd = name, error = %e, "Command failed");
                vec![Response::error(e.to_string(), Some(name))]
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Response>, HeadlessError> {
        let name = cmd.name();
        match cmd {
            Command::LoadMap { path } => {
                self.load(MapDescription::load(path)?)?;
                Ok(vec![Response::ack(name)])
            }
            Command::LoadPreset { name: preset } => {
                self.load_preset(&preset)?;
                Ok(vec![Response::ack(name)])
            }
            Command::Solve => Ok(vec![match self.plan()? {
                Some(path) => Response::Path {
                    commands: path.to_string(),
                    length: path.len(),
                },
                None => Response::NoPath,
            }]),
            Command::Step { direction } => {
                let session = self.session_mut()?;
                let record = session.step(direction)?;
                Ok(vec![Response::Steps {
                    records: vec![record],
                    status: session.status(),
                }])
            }
            Command::Run { commands, policy } => {
                let path = parse_commands(&commands, policy.unwrap_or(self.config.policy))?;
                self.execute(&path)
            }
            Command::Autoplay => match self.plan()? {
                Some(path) => self.execute(&path),
                None => Ok(vec![Response::NoPath]),
            },
            Command::Reset => {
                self.session_mut()?.reset();
                Ok(vec![Response::ack(name)])
            }
            Command::Query => Ok(vec![self.state().ok_or(HeadlessError::NoMapLoaded)?]),
            Command::Quit => Ok(vec![Response::Bye]),
        }
    }

    fn load(&mut self, map: MapDescription) -> Result<(), HeadlessError> {
        let grid = map.to_grid()?;
        tracing::info!(map = %map.name, width = grid.width(), height = grid.height(), "Map loaded");
        self.map_name = Some(map.name);
        self.session = Some(Session::new(grid));
        Ok(())
    }

    fn load_preset(&mut self, name: &str) -> Result<(), HeadlessError> {
        let map = MapDescription::preset(name)
            .ok_or_else(|| HeadlessError::UnknownPreset(name.to_string()))?;
        self.load(map)
    }

    fn session_mut(&mut self) -> Result<&mut Session, HeadlessError> {
        self.session.as_mut().ok_or(HeadlessError::NoMapLoaded)
    }

    /// Route from the current position to the primary goal.
    fn plan(&self) -> Result<Option<Path>, HeadlessError> {
        let session = self.session.as_ref().ok_or(HeadlessError::NoMapLoaded)?;
        let grid = session.grid();
        Ok(find_path(grid, session.position(), grid.goal())?)
    }

    fn execute(&mut self, path: &Path) -> Result<Vec<Response>, HeadlessError> {
        let session = self.session_mut()?;
        let records = session.run(path)?;
        Ok(vec![Response::Steps {
            records,
            status: session.status(),
        }])
    }

    fn state(&self) -> Option<Response> {
        self.session.as_ref().map(|session| Response::State {
            position: session.position(),
            status: session.status(),
            history_len: session.history().len(),
        })
    }
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()
}
