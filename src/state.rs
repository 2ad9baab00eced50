use crate::catalog::CommandCatalog;
use crate::error::ClientError;
use crate::protocol::TurnResponse;

pub const START_FAILED: &str = "Could not start the game. Is the server running?";
pub const TURN_FAILED: &str = "Something went wrong talking to the server. Try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    Finished,
}

/// Snapshot of everything the screens render. The network thread publishes a
/// new one after every request; transitions never mutate in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub title: Option<String>,
    pub phase: Phase,
    pub output: String,
    pub error: Option<&'static str>,
    pub in_flight: bool,
    pub catalog: CommandCatalog,
}

impl Default for State {
    fn default() -> Self {
        Self {
            title: None,
            phase: Phase::NotStarted,
            output: String::new(),
            error: None,
            in_flight: false,
            catalog: CommandCatalog::development(),
        }
    }
}

impl State {
    pub fn with_title(&self, title: String) -> Self {
        Self {
            title: Some(title),
            ..self.clone()
        }
    }

    /// A new request clears the last error so the status line can show the
    /// request is pending.
    pub fn waiting(&self) -> Self {
        Self {
            in_flight: true,
            error: None,
            ..self.clone()
        }
    }

    pub fn after_start(&self, result: &Result<TurnResponse, ClientError>) -> Self {
        match result {
            Ok(resp) => self.accept(resp),
            Err(_) => Self {
                in_flight: false,
                error: Some(START_FAILED),
                ..self.clone()
            },
        }
    }

    /// Failed turns keep whatever output was already on screen.
    pub fn after_turn(&self, result: &Result<TurnResponse, ClientError>) -> Self {
        match result {
            Ok(resp) => self.accept(resp),
            Err(_) => Self {
                in_flight: false,
                error: Some(TURN_FAILED),
                ..self.clone()
            },
        }
    }

    pub fn with_command_options(&self, command: &str, args: Vec<String>) -> Self {
        let mut next = self.clone();
        next.in_flight = false;
        if !next.catalog.set_args(command, args) {
            tracing::warn!("server sent options for unknown command {}", command);
        }
        next
    }

    pub fn idle(&self) -> Self {
        Self {
            in_flight: false,
            ..self.clone()
        }
    }

    fn accept(&self, resp: &TurnResponse) -> Self {
        let phase = if resp.game_over {
            Phase::Finished
        } else if self.phase == Phase::NotStarted {
            Phase::Playing
        } else {
            self.phase
        };
        Self {
            phase,
            output: resp.message.clone(),
            error: None,
            in_flight: false,
            ..self.clone()
        }
    }
}
