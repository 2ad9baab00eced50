use serde::{Deserialize, Serialize};

/// Command that asks the server to set up a game and return the introduction.
pub const START_COMMAND: &str = "start";

/// Body of `POST /GameResponse`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub command: String,
    pub args: Vec<String>,
}

impl TurnRequest {
    pub fn new(command: impl Into<String>, argument: Option<String>) -> Self {
        Self {
            command: command.into(),
            args: argument.into_iter().collect(),
        }
    }

    pub fn start() -> Self {
        Self::new(START_COMMAND, None)
    }

    /// Split a typed line on whitespace: first word is the command, the rest
    /// are arguments. Blank lines produce nothing.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        Some(Self {
            command: command.to_owned(),
            args: words.map(str::to_owned).collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub message: String,
    #[serde(default)]
    pub game_over: bool,
}

/// Body of `POST /CommandOptions`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandOptionsRequest<'a> {
    pub command: &'a str,
}
