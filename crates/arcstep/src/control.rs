use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/sickleave.sock";

/// One line of the control socket protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    SetDaysLeft(u32),
    SetTotalDays(u32),
    Replay,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' expects a day count")]
    MissingArgument(&'static str),
    #[error("Invalid day count '{0}'")]
    InvalidCount(String),
    #[error("Unexpected trailing input '{0}'")]
    Trailing(String),
}

impl ControlCommand {
    fn keyword(&self) -> &'static str {
        match self {
            Self::SetDaysLeft(_) => "left",
            Self::SetTotalDays(_) => "total",
            Self::Replay => "replay",
        }
    }
}

impl FromStr for ControlCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().ok_or(ParseCommandError::Empty)?;

        let mut count = |name: &'static str| -> Result<u32, ParseCommandError> {
            let arg = words.next().ok_or(ParseCommandError::MissingArgument(name))?;
            arg.parse()
                .map_err(|_| ParseCommandError::InvalidCount(arg.to_string()))
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "left" => Self::SetDaysLeft(count("left")?),
            "total" => Self::SetTotalDays(count("total")?),
            "replay" => Self::Replay,
            _ => return Err(ParseCommandError::Unknown(keyword.to_string())),
        };

        let rest: Vec<_> = words.collect();
        if !rest.is_empty() {
            return Err(ParseCommandError::Trailing(rest.join(" ")));
        }
        Ok(command)
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetDaysLeft(n) | Self::SetTotalDays(n) => write!(f, "{} {}", self.keyword(), n),
            Self::Replay => f.write_str(self.keyword()),
        }
    }
}
