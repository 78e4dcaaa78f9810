//! Commands accepted by the interactive session.

use std::{path::PathBuf, str::FromStr};

use thiserror::Error;

pub const HELP: &str = "\
commands:
  upload <path>          select a study with the file picker
  drag                   hover a file over the drop zone
  leave                  move the file away from the drop zone
  drop <path> [path...]  drop files onto the drop zone (first one is used)
  reset                  load another study
  show                   render the current view
  help                   show this help
  quit                   leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Upload(PathBuf),
    DragOver,
    DragLeave,
    Drop(Vec<PathBuf>),
    Reset,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("`{0}` needs a file path")]
    MissingPath(&'static str),
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "upload" | "select" | "open" => {
                if rest.is_empty() {
                    Err(CommandParseError::MissingPath("upload"))
                } else {
                    Ok(Self::Upload(PathBuf::from(rest)))
                }
            }
            "drag" => Ok(Self::DragOver),
            "leave" => Ok(Self::DragLeave),
            "drop" => Ok(Self::Drop(
                rest.split_whitespace().map(PathBuf::from).collect(),
            )),
            "reset" | "back" => Ok(Self::Reset),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}
