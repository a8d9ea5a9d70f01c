use std::str::FromStr;
use thiserror::Error;

/// One line of user input during an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Choose the option at a 1-based display slot.
    Answer(usize),
    Next,
    Previous,
    /// Jump to a 0-based position.
    Jump(usize),
    Restart,
    Quit,
    Help,
    Redraw,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandError {
    #[error("unknown command \"{0}\", type h for help")]
    Unknown(String),
    #[error("g needs a question number, e.g. g 3")]
    MissingTarget,
    #[error("\"{0}\" is not a question number")]
    InvalidTarget(String),
}

pub const HELP: &str = "\
  <number>  choose that option
  n         next question (finishes on the last one)
  p         previous question
  g <k>     go to question k
  r         restart
  q         quit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.is_empty() {
            return Ok(Self::Redraw);
        }
        if let Ok(slot) = line.parse::<usize>() {
            return Ok(Self::Answer(slot));
        }

        let mut parts = line.split_whitespace();
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        match head.as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "r" | "restart" => Ok(Self::Restart),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "h" | "help" | "?" => Ok(Self::Help),
            "g" | "go" | "goto" => {
                let target = parts.next().ok_or(CommandError::MissingTarget)?;
                match target.parse::<usize>() {
                    Ok(k) if k > 0 => Ok(Self::Jump(k - 1)),
                    _ => Err(CommandError::InvalidTarget(target.to_string())),
                }
            }
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}
