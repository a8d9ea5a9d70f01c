mod command;
mod terminal;

pub use command::{Command, CommandError, HELP};
pub use terminal::{ExamRequest, TerminalPresenter};
