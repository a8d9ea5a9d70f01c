#![forbid(unsafe_code)]

pub mod error;
pub mod presenter;
pub mod vm;

pub use error::{PresenterError, user_message};
pub use presenter::{Command, CommandError, ExamRequest, TerminalPresenter};
