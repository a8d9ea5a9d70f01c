mod progress;
mod selector;
mod service;
mod shuffle;
mod timer;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::{SelectionError, SessionError};
pub use progress::{MapEntry, SessionProgress};
pub use selector::{Selector, parse_count, sample_without_replacement};
pub use service::{Advance, QuizSession, SessionPhase};
pub use shuffle::{ShuffledOption, shuffle_options};
pub use timer::{SessionTimer, TICK_PERIOD};
pub use view::{OptionView, QuestionView};
pub use workflow::{AdvanceOutcome, ExamStart, QuizLoopService};
