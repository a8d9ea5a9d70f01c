#![forbid(unsafe_code)]

pub mod bank_service;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use bank_service::QuestionBankService;
pub use error::{BankError, QuizError, SelectionError, SessionError};

pub use sessions::{
    Advance, AdvanceOutcome, ExamStart, MapEntry, OptionView, QuestionView, QuizLoopService,
    QuizSession, Selector, SessionPhase, SessionProgress, SessionTimer, ShuffledOption,
    parse_count, sample_without_replacement, shuffle_options,
};
