mod answer_sheet;
mod bank;
mod ids;
mod question;

pub use ids::{AttemptId, QuestionId};

pub use answer_sheet::AnswerSheet;
pub use bank::{AnswerKeyPolicy, CategoryCount, CategoryFilter, QuestionBank, QuestionBankError};
pub use question::{Question, QuestionError, QuizOption};
