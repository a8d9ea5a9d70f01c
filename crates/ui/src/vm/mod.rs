mod exam_vm;
mod results_vm;
mod time_fmt;

pub use exam_vm::{BankSummaryVm, ExamVm, OptionLineVm, format_map};
pub use results_vm::{NOT_DEFINED, ReviewItemVm, ResultsVm, UNANSWERED};
pub use time_fmt::{format_clock, format_duration, format_ideal_minutes};
