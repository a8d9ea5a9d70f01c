#![forbid(unsafe_code)]

pub mod http;
pub mod json;
pub mod repository;

pub use repository::{BankLocation, InMemoryQuestionSource, QuestionSource, Storage, StorageError};
