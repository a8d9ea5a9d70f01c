//! Command-line arguments for the quiz binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz runner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (default: ./quiz.toml when present).
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Take a quiz in the terminal.
    Run(RunArgs),

    /// Print bank totals and categories.
    Info(BankArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct BankArgs {
    /// Question bank: a JSON file path or an http(s) URL.
    #[arg(long, env = "QUIZ_BANK", value_name = "PATH|URL")]
    pub bank: Option<String>,

    /// Reject banks where a question does not have exactly one correct option.
    #[arg(long)]
    pub strict_answer_key: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub bank: BankArgs,

    /// Number of questions (prompted when omitted).
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Restrict questions to one category ("all" for the whole bank).
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Ideal time budget per question.
    #[arg(long, env = "QUIZ_SECONDS_PER_QUESTION", value_name = "SECS")]
    pub seconds_per_question: Option<u32>,

    /// Width of the on-pace band around the ideal time.
    #[arg(long, env = "QUIZ_TOLERANCE_SECS", value_name = "SECS")]
    pub tolerance: Option<u32>,

    /// Seed for question selection and option shuffling.
    #[arg(long, env = "QUIZ_SEED")]
    pub seed: Option<u64>,
}

impl RunArgs {
    #[must_use]
    pub fn from_bank(bank: BankArgs) -> Self {
        Self {
            bank,
            ..Self::default()
        }
    }
}
