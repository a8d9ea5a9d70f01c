mod cli;
mod config;
mod logging;

use clap::Parser;

use services::{Clock, QuestionBankService, QuizLoopService};
use storage::Storage;
use ui::vm::BankSummaryVm;
use ui::{ExamRequest, TerminalPresenter};

use crate::cli::{Cli, Command, RunArgs};
use crate::config::Settings;

async fn run_quiz(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::from_location(&settings.bank);
    let mut service = QuizLoopService::new(Clock::default_clock(), storage.questions)
        .with_answer_key_policy(settings.answer_key)
        .with_scoring_policy(settings.scoring);
    if let Some(seed) = settings.seed {
        service = service.with_seed(seed);
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let request = ExamRequest {
        count: settings.count,
        category: settings.category,
    };
    let mut presenter =
        TerminalPresenter::new(service, input, std::io::stdout()).with_request(request);
    presenter.run().await?;
    Ok(())
}

async fn show_info(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::from_location(&settings.bank);
    let banks = QuestionBankService::new(storage.questions).with_policy(settings.answer_key);
    let bank = banks.load().await?;

    let summary = BankSummaryVm::from(&bank);
    println!("Source: {}", banks.describe_source());
    println!("{}", summary.total_line);
    for category in &summary.categories {
        println!("  {category}");
    }
    let uncategorized = bank.questions().iter().filter(|q| q.category().is_none()).count();
    if uncategorized > 0 {
        println!("  (no category) ({uncategorized})");
    }
    let ambiguous = bank.ambiguous_answer_keys().count();
    if ambiguous > 0 {
        println!("{ambiguous} questions do not have exactly one correct option.");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // `.env` values become defaults for the `env = ...` flags below.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let file = config::load_file(cli.config.as_deref())?;
    match cli.command {
        Command::Run(args) => run_quiz(Settings::resolve(&args, file)?).await,
        Command::Info(args) => show_info(Settings::resolve(&RunArgs::from_bank(args), file)?).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
