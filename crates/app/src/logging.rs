//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Workspace crates whose level follows `-v`/`-q`; dependencies stay at `warn`.
const CRATES: [&str; 5] = ["quiz", "quiz_core", "storage", "services", "ui"];

/// Map `-v`/`-q` to a level name.
#[must_use]
pub fn level_name(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr so stdout stays with the presenter.
///
/// `RUST_LOG` overrides the flags when set.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_name(verbose, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
