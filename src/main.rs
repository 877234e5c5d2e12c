use clap::Parser;
use spend_tracker::args::{Args, Command};
use spend_tracker::entry::Entry;
use spend_tracker::{commands, Mode, Result, Session};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let home = common.spend_home().path();
    let json = common.json();

    // When SPEND_TRACKER_IN_TEST_MODE is set and non-empty the mode will be Mode::Test and an
    // in-memory sheet with sample data is used instead of Google.
    let mode = Mode::from_env();

    match args.command() {
        Command::Init(init_args) => {
            commands::init(home, common.sheet_name(), init_args.credentials())
                .await?
                .print(json)
        }
        Command::Dashboard => {
            let mut session = Session::open(home, common.sheet_name(), mode).await?;
            commands::dashboard(&mut session).await?.print(json)
        }
        Command::Analysis => {
            let mut session = Session::open(home, common.sheet_name(), mode).await?;
            commands::analysis(&mut session).await?.print(json)
        }
        Command::Add(add_args) => {
            let mut session = Session::open(home, common.sheet_name(), mode).await?;
            let entry = Entry::from_choices(
                add_args.date(),
                add_args.item(),
                add_args.amount(),
                add_args.r#type(),
                add_args.category(),
                add_args.notes(),
            );
            commands::add(&mut session, entry).await?.print(json)
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
