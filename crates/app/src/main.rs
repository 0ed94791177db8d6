use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use exam_core::Clock;
use exam_core::model::ClientSettingsDraft;
use services::AppServices;

mod review;

const DEFAULT_DB_URL: &str = "sqlite://exam-review.sqlite3";
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_ANSWER_TIMEOUT_MS: u64 = 5_000;

#[derive(Parser, Debug)]
#[command(
    name = "exam-review",
    version,
    about = "Review exam questions you previously got wrong"
)]
struct Cli {
    /// SQLite database URL or file path
    #[arg(long = "db", env = "EXAM_DB_URL", default_value = DEFAULT_DB_URL, global = true)]
    db_url: String,

    /// Base URL of the exam backend API
    #[arg(
        long = "api",
        env = "EXAM_API_BASE_URL",
        default_value = DEFAULT_API_BASE_URL,
        global = true
    )]
    api_base_url: String,

    /// How long to wait for the backend's verdict before judging locally
    #[arg(
        long,
        env = "EXAM_ANSWER_TIMEOUT_MS",
        default_value_t = DEFAULT_ANSWER_TIMEOUT_MS,
        global = true
    )]
    answer_timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Work through the review queue (default)
    Review,
    /// Show totals and accuracy from local history
    Stats,
    /// List questions whose latest local answer was wrong
    Mistakes,
    /// Print every locally recorded answer, oldest first
    History,
    /// Print the anonymous learner id
    Whoami,
    /// Forget local answer history; the learner id is kept
    Reset,
}

fn normalize_sqlite_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return Ok(trimmed.to_string());
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        bail!("invalid --db value: {raw:?}");
    }

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    let mut url = format!("sqlite://{}", absolute.display());
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    Ok(url)
}

/// Make sure the database file and its directory exist before connecting.
fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let db_url = normalize_sqlite_url(&cli.db_url)?;
    let settings = ClientSettingsDraft {
        api_base_url: Some(cli.api_base_url),
        answer_timeout_ms: Some(cli.answer_timeout_ms),
        request_timeout_ms: None,
    }
    .validate()
    .context("invalid backend settings")?;

    prepare_sqlite_file(&db_url)?;
    info!(db = %db_url, api = settings.api_base(), "starting");
    let services = AppServices::new_sqlite(&db_url, settings, Clock::system())
        .await
        .with_context(|| format!("failed to open {db_url}"))?;

    match cli.command.unwrap_or(Commands::Review) {
        Commands::Review => review::run(&services).await,
        Commands::Stats => {
            let stats = services.progress().stats().await;
            println!("Answered:  {}", stats.total_answered);
            println!("Correct:   {}", stats.correct_count);
            println!("Incorrect: {}", stats.incorrect_count);
            println!("Accuracy:  {}%", stats.accuracy_percent());
            Ok(())
        }
        Commands::Mistakes => {
            let ids = services.progress().incorrect_question_ids().await;
            if ids.is_empty() {
                println!("No outstanding mistakes.");
            }
            for id in ids {
                println!("{id}");
            }
            Ok(())
        }
        Commands::History => {
            let records = services.progress().records().await;
            if records.is_empty() {
                println!("No answers recorded yet.");
            }
            for record in records {
                let outcome = if record.is_correct { "correct" } else { "wrong" };
                match record.answered_at {
                    Some(at) => println!("{}  {outcome:<7}  {}", at.to_rfc3339(), record.question_id),
                    None => println!("{:<25}  {outcome:<7}  {}", "-", record.question_id),
                }
            }
            Ok(())
        }
        Commands::Whoami => {
            println!("{}", services.identity().get_or_create_user_id().await);
            Ok(())
        }
        Commands::Reset => {
            services.progress().clear().await;
            println!("Local answer history cleared.");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("Error: {err:#}");
        process::exit(2);
    }
}
