use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use taskdeck::cli::{run_add, run_list};
use taskdeck::config::AppConfig;
use taskdeck::ui::TaskUi;
use taskdeck::view::StatusFilter;
use taskdeck::AppContext;

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Terminal task list client for a hosted task table",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Remote store root URL, e.g. https://xyzcompany.supabase.co
    #[arg(long, env = "TASKDECK_BASE_URL")]
    base_url: Option<String>,

    /// API key for the remote store
    #[arg(long, env = "TASKDECK_API_KEY")]
    api_key: Option<String>,

    /// Data directory for config.toml and the TUI log file
    #[arg(long, env = "TASKDECK_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Explicit config file path (default: {data_dir}/config.toml)
    #[arg(long, env = "TASKDECK_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKDECK_LOG")]
    log: Option<String>,

    /// Log file path (default: {data_dir}/logs/taskdeck.log in the TUI,
    /// stderr for subcommands)
    #[arg(long, env = "TASKDECK_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Suppress progress and informational output.
    ///
    /// Errors are still printed to stderr. JSON output (--json flags) is
    /// unaffected. Use this flag when piping output to other tools.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive task list (default when no subcommand given).
    Ui,
    /// Print tasks to stdout.
    ///
    /// Examples:
    ///   taskdeck list
    ///   taskdeck list --status pending --json
    List {
        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Only tasks with this status (pending | completed)
        #[arg(long, value_parser = parse_status)]
        status: Option<StatusFilter>,
    },
    /// Create one task and exit.
    ///
    /// Examples:
    ///   taskdeck add "Write report"
    ///   taskdeck add "Buy milk" --description "from the corner shop"
    Add {
        title: String,
        #[arg(long, short = 'd')]
        description: Option<String>,
    },
}

fn parse_status(s: &str) -> Result<StatusFilter, String> {
    match s {
        "pending" => Ok(StatusFilter::Pending),
        "completed" => Ok(StatusFilter::Completed),
        "all" => Ok(StatusFilter::All),
        other => Err(format!("unknown status: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();

    let config = AppConfig::new(args.base_url, args.api_key, args.data_dir, args.config)
        .context("invalid configuration")?;

    match args.command {
        Some(Command::List { json, status }) => {
            let _file_guard = setup_logging(&log_level, args.log_file.as_deref());
            let ctx = AppContext::new(config)?;
            run_list(&ctx.store, status.unwrap_or_default(), json, args.quiet).await
        }
        Some(Command::Add { title, description }) => {
            let _file_guard = setup_logging(&log_level, args.log_file.as_deref());
            let ctx = AppContext::new(config)?;
            run_add(&ctx.store, &title, description.as_deref(), args.quiet).await
        }
        None | Some(Command::Ui) => {
            // Log to a rolling file — stdout belongs to the alternate screen.
            let log_path = args
                .log_file
                .unwrap_or_else(|| config.data_dir.join("logs").join("taskdeck.log"));
            let _file_guard = setup_logging(&log_level, Some(&log_path));
            let ctx = AppContext::new(config)?;
            TaskUi::new(ctx.store.clone())
                .run()
                .await
                .context("terminal UI failed")
        }
    }
}

/// Initialize the tracing subscriber.
/// With a `log_file`, logs go to a daily-rolling file at that path (the TUI
/// default; opt-in for subcommands via --log-file); otherwise they go to
/// stderr. Returns a guard that must stay alive for the process lifetime
/// when file logging is active.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    if let Some(path) = log_file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("taskdeck.log"));
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stderr — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stderr",
                dir.display()
            );
        } else {
            let appender = tracing_appender::rolling::daily(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(log_level))
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .compact()
        .init();
    None
}
