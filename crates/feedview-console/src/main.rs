//! feedview binary.
//!
//! Usage:
//!   feedview [--config PATH] [--endpoint URL] [--token-env VAR] [console]
//!   feedview dump [--view all|user|sentence|waitlist] [--desc] [--expand-all] [--json]

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use feedview_console::{
    config::{AppConfig, CliOverrides, FileConfig},
    dump::{dump_view, render_json, render_text, DumpOptions},
    run_console, Tab,
};
use feedview_network::{SnapshotClient, SnapshotSource};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "feedview",
    version,
    about = "Read-only dashboard for the vocabulary feedback log and beta waitlist"
)]
struct Cli {
    /// Path to the TOML config file (default: <config dir>/feedview/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend endpoint URL; overrides FEEDVIEW_ENDPOINT and the config file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Environment variable holding the bearer token.
    #[arg(long, global = true)]
    token_env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal dashboard (default).
    Console,
    /// Fetch once and print a view to stdout.
    Dump {
        #[arg(long, value_enum, default_value_t = ViewArg::All)]
        view: ViewArg,
        /// Newest first.
        #[arg(long)]
        desc: bool,
        /// Expand every sentence group.
        #[arg(long)]
        expand_all: bool,
        /// Emit JSON instead of tab-separated text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewArg {
    All,
    User,
    Sentence,
    Waitlist,
}

impl From<ViewArg> for Tab {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::All => Tab::All,
            ViewArg::User => Tab::ByUser,
            ViewArg::Sentence => Tab::BySentence,
            ViewArg::Waitlist => Tab::Waitlist,
        }
    }
}

enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

fn init_logging(target: LogTarget) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = FileConfig::load(cli.config.as_deref())?;
    let overrides = CliOverrides {
        endpoint: cli.endpoint.clone(),
        token_env: cli.token_env.clone(),
    };
    let config = AppConfig::resolve(file, &overrides)?;

    let command = cli.command.unwrap_or(Command::Console);
    init_logging(match (&command, &config.console.log_file) {
        (Command::Dump { .. }, _) => LogTarget::Stderr,
        (Command::Console, Some(path)) => LogTarget::File(path.clone()),
        (Command::Console, None) => LogTarget::Discard,
    })?;

    let client = SnapshotClient::new(
        &config.source.endpoint,
        config.source.token.clone(),
        config.source.timeout,
    )?;
    tracing::info!(endpoint = client.endpoint(), "feedview starting");

    match command {
        Command::Console => {
            let source: Arc<dyn SnapshotSource> = Arc::new(client);
            run_console(config, source).await
        }
        Command::Dump {
            view,
            desc,
            expand_all,
            json,
        } => {
            let opts = DumpOptions {
                tab: view.into(),
                descending: desc,
                expand_all,
            };
            let vm = dump_view(&client, &config.display, opts)
                .await
                .context("fetching snapshot")?;
            let out = if json {
                render_json(&vm)?
            } else {
                render_text(&vm)
            };
            print!("{out}");
            Ok(())
        }
    }
}
