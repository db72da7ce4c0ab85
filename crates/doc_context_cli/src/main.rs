//! `doc-context` command line entry point.
//!
//! # Responsibility
//! - Parse flags, set up logging, settings and the HTTP store.
//! - Run one command or a line-driven session against the host API.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use doc_context_core::config::{API_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL};
use doc_context_core::{
    default_log_level, init_logging, Command, CommandDispatcher, HttpDocumentStore, Labels,
    LogTarget, Placement, PluginSettings, StoreConfig, TabSession,
};
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

mod action;
mod output;
mod session;

use action::{execute, Action};

#[derive(Parser)]
#[command(name = "doc-context")]
#[command(about = "Navigate the document hierarchy of a running note app", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the host API
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API token sent as `Authorization: Token <token>`
    #[arg(long, global = true, env = API_TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Settings JSON file (defaults apply when absent)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level filter (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files (stderr when omitted)
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show breadcrumb, parent, children and siblings
    Show(DocArgs),
    /// Show the heading outline
    Outline(DocArgs),
    /// Open the parent document
    Parent(DocArgs),
    /// Open the first child document
    Child(DocArgs),
    /// Open the previous sibling, wrapping to the last
    Prev(DocArgs),
    /// Open the next sibling, wrapping to the first
    Next(DocArgs),
    /// Create a document next to the active one
    #[command(name = "new-sibling")]
    NewSibling(CreateArgs),
    /// Create a document under the active one
    #[command(name = "new-child")]
    NewChild(CreateArgs),
    /// Read commands line by line from stdin
    Session(DocArgs),
}

#[derive(Args)]
struct DocArgs {
    /// Active document id
    #[arg(long = "doc", value_name = "ID")]
    doc: String,
}

#[derive(Args)]
struct CreateArgs {
    #[command(flatten)]
    target: DocArgs,

    /// Title of the new document
    title: String,
}

impl Commands {
    fn doc(&self) -> &str {
        match self {
            Self::Show(args)
            | Self::Outline(args)
            | Self::Parent(args)
            | Self::Child(args)
            | Self::Prev(args)
            | Self::Next(args)
            | Self::Session(args) => &args.doc,
            Self::NewSibling(args) | Self::NewChild(args) => &args.target.doc,
        }
    }

    /// Maps a one-shot subcommand to its action; `None` for `session`.
    fn action(&self) -> Option<Action> {
        Some(match self {
            Self::Show(_) => Action::Run(Command::ShowContext),
            Self::Outline(_) => Action::Outline,
            Self::Parent(_) => Action::Run(Command::GoToParent),
            Self::Child(_) => Action::Run(Command::GoToChild),
            Self::Prev(_) => Action::Run(Command::PreviousSibling),
            Self::Next(_) => Action::Run(Command::NextSibling),
            Self::NewSibling(args) => Action::Create(Placement::Sibling, args.title.clone()),
            Self::NewChild(args) => Action::Create(Placement::Child, args.title.clone()),
            Self::Session(_) => return None,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = setup_logging(&cli) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let target = match cli.log_dir.as_deref() {
        Some(dir) => LogTarget::directory(dir).map_err(|err| anyhow!(err))?,
        None => LogTarget::Stderr,
    };
    init_logging(level, target).map_err(|err| anyhow!(err))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = match cli.settings.as_deref() {
        Some(path) => PluginSettings::load(path)?,
        None => PluginSettings::default(),
    };
    let store = HttpDocumentStore::new(&StoreConfig::new(cli.api_url.clone(), cli.token.clone()))?;
    let mut dispatcher = CommandDispatcher::activate_with_store(store, settings)
        .await
        .with_context(|| format!("cannot reach host API at {}", cli.api_url))?;

    let session = TabSession::with_document(cli.command.doc());
    info!(
        "event=cli_start module=cli status=ok doc={} json={}",
        cli.command.doc(),
        cli.json
    );

    let Some(action) = cli.command.action() else {
        let mut stdout = std::io::stdout();
        session::run_session(
            &mut dispatcher,
            &session,
            tokio::io::BufReader::new(tokio::io::stdin()),
            &mut stdout,
            cli.json,
        )
        .await?;
        dispatcher.deactivate();
        return Ok(());
    };

    let result = execute(&mut dispatcher, &session, action).await;
    let notices = session.take_notices();
    let output = match result {
        Ok(output) => output,
        Err(err) => {
            for notice in &notices {
                eprintln!("ℹ️ {notice}");
            }
            return Err(err.into());
        }
    };
    let text =
        output::format_output(&output, &notices, &session.tabs(), cli.json, &Labels::default())?;
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{text}")?;
    if cli.json {
        writeln!(stdout)?;
    }
    dispatcher.deactivate();
    Ok(())
}
