use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use grebase::app::chooser::PromptRefChooser;
use grebase::app::config::Config;
use grebase::app::features::rebase::handler::{describe_outcome, error_chain};
use grebase::app::features::rebase::Services;
use grebase::app::{r#loop::run_loop, state::AppState};
use grebase::domain::error::RebaseError;
use grebase::domain::menu::MenuAction;
use grebase::domain::models::Repository;
use grebase::domain::vcs::RefChooser;
use grebase::infrastructure::git::GitAdapter;
use grebase::infrastructure::sequence_editor::{
    editor_command, run_helper, HelperOutcome, SequenceEditorBridge, HANDOFF_ENV,
};
use grebase::logging;
use grebase::rebase::{Outcome, RebaseOrchestrator, RefTarget};

#[derive(Parser)]
#[command(name = "grebase", version, about = "Rebase menus for git")]
struct Cli {
    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rebase menu for the repository's current state
    Menu,
    /// Rebase the current branch onto REF
    Onto {
        #[arg(value_name = "REF")]
        target: String,
    },
    /// Continue the rebase in progress
    Continue,
    /// Skip the current commit of the rebase in progress
    Skip,
    /// Abort the rebase in progress
    Abort,
    /// Runs as git's sequence editor and hands the todo to the UI
    #[command(hide = true)]
    SequenceEditor { file: PathBuf },
}

/// Used outside the TUI, where nobody can answer a ref prompt.
struct NoPromptChooser;

#[async_trait]
impl RefChooser for NoPromptChooser {
    async fn choose_ref(&self, _repo: &Repository, prompt: &str) -> Result<Option<String>> {
        warn!(%prompt, "Ref prompt requested without a UI; cancelling");
        Ok(None)
    }
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("grebase: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = match logging::init(&config.log.level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {e}");
            None
        }
    };

    let result = match cli.command {
        Some(Commands::SequenceEditor { file }) => run_sequence_editor(file).await,
        command => run(cli.repo, command, &config).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "grebase failed");
            eprintln!("grebase: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_sequence_editor(file: PathBuf) -> Result<ExitCode> {
    let handoff = std::env::var_os(HANDOFF_ENV)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{HANDOFF_ENV} is not set; this command is run by git"))?;
    match run_helper(&file, &handoff).await? {
        HelperOutcome::Saved => Ok(ExitCode::SUCCESS),
        // Non-zero tells git the edit was abandoned
        HelperOutcome::Aborted => Ok(ExitCode::FAILURE),
    }
}

async fn run(path: Option<PathBuf>, command: Option<Commands>, config: &Config) -> Result<ExitCode> {
    // Resolve the repository BEFORE terminal setup so a failure here
    // doesn't leave the terminal in raw mode.
    let adapter = GitAdapter::new(config.git_binary.clone());
    let version = adapter.check_version().await?;
    let path = match path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let repo = adapter.discover(&path).await?;
    info!(repo = %repo.root().display(), %version, "Starting grebase");

    let Some(command) = command else {
        return run_tui(adapter, repo, config).await;
    };

    let orchestrator = cli_orchestrator(adapter, config);
    let (action, result) = match command {
        Commands::Menu => return print_menu(&orchestrator, &repo).await,
        Commands::Onto { target } => (
            MenuAction::OntoElsewhere,
            orchestrator
                .rebase_onto(&repo, RefTarget::Direct(target))
                .await,
        ),
        Commands::Continue => run_action(&orchestrator, &repo, MenuAction::Continue).await,
        Commands::Skip => run_action(&orchestrator, &repo, MenuAction::Skip).await,
        Commands::Abort => run_action(&orchestrator, &repo, MenuAction::Abort).await,
        Commands::SequenceEditor { .. } => {
            return Err(anyhow!("sequence-editor is only run by git"));
        }
    };

    match result {
        Ok(outcome) => {
            println!("{}", describe_outcome(&action, &outcome));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", error_chain(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_action(
    orchestrator: &RebaseOrchestrator,
    repo: &Repository,
    action: MenuAction,
) -> (MenuAction, Result<Outcome, RebaseError>) {
    let result = orchestrator.execute(repo, &action).await;
    (action, result)
}

fn cli_orchestrator(adapter: GitAdapter, config: &Config) -> RebaseOrchestrator {
    let adapter = Arc::new(adapter);
    RebaseOrchestrator::new(
        adapter.clone(),
        adapter,
        Arc::new(NoPromptChooser),
        Arc::new(SequenceEditorBridge::default()),
        config.rebase_settings(),
    )
}

async fn print_menu(orchestrator: &RebaseOrchestrator, repo: &Repository) -> Result<ExitCode> {
    let menu = orchestrator.present_menu(repo).await?;
    println!("{}", menu.title);
    for item in &menu.items {
        println!("  {}  {}", item.key, item.description);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_tui(adapter: GitAdapter, repo: Repository, config: &Config) -> Result<ExitCode> {
    let exe = std::env::current_exe().context("Failed to locate the grebase executable")?;
    let adapter = Arc::new(adapter.with_sequence_editor(editor_command(&exe)));

    let (action_tx, action_rx) = mpsc::channel(100);
    let chooser = Arc::new(PromptRefChooser::new(adapter.clone(), action_tx.clone()));
    let bridge = Arc::new(SequenceEditorBridge::default());
    let orchestrator = RebaseOrchestrator::new(
        adapter.clone(),
        adapter,
        chooser.clone(),
        bridge.clone(),
        config.rebase_settings(),
    );

    let repo_name = repo
        .root()
        .file_name()
        .map_or_else(|| repo.root().display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        });
    let services = Services {
        repo,
        orchestrator: Arc::new(orchestrator),
        chooser,
        bridge,
    };

    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_loop(
        &mut terminal,
        AppState::new(repo_name),
        services,
        action_tx,
        action_rx,
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map(|()| ExitCode::SUCCESS)
}
