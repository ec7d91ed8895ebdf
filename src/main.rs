//! # Taskkeep
//!
//! A terminal task tracker with personal accounts. Users register or log in
//! with a username and password (stored as a bcrypt hash), then add, view,
//! edit and complete their own tasks. Everything is kept in three JSON files.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu (default)
//! taskkeep
//!
//! # Dashboard
//! taskkeep ui
//!
//! # Spanish prompts, custom data directory (without --lang the language is asked first)
//! taskkeep --lang es --data-dir ./data
//! ```
//!
//! ### Menu commands
//! *   `add`: Add a new task (name, description, priority, category)
//! *   `view`: List tasks sorted by priority, due date, category, status or creation date
//! *   `edit`: Change one field of a task
//! *   `delete`: Move a task to the completed list
//! *   `completed`: List completed tasks
//! *   `help`, `exit`
//!
//! ## Data Storage
//!
//! `users.json`, `ongoing.json` and `completed.json` live in your local data directory:
//! *   Linux: `~/.local/share/taskkeep/`
//! *   macOS: `~/Library/Application Support/taskkeep/`
//! *   Windows: `%APPDATA%\taskkeep\`
//!
//! You can override this with `--data-dir` or the `TASKKEEP_DATA_DIR` environment variable.
//! Diagnostics go to `taskkeep.log` in the same directory (`RUST_LOG` overrides `--log-level`).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell as CompletionShell};

use taskkeep::auth::CredentialStore;
use taskkeep::commands::Shell;
use taskkeep::config::{ensure_data_dir, init_logging, Config, DATA_DIR_ENV};
use taskkeep::i18n::Language;
use taskkeep::lifecycle::Session;
use taskkeep::storage::JsonFileStorage;
use taskkeep::store::TaskStore;
use taskkeep::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskkeep")]
#[command(about = "Personal terminal task tracker", long_about = None)]
struct Cli {
    /// Directory holding users.json, ongoing.json and completed.json
    #[arg(long, env = DATA_DIR_ENV, global = true)]
    data_dir: Option<PathBuf>,
    /// Language for prompts and messages; asked at startup when omitted
    #[arg(long, value_enum, global = true)]
    lang: Option<Language>,
    /// Log filter written to taskkeep.log
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Shell,
    /// Log in, then open the interactive dashboard
    Ui,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell_enum = match shell.as_str() {
            "bash" => CompletionShell::Bash,
            "zsh" => CompletionShell::Zsh,
            "fish" => CompletionShell::Fish,
            "powershell" => CompletionShell::PowerShell,
            "elvish" => CompletionShell::Elvish,
            _ => {
                eprintln!("Unsupported shell: {}", shell);
                return ExitCode::FAILURE;
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "taskkeep", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::new(cli.data_dir, cli.lang.unwrap_or_default(), cli.log_level);
    if let Err(e) = ensure_data_dir(&config.data_dir) {
        eprintln!("Cannot create data directory {}: {}", config.data_dir.display(), e);
        return ExitCode::FAILURE;
    }
    let _guard = init_logging(&config);
    tracing::info!(data_dir = %config.data_dir.display(), "taskkeep starting");

    match run(&config, cli.lang.is_none(), cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, ask_language: bool, command: Option<Commands>) -> anyhow::Result<()> {
    let storage = JsonFileStorage::new(&config.data_dir);
    let credentials = CredentialStore::new(&storage);
    let tasks = TaskStore::new(&storage);

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), config.language, &credentials, &tasks);
    if ask_language && shell.select_language()?.is_none() {
        return Ok(());
    }
    if !shell.confirm_start()? {
        return Ok(());
    }
    let Some(user) = shell.authenticate()? else {
        return Ok(());
    };
    let language = shell.lang();

    match command {
        Some(Commands::Ui) => {
            drop(shell);
            run_tui(Session::new(user, &tasks), language)
                .map_err(|e| anyhow::anyhow!("dashboard failed: {}", e))?;
        }
        _ => shell.run(user)?,
    }
    tracing::info!("taskkeep exiting");
    Ok(())
}
