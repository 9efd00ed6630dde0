//! fueldb - terminal dialogs for a fuel purchase log
//!
//! Built with Ratatui and crossterm.

mod app;
mod config;
mod handlers;
mod ui;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fueldb_core::{
    EntityDialog, Error, FileRepository, FileStore, FuelType, Mode, Outcome, Outlet, Purchase,
    RecordId, Repository, Vehicle,
};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;

/// Kind of record a dialog works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EntityKind {
    FuelType,
    Outlet,
    Vehicle,
    Purchase,
}

/// Create, edit or delete one record of a fuel log
#[derive(Parser, Debug)]
#[command(name = "fueldb")]
#[command(about = "Create, edit or delete one record of a fuel log")]
struct Args {
    /// Which kind of record to work on
    #[arg(value_enum)]
    entity: EntityKind,

    /// Store file; falls back to `database_path` from the config
    database: Option<PathBuf>,

    /// Edit the record with this id
    #[arg(short, long, value_name = "ID")]
    edit: Option<String>,

    /// Delete the record with this id
    #[arg(short, long, value_name = "ID")]
    delete: Option<String>,

    /// Config file to use instead of the default one
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // Write logs to stderr to not interfere with the TUI on stdout
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}

fn usage_error(kind: ErrorKind, message: &str) -> ! {
    Args::command().error(kind, message).exit()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mode = match Mode::from_flags(
        args.edit.as_deref().map(RecordId::from),
        args.delete.as_deref().map(RecordId::from),
    ) {
        Ok(mode) => mode,
        Err(Error::Usage(message)) => usage_error(ErrorKind::ArgumentConflict, &message),
        Err(e) => return Err(e.into()),
    };

    let config = Config::load(args.config.clone())?;
    init_logging(&config)?;

    let Some(database) = args.database.or(config.database_path) else {
        usage_error(
            ErrorKind::MissingRequiredArgument,
            "No database file was specified.",
        );
    };
    tracing::info!("Using store {}", database.display());

    let store = FileStore::open(&database)
        .with_context(|| format!("Failed to open store: {}", database.display()))?;

    match args.entity {
        EntityKind::FuelType => run::<FuelType>(store.repository(), mode),
        EntityKind::Outlet => run::<Outlet>(store.repository(), mode),
        EntityKind::Vehicle => run::<Vehicle>(store.repository(), mode),
        EntityKind::Purchase => run::<Purchase>(store.repository(), mode),
    }
}

/// Show one dialog for `E` and report what it did.
fn run<E: EntityDialog>(repository: FileRepository<E>, mode: Mode) -> Result<()> {
    // Opening fetches the record, so a bad id fails before the screen changes.
    let mut app = App::new(repository, mode, E::layout()?)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    if let Some(Outcome::Committed { action, id }) = app.outcome() {
        println!("{} {} {}", action.past_tense(), E::TYPE_NAME, id);
    }
    Ok(())
}

fn run_app<B, E, R>(terminal: &mut Terminal<B>, app: &mut App<E, R>) -> Result<()>
where
    B: Backend,
    E: EntityDialog,
    R: Repository<E>,
{
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}
