//! loanbook - Book Loan Tracker
//!
//! A terminal application for recording which student borrowed which book,
//! when it is due back, and whether it has been returned. Every change is
//! written straight through to a local JSON file.

use std::io;
use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use loanbook::application::{App, AppMode};
use loanbook::infrastructure::{init_logging, AppConfig, FileStore, PersistenceBridge};
use loanbook::presentation::{render_ui, InputHandler};

/// Entry point: loads configuration and the persisted loans, then runs the
/// terminal UI until the user quits.
///
/// # Errors
///
/// Fails before the UI starts if logging cannot be set up or the loan file
/// cannot be read, and afterwards on terminal I/O errors.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let _log_guard = init_logging(&config)?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting loanbook");

    let persistence = PersistenceBridge::new(FileStore::new(&config.data_dir));
    let mut app = App::start(persistence, config.corruption_policy)
        .inspect_err(|err| tracing::error!(error = %err, "could not load loan records"))
        .with_context(|| {
            format!(
                "could not load loans from {} (set LOANBOOK_RESET_ON_CORRUPT=true to start empty)",
                config.data_dir.display()
            )
        })?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "terminal loop failed");
    }
    tracing::info!("loanbook stopped");
    res.map_err(Into::into)
}

/// Draws the UI and dispatches key presses until 'q' is pressed in the table view.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
