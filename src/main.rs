//! Enquiry TUI - Terminal User Interface for a multi-step job application
//!
//! A Ratatui-based form with step validation, conditional fields, local
//! sign-in and drafts saved per user.

mod app;
mod config;
mod identity;
mod platform;
mod state;
mod storage;
mod submission;
mod ui;

use anyhow::{Context, Result};
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use identity::LocalIdentityProvider;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::{DraftStore, FileStore, KeyValueStore, MemoryStore};
use submission::SimulatedSubmission;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log file written inside the data directory
const LOG_FILE_NAME: &str = "enquiry-tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    let ephemeral = std::env::args().skip(1).any(|arg| arg == "--ephemeral");

    let config = TuiConfig::load()?;
    let data_dir = config.data_dir()?;
    init_logging(&config, &data_dir)?;
    tracing::info!(data_dir = %data_dir.display(), ephemeral, "Starting enquiry-tui");

    let store: Arc<dyn KeyValueStore> = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::open(&data_dir)?)
    };
    let auth = LocalIdentityProvider::restore(store.clone(), config.login_display_name());
    let sink = Arc::new(SimulatedSubmission::new(config.submit_delay()));
    let mut app = App::new(
        Box::new(auth),
        DraftStore::new(store),
        sink,
        config.submit_delay(),
    );

    // Setup terminal
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

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    tracing::info!("Bye");
    Ok(())
}

/// Send tracing output to a file so it never draws over the alternate screen
fn init_logging(config: &TuiConfig, data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished submissions before drawing
        app.poll_submission();

        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Use faster polling while the progress gauge animates (16ms = ~60fps)
        // Normal polling (100ms) otherwise
        let poll_duration = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
