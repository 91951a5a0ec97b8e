use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::IntoDiagnostic;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use talent_bridge::config::AppConfig;
use talent_bridge::core::logging::{self, AppError};
use talent_bridge::tui::app::AppState;
use talent_bridge::tui::services::Services;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // File-only logging; stdout belongs to the terminal UI
    let _log_guard = logging::init_tui();
    log::info!("{} v{} starting", talent_bridge::NAME, talent_bridge::VERSION);

    let config = AppConfig::load();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx.clone()).map_err(|e| {
        AppError::new(e.to_string()).with_help(format!(
            "Check the [api] section of {}",
            AppConfig::config_path().display()
        ))
    })?;

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture).into_diagnostic()?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    let mut app = AppState::new(event_rx, event_tx, services);
    let result = app.run(&mut terminal, config.tui.tick_rate()).await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture).into_diagnostic()?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    log::info!("Shutting down");
    result.into_diagnostic()
}
