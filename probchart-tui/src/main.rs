//! probchart TUI — interactive probability chart in the terminal.
//!
//! Usage: `probchart-tui [payload.json]`. Without a payload a synthetic
//! three-market event is shown. The mouse moves the hover cursor too. Set `PROBCHART_LOG=<file>` to write logs;
//! nothing is logged to the terminal while the alternate screen is active.

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use probchart_core::ingest::{load_payload, IngestOptions};
use probchart_core::synthetic::{generate, SyntheticParams};
use probchart_core::ChartConfig;
use probchart_tui::{input, ui, App, Theme};

fn main() -> Result<()> {
    init_logging()?;

    let config = ChartConfig::load_or_default(None).context("failed to load chart config")?;
    let app = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let ingested = load_payload(&path, &IngestOptions::from(&config))
                .with_context(|| format!("failed to load {}", path.display()))?;
            info!(
                markets = ingested.report.markets,
                samples = ingested.report.samples_kept,
                "payload loaded"
            );
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "payload".into());
            App::new(title, ingested.series, config)
        }
        None => App::new(
            "Synthetic event",
            generate(&SyntheticParams::default()),
            config,
        ),
    };

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = app;
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("PROBCHART_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let theme = Theme::default();
    loop {
        terminal.draw(|f| ui::draw(f, app, &theme))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
