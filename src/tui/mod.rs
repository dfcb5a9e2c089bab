//! Terminal UI for MindFlip.

pub mod input;
pub mod ui;

use crate::GameShell;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mindflip_core::CardId;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// How long to wait for terminal input before checking deferred events again.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Sends log output to `path` so it does not interfere with the TUI.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,mindflip=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

/// Runs the game in the terminal until the player quits.
pub async fn run_tui(mut shell: GameShell) -> Result<()> {
    info!("Starting MindFlip TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut shell).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Draw / input loop. Deferred shell events are applied before every frame.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    shell: &mut GameShell,
) -> Result<()> {
    let mut cursor = 0usize;

    loop {
        while let Some(event) = shell.try_next_event() {
            shell.handle_event(event);
        }

        let view = shell.view();
        terminal.draw(|f| ui::draw(f, &view, cursor))?;

        if !event::poll(INPUT_POLL)? {
            // Let spawned timers and requests make progress.
            tokio::task::yield_now().await;
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    info!("User quit");
                    return Ok(());
                }
                KeyCode::Char('r') => {
                    shell.restart()?;
                    cursor = 0;
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let outcome = shell.card_clicked(CardId(cursor));
                    debug!(?outcome, "Card clicked");
                }
                code => {
                    cursor = input::move_cursor(cursor, code, shell.session().cards().len());
                }
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                let card_count = shell.session().cards().len();
                if let Some(index) = ui::card_at(area, card_count, mouse.column, mouse.row) {
                    cursor = index;
                    let outcome = shell.card_clicked(CardId(index));
                    debug!(?outcome, "Card clicked with mouse");
                }
            }
            _ => {}
        }
    }
}
