use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use snapdeck_core::{AppConfig, Deck, DeckEvent, DeckService};
use snapdeck_tui::{
    app::App,
    event::EventHandler,
    input::handle_event,
    scroll::UiConfigExt,
    widgets::{DeckWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig, config_path: PathBuf) -> Result<()> {
    let deck = Deck::new(config.pages.clone(), config.deck_config());
    let mut app = App::new(config, &deck);
    app.config_path = Some(config_path);

    let (event_tx, mut deck_rx) = mpsc::unbounded_channel::<DeckEvent>();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (handle, task) = DeckService::new(deck)
        .with_event_sender(event_tx)
        .spawn(shutdown_rx);
    app.attach(handle);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("snapdeck"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut deck_rx);

    if shutdown_tx.send(true).is_err() {
        info!("Deck service already stopped");
    }
    if let Err(e) = task.await {
        warn!("Deck service task failed: {}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    deck_rx: &mut mpsc::UnboundedReceiver<DeckEvent>,
) -> Result<()> {
    let event_handler = EventHandler::new(
        app.config.ui.tick_duration(),
        app.config.ui.animation_tick_duration(),
    );

    loop {
        // Process deck notifications (non-blocking)
        while let Ok(event) = deck_rx.try_recv() {
            app.handle_deck_event(event, Instant::now())?;
        }

        if app.should_quit {
            break;
        }

        app.update_animation(Instant::now());

        terminal.draw(|frame| {
            let size = frame.area();
            if app.config.ui.show_status {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(size);
                DeckWidget::render(frame, layout[0], app);
                StatusBarWidget::render(frame, layout[1], app);
            } else {
                DeckWidget::render(frame, size, app);
            }
        })?;

        // Poll faster while the stack is moving
        let event = if app.needs_animation_frame() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            let action = handle_event(&event, &app.keymap, app.config.input.wheel_step);
            app.handle_action(action)?;
        }
    }

    Ok(())
}
