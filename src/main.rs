use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use finbot::{
    api::BackendClient,
    app::{App, AppState},
    config,
    dispatcher::Dispatcher,
    event::{Event, EventHandler},
    key_handlers::{handle_key, Action},
    logging,
    models::Settlement,
    ui,
};
use log::{error, info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, panic, time::Duration};
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = config::initialize_config()?;
    let _logger = logging::init_logging(&config)?;
    info!("Starting FinBot against {}", config.backend_url);

    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new(
        BackendClient::new(&config.backend_url),
        config.fallback_message(),
        settled_tx,
    );
    let mut app = App::new(&config);

    // Setup terminal
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
    let res = run_app(
        &mut terminal,
        &mut app,
        &mut dispatcher,
        &mut events,
        &mut settled_rx,
    )
    .await;
    dispatcher.cancel_all();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("FinBot stopped with an error: {:?}", err);
        eprintln!("{:?}", err);
    }

    info!("FinBot exited");
    Ok(())
}

/// Puts the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

/// Main loop: redraw, then wait for a key, a tick or a settled request.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    events: &mut EventHandler,
    settled_rx: &mut UnboundedReceiver<Settlement>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            Some(settlement) = settled_rx.recv() => {
                app.apply_settlement(settlement);
            }
            event = events.next() => match event {
                Some(Event::Input(key)) => {
                    if let Some(action) = handle_key(key, app) {
                        perform(action, dispatcher);
                    }
                }
                Some(Event::Tick) => app.on_tick(),
                Some(Event::Resize) => {}
                None => break,
            },
        }

        if app.state == AppState::Quit {
            break;
        }
    }

    Ok(())
}

fn perform(action: Action, dispatcher: &mut Dispatcher) {
    match action {
        Action::Dispatch(pending) => {
            dispatcher.dispatch(pending);
        }
        Action::OpenLink(url) => {
            info!("Opening {} in the system browser", url);
            if let Err(e) = open::that_detached(&url) {
                warn!("Failed to open {}: {}", url, e);
            }
        }
    }
}
