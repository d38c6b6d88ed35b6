//! jellytv - Jellyfin client for the terminal, built for the couch
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! jellytv
//!
//! # TV mode: remote focus, navigation bar, menu key
//! jellytv --tv
//!
//! # CLI mode (for automation)
//! jellytv info https://demo.jellyfin.org/stable
//! jellytv -u demo -p '' libraries --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use jellytv::app::{App, Effect};
use jellytv::cli::Cli;
use jellytv::commands::{self, Connection};
use jellytv::config::Config;
use jellytv::focus::Platform;
use jellytv::logging::init_logging;
use jellytv::models::ViewportMetrics;
use jellytv::playback::{self, sampler::SAMPLE_PERIOD, PlaybackSample, PlayerError, ProgressTracker, Sampler};
use jellytv::screens::Response;
use jellytv::MediaClient;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Results delivered to the event loop from background tasks
enum AppEvent {
    Response(Response),
    PlayerOpened {
        generation: u64,
        tracker: ProgressTracker,
    },
    PlayerFailed {
        generation: u64,
        error: PlayerError,
    },
    PlaybackSampled {
        generation: u64,
        sample: PlaybackSample,
    },
    SignedOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_ref());

    // Hold the guard until exit so buffered log lines reach the file
    let log_guard = match init_logging(&config.log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Warning: file logging disabled: {}", e);
            }
            None
        }
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = commands::run(cli).await;
        // process::exit skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let result = run_tui(cli, config).await;
        drop(log_guard);
        result
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Everything the event loop needs besides the app itself
struct Runtime {
    client: Arc<MediaClient>,
    player_command: String,
    cell_width_px: u32,
    cell_height_px: u32,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

/// Run interactive TUI
async fn run_tui(cli: Cli, mut config: Config) -> Result<()> {
    let platform = Platform {
        is_tv: cli.tv || config.tv_mode,
    };
    let connection = Connection::resolve(&cli, &config);
    let client = Arc::new(commands::client_for(&mut config, cli.config.as_ref()));

    let mut app = App::new(platform, &connection.server_url, &connection.username);
    app.device_id = client.info().device_id.clone();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut runtime = Runtime {
        client,
        player_command: config.player().to_string(),
        cell_width_px: config.cell_width_px(),
        cell_height_px: config.cell_height_px(),
        tx,
        rx,
    };
    tracing::info!(tv = platform.is_tv, server = %connection.server_url, "starting TUI");

    let mut terminal = init_terminal()?;
    let size = terminal.size()?;
    app.set_viewport(runtime.viewport(size.width, size.height));
    app.start();

    let result = run_event_loop(&mut terminal, &mut app, &mut runtime).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    // Release the server-side session on the way out
    runtime.client.logout().await;
    result
}

impl Runtime {
    fn viewport(&self, cols: u16, rows: u16) -> ViewportMetrics {
        ViewportMetrics::from_terminal(cols, rows, self.cell_width_px, self.cell_height_px)
    }

    /// Start background work for each effect
    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let tx = self.tx.clone();
            let client = Arc::clone(&self.client);
            match effect {
                Effect::Fetch(request) => {
                    tokio::spawn(async move {
                        let response = request.run(&client).await;
                        let _ = tx.send(AppEvent::Response(response));
                    });
                }
                Effect::OpenPlayer(open) => {
                    let command = self.player_command.clone();
                    tokio::spawn(async move {
                        let opened = client
                            .active_session()
                            .map_err(|e| PlayerError::NoSource(e.to_string()))
                            .and_then(|session| playback::open_stream(&command, &session, &open.item_id));
                        let event = match opened {
                            Ok(tracker) => AppEvent::PlayerOpened {
                                generation: open.generation,
                                tracker,
                            },
                            Err(error) => AppEvent::PlayerFailed {
                                generation: open.generation,
                                error,
                            },
                        };
                        let _ = tx.send(event);
                    });
                }
                Effect::SignOut => {
                    tokio::spawn(async move {
                        client.logout().await;
                        let _ = tx.send(AppEvent::SignedOut);
                    });
                }
            }
        }
    }

    fn handle(&self, app: &mut App, event: AppEvent) {
        match event {
            AppEvent::Response(response) => app.apply(response),
            AppEvent::PlayerOpened {
                generation,
                tracker,
            } => {
                let sampler = Sampler::spawn(tracker, SAMPLE_PERIOD, self.tx.clone(), move |sample| {
                    AppEvent::PlaybackSampled { generation, sample }
                });
                app.player_opened(generation, sampler);
            }
            AppEvent::PlayerFailed { generation, error } => app.player_failed(generation, &error),
            AppEvent::PlaybackSampled { generation, sample } => app.on_playback_sample(generation, sample),
            AppEvent::SignedOut => app.signed_out(),
        }
    }
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, runtime: &mut Runtime) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        runtime.dispatch(app.take_effects());

        // Render current state
        terminal.draw(|frame| jellytv::ui::render(frame, app))?;
        // A pressed tile shows for one frame
        app.settle();

        // Poll for events with timeout so background results get picked up
        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Resize(cols, rows) => app.set_viewport(runtime.viewport(cols, rows)),
                _ => {}
            }
        }

        while let Ok(event) = runtime.rx.try_recv() {
            runtime.handle(app, event);
        }
    }

    Ok(())
}
