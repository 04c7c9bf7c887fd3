use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use devwatch::config::{Overrides, Settings};
use devwatch::ui::{self, IconResolver, Theme, ThemeChoice};
use devwatch::{events, logging, App, AppOptions, Command, DeviceSource, FileSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "devwatch")]
#[command(about = "Live status dashboard for monitored network devices")]
struct Args {
    /// Base URL of the monitoring server
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read the device list from a JSON file instead of a server
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Auto-refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Start with auto-refresh enabled
    #[arg(short, long)]
    auto: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.url.clone(),
            file: self.file.clone(),
            refresh_secs: self.refresh,
            auto_refresh: self.auto.then_some(true),
            log_file: self.log_file.clone(),
            theme: self.theme,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    logging::init(&settings.log_path(), &settings.log_level)?;

    // Fetches and probes run on the runtime; the UI loop stays on this thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source: Arc<dyn DeviceSource> = match &settings.file {
        Some(path) => Arc::new(FileSource::new(path)),
        None => {
            let mut builder = HttpSource::builder()
                .base_url(&settings.base_url)
                .timeout(settings.request_timeout())
                .csrf_cookie(&settings.csrf_cookie);
            if let Some(token) = &settings.csrf_token {
                builder = builder.csrf_token(token);
            }
            let source = builder.build()?;

            // Without the session cookie probes are rejected, but fetches still work
            if let Err(e) = rt.block_on(source.bootstrap_session()) {
                warn!(error = %e, "Could not obtain session cookie");
            }
            Arc::new(source)
        }
    };
    info!(source = source.description(), "Starting dashboard");

    let options = AppOptions {
        refresh_interval: settings.refresh_interval(),
        theme: Theme::from_choice(settings.theme),
        icons: IconResolver::new(settings.icons.clone()),
    };

    run_tui(source, options, settings.auto_refresh)
}

/// Run the TUI with the given data source
fn run_tui(source: Arc<dyn DeviceSource>, options: AppOptions, auto_refresh: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and start the initial load
    let mut app = App::new(source, options);
    app.dispatch(Command::RefreshRequested);
    if auto_refresh {
        app.dispatch(Command::AutoRefreshToggled(true));
    }

    let result = run_app(&mut terminal, &mut app);

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

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_updates();

        let mut table_offset = app.table_offset;
        terminal.draw(|frame| table_offset = ui::render(frame, app))?;
        app.table_offset = table_offset;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events::handle_key_event(app, key)
                }
                Event::Mouse(mouse) => {
                    let start = ui::table_start_row(app);
                    events::handle_mouse_event(app, mouse, start);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    info!("Dashboard closed");
    Ok(())
}
