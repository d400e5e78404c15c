//! A terminal portfolio: selected works, an about page and smooth-scrolling
//! project galleries.
//!
//! Run the binary to browse the built-in portfolio, or point it at your own
//! with `--content portfolio.toml --assets ./public`.

mod app;
mod config;
mod core;
mod shell;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    image_runtime::ImageUpdate,
    state::AppState,
    transition::Route,
};
use crate::core::content::{Portfolio, BUILTIN_CONTENT};
use crate::shell::clipboard;
use crate::ui::screen;

/// How long the event reader waits before reporting an idle tick.
const TICK_RATE: Duration = Duration::from_millis(100);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "A terminal portfolio")]
struct Cli {
    /// Portfolio content file (TOML).  Defaults to the built-in portfolio.
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    /// Directory that image paths like `/images/a.png` resolve against.
    /// Defaults to the content file's directory, or `.`.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Open straight into a project page.
    #[arg(long, value_name = "SLUG")]
    project: Option<String>,

    /// Print the built-in content file and exit.
    #[arg(long = "dump-content")]
    dump_content: bool,

    /// Write logs here instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn assets_dir(&self) -> PathBuf {
        if let Some(dir) = &self.assets {
            return dir.clone();
        }
        self.content
            .as_deref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ───────────────────────────────────────── setup ─────────────

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            subscriber
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(Mutex::new(file)))
                .init();
        }
        // Never pollute stdout: it carries the exit payload.
        None => subscriber.with_writer(BoxMakeWriter::new(io::stderr)).init(),
    }
    Ok(())
}

fn load_portfolio(cli: &Cli) -> Result<Portfolio> {
    let portfolio = match &cli.content {
        Some(path) => Portfolio::load(path)
            .with_context(|| format!("loading content from {}", path.display()))?,
        None => Portfolio::builtin().context("parsing built-in content")?,
    };
    for work in portfolio.dangling_works() {
        tracing::warn!(work = %work.name, slug = %work.slug, "work has no project page");
    }
    Ok(portfolio)
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.dump_content {
        print!("{BUILTIN_CONTENT}");
        return Ok(());
    }

    init_tracing(cli.log_file.as_ref())?;

    let portfolio = load_portfolio(&cli)?;
    if let Some(slug) = &cli.project {
        if portfolio.project(slug).is_none() {
            bail!("unknown project \"{slug}\"");
        }
    }
    let user_config = config::AppConfig::load();
    let (image_tx, mut image_rx) = tokio::sync::mpsc::unbounded_channel::<ImageUpdate>();
    let mut state = AppState::new(
        portfolio,
        cli.assets_dir(),
        user_config,
        image_tx,
        Instant::now(),
    );
    if let Some(slug) = cli.project.clone() {
        handler::navigate(&mut state, Route::Project(slug), Instant::now());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, &mut image_rx).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result?;

    clipboard::print_exit_payload(state.copied_link.as_deref());
    Ok(())
}

/// The event loop.  Draws, then waits for whichever comes first: terminal
/// input, a decoded image, or, while something is animating, the next frame.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    image_rx: &mut tokio::sync::mpsc::UnboundedReceiver<ImageUpdate>,
) -> Result<()> {
    let mut events = spawn_event_reader(TICK_RATE);
    let mut frame_timer = tokio::time::interval(state.config.frame_interval);
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        terminal.draw(|frame| screen::draw(frame, state, now))?;

        let animating = state.wants_frames(Instant::now());
        if !animating {
            // Resume from a fresh baseline so the first frame's dt is small.
            last_frame = Instant::now();
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let now = Instant::now();
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k, now),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m, now),
                    AppEvent::Resize(w, h) => tracing::debug!(w, h, "terminal resized"),
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = image_rx.recv() => {
                // Batch-drain everything queued before the next redraw.
                handler::apply_image_update(state, update);
                while let Ok(update) = image_rx.try_recv() {
                    handler::apply_image_update(state, update);
                }
            }

            _ = frame_timer.tick(), if animating => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;
                handler::on_frame(state, dt, now);
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }
    tracing::debug!(frames = state.clock.frame_count(), "event loop finished");
    Ok(())
}
