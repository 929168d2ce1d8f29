//! Droptable - A fast TUI for browsing item drop tables
//!
//! Loads a tab-delimited `Name / location / Percent` table and lets you
//! filter it by item name and location, and sort it by any column.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use argh::FromArgs;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

use droptable::app::App;
use droptable::commands::EMPTY_MESSAGE;
use droptable::data::Dataset;
use droptable::error::LoadError;
use droptable::export::{write_rows, OutputFormat};
use droptable::parser::{HeaderSpec, DEFAULT_LOCATION_COLUMN};
use droptable::sort::SortColumn;
use droptable::source::{load_dataset, Source};
use droptable::theme::{Preferences, ThemeMode, ThemeStore};
use droptable::tui::Tui;
use droptable::view::{current_view, ViewState};

const POLL_INTERVAL_MS: u64 = 100;

/// Droptable - browse item drop tables in the terminal
#[derive(FromArgs)]
struct Args {
    /// path, http(s) URL, or "-" for stdin
    #[argh(positional)]
    source: String,

    /// header name of the location column
    #[argh(option, short = 'c', default = "String::from(DEFAULT_LOCATION_COLUMN)")]
    location_column: String,

    /// light or dark; overrides the saved preference for this session
    #[argh(option)]
    theme: Option<ThemeMode>,

    /// print the filtered, sorted rows to stdout instead of opening the TUI
    #[argh(switch, short = 'p')]
    print: bool,

    /// with --print, emit JSON instead of TSV
    #[argh(switch)]
    json: bool,

    /// with --print, only rows whose name contains this text
    #[argh(option, short = 's')]
    search: Option<String>,

    /// with --print, only rows from this location (repeatable; default all)
    #[argh(option, short = 'L')]
    location: Vec<String>,

    /// with --print, sort column: name, location or percent
    #[argh(option, default = "SortColumn::Name")]
    sort: SortColumn,

    /// with --print, sort descending
    #[argh(switch)]
    desc: bool,

    /// append logs to this file (RUST_LOG controls the level)
    #[argh(option)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.log_file.as_deref(), args.print)?;

    let source = Source::parse(&args.source);
    let spec = HeaderSpec::new(args.location_column.clone());

    // Loading is the only async step; it runs on the worker while the UI polls
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .with_context(|| "Failed to start the runtime")?;

    if args.print {
        return run_print_mode(&args, &source, &spec, &runtime);
    }

    let theme = match args.theme {
        Some(mode) => ThemeStore::ephemeral(mode),
        None => ThemeStore::open(Preferences::default_path()),
    };
    let mut app = App::new(source.display_name(), args.location_column.clone(), theme);

    let mut pending = Some(spawn_load(&runtime, source, spec));
    let mut tui = Tui::new()?;

    // Main event loop
    loop {
        if let Some(rx) = pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    app.finish_loading(result);
                    pending = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    tracing::error!("Load task ended without a result");
                    pending = None;
                }
            }
        }

        tui.draw(&mut app)?;

        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                // Resize is picked up by the next draw
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    // A fetch that never finished must not hold up exit
    runtime.shutdown_background();
    Ok(())
}

/// Start loading `source` on the runtime. The result arrives on the
/// returned channel; the caller keeps handling input meanwhile.
fn spawn_load(
    runtime: &tokio::runtime::Runtime,
    source: Source,
    spec: HeaderSpec,
) -> oneshot::Receiver<Result<Dataset, LoadError>> {
    let (tx, rx) = oneshot::channel();
    runtime.spawn(async move {
        let result = load_dataset(&source, &spec).await;
        // The receiver is gone once the user has quit
        let _ = tx.send(result);
    });
    rx
}

/// Headless mode: load, project, write to stdout.
fn run_print_mode(
    args: &Args,
    source: &Source,
    spec: &HeaderSpec,
    runtime: &tokio::runtime::Runtime,
) -> Result<()> {
    let dataset = match runtime.block_on(load_dataset(source, spec)) {
        Ok(dataset) => dataset,
        Err(e) => {
            let message = e.user_message(&source.display_name(), &spec.location_column);
            return Err(anyhow::Error::new(e).context(message));
        }
    };

    let mut view = ViewState::new(&dataset);
    if let Some(ref term) = args.search {
        view.search_term = term.clone();
    }
    if !args.location.is_empty() {
        for location in &args.location {
            if !dataset.has_location(location) {
                tracing::warn!("Unknown location '{}'", location);
            }
        }
        view.selected_locations = args.location.iter().cloned().collect();
    }
    view.sort_column = args.sort;
    view.sort_ascending = !args.desc;

    let rows = current_view(&dataset, &view);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Tsv
    };
    write_rows(&rows, &dataset.location_column, format, io::stdout().lock())?;

    eprintln!("Found {} results.", rows.len());
    if rows.is_empty() {
        eprintln!("{}", EMPTY_MESSAGE);
    }
    Ok(())
}

/// Log to a file when asked, to stderr in print mode, and nowhere otherwise
/// since the TUI owns the terminal.
fn init_logging(log_file: Option<&str>, headless: bool) -> Result<()> {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("info"))
            .init();
        tracing::info!("droptable {} logging to {}", env!("CARGO_PKG_VERSION"), path);
    } else if headless {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }

    Ok(())
}
