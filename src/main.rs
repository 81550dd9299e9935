use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    event::{EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use claimview::event_source::KeyboardEventSource;
use claimview::panic_handler::{initialize_panic_handler, restore_terminal};
use claimview::settings::{is_mouse_enabled, load_settings};
use claimview::{App, run_app_with_event_source};

#[derive(Parser, Debug)]
#[command(name = "claimview")]
#[command(version, about = "Review a claim document next to its extracted data")]
struct Args {
    /// Claim PDF and/or record JSON to load on start
    files: Vec<PathBuf>,

    /// Open the review as soon as both files are loaded
    #[arg(long)]
    start: bool,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file
    #[arg(long, default_value = "claimview.log")]
    log_file: PathBuf,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|_| anyhow!("unknown log level {:?}", args.log_level))?;

    WriteLogger::init(
        level,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("creating log file {}", args.log_file.display()))?,
    )?;

    info!("Starting claimview {}", env!("CARGO_PKG_VERSION"));

    load_settings(args.config.as_deref());
    initialize_panic_handler();

    let mut app = App::new();
    app.add_paths(&args.files);
    app.set_auto_start(args.start);

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if is_mouse_enabled() {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    // Drop the review before the terminal goes back, so the worker shuts down
    drop(app);
    restore_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down claimview");
    Ok(())
}
