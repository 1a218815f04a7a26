mod input;
mod logging;
mod screen;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use myshows_core::config::AppConfig;
use myshows_core::error::MyShowsError;
use myshows_runtime::{ChannelPresenter, CoordinatorHandle, Runtime, RuntimeError, UiEvent};

use input::Input;
use screen::Screen;

#[derive(Parser)]
#[command(name = "myshows")]
#[command(about = "Search movies and TV shows on TMDb and keep a watchlist")]
#[command(version)]
struct Cli {
    /// TMDb v3 API key (defaults to $TMDB_API_KEY, then the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Watchlist database file
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective settings (flags included) to the config file and exit
    #[arg(long)]
    save_config: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] MyShowsError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("myshows: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(key) = cli
        .api_key
        .or_else(|| std::env::var("TMDB_API_KEY").ok())
        .filter(|k| !k.is_empty())
    {
        config.tmdb.api_key = key;
    }
    if let Some(db) = cli.db {
        config.watchlist.db_file = db.to_string_lossy().into_owned();
    }
    if cli.save_config {
        let path = match cli.config {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => {
                config.save()?;
                AppConfig::config_path()
            }
        };
        println!("saved {}", path.display());
        return Ok(());
    }

    let _guard = logging::init(&AppConfig::log_dir(), &config.logging.level)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "myshows starting");

    let runtime = Runtime::from_config(&config)?;
    let (presenter, events) = ChannelPresenter::new();
    let (handle, coordinator) = runtime.start(presenter);

    let screen = Arc::new(Mutex::new(Screen::default()));
    let render = tokio::spawn(render_loop(events, Arc::clone(&screen)));

    println!("{}", input::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match input::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => dispatch(&handle, &screen, input).await,
            Err(msg) => println!("{msg}"),
        }
    }

    handle.dispose();
    if let Err(e) = coordinator.await {
        tracing::error!("Coordinator task failed: {e}");
    }
    let _ = render.await;
    tracing::info!("myshows stopped");
    Ok(())
}

async fn dispatch(handle: &CoordinatorHandle, screen: &Mutex<Screen>, input: Input) {
    match input {
        Input::Search(query) => handle.search_shows(query, true),
        Input::Type(text) => handle.search_shows(text, false),
        Input::Next => handle.load_next_shows(),
        Input::Refresh => handle.refresh(),
        Input::Shows => handle.display_show_list(),
        Input::Watchlist => handle.display_watchlist(),
        Input::Open(n) => {
            let screen = screen.lock().await;
            match screen.row(n) {
                Some(show) => handle.select_show(show.id, screen.in_catalog),
                None => println!("no row {n}"),
            }
        }
        Input::Toggle => handle.toggle_watch(),
        Input::Delete(n) => {
            let screen = screen.lock().await;
            if screen.in_catalog {
                println!("open the watchlist first, or use `toggle` on an open show");
                return;
            }
            match screen.row(n) {
                Some(show) => handle.delete_from_watchlist(show.id),
                None => println!("no row {n}"),
            }
        }
        Input::Back => handle.exit_detail(),
        Input::Help => println!("{}", input::HELP),
        Input::Quit => {}
    }
}

/// Print every presenter signal as it arrives. Ends when the coordinator stops.
async fn render_loop(mut events: mpsc::UnboundedReceiver<UiEvent>, screen: Arc<Mutex<Screen>>) {
    while let Some(event) = events.recv().await {
        match event {
            UiEvent::State(state) => {
                let mut screen = screen.lock().await;
                screen.apply(state);
                println!("{}", screen.render());
            }
            UiEvent::Loading(true) => println!("loading..."),
            UiEvent::Loading(false) => {}
            UiEvent::Error { kind, detail } => match detail {
                Some(detail) => println!("error: {kind} ({detail})"),
                None => println!("error: {kind}"),
            },
        }
    }
}
