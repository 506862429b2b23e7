use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mapty::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    export,
    location::{parse_coords, request_position, FixedLocation, NoLocation},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    store::{SqliteStore, WorkoutRepository},
    ui,
    workout::Coords,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc::Sender,
    time::Duration,
};

const TICK_RATE_MS: u64 = 50;

/// log runs and rides on a map, right in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Pick a spot on the map, fill in distance and duration, and mapty keeps your workouts with pace, speed and where they happened."
)]
pub struct Cli {
    /// current position as LAT,LNG (defaults to `home` in the config file)
    #[clap(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
    at: Option<Coords>,

    /// zoom level for the map and for jumping to a workout
    #[clap(short = 'z', long, value_parser = clap::value_parser!(u8).range(1..=18))]
    zoom: Option<u8>,

    /// workout database to use instead of the default one
    #[clap(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// remember the --at position as home
    #[clap(long, requires = "at")]
    save_home: bool,

    /// delete every stored workout and exit
    #[clap(long)]
    reset: bool,

    /// write stored workouts to a CSV file and exit
    #[clap(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,

    /// log more (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        logging::init_logging(&log_path, cli.verbose);
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if cli.save_home {
        config.home = cli.at;
        config_store.save(&config)?;
        tracing::info!(path = %config_store.path().display(), "saved home position");
    }
    if let Some(zoom) = cli.zoom {
        config.zoom = zoom;
    }

    let Some(db_path) = cli.db.clone().or_else(AppDirs::db_path) else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "no data directory found; pass --db PATH")
            .exit();
    };
    let mut repo = WorkoutRepository::new(SqliteStore::open(&db_path)?);

    if cli.reset {
        repo.clear()?;
        println!("cleared workouts in {}", db_path.display());
        return Ok(());
    }

    if let Some(path) = &cli.export_csv {
        let app = App::new(repo, config);
        export::write_csv(app.workouts(), File::create(path)?)?;
        println!("wrote {} workouts to {}", app.workouts().len(), path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let position = cli.at.or(config.home);
    let app = App::new(repo, config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, app, position);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App<SqliteStore>,
    position: Option<Coords>,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    locate(position, events.sender());
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    terminal.draw(|f| ui::draw(&mut app, f))?;

    loop {
        let event = runner.step();
        // idle ticks only matter while the map is moving
        let redraw = !matches!(event, AppEvent::Tick) || app.map().is_panning();

        match app.handle_event(event, runner.tick_interval()) {
            Control::Continue => {}
            Control::Quit => break,
            Control::Reload => {
                app = app.reset();
                locate(position, runner.event_source().sender());
            }
        }

        if redraw {
            terminal.draw(|f| ui::draw(&mut app, f))?;
        }
    }

    tracing::info!("bye");
    Ok(())
}

fn locate(position: Option<Coords>, tx: Sender<AppEvent>) {
    match position {
        Some(coords) => request_position(FixedLocation::new(coords), tx),
        None => request_position(NoLocation, tx),
    }
}
