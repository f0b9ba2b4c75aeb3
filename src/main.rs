use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

use hitsujun::{
    app::App,
    app_dirs::AppDirs,
    board::TerminalBoard,
    celebration::CelebrationAnimation,
    character::Kanji,
    config::{Config, ConfigStore, FileConfigStore},
    curriculum::Curriculum,
    logging,
    lookup::{BackgroundLookup, KanjiApiClient, KanjiLookup, OfflineLookup},
    metadata::MetadataOverrides,
    progress::{ProgressStore, ResetScope, SetSelector, INCORRECT_SET_LABEL},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::SessionController,
    storage::{KeyValueStore, SqliteStore},
};

const TICK_RATE_MS: u64 = 100;

/// stroke-order quiz trainer for japanese school kanji
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Watch the stroke order of a kanji, write it yourself and report how it went. Mastered and missed characters are remembered between sessions."
)]
pub struct Cli {
    /// set to start on (小1, 小2, 小3 or wrong)
    #[clap(short = 'g', long)]
    grade: Option<String>,

    /// character to load first
    #[clap(short = 'k', long)]
    kanji: Option<char>,

    /// never query the remote dictionary
    #[clap(long)]
    offline: bool,

    /// progress database location
    #[clap(long)]
    db: Option<PathBuf>,

    /// directory holding kanji/<c>.jpg reward pictures
    #[clap(long)]
    assets: Option<PathBuf>,

    /// config file location
    #[clap(long)]
    config: Option<PathBuf>,

    /// print progress for every set and exit
    #[clap(long)]
    summary: bool,

    /// clear saved progress before starting
    #[clap(long, value_enum)]
    reset: Option<ResetScope>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags take precedence over the config file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(grade) = &self.grade {
            config.grade = grade.clone();
        }
        if let Some(kanji) = self.kanji {
            config.kanji = kanji;
        }
        if self.offline {
            config.offline = true;
        }
        if let Some(assets) = &self.assets {
            config.assets_dir = assets.clone();
        }
        config
    }

    fn db_path(&self) -> Option<PathBuf> {
        self.db.clone().or_else(AppDirs::db_path)
    }

    fn log_path(&self) -> Option<PathBuf> {
        match &self.db {
            Some(db) => db.parent().map(|dir| dir.join("hitsujun.log")),
            None => AppDirs::log_path(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = cli.log_path() {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("logging disabled: {e}");
        }
    }

    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(config_store.load());

    let curriculum = Curriculum::embedded()?;
    let selector: SetSelector = config.grade.parse()?;
    if let SetSelector::Named(name) = &selector {
        if curriculum.find(name).is_none() {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("unknown grade {name}"))
                .exit();
        }
    }
    let Some(initial) = Kanji::new(config.kanji) else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            format!("{} is not a supported kanji", config.kanji),
        )
        .exit();
    };

    if cli.save_config {
        config_store.save(&config)?;
        info!("saved config to {}", config_store.path().display());
        println!("saved config to {}", config_store.path().display());
    }

    let Some(db_path) = cli.db_path() else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "cannot locate a state directory, pass --db")
            .exit();
    };
    let mut progress = ProgressStore::load(curriculum, SqliteStore::open(&db_path)?);

    if let Some(scope) = cli.reset {
        progress.reset(scope);
        info!("reset {scope} progress");
        println!("reset {scope} progress");
    }
    if cli.summary {
        for line in summary_lines(&progress) {
            println!("{line}");
        }
        return Ok(());
    }
    if cli.reset.is_some() && !stdin().is_tty() {
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if config.offline {
        start(progress, &config, selector, initial, OfflineLookup)
    } else {
        match KanjiApiClient::new(&config.lookup_url) {
            Ok(client) => start(progress, &config, selector, initial, client),
            Err(e) => {
                warn!("remote lookup unavailable: {e}");
                start(progress, &config, selector, initial, OfflineLookup)
            }
        }
    }
}

/// One line per curriculum set plus the incorrect drill.
fn summary_lines<S: KeyValueStore>(progress: &ProgressStore<S>) -> Vec<String> {
    let mut lines = progress
        .curriculum()
        .sets()
        .iter()
        .map(|set| {
            let p = progress.compute_progress(&SetSelector::named(&set.name));
            format!(
                "{} ({})  進行度 {} / {}  {}%",
                set.name, set.label, p.mastered, p.total, p.percent
            )
        })
        .collect::<Vec<_>>();
    lines.push(format!(
        "{}  {}",
        INCORRECT_SET_LABEL,
        progress.incorrect_list().len()
    ));
    lines
}

fn start<S: KeyValueStore, L: KanjiLookup>(
    progress: ProgressStore<S>,
    config: &Config,
    selector: SetSelector,
    initial: Kanji,
    lookup: L,
) -> Result<(), Box<dyn Error>> {
    let overrides = MetadataOverrides::embedded().unwrap_or_else(|e| {
        warn!("metadata overrides unavailable: {e}");
        MetadataOverrides::default()
    });

    let events = CrosstermEventSource::new();
    let session = SessionController::builder(
        progress,
        TerminalBoard::new(),
        BackgroundLookup::new(lookup, events.sender()),
        CelebrationAnimation::new(),
    )
    .with_overrides(overrides)
    .with_options(config.widget_options())
    .with_rewards(config.reward_assets())
    .with_selector(selector)
    .start(initial);
    let mut app = App::new(session);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, S, M, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, M>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    S: KeyValueStore,
    M: hitsujun::lookup::MetadataSource,
    E: hitsujun::runtime::AppEventSource,
    T: hitsujun::runtime::Ticker,
{
    let size = terminal.size()?;
    app.on_event(AppEvent::Resize(size.width, size.height));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        app.on_event(runner.step());
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
