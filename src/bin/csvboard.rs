use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{self, Event as CEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use csvboard::config::Config;
use csvboard::services::DataService;
use csvboard::tui::App;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

/// Load CSV files into a SQLite store and chart them in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite store to use (defaults to datos.db in the data directory)
    #[arg(long = "db", value_name = "PATH")]
    db: Option<PathBuf>,
    /// Path to a config file (overrides ~/.csvboard-config.json5)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable file logging at the given level (RUST_LOG refines it)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Upload a CSV file before the UI starts. Repeat per file.
    #[arg(long = "upload", value_name = "PATH")]
    upload: Vec<PathBuf>,
    /// Print the stored tables and exit
    #[arg(long = "list")]
    list: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    csvboard::logging::init_with(None, args.logging.map(Into::into))?;

    let config = Config::from_path(args.config.as_ref())?;
    let db_path = args.db.clone().unwrap_or_else(|| config.database_path());
    let service = DataService::open(&db_path)?;
    info!("Using store {}", db_path.display());

    // Uploads happen before the terminal is taken over so errors stay readable
    for path in &args.upload {
        match service.import_csv(path) {
            Ok(summary) => println!(
                "Data saved in table `{}` ({} rows, {} skipped)",
                summary.table_name, summary.rows, summary.skipped_rows
            ),
            Err(e) => {
                error!("Upload of {} failed: {}", path.display(), e);
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    if args.list {
        for name in service.list_tables()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut app = App::new(service, config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(250))? {
            if let CEvent::Key(key_event) = event::read()? {
                app.handle_key_event(key_event)?;
            }
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
