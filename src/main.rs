use std::error::Error;
use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info};

use table_pager::config::{Cli, FileConfig, Settings};
use table_pager::handlers::{self, KeyAction};
use table_pager::state::App;
use table_pager::{load, logging, render, Dataset, LoadError, TableController};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Number of rows in the `--demo` dataset.
const DEMO_ROWS: usize = 50;

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
/// Disables raw mode and leaves alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Load the dataset named on the command line, or psql output from stdin.
fn load_dataset(cli: &Cli) -> Result<Dataset, LoadError> {
    if cli.demo {
        return Ok(load::demo_dataset(DEMO_ROWS));
    }
    if let Some(path) = &cli.file {
        return load::load_path(path);
    }
    if io::stdin().is_terminal() {
        return Err(LoadError::EmptyInput);
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|source| LoadError::Io {
            path: "<stdin>".to_string(),
            source,
        })?;
    load::parse_psql(&input)
}

/// Build the controller from flags, config file and data source.
fn build_controller(cli: &Cli) -> Result<TableController, LoadError> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(cli, file_config);
    let mut dataset = load_dataset(cli)?;
    settings.apply(&mut dataset)?;
    Ok(TableController::new(dataset, settings.page_size)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let cli = Cli::parse();
    logging::init(cli.log_file.clone(), cli.log_level)?;

    // Load everything before initializing the TUI so errors print normally
    let controller = match build_controller(&cli) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "failed to start");
            eprintln!("Error: {}", e);
            eprintln!("Usage: tpg data.csv | tpg data.json | tpg --demo | psql -c 'SELECT ...' | tpg");
            std::process::exit(1);
        }
    };
    info!(
        rows = controller.dataset().row_count(),
        page_size = controller.page_size(),
        "starting"
    );

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let mut app = App::new(controller);

    // Main event loop
    loop {
        terminal.draw(|frame| render::draw(frame, &mut app))?;

        // Poll with 250ms timeout for responsive feel
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.status_message = None;
                    match handlers::handle_key(&key, &mut app) {
                        KeyAction::Quit => break,
                        KeyAction::StatusMessage(msg) => app.status_message = Some(msg),
                        KeyAction::ModeChange(mode) => app.set_mode(mode),
                        KeyAction::None => {}
                    }
                }
                Event::Mouse(mouse) => handlers::handle_mouse(&mouse, &mut app),
                _ => {}
            }
        }
    }

    // Clear terminal before exit
    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    Ok(())
}
