//! Paw Measurement Wizard - Interactive TUI
//!
//! Step-by-step measurement of a dog's paw from three photos taken next to
//! a ruler. Each photo is calibrated with a 5 cm reference segment, then
//! length, width, height and thickness are drawn with the mouse.
//!
//! ## Usage
//!
//! ```bash
//! # Start with an empty form
//! paw-wizard
//!
//! # Prefill dog info and image paths, export the result as CSV
//! paw-wizard --breed Beagle --owner Sam \
//!     --bottom bottom.jpg --side side.jpg --front front.jpg \
//!     --export paw.csv
//!
//! # Debug logging goes to a file while the TUI owns the terminal
//! RUST_LOG=debug paw-wizard --log-file wizard.log
//! ```

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;

use paw_measure::tui::{App, Event, EventHandler, ImagePaths};
use paw_measure::wizard::{DogInfoBuilder, Session, WizardConfigBuilder, DEFAULT_MIN_CALIBRATION_PX};

const VERSION: &str = env!("PAW_MEASURE_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "paw-wizard",
    author,
    version = VERSION,
    about = "Interactive paw measurement from calibrated photos"
)]
struct Cli {
    /// Dog breed
    #[clap(long, default_value = "")]
    breed: String,

    /// Dog sex
    #[clap(long, default_value = "")]
    sex: String,

    /// Dog age
    #[clap(long, default_value = "")]
    age: String,

    /// Dog weight
    #[clap(long, default_value = "")]
    weight: String,

    /// Owner name
    #[clap(long, default_value = "")]
    owner: String,

    /// Bottom view photo, offered in the upload prompt
    #[clap(long, value_name = "FILE")]
    bottom: Option<PathBuf>,

    /// Side view photo, offered in the upload prompt
    #[clap(long, value_name = "FILE")]
    side: Option<PathBuf>,

    /// Front view photo, offered in the upload prompt
    #[clap(long, value_name = "FILE")]
    front: Option<PathBuf>,

    /// CSV file the final record is exported to
    #[clap(short, long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Reject 5 cm reference segments shorter than this (image pixels)
    #[clap(long, default_value_t = DEFAULT_MIN_CALIBRATION_PX, value_name = "PX")]
    min_calibration_px: f64,

    /// Write logs (filtered by RUST_LOG) to this file
    #[clap(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        paw_measure::setup_logger(Some(path))?;
    }

    let config = WizardConfigBuilder::default()
        .min_calibration_px(cli.min_calibration_px)
        .build()?;
    let dog = DogInfoBuilder::default()
        .breed(cli.breed)
        .sex(cli.sex)
        .age(cli.age)
        .weight(cli.weight)
        .owner(cli.owner)
        .build()?;
    let image_paths = ImagePaths {
        bottom: cli.bottom,
        side: cli.side,
        front: cli.front,
    };

    // Create event handler (100ms tick rate)
    let mut event_handler = EventHandler::new(100);

    let mut app = App::new(Session::new(config).with_dog(dog), image_paths, cli.export)
        .with_events(event_handler.sender());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let outcome = run(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    outcome?;

    // Print the final record if the wizard was completed
    if let Some(record) = app.session().final_record() {
        println!("\nFinal measurements:");
        print!("{}", record);
    }

    Ok(())
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        // Draw the UI
        terminal.draw(|frame| {
            paw_measure::tui::ui::draw(frame, app);
        })?;

        // Handle events
        match event_handler.next().await? {
            Event::Tick => {
                app.on_tick();
            }
            Event::Key(key) => {
                app.on_key(key);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                app.on_mouse(mouse);
            }
            Event::Resize(_, _) => {
                // Terminal will redraw automatically
            }
            Event::ImageDecoded {
                view,
                generation,
                result,
            } => {
                app.on_image_decoded(view, generation, result);
            }
        }
    }
}
