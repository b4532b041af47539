use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install `pretty_env_logger`, filtered by `RUST_LOG`.
/// With a file the log goes there instead of stderr, which the TUI owns.
pub fn setup_logger(log_file: Option<&Path>) -> io::Result<()> {
    let target = match log_file {
        Some(path) => Some(File::create(path)?),
        None => None,
    };
    INIT.call_once(|| {
        let mut builder = pretty_env_logger::formatted_builder();
        builder.parse_default_env();
        if let Some(file) = target {
            builder
                .write_style(env_logger::WriteStyle::Never)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Another logger may already be installed by a host application
        let _ = builder.try_init();
    });
    Ok(())
}

pub use wizard::{Action, Outcome, Session, Step, ViewKind, Wizard, WizardError};
pub mod geometry;
pub mod tui;
pub mod wizard;
