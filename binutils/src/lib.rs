//! Command line plumbing shared by the binaries of this workspace.

use std::{fs::File, sync::Mutex};

pub use clap;

/// Verbosity flags (`-v`, `-q`) for the command line parser.
pub mod verbose {
    pub use clap_verbosity_flag::{Level, Verbosity};
}

/// Styles of the help message.
pub fn get_styles() -> clap::builder::Styles {
    use clap::builder::styling::{AnsiColor, Effects, Styles};
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Map the level of the verbosity flag to a tracing level.
///
/// The tracing level is one step more verbose than the flag: warnings show
/// by default, `-v` adds progress and `-q` leaves errors only.
pub fn verbose_level_to_trace(level: Option<verbose::Level>) -> &'static tracing::Level {
    match level {
        Some(verbose::Level::Error) => &tracing::Level::WARN,
        Some(verbose::Level::Warn) => &tracing::Level::INFO,
        Some(verbose::Level::Info) => &tracing::Level::DEBUG,
        Some(verbose::Level::Debug) => &tracing::Level::TRACE,
        Some(verbose::Level::Trace) => &tracing::Level::TRACE,
        None => &tracing::Level::ERROR,
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr in a human readable format. If `log_file` is given,
/// logs are written to it as JSON lines instead. Calling this more than once
/// keeps the first subscriber.
pub fn logging_setup(level: &tracing::Level, log_file: Option<&File>) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(*level)
        .with_target(false);

    let file = match log_file.map(File::try_clone) {
        Some(Ok(file)) => Some(file),
        Some(Err(err)) => {
            eprintln!("could not open log file, logging to stderr: {err}");
            None
        }
        None => None,
    };

    let _ = match file {
        Some(file) => builder
            .json()
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}
