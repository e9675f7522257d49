//! Logger set up for drivebot executables
//!
//! Log lines go to two places: the console, coloured and filtered at the
//! requested level, and the session log file, uncoloured and always at
//! `Trace` so the per-tick traces of the control loops can be inspected
//! after a run without flooding the console.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info, warn};
use fern;
use colored::{ColoredString, Colorize};
use std::{env, fmt};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable which, if set to a level name, overrides the console
/// log level passed to `logger_init`.
pub const LOG_LEVEL_ENV_VAR: &str = "DRIVEBOT_LOG";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a console log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - The console level is `min_level` unless `DRIVEBOT_LOG` names another
///   level. Either way it must include `log::Level::Info`.
/// - The log file always records everything down to `Trace`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    let env_level = env::var(LOG_LEVEL_ENV_VAR).ok();
    let env_override = env_level.as_deref().and_then(parse_level);
    let console_level = env_override.unwrap_or(min_level);

    if console_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(console_level))
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_line(
                    session::get_elapsed_seconds(),
                    coloured_tag(record.level()),
                    record.level(),
                    record.target(),
                    message
                )
            ))
        })
        .level(console_level)
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_line(
                    session::get_elapsed_seconds(),
                    level_tag(record.level()),
                    record.level(),
                    record.target(),
                    message
                )
            ))
        })
        .level(LevelFilter::Trace)
        .chain(log_file);

    fern::Dispatch::new()
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Console log level: {:?}", console_level);
    info!("    Log file path: {:?}", session.log_file_path);

    if let (Some(value), None) = (&env_level, env_override) {
        warn!("Ignoring unknown {} value \"{}\"", LOG_LEVEL_ENV_VAR, value);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a level name such as `debug` or `WARN`.
fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Build one log line. Debug and trace lines name their target so the
/// control loop they came from can be told apart.
fn format_line<T: fmt::Display>(
    elapsed_s: f64,
    tag: T,
    level: log::Level,
    target: &str,
    message: &fmt::Arguments
) -> String {
    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, tag, target, message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

/// Plain three letter tag for a log level
fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info  => "INF",
        log::Level::Warn  => "WRN",
        log::Level::Error => "ERR"
    }
}

/// Level tag coloured for the console
fn coloured_tag(level: log::Level) -> ColoredString {
    let tag = level_tag(level);

    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info  => tag.normal(),
        log::Level::Warn  => tag.yellow(),
        log::Level::Error => tag.red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Some(LevelFilter::Trace));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("Debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("loud"), None);
        assert_eq!(parse_level(""), None);
    }

    #[test]
    fn test_format_line() {
        let line = format_line(
            1.5, level_tag(log::Level::Info), log::Level::Info, "bot_lib::drive", &format_args!("Turning to {}", 90)
        );
        assert_eq!(line, "[  1.500000 INF] Turning to 90");

        let line = format_line(
            0.01, level_tag(log::Level::Trace), log::Level::Trace, "bot_lib::loc::odom", &format_args!("tick")
        );
        assert_eq!(line, "[  0.010000 TRC] bot_lib::loc::odom: tick");
    }

    #[test]
    fn test_file_tags_uncoloured() {
        for &level in [
            log::Level::Trace, log::Level::Debug, log::Level::Info, log::Level::Warn, log::Level::Error
        ].iter() {
            let tag = level_tag(level);
            assert_eq!(tag.len(), 3);
            assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
        }
    }
}
