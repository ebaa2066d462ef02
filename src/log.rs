//! Logging for `tariffsim`, built on `fern`.
//!
//! Informational messages go to stdout and warnings and errors to stderr, with colour when the
//! stream is a terminal. For a model run the same messages are also saved in the output folder.
use anyhow::{Context, Result, bail, ensure};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Metadata, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used when neither `TARIFFSIM_LOG_LEVEL` nor `settings.toml` gives one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Takes precedence over the log level in `settings.toml`
const LOG_LEVEL_ENV_VAR: &str = "TARIFFSIM_LOG_LEVEL";

/// Receives everything below warning level
const LOG_INFO_FILE_NAME: &str = "tariffsim_info.log";

/// Receives warnings and errors
const LOG_ERROR_FILE_NAME: &str = "tariffsim_error.log";

/// Whether [`init`] has already succeeded in this process
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Set up the global logger.
///
/// The level is taken from `TARIFFSIM_LOG_LEVEL` if it is set, otherwise from
/// `log_level_from_settings`. Accepted values are `off`, `error`, `warn`, `info`, `debug` and
/// `trace`, in any case.
///
/// If `log_dir` is given, `tariffsim_info.log` and `tariffsim_error.log` are created there (any
/// existing files are truncated). This can only be called once per process.
pub fn init(log_level_from_settings: &str, log_dir: Option<&Path>) -> Result<()> {
    ensure!(!is_logger_initialised(), "Logger already initialised");

    let level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(from_env) => parse_log_level(&from_env)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) => parse_log_level(log_level_from_settings)?,
    };

    let mut dispatch = Dispatch::new().chain(console_dispatch(level));
    if let Some(log_dir) = log_dir {
        dispatch = dispatch.chain(file_dispatch(log_dir, level)?);
    }
    dispatch.apply()?;

    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Whether a message belongs in the info stream rather than the warning/error one
fn is_info(metadata: &Metadata) -> bool {
    metadata.level() > Level::Warn
}

/// Log to stdout and stderr
fn console_dispatch(level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let stdout_colour = std::io::stdout().is_terminal().then_some(colours);
    let stderr_colour = std::io::stderr().is_terminal().then_some(colours);

    Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(is_info)
                .level(level)
                .format(move |out, message, record| {
                    write_log(out, message, record, stdout_colour.as_ref());
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .level(level.min(LevelFilter::Warn))
                .format(move |out, message, record| {
                    write_log(out, message, record, stderr_colour.as_ref());
                })
                .chain(std::io::stderr()),
        )
}

/// Log to files in `log_dir`.
///
/// The info file records at least info level even if the console is quieter, so that a saved run
/// always has a full account. Warnings and errors are always recorded.
fn file_dispatch(log_dir: &Path, level: LevelFilter) -> Result<Dispatch> {
    let create = |file_name: &str| {
        let path = log_dir.join(file_name);
        File::create(&path).with_context(|| format!("Could not create {}", path.display()))
    };

    Ok(Dispatch::new()
        .format(|out, message, record| write_log(out, message, record, None))
        .chain(
            Dispatch::new()
                .filter(is_info)
                .level(level.max(LevelFilter::Info))
                .chain(create(LOG_INFO_FILE_NAME)?),
        )
        .chain(
            Dispatch::new()
                .level(LevelFilter::Warn)
                .chain(create(LOG_ERROR_FILE_NAME)?),
        ))
}

/// Convert a log level name (case insensitive) to a [`LevelFilter`]
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Write a message as `[HH:MM:SS LEVEL target] message`, colouring the level if requested
fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();

    match colours {
        Some(colours) => out.finish(format_args!(
            "[{timestamp} {} {target}] {message}",
            colours.color(record.level())
        )),
        None => out.finish(format_args!(
            "[{timestamp} {} {target}] {message}",
            record.level()
        )),
    }
}
