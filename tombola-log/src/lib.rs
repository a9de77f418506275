//! Tombola logging
//!
//! Small stderr logger used by every `tombola-*` crate. Verbosity is driven
//! by environment variables so embedding applications can turn on resolution
//! traces without recompiling.
//!
//! # Environment Variables
//!
//! - `TOMBOLA_DEBUG=1` - enable debug logging
//! - `TOMBOLA_LOG_LEVEL=trace|debug|info|warn|error|off` - minimum level
//! - `TOMBOLA_LOG_FORMAT=pretty|compact|json` - output format (default `json`)
//! - `TOMBOLA_LOG_TIMESTAMPS=1|0` - include timestamps
//!
//! # Usage
//!
//! ```rust
//! use tombola_log::{debug, warn};
//!
//! debug!("loaded {} features", 3);
//! warn!(target: "tombola::overrides", "ignoring empty token");
//! ```

mod level;

pub use level::{Format, Level};

use once_cell::sync::Lazy;
use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static SETTINGS: Lazy<LogSettings> = Lazy::new(LogSettings::from_env);

/// Logger settings, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            timestamps: true,
        }
    }
}

impl LogSettings {
    /// Read `TOMBOLA_*` variables and publish the level to the global atomics.
    pub fn from_env() -> Self {
        let debug = env_flag("TOMBOLA_DEBUG").unwrap_or(false);
        let level = env::var("TOMBOLA_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });
        let format = env::var("TOMBOLA_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);
        let timestamps = env_flag("TOMBOLA_LOG_TIMESTAMPS").unwrap_or(true);

        DEBUG_ENABLED.store(debug, Ordering::SeqCst);
        LOG_LEVEL.store(level as u8, Ordering::SeqCst);

        Self {
            debug,
            level,
            format,
            timestamps,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Force settings to be read from the environment now rather than on first use.
pub fn init() {
    Lazy::force(&SETTINGS);
}

pub fn settings() -> &'static LogSettings {
    &SETTINGS
}

#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    Lazy::force(&SETTINGS);
    if level == Level::Off {
        return false;
    }
    if level == Level::Debug && is_debug_enabled() {
        return true;
    }
    level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    Lazy::force(&SETTINGS);
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Set the minimum level. Environment settings are read first so they
/// cannot replace this value on the next log call.
pub fn set_level(level: Level) {
    Lazy::force(&SETTINGS);
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode; enabling it also lowers the level to `Debug` if needed.
pub fn set_debug(enabled: bool) {
    Lazy::force(&SETTINGS);
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

#[doc(hidden)]
pub fn emit(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let settings = settings();
    let line = match settings.format {
        Format::Pretty => render_pretty(level, target, message, settings.timestamps),
        Format::Compact => render_compact(level, target, message, settings.timestamps),
        Format::Json => render_json(level, target, message),
    };

    let _ = writeln!(std::io::stderr().lock(), "{}", line);
}

fn render_pretty(level: Level, target: &str, message: &str, timestamps: bool) -> String {
    let mut line = String::new();
    if timestamps {
        line.push_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f ").to_string());
    }
    line.push_str(&format!("{:5} ", level.as_str()));
    if !target.is_empty() {
        line.push_str(&format!("[{}] ", target));
    }
    line.push_str(message);
    line
}

fn render_compact(level: Level, target: &str, message: &str, timestamps: bool) -> String {
    let mut line = String::new();
    if timestamps {
        line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
    }
    line.push(level.as_str().chars().next().unwrap_or('?'));
    line.push(' ');
    if !target.is_empty() {
        line.push_str(target);
        line.push_str(": ");
    }
    line.push_str(message);
    line
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str) -> String {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };

    serde_json::to_string(&record).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str) -> String {
    format!(
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        target.escape_default(),
        message.escape_default()
    )
}

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($level:expr, $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::emit($level, $target, &format!($($arg)+));
        }
    };
}

/// Log at `TRACE`. Used for per-resolution detail.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => { $crate::__emit!($crate::Level::Trace, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Trace, module_path!(), $($arg)+) };
}

/// Log at `DEBUG`. Enabled by `TOMBOLA_DEBUG=1` or `TOMBOLA_LOG_LEVEL=debug`.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => { $crate::__emit!($crate::Level::Debug, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Debug, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => { $crate::__emit!($crate::Level::Info, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Info, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => { $crate::__emit!($crate::Level::Warn, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Warn, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => { $crate::__emit!($crate::Level::Error, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__emit!($crate::Level::Error, module_path!(), $($arg)+) };
}
