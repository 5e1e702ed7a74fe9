//! # GameLog
//!
//! GameLog is a small leveled logger that echoes every entry to the console
//! with a color-coded level label and mirrors it to per-level log files plus
//! a combined stream. Log files are organized into a `year/MonthName/day`
//! directory hierarchy and rotated daily: each level keeps its own append
//! handle and reopens it when the UTC day changes, independently of the
//! other levels. All timestamps are UTC.
//!
//! There is no verbosity threshold. Every call at every level writes to its
//! own file, to the combined `all` file, and to the console. Failures along
//! the file path degrade to a console diagnostic; a log call never returns
//! an error and never panics in the host process.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gamelog::{log_error, log_game, log_info, GameLoggerBuilder};
//!
//! let mut logger = GameLoggerBuilder::new().build();
//!
//! log_info!(logger, "Server listening on port", 8080);
//! log_game!(logger, "Player", "Alice", "joined lobby", 3);
//! log_error!(logger, "boom", 42);
//! ```
//!
//! This produces files such as `./logs/2024/March/05/2024-03-05-info.log`
//! and `./logs/2024/March/05/2024-03-05-all.log`, each line shaped like
//! `07:08:09.123 GMT > info:  Server listening on port 8080`.
use {
    chrono::{DateTime, Datelike, Timelike, Utc},
    colored::Colorize,
    regex::Regex,
    std::{
        fmt,
        fs::{self, OpenOptions},
        io::Write as _,
        path::{Path, PathBuf},
        sync::OnceLock,
    },
};

/// Default root directory for log files, relative to the working directory.
const DEFAULT_LOG_ROOT: &str = "./logs";

/// Full English month names, indexed by UTC month number minus one.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One sink slot per level plus the combined stream.
const SINK_COUNT: usize = 6;
/// Slot index of the combined `all` stream.
const COMBINED_SINK: usize = 5;
/// Sink file-name components, indexed by slot.
const SINK_NAMES: [&str; SINK_COUNT] = ["error", "warn", "info", "game", "debug", "all"];

/// Severity levels accepted by the logger.
///
/// The set is closed: each level owns a console color, a fixed-width file
/// label and an independent daily-rotated log file. The combined `all`
/// stream is not a level — it cannot be logged to directly and only exists
/// as the mirror target of the five real levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Failures and unexpected conditions. Bright red on the console.
    Error,
    /// Suspicious but non-fatal conditions. Bright yellow on the console.
    Warn,
    /// Routine operational messages. White on the console.
    Info,
    /// Gameplay events. Bright green on the console.
    Game,
    /// Diagnostic detail. Bright cyan on the console.
    Debug,
}

impl Level {
    /// The lowercase level name, as used in log file names.
    pub fn name(&self) -> &'static str {
        SINK_NAMES[self.sink()]
    }

    /// Slot index of this level's sink.
    fn sink(&self) -> usize {
        match self {
            Level::Error => 0,
            Level::Warn => 1,
            Level::Info => 2,
            Level::Game => 3,
            Level::Debug => 4,
        }
    }

    /// The file label, padded to 7 characters so message columns align
    /// across levels in the combined file.
    fn file_label(&self) -> &'static str {
        match self {
            Level::Error => "error: ",
            Level::Warn => "warn:  ",
            Level::Info => "info:  ",
            Level::Game => "game:  ",
            Level::Debug => "debug: ",
        }
    }

    /// The console label: the level name colored per level, followed by a
    /// colon, padded to 6 characters.
    fn console_label(&self) -> String {
        match self {
            Level::Error => format!("{}:", "error".bright_red()),
            Level::Warn => format!("{}: ", "warn".bright_yellow()),
            Level::Info => format!("{}: ", "info".white()),
            Level::Game => format!("{}: ", "game".bright_green()),
            Level::Debug => format!("{}:", "debug".bright_cyan()),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The UTC calendar fields of one instant.
///
/// A pure decomposition of a [`DateTime<Utc>`]: the raw fields stay numeric
/// and unpadded, while [`TimeParts::clock_stamp`] and
/// [`TimeParts::date_stamp`] render the zero-padded forms used in log lines
/// and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl TimeParts {
    /// Split an instant into its UTC calendar fields.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        TimeParts {
            year: instant.year(),
            month: instant.month(),
            day: instant.day(),
            hour: instant.hour(),
            minute: instant.minute(),
            second: instant.second(),
            millisecond: instant.timestamp_subsec_millis(),
        }
    }

    /// `HH:MM:SS.mmm` — hours, minutes and seconds zero-padded to two
    /// characters and milliseconds to three. The year is never padded.
    pub fn clock_stamp(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }

    /// `YYYY-MM-DD`, month and day zero-padded.
    pub fn date_stamp(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// The full English name of this instant's UTC month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

/// A source of the current instant.
///
/// The logger reads the clock once per log call to pick the rotation day
/// and the line timestamp. Tests inject fixed or scripted clocks here
/// instead of sampling wall-clock time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock. Used unless the builder is given another [`Clock`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Errors that can occur on the file side of a log call.
///
/// None of these escape the level methods: the dispatcher reports them to
/// the console and the call completes. They are public so downstream
/// wrappers that drive the sink machinery directly can compose with `?`.
#[derive(Debug, thiserror::Error)]
pub enum GameLogError {
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to open log file '{0}': {1}")]
    OpenSinkFailed(PathBuf, String),
    #[error("Short write to '{path}': wrote {written} of {expected} bytes")]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
}

fn ansi_pattern() -> Option<&'static Regex> {
    // ESC or single-byte CSI introducer, optional parameter/intermediate
    // bytes, one final byte in the recognized command range.
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"[\x1b\x9b][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]")
                .ok()
        })
        .as_ref()
}

/// Remove every ANSI CSI escape sequence from `text`.
///
/// Applied to every string before it reaches a file sink, so log files stay
/// plain text even when callers pass pre-styled values. Idempotent:
/// stripping an already-stripped string is a no-op.
pub fn strip_styles(text: &str) -> String {
    match ansi_pattern() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => text.to_owned(),
    }
}

/// Compute the log file path for `sink_name` at `instant`, creating missing
/// directories along the way.
///
/// The layout is `<root>/<year>/<MonthName>/<DD>/<YYYY>-<MM>-<DD>-<sink>.log`
/// with the month rendered as its full English name. Each of the four
/// directory segments is checked and created individually, top-down, so
/// repeated calls within one day find everything in place and create
/// nothing. A creation failure is reported to the console and the resolve
/// continues — the subsequent open of the returned path then fails on its
/// own.
///
/// Returns the path only; the file itself is not opened here.
pub fn resolve_path(root: &Path, instant: DateTime<Utc>, sink_name: &str) -> PathBuf {
    let parts = TimeParts::from_datetime(instant);
    let year_path = root.join(parts.year.to_string());
    let month_path = year_path.join(parts.month_name());
    let day_path = month_path.join(format!("{:02}", parts.day));

    for segment in [root, year_path.as_path(), month_path.as_path(), day_path.as_path()] {
        if !segment.exists() {
            if let Err(err) = fs::create_dir(segment) {
                eprintln!(
                    "{}",
                    GameLogError::CreateDirectoryFailed(segment.to_path_buf(), err.to_string())
                );
            }
        }
    }

    day_path.join(format!("{}-{}.log", parts.date_stamp(), sink_name))
}

/// Configuration shared by the logger and its builder.
struct GameLoggerMeta {
    /// Root directory under which the year/month/day hierarchy is created.
    directory: PathBuf,
    /// Source of the current instant, read once per log call.
    clock: Box<dyn Clock>,
}

impl GameLoggerMeta {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// One open sink: the file handle plus the UTC day it was opened for.
struct OpenSink {
    /// UTC day-of-month the handle covers. Compared against the current
    /// instant on every write to decide rotation.
    opened_day: u32,
    /// The resolved path of the open file.
    path: PathBuf,
    /// Append-mode handle.
    file: fs::File,
}

/// A leveled logger writing to the console, per-level daily files and a
/// combined stream.
///
/// One instance owns all six sink slots. Handles are opened lazily on the
/// first record for a slot and swapped out when the UTC day changes;
/// nothing is pre-opened at construction and nothing is flushed or closed
/// at process exit beyond what dropping the handles does.
///
/// All level methods take `&mut self`: within one logger, writes are
/// strictly ordered and a rotation can never race a write. Wrap the logger
/// in a mutex before sharing it across threads.
pub struct GameLogger {
    meta: GameLoggerMeta,
    sinks: [Option<OpenSink>; SINK_COUNT],
}

impl GameLogger {
    /// Log at the error level. See [`GameLogger::log`].
    pub fn error(&mut self, values: &[&dyn fmt::Display]) {
        self.log(Level::Error, values);
    }

    /// Log at the warn level. See [`GameLogger::log`].
    pub fn warn(&mut self, values: &[&dyn fmt::Display]) {
        self.log(Level::Warn, values);
    }

    /// Log at the info level. See [`GameLogger::log`].
    pub fn info(&mut self, values: &[&dyn fmt::Display]) {
        self.log(Level::Info, values);
    }

    /// Log at the game level. See [`GameLogger::log`].
    pub fn game(&mut self, values: &[&dyn fmt::Display]) {
        self.log(Level::Game, values);
    }

    /// Log at the debug level. See [`GameLogger::log`].
    pub fn debug(&mut self, values: &[&dyn fmt::Display]) {
        self.log(Level::Debug, values);
    }

    /// Write one record: to the level's own file, to the combined file, and
    /// to the console.
    ///
    /// Values are converted to strings and space-joined. The file lines are
    /// stripped of ANSI styling and tagged with the level's padded label so
    /// the combined file preserves each line's origin; the console line
    /// keeps the caller's styling and colors the label per level.
    ///
    /// Never returns an error and never panics: directory, open and write
    /// failures degrade to a console diagnostic and the call completes, so
    /// a broken log directory cannot take down the host process. Log loss
    /// past the diagnostic is accepted.
    pub fn log(&mut self, level: Level, values: &[&dyn fmt::Display]) {
        let now = self.meta.now();
        let parts = TimeParts::from_datetime(now);
        let message = join_values(values);

        self.write_record(level.sink(), level, &parts, &message, now);
        self.write_record(COMBINED_SINK, level, &parts, &message, now);

        println!(
            "{} GMT > {} {}",
            parts.clock_stamp(),
            level.console_label(),
            message
        );
    }

    /// The path of a level's currently open file, if any. Useful for tests
    /// and for wrappers that report where logs are going.
    pub fn open_path(&self, level: Level) -> Option<&Path> {
        self.sinks[level.sink()]
            .as_ref()
            .map(|sink| sink.path.as_path())
    }

    fn write_record(
        &mut self,
        slot: usize,
        level: Level,
        parts: &TimeParts,
        message: &str,
        now: DateTime<Utc>,
    ) {
        let line = format!(
            "{} GMT > {}{}\n",
            parts.clock_stamp(),
            level.file_label(),
            strip_styles(message)
        );
        if let Err(err) = self.append_line(slot, now, &line) {
            eprintln!("{} GMT > {}", parts.clock_stamp(), err);
        }
    }

    fn append_line(
        &mut self,
        slot: usize,
        now: DateTime<Utc>,
        line: &str,
    ) -> Result<(), GameLogError> {
        let sink = self.ensure_sink(slot, now)?;
        let written = sink.file.write(line.as_bytes())?;
        if written < line.len() {
            return Err(GameLogError::ShortWrite {
                path: sink.path.to_owned(),
                written,
                expected: line.len(),
            });
        }
        Ok(())
    }

    /// Get the slot's sink, opening or rotating it first if needed.
    ///
    /// A sink is stale when the current UTC day-of-month differs from the
    /// one it was opened for; the old handle is dropped before the new file
    /// is opened. The check is deliberately coarse: a gap of exactly one or
    /// more full months lands on the same day-of-month and does not rotate.
    /// Across any shorter real day boundary the day-of-month changes and
    /// rotation fires, so the limitation is accepted rather than corrected.
    fn ensure_sink(
        &mut self,
        slot: usize,
        now: DateTime<Utc>,
    ) -> Result<&mut OpenSink, GameLogError> {
        let today = now.day();
        let sink = match self.sinks[slot].take() {
            Some(sink) if sink.opened_day == today => sink,
            stale => {
                // Close any old handle before the new one is opened.
                drop(stale);
                let path = resolve_path(&self.meta.directory, now, SINK_NAMES[slot]);
                let file = OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(&path)
                    .map_err(|err| {
                        GameLogError::OpenSinkFailed(path.to_owned(), err.to_string())
                    })?;
                OpenSink {
                    opened_day: today,
                    path,
                    file,
                }
            }
        };
        Ok(self.sinks[slot].insert(sink))
    }
}

fn join_values(values: &[&dyn fmt::Display]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builder for [`GameLogger`].
///
/// Defaults: log root `./logs`, wall clock. Construction is infallible —
/// no directory is touched and no file is opened until the first log call.
///
/// # Examples
///
/// ```rust,no_run
/// use gamelog::GameLoggerBuilder;
///
/// let mut logger = GameLoggerBuilder::new()
///     .directory("./logs")
///     .build();
/// logger.info(&[&"ready"]);
/// ```
pub struct GameLoggerBuilder {
    meta: GameLoggerMeta,
}

impl GameLoggerBuilder {
    /// Create a builder with the default log root and the system clock.
    pub fn new() -> Self {
        GameLoggerBuilder {
            meta: GameLoggerMeta {
                directory: PathBuf::from(DEFAULT_LOG_ROOT),
                clock: Box::new(SystemClock),
            },
        }
    }

    /// Set the root directory for the year/month/day log hierarchy.
    pub fn directory<P: AsRef<Path>>(self, directory: P) -> Self {
        Self {
            meta: GameLoggerMeta {
                directory: directory.as_ref().to_path_buf(),
                ..self.meta
            },
        }
    }

    /// Set the clock used to timestamp records and drive rotation.
    pub fn clock(self, clock: Box<dyn Clock>) -> Self {
        Self {
            meta: GameLoggerMeta { clock, ..self.meta },
        }
    }

    /// Build the logger. No filesystem work happens here.
    pub fn build(self) -> GameLogger {
        GameLogger {
            meta: self.meta,
            sinks: Default::default(),
        }
    }
}

impl Default for GameLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Log space-joined values at the error level.
#[macro_export]
macro_rules! log_error {
    ($logger:expr $(, $value:expr)+ $(,)?) => {
        $logger.error(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log space-joined values at the warn level.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr $(, $value:expr)+ $(,)?) => {
        $logger.warn(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log space-joined values at the info level.
#[macro_export]
macro_rules! log_info {
    ($logger:expr $(, $value:expr)+ $(,)?) => {
        $logger.info(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log space-joined values at the game level.
#[macro_export]
macro_rules! log_game {
    ($logger:expr $(, $value:expr)+ $(,)?) => {
        $logger.game(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

/// Log space-joined values at the debug level.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr $(, $value:expr)+ $(,)?) => {
        $logger.debug(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}
