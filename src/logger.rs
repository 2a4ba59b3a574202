//! Process-wide logging on top of `log4rs`.
//!
//! Three rolling files live in the log directory:
//! - `app.log`: everything routed to the root logger
//! - `audit.log`: one JSON line per document write (target `jobboard::audit`)
//! - `dev6.log`: developer bench lines from [`crate::dev6!`] when enabled (target `jobboard::dev6`)

use log::LevelFilter;
use log4rs::Handle;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const AUDIT_TARGET: &str = "jobboard::audit";
pub const DEV6_TARGET: &str = "jobboard::dev6";

const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

static HANDLE: OnceLock<Handle> = OnceLock::new();

#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling_appender(
    base: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    Ok(RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))?)
}

/// Configure logging globally for the process. Calling it again replaces the active config.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
/// - enable_dev6: also persist developer bench lines to `dev6.log`
///
/// # Errors
/// Returns an error if the directory or an appender cannot be created.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_dev6: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let base =
        dir.map(PathBuf::from).unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)?;
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let lvl = parse_level(level);

    let mut builder = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling_appender(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling_appender(&base, "audit", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl));

    builder = if enable_dev6 {
        builder
            .appender(Appender::builder().build("dev6", Box::new(rolling_appender(&base, "dev6", keep)?)))
            .logger(Logger::builder().appender("dev6").additive(false).build(DEV6_TARGET, LevelFilter::Trace))
    } else {
        builder.logger(Logger::builder().additive(false).build(DEV6_TARGET, LevelFilter::Off))
    };

    let config = builder.build(Root::builder().appender("app").build(lvl))?;
    if let Some(handle) = HANDLE.get() {
        handle.set_config(config);
    } else {
        let handle = log4rs::init_config(config)?;
        let _ = HANDLE.set(handle);
    }
    Ok(())
}

/// Configure logging from environment variables if present:
/// - JOBBOARD_LOG_DIR
/// - JOBBOARD_LOG_LEVEL
/// - JOBBOARD_LOG_RETENTION
/// - JOBBOARD_DEV6
///
/// # Errors
/// Same as [`configure_logging`].
pub fn configure_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::var("JOBBOARD_LOG_DIR").ok().map(PathBuf::from);
    let level = std::env::var("JOBBOARD_LOG_LEVEL").ok();
    let retention =
        std::env::var("JOBBOARD_LOG_RETENTION").ok().and_then(|s| s.parse::<usize>().ok());
    let dev6_enabled = std::env::var("JOBBOARD_DEV6")
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    configure_logging(dir.as_deref(), level.as_deref(), retention, dev6_enabled)
}

/// One JSON audit line per document write.
pub fn log_audit(op: &str, collection: &str, doc_id: &str) {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339(),
        "op": op,
        "collection": collection,
        "doc_id": doc_id,
    });
    log::info!(target: AUDIT_TARGET, "{line}");
}
