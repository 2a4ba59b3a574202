use crate::errors::DbError;

use super::runner::OutputMode;

pub fn parse_output_mode(s: Option<&str>) -> OutputMode {
    match s.map(str::to_lowercase).as_deref() {
        Some("json") => OutputMode::Json,
        Some("plain" | "text") => OutputMode::Plain,
        _ => OutputMode::Human,
    }
}

/// Process exit status for a failed command: 2 for bad input, 3 for not found, 1 otherwise.
#[must_use]
pub const fn exit_code(err: &DbError) -> i32 {
    if err.is_client_error() {
        2
    } else if err.is_not_found() {
        3
    } else {
        1
    }
}
