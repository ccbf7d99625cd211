use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// year.month.day hour:minute
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M";

/// Render in local time, or UTC when `utc` is set.
///
/// `format` must have passed [`is_valid_timestamp_format`]; chrono panics
/// while displaying an invalid pattern.
pub fn format_timestamp(ts: DateTime<Utc>, format: &str, utc: bool) -> String {
    if utc {
        ts.format(format).to_string()
    } else {
        ts.with_timezone(&Local).format(format).to_string()
    }
}

pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
