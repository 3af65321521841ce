//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a `Timestamp` in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
///
/// Runs store UTC timestamps; this wrapper is only for human-facing output.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
