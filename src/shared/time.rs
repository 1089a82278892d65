//! Timestamp helpers for record modification stamps.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision every store keeps.
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next modification stamp for a record last modified at `previous`.
///
/// Always strictly greater than `previous`, even when the clock has not
/// advanced (or went backwards) since the previous write.
pub fn next_modification(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_micros();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
