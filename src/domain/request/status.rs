//! Request lifecycle status
//!
//! One canonical enumeration is written by this service. Older clients wrote
//! `open`/`in_progress`/`selected`/`closed`; those spellings are still read.

use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Completed,
    ];

    /// Status every new request starts in.
    pub const INITIAL: RequestStatus = RequestStatus::Pending;

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }

    /// Every spelling found in the store that reads back as this status.
    pub fn stored_spellings(&self) -> &'static [&'static str] {
        match self {
            RequestStatus::Pending => &["pending", "open", "in_progress"],
            RequestStatus::Approved => &["approved", "selected"],
            RequestStatus::Rejected => &["rejected"],
            RequestStatus::Completed => &["completed", "closed"],
        }
    }

    /// Decode a stored status column. Unrecognised values decode as unset.
    pub fn from_stored(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.stored_spellings().contains(&raw))
    }
}

/// Unset statuses count as pending.
pub fn counts_as_pending(status: Option<RequestStatus>) -> bool {
    matches!(status, None | Some(RequestStatus::Pending))
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    /// Strict parse used for caller input: only canonical names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Unknown status '{}', expected one of pending, approved, rejected, completed",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_spellings_read_as_canonical_states() {
        assert_eq!(RequestStatus::from_stored("open"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::from_stored("in_progress"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::from_stored("selected"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::from_stored("closed"), Some(RequestStatus::Completed));
        assert_eq!(RequestStatus::from_stored("completed"), Some(RequestStatus::Completed));
        assert_eq!(RequestStatus::from_stored("archived"), None);
    }

    #[test]
    fn caller_input_accepts_only_canonical_names() {
        assert_eq!("rejected".parse::<RequestStatus>().unwrap(), RequestStatus::Rejected);
        assert!("open".parse::<RequestStatus>().is_err());
        assert!("".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn unset_and_pending_both_count_as_pending() {
        assert!(counts_as_pending(None));
        assert!(counts_as_pending(Some(RequestStatus::Pending)));
        assert!(!counts_as_pending(Some(RequestStatus::Completed)));
    }
}
