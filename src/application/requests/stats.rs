use crate::domain::request::{RequestKind, StatusCounts};

/// Dashboard aggregates over both request collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub concrete: StatusCounts,
    pub steel: StatusCounts,
    pub total_users: u64,
}

impl RequestStats {
    pub fn new(concrete: StatusCounts, steel: StatusCounts, total_users: u64) -> Self {
        Self {
            concrete,
            steel,
            total_users,
        }
    }

    pub fn of(&self, kind: RequestKind) -> &StatusCounts {
        match kind {
            RequestKind::Concrete => &self.concrete,
            RequestKind::Steel => &self.steel,
        }
    }

    /// Completed requests of both kinds
    pub fn completed(&self) -> u64 {
        self.concrete.completed + self.steel.completed
    }

    pub fn pending(&self) -> u64 {
        self.concrete.pending + self.steel.pending
    }

    pub fn total_requests(&self) -> u64 {
        self.concrete.total + self.steel.total
    }
}

/// One buyer's counters over their own requests of both kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnRequestStats {
    pub concrete: StatusCounts,
    pub steel: StatusCounts,
}

impl OwnRequestStats {
    pub fn total(&self) -> u64 {
        self.concrete.total + self.steel.total
    }

    /// Includes requests whose status was never set
    pub fn pending(&self) -> u64 {
        self.concrete.pending + self.steel.pending
    }

    pub fn completed(&self) -> u64 {
        self.concrete.completed + self.steel.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_sums_both_kinds() {
        let concrete = StatusCounts::from_groups(vec![(None, 1), (Some("completed".into()), 1)]);
        let steel = StatusCounts::from_groups(vec![(Some("closed".into()), 2)]);
        let stats = RequestStats::new(concrete, steel, 4);

        assert_eq!(stats.of(RequestKind::Concrete).pending, 1);
        assert_eq!(stats.of(RequestKind::Concrete).completed, 1);
        assert_eq!(stats.completed(), 3);
        assert_eq!(stats.pending(), 1);
        assert_eq!(stats.total_requests(), 4);
    }

    #[test]
    fn own_counters_sum_both_kinds() {
        let own = OwnRequestStats {
            concrete: StatusCounts::from_groups(vec![(None, 2), (Some("approved".into()), 1)]),
            steel: StatusCounts::from_groups(vec![(Some("pending".into()), 1), (Some("closed".into()), 1)]),
        };
        assert_eq!(own.total(), 5);
        assert_eq!(own.pending(), 3);
        assert_eq!(own.completed(), 1);
    }
}
