use serde::Serialize;

use crate::worker::RingStats;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpreadMetrics {
    pub rings: usize,
    pub gaining_contributions: u64,
    pub losing_contributions: u64,
    pub positions_checked: u64,
    pub positions_rejected: u64,
    pub result_entries: usize,
}

impl SpreadMetrics {
    pub fn record_ring(&mut self, stats: &RingStats) {
        self.gaining_contributions += stats.gaining;
        self.losing_contributions += stats.losing;
        self.positions_checked += stats.checked;
        self.positions_rejected += stats.rejected;
    }
}
