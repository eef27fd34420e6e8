//! Point-in-time buffer accounting

use core::fmt;

/// Snapshot of a queue's accounting
///
/// At every snapshot `pushed == popped + len` holds, and `consumed` trails
/// `popped` by at most one item (the consumer handles items one at a time).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueStats {
    /// Configured bound
    pub capacity: usize,
    /// Items currently buffered
    pub len: usize,
    /// Items accepted from the producer
    pub pushed: u64,
    /// Items taken out of the buffer by the consumption task
    pub popped: u64,
    /// Items the consumer finished handling
    pub consumed: u64,
    /// Largest `len` observed during the run
    pub high_water_mark: usize,
    /// The producer returned its end-of-stream sentinel
    pub ended: bool,
    /// The run was stopped after a failure
    pub aborted: bool,
}

impl QueueStats {
    /// Items popped but not yet (or never) handled to completion
    pub fn in_flight(&self) -> u64 {
        self.popped.saturating_sub(self.consumed)
    }

    /// Items accepted from the producer that never completed consumption
    pub fn incomplete(&self) -> u64 {
        self.pushed.saturating_sub(self.consumed)
    }

    /// Production ended and every item was consumed
    pub fn is_complete(&self) -> bool {
        self.ended && self.len == 0 && self.in_flight() == 0
    }
}

impl fmt::Display for QueueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "len={}/{} pushed={} popped={} consumed={} peak={}",
            self.len, self.capacity, self.pushed, self.popped, self.consumed, self.high_water_mark
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_counts() {
        let stats = QueueStats {
            capacity: 4,
            len: 2,
            pushed: 9,
            popped: 7,
            consumed: 6,
            high_water_mark: 4,
            ended: false,
            aborted: true,
        };
        assert_eq!(stats.in_flight(), 1);
        assert_eq!(stats.incomplete(), 3);
        assert!(!stats.is_complete());
        assert_eq!(
            stats.to_string(),
            "len=2/4 pushed=9 popped=7 consumed=6 peak=4"
        );
    }

    #[test]
    fn test_complete_run() {
        let stats = QueueStats {
            capacity: 4,
            pushed: 3,
            popped: 3,
            consumed: 3,
            high_water_mark: 2,
            ended: true,
            ..QueueStats::default()
        };
        assert!(stats.is_complete());
        assert_eq!(stats.incomplete(), 0);
    }
}
