//! Deadline tracking for the search driver (spec §4.6.5). Grounded on the
//! teacher's `time_man.rs`: an absolute `Instant` deadline plus an amortized
//! check so hot recursive calls don't hit the clock on every node.

use std::time::{Duration, Instant};

/// Safety margin subtracted from the caller's budget before computing the
/// deadline (spec §4.6.1 step 1: "safety ~= 20-50 ms"). Must be at least the
/// worst observed single-node latency (spec §4.6.5).
pub const SAFETY_MARGIN_MS: u64 = 30;

/// An absolute instant past which the search must stop expanding nodes.
/// Consulted by `alphabeta`, `quiesce`, and the iterative-deepening driver
/// (spec §4.6.5: "All three ... consult it on entry").
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Builds a deadline `time_budget_ms` from now, minus the safety margin.
    /// A budget smaller than the margin clamps to zero rather than panic,
    /// so a pathologically tight budget still returns immediately instead
    /// of computing a deadline in the past relative to `now`.
    #[must_use]
    pub fn from_budget(time_budget_ms: u64) -> Self {
        let budget = Duration::from_millis(time_budget_ms);
        let margin = Duration::from_millis(SAFETY_MARGIN_MS);
        let usable = budget.checked_sub(margin).unwrap_or(Duration::ZERO);
        Self { at: Instant::now() + usable }
    }

    #[must_use]
    pub fn has_passed(self) -> bool {
        Instant::now() >= self.at
    }
}

/// A sticky "time is up" flag set the first time [`Deadline::has_passed`]
/// returns true, amortized by only polling the clock every 2048 nodes
/// (the teacher's `TimeMan::check_stop` skips the syscall for low bits of
/// the node counter the same way). Once tripped it never un-trips for the
/// lifetime of one `search` call.
#[derive(Debug)]
pub struct TimeCheck {
    deadline: Deadline,
    tripped: bool,
    polls: u64,
}

const POLL_INTERVAL_MASK: u64 = 0x7FF;

impl TimeCheck {
    #[must_use]
    pub fn new(deadline: Deadline) -> Self {
        Self { deadline, tripped: false, polls: 0 }
    }

    /// Checks the deadline, amortized. Always returns true once tripped.
    pub fn poll(&mut self) -> bool {
        if self.tripped {
            return true;
        }
        self.polls += 1;
        if self.polls & POLL_INTERVAL_MASK != 0 {
            return false;
        }
        if self.deadline.has_passed() {
            self.tripped = true;
        }
        self.tripped
    }

    /// Unconditional deadline check, bypassing the poll-interval sampling.
    /// Used at the top of the iterative-deepening loop, where a single
    /// extra syscall per depth is free.
    pub fn poll_now(&mut self) -> bool {
        if !self.tripped && self.deadline.has_passed() {
            self.tripped = true;
        }
        self.tripped
    }

    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_deadline_has_already_passed() {
        let deadline = Deadline::from_budget(0);
        assert!(deadline.has_passed());
    }

    #[test]
    fn generous_budget_has_not_passed_immediately() {
        let deadline = Deadline::from_budget(10_000);
        assert!(!deadline.has_passed());
    }

    #[test]
    fn poll_now_trips_immediately_on_expired_deadline() {
        let mut check = TimeCheck::new(Deadline::from_budget(0));
        assert!(check.poll_now());
        assert!(check.is_tripped());
    }
}
