//! Retry budget and backoff schedule for failed jobs

use std::time::Duration;

/// What to do with a job after a failed handler run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Put the job back on the queue after the given delay
    Retry(Duration),
    /// Retry budget exhausted; drop the job
    Discard,
}

/// Bounded exponential backoff policy
///
/// A job is run at most `max_attempts` times in total. After the Nth failed
/// run the job waits `backoff[N - 1]` before the next run; schedules shorter
/// than the budget repeat their last entry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Vec<Duration>,
}

impl RetryPolicy {
    /// Creates a policy from an attempt budget and a backoff schedule in
    /// milliseconds
    pub fn new(max_attempts: u32, backoff_ms: &[u64]) -> Self {
        Self {
            max_attempts,
            backoff: backoff_ms.iter().map(|ms| Duration::from_millis(*ms)).collect(),
        }
    }

    /// Total number of handler runs a job is allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides the fate of a job after `attempts_made` failed runs
    ///
    /// `attempts_made` counts completed runs including the one that just
    /// failed, so the first failure passes 1.
    pub fn decide(&self, attempts_made: u32) -> RetryDecision {
        if attempts_made >= self.max_attempts {
            return RetryDecision::Discard;
        }
        let delay = self
            .backoff
            .get(attempts_made.saturating_sub(1) as usize)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO);
        RetryDecision::Retry(delay)
    }
}

impl Default for RetryPolicy {
    /// Three runs with 1s, 2s, 4s between them
    fn default() -> Self {
        Self::new(3, &[1000, 2000, 4000])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.decide(1), RetryDecision::Retry(Duration::from_secs(1)));
        assert_eq!(policy.decide(2), RetryDecision::Retry(Duration::from_secs(2)));
        assert_eq!(policy.decide(3), RetryDecision::Discard);
    }

    #[test]
    fn test_no_attempts_beyond_budget() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.decide(4), RetryDecision::Discard);
        assert_eq!(policy.decide(100), RetryDecision::Discard);
    }

    #[test]
    fn test_short_schedule_repeats_last_entry() {
        let policy = RetryPolicy::new(5, &[500]);

        assert_eq!(policy.decide(1), RetryDecision::Retry(Duration::from_millis(500)));
        assert_eq!(policy.decide(4), RetryDecision::Retry(Duration::from_millis(500)));
        assert_eq!(policy.decide(5), RetryDecision::Discard);
    }

    #[test]
    fn test_empty_schedule_retries_immediately() {
        let policy = RetryPolicy::new(2, &[]);

        assert_eq!(policy.decide(1), RetryDecision::Retry(Duration::ZERO));
    }
}
