//! Bounded-retry network time fetch.
//!
//! [`TimeSync`] is the non-blocking form: the caller asks whether an attempt
//! is due, performs one reading and records it. [`fetch`] drives the same
//! machine in a blocking loop over a synchronous [`TimeSource`].

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::calendar;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyncPolicy {
    pub max_attempts: u16,
    pub attempt_delay_ms: u32,
    /// Wall time one fetch may take, counted from [`TimeSync::new`].
    pub max_duration_ms: u32,
    /// Readings must decode to a year strictly greater than this.
    pub min_valid_year: i32,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            attempt_delay_ms: 25,
            max_duration_ms: 10_000,
            min_valid_year: 2016,
        }
    }
}

impl SyncPolicy {
    /// Rejects the epoch-start placeholder time sources report before first contact.
    pub fn accepts(&self, reading: TimeReading) -> bool {
        reading.valid && calendar::decode(reading.epoch).year > self.min_valid_year
    }
}

/// One raw answer from the time source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeReading {
    pub epoch: i64,
    pub valid: bool,
}

impl TimeReading {
    pub const INVALID: Self = Self {
        epoch: 0,
        valid: false,
    };

    pub const fn new(epoch: i64, valid: bool) -> Self {
        Self { epoch, valid }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetworkTimeResult {
    Valid(i64),
    Invalid,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncStep {
    /// Reading rejected; `attempt` attempts have been spent so far.
    Retry { attempt: u16 },
    Done(NetworkTimeResult),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeSync {
    policy: SyncPolicy,
    attempts: u16,
    started_ms: u32,
    last_attempt_ms: Option<u32>,
    outcome: Option<NetworkTimeResult>,
}

impl TimeSync {
    pub const fn new(policy: SyncPolicy, now_ms: u32) -> Self {
        Self {
            policy,
            attempts: 0,
            started_ms: now_ms,
            last_attempt_ms: None,
            outcome: if policy.max_attempts == 0 {
                Some(NetworkTimeResult::Invalid)
            } else {
                None
            },
        }
    }

    pub const fn attempts(&self) -> u16 {
        self.attempts
    }

    pub const fn max_attempts(&self) -> u16 {
        self.policy.max_attempts
    }

    pub const fn outcome(&self) -> Option<NetworkTimeResult> {
        self.outcome
    }

    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// 0..=100, whichever of the attempt and time budgets is further spent.
    pub fn progress_pct(&self) -> u8 {
        let max = self.policy.max_attempts.max(1) as u32;
        let by_attempts = (self.attempts as u32 * 100) / max;
        let by_time = self.last_attempt_ms.map_or(0, |last| {
            let spent = u64::from(last.wrapping_sub(self.started_ms)) * 100;
            (spent / u64::from(self.policy.max_duration_ms.max(1))) as u32
        });
        by_attempts.max(by_time).min(100) as u8
    }

    fn deadline_passed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.started_ms) >= self.policy.max_duration_ms
    }

    /// First attempt is due immediately, later ones `attempt_delay_ms` apart.
    pub fn attempt_due(&self, now_ms: u32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.last_attempt_ms
            .is_none_or(|last| now_ms.wrapping_sub(last) >= self.policy.attempt_delay_ms)
    }

    pub fn record(&mut self, reading: TimeReading, now_ms: u32) -> SyncStep {
        if let Some(outcome) = self.outcome {
            return SyncStep::Done(outcome);
        }

        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt_ms = Some(now_ms);

        if self.policy.accepts(reading) {
            info!(
                "sync: accepted epoch {} after {} attempt(s)",
                reading.epoch, self.attempts
            );
            let outcome = NetworkTimeResult::Valid(reading.epoch);
            self.outcome = Some(outcome);
            return SyncStep::Done(outcome);
        }

        debug!(
            "sync: attempt {}/{} rejected (epoch={} valid={})",
            self.attempts, self.policy.max_attempts, reading.epoch, reading.valid
        );

        if self.attempts >= self.policy.max_attempts {
            info!("sync: attempt budget exhausted");
            self.outcome = Some(NetworkTimeResult::Invalid);
            return SyncStep::Done(NetworkTimeResult::Invalid);
        }

        if self.deadline_passed(now_ms) {
            info!(
                "sync: gave up after {}ms and {} attempt(s)",
                now_ms.wrapping_sub(self.started_ms),
                self.attempts
            );
            self.outcome = Some(NetworkTimeResult::Invalid);
            return SyncStep::Done(NetworkTimeResult::Invalid);
        }

        SyncStep::Retry {
            attempt: self.attempts,
        }
    }
}

/// Single blocking best-effort epoch reading.
pub trait TimeSource {
    fn fetch_epoch(&mut self) -> TimeReading;
}

/// Blocking bounded-retry fetch. `on_retry` receives the attempt count and
/// progress percentage after every rejected reading.
pub fn fetch<S, D, F>(
    source: &mut S,
    policy: SyncPolicy,
    delay: &mut D,
    mut on_retry: F,
) -> NetworkTimeResult
where
    S: TimeSource,
    D: DelayNs,
    F: FnMut(u16, u8),
{
    let mut sync = TimeSync::new(policy, 0);
    let mut now_ms = 0u32;

    loop {
        if let Some(outcome) = sync.outcome() {
            return outcome;
        }

        match sync.record(source.fetch_epoch(), now_ms) {
            SyncStep::Done(outcome) => return outcome,
            SyncStep::Retry { attempt } => {
                on_retry(attempt, sync.progress_pct());
                delay.delay_ms(policy.attempt_delay_ms);
                now_ms = now_ms.wrapping_add(policy.attempt_delay_ms);
            }
        }
    }
}
