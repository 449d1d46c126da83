//! Network join retry policy.
//!
//! Candidates are tried in priority order, the whole list up to
//! [`JoinPolicy::passes`] times, stopping on the first success. A single
//! candidate is given a bounded number of status polls with a
//! status-dependent backoff before the next one is tried.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::error::WatchError;

/// One configured network, in priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkCandidate<'a> {
    /// Shown on screen while joining.
    pub label: &'a str,
    pub ssid: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
    Idle,
    NoSsid,
    ConnectFailed,
    ConnectionLost,
}

impl LinkStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "+ WiFi connected",
            Self::Disconnected => "Connection attempt",
            Self::Idle => "-WiFi idle status",
            Self::NoSsid => "-SSID unavailable",
            Self::ConnectFailed => "-Connection failed",
            Self::ConnectionLost => "-Connection lost",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JoinPolicy {
    /// Full passes over the candidate list.
    pub passes: u8,
    /// Status polls granted to one candidate.
    pub status_polls: u8,
    pub disconnected_backoff_ms: u32,
    pub failure_backoff_ms: u32,
    /// Pause after a candidate gave up, before the next one.
    pub candidate_gap_ms: u32,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self {
            passes: 3,
            status_polls: 15,
            disconnected_backoff_ms: 2_000,
            failure_backoff_ms: 250,
            candidate_gap_ms: 1_000,
        }
    }
}

/// Yields candidate indices in priority order, pass after pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JoinPlan {
    candidates: usize,
    passes: u8,
    pass: u8,
    next_index: usize,
}

impl JoinPlan {
    pub const fn new(candidates: usize, policy: &JoinPolicy) -> Self {
        Self {
            candidates,
            passes: policy.passes,
            pass: 0,
            next_index: 0,
        }
    }

    pub fn next_candidate(&mut self) -> Option<usize> {
        if self.candidates == 0 || self.pass >= self.passes {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;
        if self.next_index >= self.candidates {
            self.next_index = 0;
            self.pass += 1;
        }
        Some(index)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinStep {
    Connected,
    /// Poll the status again after this many milliseconds.
    Wait(u32),
    GiveUp,
}

/// Status polling for a single candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JoinAttempt {
    policy: JoinPolicy,
    polls: u8,
}

impl JoinAttempt {
    pub const fn new(policy: JoinPolicy) -> Self {
        Self { policy, polls: 0 }
    }

    pub const fn polls(&self) -> u8 {
        self.polls
    }

    pub fn observe(&mut self, status: LinkStatus) -> JoinStep {
        self.polls = self.polls.saturating_add(1);
        debug!("wifi: poll {} -> {:?}", self.polls, status);

        match status {
            LinkStatus::Connected => JoinStep::Connected,
            LinkStatus::NoSsid => JoinStep::GiveUp,
            _ if self.polls >= self.policy.status_polls => JoinStep::GiveUp,
            LinkStatus::Disconnected => JoinStep::Wait(self.policy.disconnected_backoff_ms),
            _ => JoinStep::Wait(self.policy.failure_backoff_ms),
        }
    }
}

/// Synchronous connectivity collaborator.
pub trait Connectivity {
    type Error: core::fmt::Debug;

    fn status(&mut self) -> LinkStatus;
    /// Starts associating; progress is observed through [`Self::status`].
    fn connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;
    fn disconnect(&mut self);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinOutcome {
    AlreadyConnected,
    /// Index into the candidate list.
    Joined(usize),
}

/// Blocking join over the whole retry budget. `on_candidate` fires before
/// each candidate is tried.
pub fn connect_with_retry<'a, C, D, F>(
    link: &mut C,
    candidates: &[NetworkCandidate<'a>],
    policy: JoinPolicy,
    delay: &mut D,
    force_refresh: bool,
    mut on_candidate: F,
) -> Result<JoinOutcome, WatchError>
where
    C: Connectivity,
    D: DelayNs,
    F: FnMut(&NetworkCandidate<'a>),
{
    if candidates.is_empty() {
        warn!("wifi: no networks configured");
        return Err(WatchError::NoNetworksConfigured);
    }

    if !force_refresh && link.status() == LinkStatus::Connected {
        return Ok(JoinOutcome::AlreadyConnected);
    }

    link.disconnect();
    let mut plan = JoinPlan::new(candidates.len(), &policy);

    while let Some(index) = plan.next_candidate() {
        let candidate = &candidates[index];
        on_candidate(candidate);
        info!("wifi: trying {}", candidate.label);

        link.disconnect();
        if let Err(err) = link.connect(candidate.ssid, candidate.password) {
            warn!("wifi: connect to {} rejected: {:?}", candidate.label, err);
        } else {
            let mut attempt = JoinAttempt::new(policy);
            loop {
                match attempt.observe(link.status()) {
                    JoinStep::Connected => {
                        info!("wifi: joined {}", candidate.label);
                        return Ok(JoinOutcome::Joined(index));
                    }
                    JoinStep::Wait(ms) => delay.delay_ms(ms),
                    JoinStep::GiveUp => break,
                }
            }
        }

        delay.delay_ms(policy.candidate_gap_ms);
    }

    warn!("wifi: unable to join any network");
    Err(WatchError::ConnectivityUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLink {
        joinable: &'static str,
        missing: &'static [&'static str],
        polls_to_join: u8,
        reject: bool,
        current: Option<String>,
        polls: u8,
        connects: Vec<String>,
        disconnects: u32,
    }

    impl FakeLink {
        fn new(joinable: &'static str, polls_to_join: u8) -> Self {
            Self {
                joinable,
                missing: &[],
                polls_to_join,
                reject: false,
                current: None,
                polls: 0,
                connects: Vec::new(),
                disconnects: 0,
            }
        }
    }

    impl Connectivity for FakeLink {
        type Error = ();

        fn status(&mut self) -> LinkStatus {
            let Some(current) = self.current.as_deref() else {
                return LinkStatus::Idle;
            };
            if self.missing.iter().any(|missing| *missing == current) {
                return LinkStatus::NoSsid;
            }
            if current != self.joinable {
                return LinkStatus::Disconnected;
            }
            self.polls += 1;
            if self.polls >= self.polls_to_join {
                LinkStatus::Connected
            } else {
                LinkStatus::Disconnected
            }
        }

        fn connect(&mut self, ssid: &str, _password: &str) -> Result<(), Self::Error> {
            self.connects.push(ssid.to_string());
            if self.reject {
                return Err(());
            }
            self.current = Some(ssid.to_string());
            self.polls = 0;
            Ok(())
        }

        fn disconnect(&mut self) {
            self.current = None;
            self.disconnects += 1;
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        waits: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.waits.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.waits.push(ms);
        }
    }

    const CANDIDATES: [NetworkCandidate<'static>; 2] = [
        NetworkCandidate {
            label: "Home",
            ssid: "home-ssid",
            password: "home-pass",
        },
        NetworkCandidate {
            label: "Work",
            ssid: "work-ssid",
            password: "work-pass",
        },
    ];

    #[test]
    fn plan_walks_the_list_three_times() {
        let mut plan = JoinPlan::new(2, &JoinPolicy::default());
        let mut order = Vec::new();
        while let Some(index) = plan.next_candidate() {
            order.push(index);
        }
        assert_eq!(order, [0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn empty_plan_yields_nothing() {
        let mut plan = JoinPlan::new(0, &JoinPolicy::default());
        assert_eq!(plan.next_candidate(), None);
    }

    #[test]
    fn attempt_backs_off_by_status_and_gives_up_after_budget() {
        let policy = JoinPolicy::default();
        let mut attempt = JoinAttempt::new(policy);

        assert_eq!(
            attempt.observe(LinkStatus::Disconnected),
            JoinStep::Wait(2_000)
        );
        assert_eq!(
            attempt.observe(LinkStatus::ConnectFailed),
            JoinStep::Wait(250)
        );
        for _ in 2..14 {
            assert!(matches!(
                attempt.observe(LinkStatus::Idle),
                JoinStep::Wait(_)
            ));
        }
        assert_eq!(attempt.observe(LinkStatus::Idle), JoinStep::GiveUp);
        assert_eq!(attempt.polls(), 15);
    }

    #[test]
    fn missing_ssid_gives_up_immediately() {
        let mut attempt = JoinAttempt::new(JoinPolicy::default());
        assert_eq!(attempt.observe(LinkStatus::NoSsid), JoinStep::GiveUp);
    }

    #[test]
    fn joins_the_first_reachable_candidate_in_priority_order() {
        let mut link = FakeLink::new("work-ssid", 3);
        let mut delay = RecordingDelay::default();
        let mut shown = Vec::new();

        let outcome = connect_with_retry(
            &mut link,
            &CANDIDATES,
            JoinPolicy::default(),
            &mut delay,
            false,
            |candidate| shown.push(candidate.label),
        );

        assert_eq!(outcome, Ok(JoinOutcome::Joined(1)));
        assert_eq!(shown, ["Home", "Work"]);
        assert_eq!(link.connects, ["home-ssid", "work-ssid"]);
        // Home: 14 backoffs then gives up, then the candidate gap.
        assert_eq!(delay.waits[..14], [2_000; 14]);
        assert_eq!(delay.waits[14], 1_000);
        // Work: joined on the third poll.
        assert_eq!(delay.waits[15..], [2_000, 2_000]);
    }

    #[test]
    fn unreachable_networks_exhaust_three_passes() {
        let mut link = FakeLink::new("elsewhere", 1);
        link.missing = &["home-ssid", "work-ssid"];
        let mut delay = RecordingDelay::default();

        let outcome = connect_with_retry(
            &mut link,
            &CANDIDATES,
            JoinPolicy::default(),
            &mut delay,
            false,
            |_| {},
        );

        assert_eq!(outcome, Err(WatchError::ConnectivityUnavailable));
        assert_eq!(link.connects.len(), 6);
        assert_eq!(delay.waits, [1_000; 6]);
    }

    #[test]
    fn rejected_connect_moves_on() {
        let mut link = FakeLink::new("home-ssid", 1);
        link.reject = true;
        let mut delay = RecordingDelay::default();

        let outcome = connect_with_retry(
            &mut link,
            &CANDIDATES,
            JoinPolicy::default(),
            &mut delay,
            false,
            |_| {},
        );

        assert_eq!(outcome, Err(WatchError::ConnectivityUnavailable));
        assert_eq!(link.connects.len(), 6);
    }

    #[test]
    fn empty_list_is_reported_as_not_configured() {
        let mut link = FakeLink::new("home-ssid", 1);
        let mut delay = RecordingDelay::default();

        let outcome = connect_with_retry(
            &mut link,
            &[],
            JoinPolicy::default(),
            &mut delay,
            true,
            |_| {},
        );

        assert_eq!(outcome, Err(WatchError::NoNetworksConfigured));
        assert!(link.connects.is_empty());
    }

    #[test]
    fn existing_link_is_kept_unless_refresh_is_forced() {
        let mut link = FakeLink::new("home-ssid", 1);
        link.current = Some("home-ssid".to_string());
        let mut delay = RecordingDelay::default();

        let outcome = connect_with_retry(
            &mut link,
            &CANDIDATES,
            JoinPolicy::default(),
            &mut delay,
            false,
            |_| {},
        );
        assert_eq!(outcome, Ok(JoinOutcome::AlreadyConnected));
        assert!(link.connects.is_empty());

        let outcome = connect_with_retry(
            &mut link,
            &CANDIDATES,
            JoinPolicy::default(),
            &mut delay,
            true,
            |_| {},
        );
        assert_eq!(outcome, Ok(JoinOutcome::Joined(0)));
        assert!(link.disconnects >= 2);
    }
}
