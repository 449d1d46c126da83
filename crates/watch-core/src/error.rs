//! Recoverable failures surfaced to the user by the mode controller.

use core::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WatchError {
    /// No network joined after the whole retry budget.
    ConnectivityUnavailable,
    /// Every fetch attempt returned an implausible time.
    TimeSyncInvalid,
    /// The candidate network list is empty.
    NoNetworksConfigured,
}

impl WatchError {
    /// Whether the user should be told there is no Wi-Fi.
    pub const fn is_connectivity(self) -> bool {
        matches!(
            self,
            Self::ConnectivityUnavailable | Self::NoNetworksConfigured
        )
    }
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectivityUnavailable => f.write_str("no network joined"),
            Self::TimeSyncInvalid => f.write_str("no plausible time received"),
            Self::NoNetworksConfigured => f.write_str("no networks configured"),
        }
    }
}
