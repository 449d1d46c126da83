//! Runtime tunables and the build-time network list format.

use heapless::Vec;
use log::warn;

use crate::{
    calendar::TzRule, connectivity::JoinPolicy, connectivity::NetworkCandidate, sync::SyncPolicy,
};

pub const MAX_NETWORKS: usize = 8;

pub type NetworkList<'a> = Vec<NetworkCandidate<'a>, MAX_NETWORKS>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WatchConfig {
    pub idle_timeout_ms: u32,
    /// How long compare, sync and up-time screens stay up.
    pub mode_hold_ms: u32,
    /// Edges are ignored for this long after a wake.
    pub wake_settle_ms: u32,
    pub sync: SyncPolicy,
    pub join: JoinPolicy,
    pub brightness: u8,
    pub tz: TzRule,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 10_000,
            mode_hold_ms: 2_500,
            wake_settle_ms: 250,
            sync: SyncPolicy::default(),
            join: JoinPolicy::default(),
            brightness: 207,
            tz: TzRule::default(),
        }
    }
}

/// Parses `label:ssid:password;label:ssid:password`.
///
/// The password is everything after the second colon and may be empty for
/// open networks. Malformed entries are skipped; entries beyond
/// [`MAX_NETWORKS`] are dropped.
pub fn parse_networks(raw: &str) -> NetworkList<'_> {
    let mut networks = NetworkList::new();

    for entry in raw.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        let (Some(label), Some(ssid), Some(password)) = (parts.next(), parts.next(), parts.next())
        else {
            warn!("config: skipping malformed network entry");
            continue;
        };
        if label.is_empty() || ssid.is_empty() {
            warn!("config: skipping network entry without label or ssid");
            continue;
        }

        if networks
            .push(NetworkCandidate {
                label,
                ssid,
                password,
            })
            .is_err()
        {
            warn!("config: more than {} networks, rest ignored", MAX_NETWORKS);
            break;
        }
    }

    networks
}
