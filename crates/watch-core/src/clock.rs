//! Wall-clock time as up-time plus a network-derived offset.

use log::info;

use crate::{
    calendar::{self, CalendarFields, TzRule},
    uptime::UpTimeClock,
};

/// Owns the up-time counter and the `TimeOffset` correction.
///
/// `wall_clock_epoch() == elapsed_seconds() + offset()` holds at all times.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WallClock {
    uptime: UpTimeClock,
    offset: i64,
}

impl WallClock {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            uptime: UpTimeClock::new(now_ms),
            offset: 0,
        }
    }

    pub fn tick(&mut self, now_ms: u32) -> u32 {
        self.uptime.tick(now_ms)
    }

    pub const fn elapsed_seconds(&self) -> u32 {
        self.uptime.elapsed_seconds()
    }

    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Current UTC epoch.
    pub const fn wall_clock_epoch(&self) -> i64 {
        self.uptime.elapsed_seconds() as i64 + self.offset
    }

    /// Calendar fields of the current local time.
    pub fn local_fields(&self, tz: &TzRule) -> CalendarFields {
        calendar::decode(tz.to_local(self.wall_clock_epoch()))
    }

    /// Signed drift of the local clock against a freshly fetched epoch.
    pub const fn difference_to(&self, fetched_epoch: i64) -> i64 {
        self.wall_clock_epoch() - fetched_epoch
    }

    /// Re-anchors the wall clock so that it reads `fetched_epoch` right now.
    pub fn commit(&mut self, fetched_epoch: i64) {
        let previous = self.offset;
        self.offset = fetched_epoch - self.uptime.elapsed_seconds() as i64;
        info!(
            "clock: offset committed {} -> {} (uptime={}s)",
            previous,
            self.offset,
            self.uptime.elapsed_seconds()
        );
    }
}
