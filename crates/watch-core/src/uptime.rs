//! Whole seconds since boot, derived from a free-running millisecond counter.

const MS_PER_SECOND: u32 = 1_000;
const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u32 = 24 * SECONDS_PER_HOUR;

/// Up-time counter fed by a 32-bit millisecond tick source.
///
/// The tick source may wrap (every ~49.7 days); differences are taken with
/// wrapping subtraction so a wrap between two calls still yields the true
/// small elapsed interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UpTimeClock {
    elapsed_seconds: u32,
    last_tick_ms: u32,
}

impl UpTimeClock {
    /// Starts counting from `now_ms` with zero elapsed seconds.
    pub const fn new(now_ms: u32) -> Self {
        Self {
            elapsed_seconds: 0,
            last_tick_ms: now_ms,
        }
    }

    /// Folds every full second elapsed since the last call into the counter.
    pub fn tick(&mut self, now_ms: u32) -> u32 {
        while now_ms.wrapping_sub(self.last_tick_ms) >= MS_PER_SECOND {
            self.elapsed_seconds = self.elapsed_seconds.wrapping_add(1);
            self.last_tick_ms = self.last_tick_ms.wrapping_add(MS_PER_SECOND);
        }
        self.elapsed_seconds
    }

    pub const fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }
}

/// Up-time split into display units.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UpTimeParts {
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl UpTimeParts {
    pub const fn from_seconds(elapsed: u32) -> Self {
        Self {
            days: elapsed / SECONDS_PER_DAY,
            hours: ((elapsed / SECONDS_PER_HOUR) % 24) as u8,
            minutes: ((elapsed / SECONDS_PER_MINUTE) % 60) as u8,
            seconds: (elapsed % 60) as u8,
        }
    }
}
