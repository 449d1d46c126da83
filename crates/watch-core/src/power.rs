//! Screen on/off state with an idle timeout and a stay-on override.

use log::info;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerCommand {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScreenPower {
    is_on: bool,
    idle_deadline_ms: u32,
    stay_on: bool,
    timeout_ms: u32,
}

impl ScreenPower {
    /// Screen starts on with the idle timer anchored at `now_ms`.
    pub const fn new(timeout_ms: u32, now_ms: u32) -> Self {
        Self {
            is_on: true,
            idle_deadline_ms: now_ms,
            stay_on: false,
            timeout_ms,
        }
    }

    pub const fn is_on(&self) -> bool {
        self.is_on
    }

    pub const fn stay_on(&self) -> bool {
        self.stay_on
    }

    pub const fn idle_deadline_ms(&self) -> u32 {
        self.idle_deadline_ms
    }

    /// Absolute distance to the idle anchor, safe across tick wraparound.
    fn idle_for(&self, now_ms: u32) -> u32 {
        (now_ms.wrapping_sub(self.idle_deadline_ms) as i32).unsigned_abs()
    }

    pub fn check_idle(&mut self, now_ms: u32) -> Option<PowerCommand> {
        if !self.is_on || self.stay_on {
            return None;
        }
        if self.idle_for(now_ms) > self.timeout_ms {
            info!("power: idle timeout, screen off");
            self.is_on = false;
            return Some(PowerCommand::Off);
        }
        None
    }

    /// Restarts the idle timer.
    pub fn touch(&mut self, now_ms: u32) {
        self.idle_deadline_ms = now_ms;
    }

    /// Turns the screen on if it was off. Always restarts the idle timer.
    pub fn wake(&mut self, now_ms: u32) -> Option<PowerCommand> {
        self.touch(now_ms);
        if self.is_on {
            return None;
        }
        info!("power: wake");
        self.is_on = true;
        Some(PowerCommand::On)
    }

    pub fn toggle_stay_on(&mut self) -> bool {
        self.stay_on = !self.stay_on;
        info!("power: stay-on override {}", self.stay_on);
        self.stay_on
    }
}
