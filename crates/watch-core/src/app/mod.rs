//! Mode controller: button dispatch, transient modes and screen power.
//!
//! The controller never blocks. Network work is requested through
//! [`WatchApp::pending_request`] and its outcome reported back with
//! [`WatchApp::on_connectivity`] and [`WatchApp::on_time_reading`].

use log::{debug, info, warn};

use crate::{
    calendar::{self, CalendarFields},
    clock::WallClock,
    config::WatchConfig,
    error::WatchError,
    input::{Button, ButtonEdges, InputEvent, InputProvider},
    power::{PowerCommand, ScreenPower},
    redraw::{RedrawAction, RedrawScheduler},
    render::{NetTask, Screen},
    sync::{NetworkTimeResult, SyncStep, TimeReading, TimeSync},
    uptime::UpTimeParts,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TickResult {
    /// The current screen should be composed and drawn.
    pub render: bool,
    pub power: Option<PowerCommand>,
}

/// Network work the firmware should perform for the controller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetRequest {
    /// Make sure a network is joined, then call [`WatchApp::on_connectivity`].
    Connect,
    /// Once [`WatchApp::fetch_due`], read the time source and call
    /// [`WatchApp::on_time_reading`].
    FetchTime,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NetPhase {
    Connecting,
    Fetching(TimeSync),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ResultView {
    NoWifi,
    Compare { difference_secs: i64 },
    Synced { hour: u8, minute: u8 },
    Invalid(NetTask),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Clock,
    Network {
        task: NetTask,
        phase: NetPhase,
    },
    Result {
        view: ResultView,
        started_ms: u32,
    },
    UpTime {
        started_ms: u32,
        elapsed_seconds: u32,
        /// Set once the screen timer was toggled from this screen.
        timer_toggled: bool,
    },
}

pub struct WatchApp<IN>
where
    IN: InputProvider,
{
    input: IN,
    config: WatchConfig,
    clock: WallClock,
    redraw: RedrawScheduler,
    power: ScreenPower,
    mode: Mode,
    last_redraw: RedrawAction,
    pending_redraw: bool,
    settle_started_ms: Option<u32>,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");

#[cfg(test)]
mod tests;
