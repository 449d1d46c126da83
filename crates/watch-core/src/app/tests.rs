use std::collections::VecDeque;

use super::*;
use crate::{calendar::TzRule, input::mock::MockInput};

const GOOD_EPOCH: i64 = 1_600_000_000;

/// Edges handed out one cycle at a time; empty once exhausted.
#[derive(Default)]
struct ScriptedInput {
    cycles: VecDeque<ButtonEdges>,
}

impl ScriptedInput {
    fn press(&mut self, button: Button) {
        self.cycles.push_back(ButtonEdges::pressed(button));
    }
}

impl InputProvider for ScriptedInput {
    type Error = ();

    fn poll(&mut self, _now_ms: u32) -> Result<ButtonEdges, Self::Error> {
        Ok(self.cycles.pop_front().unwrap_or(ButtonEdges::NONE))
    }
}

struct FailingInput;

impl InputProvider for FailingInput {
    type Error = ();

    fn poll(&mut self, _now_ms: u32) -> Result<ButtonEdges, Self::Error> {
        Err(())
    }
}

fn make_app() -> WatchApp<ScriptedInput> {
    make_app_at(0)
}

fn make_app_at(now_ms: u32) -> WatchApp<ScriptedInput> {
    let config = WatchConfig {
        tz: TzRule::UTC,
        ..WatchConfig::default()
    };
    WatchApp::new(ScriptedInput::default(), config, now_ms)
}

fn press(app: &mut WatchApp<ScriptedInput>, button: Button, now_ms: u32) -> TickResult {
    app.input_mut().press(button);
    app.tick(now_ms)
}

fn screen(app: &WatchApp<ScriptedInput>) -> Screen<'static> {
    app.with_screen(|screen| match screen {
        Screen::Clock { fields, redraw } => Screen::Clock { fields, redraw },
        Screen::Fetching { task, percent } => Screen::Fetching { task, percent },
        Screen::CompareResult { difference_secs } => Screen::CompareResult { difference_secs },
        Screen::SyncResult { hour, minute } => Screen::SyncResult { hour, minute },
        Screen::InvalidData { task } => Screen::InvalidData { task },
        Screen::UpTime(parts) => Screen::UpTime(parts),
        Screen::ScreenTimer { timer_on } => Screen::ScreenTimer { timer_on },
        Screen::NoWifi => Screen::NoWifi,
        other => panic!("unexpected screen {other:?}"),
    })
}

fn clock_redraw(app: &WatchApp<ScriptedInput>) -> Option<RedrawAction> {
    match screen(app) {
        Screen::Clock { redraw, .. } => Some(redraw),
        _ => None,
    }
}

/// Drives a network task to its end, answering every due fetch with `reading`.
fn run_network_task(
    app: &mut WatchApp<ScriptedInput>,
    mut now_ms: u32,
    reading: impl Fn(u16) -> TimeReading,
) -> u32 {
    assert_eq!(app.pending_request(), Some(NetRequest::Connect));
    app.on_connectivity(Ok(()), now_ms);

    let mut attempt = 0;
    while app.pending_request() == Some(NetRequest::FetchTime) {
        if app.fetch_due(now_ms) {
            attempt += 1;
            app.on_time_reading(reading(attempt), now_ms);
        }
        now_ms += 5;
        app.tick(now_ms);
    }
    now_ms
}

#[test]
fn clock_face_redraws_full_then_partial_then_nothing() {
    let mut app = make_app();

    assert!(app.tick(0).render);
    assert_eq!(clock_redraw(&app), Some(RedrawAction::FullRedraw));

    assert!(!app.tick(500).render);

    assert!(app.tick(1_000).render);
    assert_eq!(clock_redraw(&app), Some(RedrawAction::PartialRedraw));

    assert!(app.tick(60_000).render);
    assert_eq!(clock_redraw(&app), Some(RedrawAction::FullRedraw));
}

#[test]
fn compare_shows_difference_and_never_commits() {
    let mut app = make_app();
    app.tick(0);

    let result = press(&mut app, Button::Up, 3_000);
    assert!(result.render);
    assert_eq!(
        screen(&app),
        Screen::Fetching {
            task: NetTask::Compare,
            percent: 0,
        }
    );

    run_network_task(&mut app, 3_000, |_| TimeReading::new(GOOD_EPOCH, true));

    assert_eq!(app.clock().offset(), 0);
    assert_eq!(
        screen(&app),
        Screen::CompareResult {
            difference_secs: 3 - GOOD_EPOCH,
        }
    );
}

#[test]
fn sync_commits_offset_and_shows_fetched_time() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Down, 5_000);
    run_network_task(&mut app, 5_000, |_| TimeReading::new(GOOD_EPOCH, true));

    assert_eq!(app.clock().offset(), GOOD_EPOCH - 5);
    assert_eq!(app.clock().wall_clock_epoch(), GOOD_EPOCH);
    // 1_600_000_000 is 2020-09-13 12:26:40 UTC.
    assert_eq!(
        screen(&app),
        Screen::SyncResult {
            hour: 12,
            minute: 26,
        }
    );
}

#[test]
fn sync_succeeds_on_the_last_attempt_of_the_budget() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Down, 1_000);
    run_network_task(&mut app, 1_000, |attempt| {
        if attempt < 100 {
            TimeReading::new(0, true)
        } else {
            TimeReading::new(GOOD_EPOCH, true)
        }
    });

    assert!(matches!(screen(&app), Screen::SyncResult { .. }));
    assert_ne!(app.clock().offset(), 0);
}

#[test]
fn failed_sync_leaves_offset_untouched() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Down, 1_000);
    let mut seen_progress = false;
    let mut now_ms = 1_000;
    app.on_connectivity(Ok(()), now_ms);
    while app.pending_request() == Some(NetRequest::FetchTime) {
        if app.fetch_due(now_ms) {
            app.on_time_reading(TimeReading::new(12, true), now_ms);
            if let Screen::Fetching { percent, .. } = screen(&app) {
                seen_progress |= percent > 0;
            }
        }
        now_ms += 25;
    }

    assert!(seen_progress);
    assert_eq!(app.clock().offset(), 0);
    assert_eq!(
        screen(&app),
        Screen::InvalidData {
            task: NetTask::Sync,
        }
    );
}

#[test]
fn slow_time_source_gives_up_within_the_time_budget() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Down, 1_000);
    let mut now_ms = 1_000;
    app.on_connectivity(Ok(()), now_ms);
    let mut attempts = 0;
    while app.pending_request() == Some(NetRequest::FetchTime) {
        if app.fetch_due(now_ms) {
            attempts += 1;
            now_ms += 4_000;
            app.on_time_reading(TimeReading::INVALID, now_ms);
        }
        now_ms += 5;
        app.tick(now_ms);
    }

    assert_eq!(attempts, 3);
    assert!(now_ms - 1_000 < 15_000);
    assert_eq!(
        screen(&app),
        Screen::InvalidData {
            task: NetTask::Sync,
        }
    );
}

#[test]
fn no_connectivity_shows_error_then_returns_to_clock() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Up, 1_000);
    app.on_connectivity(Err(WatchError::NoNetworksConfigured), 1_200);
    assert_eq!(app.pending_request(), None);

    assert!(app.tick(1_300).render);
    assert_eq!(screen(&app), Screen::NoWifi);

    assert!(!app.tick(3_699).render);
    assert_eq!(screen(&app), Screen::NoWifi);

    assert!(app.tick(3_700).render);
    assert!(app.is_showing_clock());
    assert_eq!(clock_redraw(&app), Some(RedrawAction::FullRedraw));
}

#[test]
fn non_network_failure_while_connecting_reports_invalid_data() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Up, 1_000);
    app.on_connectivity(Err(WatchError::TimeSyncInvalid), 1_200);

    assert!(app.tick(1_300).render);
    assert_eq!(
        screen(&app),
        Screen::InvalidData {
            task: NetTask::Compare,
        }
    );
}

#[test]
fn screen_turns_off_after_idle_timeout() {
    let mut app = make_app();

    assert_eq!(app.tick(0).power, None);
    assert_eq!(app.tick(10_000).power, None);
    assert_eq!(app.tick(10_001).power, Some(PowerCommand::Off));
    assert!(!app.power().is_on());
}

#[test]
fn button_activity_keeps_the_screen_on() {
    let mut app = make_app();
    app.tick(0);

    // Enter and leave up-time; entry and exit both restart the idle timer.
    press(&mut app, Button::Push, 9_000);
    app.tick(11_500);
    assert!(app.is_showing_clock());

    assert_eq!(app.tick(21_500).power, None);
    assert_eq!(app.tick(21_501).power, Some(PowerCommand::Off));
}

#[test]
fn wake_consumes_the_edge_and_settles() {
    let mut app = make_app();
    app.tick(0);
    app.tick(10_001);
    assert!(!app.power().is_on());

    let woke = press(&mut app, Button::Up, 12_000);
    assert_eq!(woke.power, Some(PowerCommand::On));
    assert!(woke.render);
    assert!(app.is_showing_clock());
    assert_eq!(app.pending_request(), None);

    // Inside the settle window.
    press(&mut app, Button::Up, 12_100);
    assert!(app.is_showing_clock());

    press(&mut app, Button::Up, 12_300);
    assert_eq!(app.pending_request(), Some(NetRequest::Connect));
}

#[test]
fn uptime_second_press_toggles_screen_timer_and_extends_hold() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Push, 93_784_000);
    assert_eq!(
        screen(&app),
        Screen::UpTime(UpTimeParts {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
        })
    );

    assert!(press(&mut app, Button::Push, 93_785_000).render);
    assert!(app.power().stay_on());
    assert_eq!(screen(&app), Screen::ScreenTimer { timer_on: false });

    // Hold restarted at the second press.
    app.tick(93_787_499);
    assert!(!app.is_showing_clock());
    app.tick(93_787_500);
    assert!(app.is_showing_clock());

    // Override active: no idle timeout.
    assert_eq!(app.tick(93_900_000).power, None);
    assert!(app.power().is_on());
}

#[test]
fn uptime_counts_from_boot_when_built_late() {
    let mut app = make_app_at(45_000);

    // Idle timer starts at construction, not at boot.
    assert_eq!(app.tick(45_000).power, None);

    press(&mut app, Button::Push, 45_500);
    assert_eq!(
        screen(&app),
        Screen::UpTime(UpTimeParts {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 45,
        })
    );
}

#[test]
fn uptime_toggle_twice_restores_the_timer() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Push, 1_000);
    press(&mut app, Button::Push, 1_500);
    press(&mut app, Button::Push, 2_000);

    assert!(!app.power().stay_on());
    assert_eq!(screen(&app), Screen::ScreenTimer { timer_on: true });
}

#[test]
fn other_buttons_do_not_toggle_the_timer() {
    let mut app = make_app();
    app.tick(0);

    press(&mut app, Button::Push, 1_000);
    press(&mut app, Button::Up, 1_500);
    press(&mut app, Button::Down, 2_000);

    assert!(!app.power().stay_on());
    assert!(matches!(screen(&app), Screen::UpTime(_)));
}

#[test]
fn simultaneous_presses_run_only_the_highest_priority_action() {
    let mut app = make_app();
    app.tick(0);

    app.input_mut().cycles.push_back(
        ButtonEdges::pressed(Button::Down)
            .with(Button::Push)
            .with(Button::Up),
    );
    app.tick(1_000);

    assert_eq!(
        screen(&app),
        Screen::Fetching {
            task: NetTask::Compare,
            percent: 0,
        }
    );
}

#[test]
fn stray_network_reports_are_ignored() {
    let mut app = make_app();
    app.tick(0);

    app.on_connectivity(Ok(()), 100);
    app.on_time_reading(TimeReading::new(GOOD_EPOCH, true), 200);

    assert!(app.is_showing_clock());
    assert_eq!(app.clock().offset(), 0);
    assert!(!app.fetch_due(300));
}

#[test]
fn input_errors_do_not_stop_the_clock() {
    let mut app = WatchApp::new(FailingInput, WatchConfig::default(), 0);

    assert!(app.tick(0).render);
    assert!(app.tick(1_000).render);
    assert!(app.is_showing_clock());
}

#[test]
fn sequence_of_edges_is_consumed_one_per_cycle() {
    let mut app = make_app();
    app.tick(0);

    let mut states = Vec::new();
    app.input_mut().press(Button::Push);
    for now in [100, 200, 3_000] {
        app.tick(now);
        states.push(app.is_showing_clock());
    }

    assert_eq!(states, [false, false, true]);
}

#[test]
fn watch_without_buttons_runs_the_clock_and_sleeps() {
    let mut app = WatchApp::new(MockInput::new(), WatchConfig::default(), 0);

    assert!(app.tick(0).render);
    assert_eq!(app.tick(10_001).power, Some(PowerCommand::Off));
    assert!(app.is_showing_clock());
    assert_eq!(app.pending_request(), None);
}
