impl<IN> WatchApp<IN>
where
    IN: InputProvider,
{
    /// `now_ms` counts from boot, so up-time starts at zero however late
    /// the controller is built.
    pub fn new(input: IN, config: WatchConfig, now_ms: u32) -> Self {
        Self {
            input,
            config,
            clock: WallClock::new(0),
            redraw: RedrawScheduler::new(),
            power: ScreenPower::new(config.idle_timeout_ms, now_ms),
            mode: Mode::Clock,
            last_redraw: RedrawAction::NoRedraw,
            pending_redraw: false,
            settle_started_ms: None,
        }
    }

    /// One polling cycle: input, time, screen power, redraw decision, then
    /// button handling.
    pub fn tick(&mut self, now_ms: u32) -> TickResult {
        let mut edges = self.poll_edges(now_ms);
        self.clock.tick(now_ms);

        let mut result = TickResult::default();

        if edges.any() {
            if !self.power.is_on() {
                result.power = self.power.wake(now_ms);
                self.settle_started_ms = Some(now_ms);
                self.redraw.force_full();
                edges = ButtonEdges::NONE;
            } else {
                self.power.touch(now_ms);
            }
        }

        if matches!(self.mode, Mode::Clock) && result.power.is_none() {
            result.power = self.power.check_idle(now_ms);
        }

        result.render = match self.mode {
            Mode::Clock => self.tick_clock(edges.event(), now_ms),
            Mode::Network { .. } => self.take_pending_redraw(),
            Mode::Result { started_ms, .. } => {
                if self.hold_elapsed(started_ms, now_ms) {
                    self.exit_to_clock(now_ms)
                } else {
                    self.take_pending_redraw()
                }
            }
            Mode::UpTime { started_ms, .. } => {
                if edges.was_pressed(Button::Push) {
                    self.toggle_screen_timer(now_ms);
                    self.take_pending_redraw()
                } else if self.hold_elapsed(started_ms, now_ms) {
                    self.exit_to_clock(now_ms)
                } else {
                    self.take_pending_redraw()
                }
            }
        };

        result
    }

    fn tick_clock(&mut self, event: Option<InputEvent>, now_ms: u32) -> bool {
        match event {
            Some(InputEvent::Pressed(Button::Up)) => self.enter_network(NetTask::Compare, now_ms),
            Some(InputEvent::Pressed(Button::Down)) => self.enter_network(NetTask::Sync, now_ms),
            Some(InputEvent::Pressed(Button::Push)) => self.enter_uptime(now_ms),
            None => {
                let fields = self.local_fields();
                self.last_redraw = self.redraw.decide(&fields);
                self.pending_redraw = false;
                return self.last_redraw != RedrawAction::NoRedraw;
            }
        }
        self.take_pending_redraw()
    }

    fn take_pending_redraw(&mut self) -> bool {
        core::mem::replace(&mut self.pending_redraw, false)
    }

    fn hold_elapsed(&self, started_ms: u32, now_ms: u32) -> bool {
        now_ms.wrapping_sub(started_ms) >= self.config.mode_hold_ms
    }

    /// Leaves a transient mode and decides the clock face in the same cycle.
    fn exit_to_clock(&mut self, now_ms: u32) -> bool {
        info!("app: back to clock");
        self.mode = Mode::Clock;
        self.power.touch(now_ms);
        self.redraw.force_full();
        self.tick_clock(None, now_ms)
    }

    fn enter_transient(&mut self, mode: Mode, now_ms: u32) {
        self.mode = mode;
        self.power.touch(now_ms);
        self.redraw.force_full();
        self.pending_redraw = true;
    }

    fn enter_network(&mut self, task: NetTask, now_ms: u32) {
        info!("app: {:?} requested", task);
        self.enter_transient(
            Mode::Network {
                task,
                phase: NetPhase::Connecting,
            },
            now_ms,
        );
    }

    fn enter_uptime(&mut self, now_ms: u32) {
        info!("app: up-time {}s", self.clock.elapsed_seconds());
        self.enter_transient(
            Mode::UpTime {
                started_ms: now_ms,
                elapsed_seconds: self.clock.elapsed_seconds(),
                timer_toggled: false,
            },
            now_ms,
        );
    }

    fn toggle_screen_timer(&mut self, now_ms: u32) {
        if let Mode::UpTime {
            elapsed_seconds, ..
        } = self.mode
        {
            self.power.toggle_stay_on();
            self.mode = Mode::UpTime {
                started_ms: now_ms,
                elapsed_seconds,
                timer_toggled: true,
            };
            self.pending_redraw = true;
        }
    }

    fn show_result(&mut self, view: ResultView, now_ms: u32) {
        self.enter_transient(
            Mode::Result {
                view,
                started_ms: now_ms,
            },
            now_ms,
        );
    }

    pub fn pending_request(&self) -> Option<NetRequest> {
        match self.mode {
            Mode::Network {
                phase: NetPhase::Connecting,
                ..
            } => Some(NetRequest::Connect),
            Mode::Network {
                phase: NetPhase::Fetching(sync),
                ..
            } if !sync.is_finished() => Some(NetRequest::FetchTime),
            _ => None,
        }
    }

    pub fn on_connectivity(&mut self, outcome: Result<(), WatchError>, now_ms: u32) {
        let Mode::Network {
            task,
            phase: NetPhase::Connecting,
        } = self.mode
        else {
            debug!("app: connectivity report outside of a network task");
            return;
        };

        self.clock.tick(now_ms);
        match outcome {
            Ok(()) => {
                self.mode = Mode::Network {
                    task,
                    phase: NetPhase::Fetching(TimeSync::new(self.config.sync, now_ms)),
                };
                self.pending_redraw = true;
            }
            Err(err) if err.is_connectivity() => {
                warn!("app: {}", err);
                self.show_result(ResultView::NoWifi, now_ms);
            }
            Err(err) => {
                warn!("app: {}", err);
                self.show_result(ResultView::Invalid(task), now_ms);
            }
        }
    }

    pub fn fetch_due(&self, now_ms: u32) -> bool {
        match self.mode {
            Mode::Network {
                phase: NetPhase::Fetching(sync),
                ..
            } => sync.attempt_due(now_ms),
            _ => false,
        }
    }

    pub fn on_time_reading(&mut self, reading: TimeReading, now_ms: u32) {
        let Mode::Network {
            task,
            phase: NetPhase::Fetching(mut sync),
        } = self.mode
        else {
            debug!("app: time reading outside of a fetch");
            return;
        };

        self.clock.tick(now_ms);
        match sync.record(reading, now_ms) {
            SyncStep::Retry { .. } => {
                self.mode = Mode::Network {
                    task,
                    phase: NetPhase::Fetching(sync),
                };
                self.pending_redraw = true;
            }
            SyncStep::Done(NetworkTimeResult::Valid(epoch)) => {
                let view = match task {
                    NetTask::Compare => ResultView::Compare {
                        difference_secs: self.clock.difference_to(epoch),
                    },
                    NetTask::Sync => {
                        self.clock.commit(epoch);
                        let local = calendar::decode(self.config.tz.to_local(epoch));
                        ResultView::Synced {
                            hour: local.hour,
                            minute: local.minute,
                        }
                    }
                };
                self.show_result(view, now_ms);
            }
            SyncStep::Done(NetworkTimeResult::Invalid) => {
                warn!("app: {}", WatchError::TimeSyncInvalid);
                self.show_result(ResultView::Invalid(task), now_ms);
            }
        }
    }

    pub fn local_fields(&self) -> CalendarFields {
        self.clock.local_fields(&self.config.tz)
    }

    pub const fn clock(&self) -> &WallClock {
        &self.clock
    }

    pub const fn power(&self) -> &ScreenPower {
        &self.power
    }

    pub const fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn is_showing_clock(&self) -> bool {
        matches!(self.mode, Mode::Clock)
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }
}
