impl<IN> WatchApp<IN>
where
    IN: InputProvider,
{
    /// Hands the view model of the current mode to `f`.
    pub fn with_screen<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Screen<'_>) -> R,
    {
        let screen = match self.mode {
            Mode::Clock => Screen::Clock {
                fields: self.local_fields(),
                redraw: self.last_redraw,
            },
            Mode::Network {
                task,
                phase: NetPhase::Connecting,
            } => Screen::Fetching { task, percent: 0 },
            Mode::Network {
                task,
                phase: NetPhase::Fetching(sync),
            } => Screen::Fetching {
                task,
                percent: sync.progress_pct(),
            },
            Mode::Result { view, .. } => match view {
                ResultView::NoWifi => Screen::NoWifi,
                ResultView::Compare { difference_secs } => {
                    Screen::CompareResult { difference_secs }
                }
                ResultView::Synced { hour, minute } => Screen::SyncResult { hour, minute },
                ResultView::Invalid(task) => Screen::InvalidData { task },
            },
            Mode::UpTime {
                timer_toggled: true,
                ..
            } => Screen::ScreenTimer {
                timer_on: !self.power.stay_on(),
            },
            Mode::UpTime {
                elapsed_seconds, ..
            } => Screen::UpTime(UpTimeParts::from_seconds(elapsed_seconds)),
        };

        f(screen)
    }
}
