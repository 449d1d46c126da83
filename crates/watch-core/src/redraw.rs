//! Flicker-avoiding redraw decisions for the clock face.

use crate::calendar::CalendarFields;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedrawAction {
    NoRedraw,
    /// Only the seconds region changed.
    PartialRedraw,
    FullRedraw,
}

/// Remembers what was last drawn. `None` forces the next decision to be a
/// full redraw.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RedrawScheduler {
    last_second: Option<u8>,
    last_minute: Option<u8>,
}

impl RedrawScheduler {
    pub const fn new() -> Self {
        Self {
            last_second: None,
            last_minute: None,
        }
    }

    pub fn decide(&mut self, current: &CalendarFields) -> RedrawAction {
        if self.last_second == Some(current.second) {
            return RedrawAction::NoRedraw;
        }

        self.last_second = Some(current.second);
        if self.last_minute != Some(current.minute) {
            self.last_minute = Some(current.minute);
            RedrawAction::FullRedraw
        } else {
            RedrawAction::PartialRedraw
        }
    }

    /// Called on every mode transition; the next decision redraws everything.
    pub fn force_full(&mut self) {
        self.last_second = None;
        self.last_minute = None;
    }

    pub const fn last_drawn(&self) -> (Option<u8>, Option<u8>) {
        (self.last_second, self.last_minute)
    }
}
