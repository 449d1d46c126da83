//! Input abstraction layer.

pub mod mock;

/// The three physical watch buttons.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Button {
    /// "Compare time".
    Up,
    /// "Sync time".
    Down,
    /// "Show up-time", second press toggles the screen timer.
    Push,
}

/// Logical actions consumed by the watch app.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Pressed(Button),
}

/// One-shot press edges observed in a single polling cycle.
///
/// An edge is reported once per physical press and never again while the
/// button stays held.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ButtonEdges {
    pub up: bool,
    pub down: bool,
    pub push: bool,
}

impl ButtonEdges {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        push: false,
    };

    pub const fn pressed(button: Button) -> Self {
        Self::NONE.with(button)
    }

    pub const fn with(mut self, button: Button) -> Self {
        match button {
            Button::Up => self.up = true,
            Button::Down => self.down = true,
            Button::Push => self.push = true,
        }
        self
    }

    pub const fn was_pressed(&self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Push => self.push,
        }
    }

    pub const fn any(&self) -> bool {
        self.up || self.down || self.push
    }

    /// The single event that acts this cycle: up, then push, then down.
    pub fn event(&self) -> Option<InputEvent> {
        [Button::Up, Button::Push, Button::Down]
            .into_iter()
            .find(|button| self.was_pressed(*button))
            .map(InputEvent::Pressed)
    }
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    /// Updates debounce state and returns this cycle's press edges.
    fn poll(&mut self, now_ms: u32) -> Result<ButtonEdges, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_event_per_cycle_in_priority_order() {
        let all = ButtonEdges::pressed(Button::Down)
            .with(Button::Push)
            .with(Button::Up);
        assert_eq!(all.event(), Some(InputEvent::Pressed(Button::Up)));

        let push_and_down = ButtonEdges::pressed(Button::Down).with(Button::Push);
        assert_eq!(
            push_and_down.event(),
            Some(InputEvent::Pressed(Button::Push))
        );

        assert_eq!(ButtonEdges::NONE.event(), None);
        assert!(!ButtonEdges::NONE.any());
    }
}
