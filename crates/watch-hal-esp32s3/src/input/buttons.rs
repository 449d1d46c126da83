use embedded_hal::digital::InputPin;

use watch_core::input::{Button, ButtonEdges, InputProvider};

#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    active_low: bool,
    debounce_polls: u8,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_polls: 2,
        }
    }
}

impl ButtonConfig {
    pub const fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    pub const fn with_debounce_polls(mut self, debounce_polls: u8) -> Self {
        self.debounce_polls = debounce_polls;
        self
    }
}

#[derive(Debug)]
pub enum ButtonInputError<UpErr, DownErr, PushErr> {
    Up(UpErr),
    Down(DownErr),
    Push(PushErr),
}

type ButtonResult<UpErr, DownErr, PushErr, T> =
    Result<T, ButtonInputError<UpErr, DownErr, PushErr>>;

/// Level debouncer for one button. Reports an edge on the stable transition
/// into the pressed state only.
#[derive(Debug, Clone, Copy)]
struct Debounce {
    raw: bool,
    stable: bool,
    stable_count: u8,
}

impl Debounce {
    const fn new(pressed: bool) -> Self {
        Self {
            raw: pressed,
            stable: pressed,
            stable_count: 0,
        }
    }

    fn update(&mut self, pressed: bool, threshold: u8) -> bool {
        if pressed == self.raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.raw = pressed;
            self.stable_count = 0;
        }

        if self.stable_count >= threshold.max(1) && self.stable != self.raw {
            self.stable = self.raw;
            return self.stable;
        }

        false
    }
}

/// The three watch buttons, each on its own GPIO.
#[derive(Debug)]
pub struct ButtonInput<UP, DOWN, PUSH> {
    up: UP,
    down: DOWN,
    push: PUSH,
    config: ButtonConfig,
    up_state: Debounce,
    down_state: Debounce,
    push_state: Debounce,
}

impl<UP, DOWN, PUSH> ButtonInput<UP, DOWN, PUSH>
where
    UP: InputPin,
    DOWN: InputPin,
    PUSH: InputPin,
{
    /// Buttons already held at construction do not produce an edge until
    /// they are released and pressed again.
    pub fn new(
        mut up: UP,
        mut down: DOWN,
        mut push: PUSH,
        config: ButtonConfig,
    ) -> ButtonResult<UP::Error, DOWN::Error, PUSH::Error, Self> {
        let up_high = up.is_high().map_err(ButtonInputError::Up)?;
        let down_high = down.is_high().map_err(ButtonInputError::Down)?;
        let push_high = push.is_high().map_err(ButtonInputError::Push)?;

        Ok(Self {
            up,
            down,
            push,
            config,
            up_state: Debounce::new(pressed_from_level(up_high, config.active_low)),
            down_state: Debounce::new(pressed_from_level(down_high, config.active_low)),
            push_state: Debounce::new(pressed_from_level(push_high, config.active_low)),
        })
    }

    /// Raw, undebounced level of one button.
    pub fn is_held(
        &mut self,
        button: Button,
    ) -> ButtonResult<UP::Error, DOWN::Error, PUSH::Error, bool> {
        let high = match button {
            Button::Up => self.up.is_high().map_err(ButtonInputError::Up)?,
            Button::Down => self.down.is_high().map_err(ButtonInputError::Down)?,
            Button::Push => self.push.is_high().map_err(ButtonInputError::Push)?,
        };
        Ok(pressed_from_level(high, self.config.active_low))
    }
}

impl<UP, DOWN, PUSH> InputProvider for ButtonInput<UP, DOWN, PUSH>
where
    UP: InputPin,
    DOWN: InputPin,
    PUSH: InputPin,
{
    type Error = ButtonInputError<UP::Error, DOWN::Error, PUSH::Error>;

    fn poll(&mut self, _now_ms: u32) -> Result<ButtonEdges, Self::Error> {
        let threshold = self.config.debounce_polls;
        let mut edges = ButtonEdges::NONE;

        let up = self.is_held(Button::Up)?;
        let down = self.is_held(Button::Down)?;
        let push = self.is_held(Button::Push)?;

        if self.up_state.update(up, threshold) {
            edges = edges.with(Button::Up);
        }
        if self.down_state.update(down, threshold) {
            edges = edges.with(Button::Down);
        }
        if self.push_state.update(push, threshold) {
            edges = edges.with(Button::Push);
        }

        Ok(edges)
    }
}

#[inline]
fn pressed_from_level(high: bool, active_low: bool) -> bool {
    if active_low { !high } else { high }
}
