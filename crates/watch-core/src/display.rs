//! Output collaborators: the text-oriented display surface and the two
//! indicator lights.

use embedded_hal::delay::DelayNs;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 64;
pub const CENTER_X: i32 = (WIDTH / 2) as i32;

/// Baselines of the five text lines used by status screens.
pub const LINES: [i32; 5] = [0, 12, 24, 36, 48];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Font {
    Small,
    Normal,
    Large,
    XLarge,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
    Center,
    /// Centered horizontally and vertically around the anchor.
    CenterBoth,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Black,
    White,
}

/// Buffered display. Nothing becomes visible before [`DisplaySurface::present`].
///
/// Text anchors are the top of the glyph box; `x` is interpreted according to
/// the current [`Align`].
pub trait DisplaySurface {
    type Error;

    fn clear(&mut self);
    fn set_font(&mut self, font: Font);
    fn set_alignment(&mut self, align: Align);
    fn set_color(&mut self, color: Color);
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), Self::Error>;
    fn draw_progress_bar(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        percent: u8,
    ) -> Result<(), Self::Error>;
    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), Self::Error>;
    fn present(&mut self) -> Result<(), Self::Error>;
    fn power_on(&mut self) -> Result<(), Self::Error>;
    fn power_off(&mut self) -> Result<(), Self::Error>;
    fn set_brightness(&mut self, level: u8) -> Result<(), Self::Error>;
}

pub trait IndicatorLight {
    type Error;

    fn set_on(&mut self) -> Result<(), Self::Error>;
    fn set_off(&mut self) -> Result<(), Self::Error>;
}

pub trait RgbIndicator {
    type Error;

    fn set_color(&mut self, red: u8, green: u8, blue: u8) -> Result<(), Self::Error>;
}

/// Lights the indicator for `on_ms`.
pub fn blink<L, D>(light: &mut L, delay: &mut D, on_ms: u32) -> Result<(), L::Error>
where
    L: IndicatorLight,
    D: DelayNs,
{
    light.set_on()?;
    delay.delay_ms(on_ms);
    light.set_off()
}

/// Red, green, blue, white at `brightness`, `step_ms` each, then off.
pub fn color_cycle<L, D>(
    light: &mut L,
    delay: &mut D,
    brightness: u8,
    step_ms: u32,
) -> Result<(), L::Error>
where
    L: RgbIndicator,
    D: DelayNs,
{
    let b = brightness;
    for (red, green, blue) in [(b, 0, 0), (0, b, 0), (0, 0, b), (b, b, b)] {
        light.set_color(red, green, blue)?;
        delay.delay_ms(step_ms);
    }
    light.set_color(0, 0, 0)
}
