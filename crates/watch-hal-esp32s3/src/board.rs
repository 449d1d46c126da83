//! Wiring of the watch board.

pub const I2C_SDA_GPIO: u8 = 5;
pub const I2C_SCL_GPIO: u8 = 4;
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Buttons are wired to ground with internal pull-ups.
pub const BUTTON_UP_GPIO: u8 = 12;
pub const BUTTON_DOWN_GPIO: u8 = 13;
pub const BUTTON_PUSH_GPIO: u8 = 14;

/// White status LED, lit when the pin is low.
pub const WHITE_LED_GPIO: u8 = 16;

/// Single WS2812 pixel, driven through the SPI data line.
pub const PIXEL_GPIO: u8 = 15;
pub const PIXEL_SPI_HZ: u32 = crate::indicator::WS2812_SPI_HZ;

/// Main loop period; button debounce is counted in these polls.
pub const POLL_INTERVAL_MS: u64 = 10;
