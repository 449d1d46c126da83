use core::fmt::Debug;

use embassy_time::Timer;
use esp_hal::delay::Delay;
use log::{info, warn};
use watch_core::{
    display::{IndicatorLight, RgbIndicator, blink, color_cycle},
    render::Screen,
};

use crate::{Display, show};

const WHITE_LED_BLINK_MS: u32 = 100;
const PIXEL_BRIGHTNESS: u8 = 10;
const PIXEL_STEP_MS: u32 = 100;
const SPLASH_MS: u64 = 3_000;
/// How long the boot Wi-Fi result stays on screen.
pub const BOOT_STATUS_MS: u64 = 3_000;

/// Lamp test, then the version splash.
pub async fn run<L, P>(display: &mut Display, white_led: &mut L, pixel: &mut P, delay: &mut Delay)
where
    L: IndicatorLight,
    L::Error: Debug,
    P: RgbIndicator,
    P::Error: Debug,
{
    if let Err(err) = blink(white_led, delay, WHITE_LED_BLINK_MS) {
        warn!("boot: white led failed: {:?}", err);
    }
    Timer::after_millis(100).await;

    if let Err(err) = color_cycle(pixel, delay, PIXEL_BRIGHTNESS, PIXEL_STEP_MS) {
        warn!("boot: rgb led failed: {:?}", err);
    }

    info!("boot: ntp-wristwatch v{}", env!("CARGO_PKG_VERSION"));
    show(
        display,
        &Screen::Splash {
            version: env!("CARGO_PKG_VERSION"),
        },
    );
    Timer::after_millis(SPLASH_MS).await;
}

pub async fn wifi_status(display: &mut Display, connected: bool) {
    show(display, &Screen::BootWifi { connected });
    Timer::after_millis(BOOT_STATUS_MS).await;
}
