#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_hal::{
    Blocking,
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    spi::master::{Config as SpiConfig, Spi},
    time::{Instant, Rate},
    timer::timg::TimerGroup,
};
use log::{LevelFilter, info, warn};
use static_cell::StaticCell;
use watch_core::{
    app::{NetRequest, WatchApp},
    config::{WatchConfig, parse_networks},
    input::Button,
    power::PowerCommand,
    render::{Screen, compose, execute},
    sync::TimeReading,
};
use watch_hal_esp32s3::{
    board,
    indicator::{WhiteLed, Ws2812},
    input::buttons::{ButtonConfig, ButtonInput},
    platform::display::OledDisplay,
};

#[path = "main/boot.rs"]
mod boot;
#[path = "main/ntp.rs"]
mod ntp;
#[path = "main/wifi.rs"]
mod wifi;

const WIFI_NETWORKS: &str = env!(
    "WATCH_WIFI_NETWORKS",
    "Set WATCH_WIFI_NETWORKS=label:ssid:password;... in your environment before building/flashing."
);
const NTP_SERVER: &str = match option_env!("NTP_SERVER") {
    Some(server) => server,
    None => "pool.ntp.org",
};

// Pin objects below are taken by name; these keep them on the board map.
const _: () = {
    assert!(board::I2C_SDA_GPIO == 5 && board::I2C_SCL_GPIO == 4);
    assert!(board::BUTTON_UP_GPIO == 12);
    assert!(board::BUTTON_DOWN_GPIO == 13);
    assert!(board::BUTTON_PUSH_GPIO == 14);
    assert!(board::WHITE_LED_GPIO == 16 && board::PIXEL_GPIO == 15);
};

static NET_RESOURCES: StaticCell<embassy_net::StackResources<4>> = StaticCell::new();

type Display = OledDisplay<I2c<'static, Blocking>>;

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Milliseconds since boot, wrapping like the core expects.
fn now_ms(boot: Instant) -> u32 {
    boot.elapsed().as_millis() as u32
}

/// Draws a full screen outside the main cycle (boot and Wi-Fi join).
fn show(display: &mut Display, screen: &Screen<'_>) {
    if let Err(err) = execute(&compose(screen), display) {
        warn!("display: render failed: {:?}", err);
    }
}

async fn park() -> ! {
    loop {
        Timer::after_secs(1).await;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: ntp-wristwatch starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    let boot_instant = Instant::now();

    // esp-radio requires an allocator.
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let watch_config = WatchConfig::default();
    let networks = parse_networks(WIFI_NETWORKS);
    info!(
        "config: networks={} ntp_server={} idle_timeout_ms={}",
        networks.len(),
        NTP_SERVER,
        watch_config.idle_timeout_ms
    );

    let i2c_config = I2cConfig::default().with_frequency(Rate::from_hz(board::I2C_FREQUENCY_HZ));
    let i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap()
        .with_sda(peripherals.GPIO5)
        .with_scl(peripherals.GPIO4);

    let mut display: Display = OledDisplay::new(i2c, sh1106::Config::default());
    let mut display_fault_logged = false;
    if let Err(err) = display.init(watch_config.brightness) {
        esp_println::println!("display: init failed");
        info!("display init failed: {:?}", err);
        display_fault_logged = true;
    } else {
        esp_println::println!("display: init ok");
    }

    let input_cfg = InputConfig::default().with_pull(Pull::Up);
    let button_up = Input::new(peripherals.GPIO12, input_cfg);
    let button_down = Input::new(peripherals.GPIO13, input_cfg);
    let button_push = Input::new(peripherals.GPIO14, input_cfg);
    let mut input =
        ButtonInput::new(button_up, button_down, button_push, ButtonConfig::default()).unwrap();

    let mut white_led = WhiteLed::new(Output::new(
        peripherals.GPIO16,
        Level::High,
        OutputConfig::default(),
    ))
    .unwrap();
    let pixel_spi_config = SpiConfig::default()
        .with_frequency(Rate::from_hz(board::PIXEL_SPI_HZ))
        .with_mode(esp_hal::spi::Mode::_0);
    let pixel_spi = Spi::new(peripherals.SPI2, pixel_spi_config)
        .unwrap()
        .with_mosi(peripherals.GPIO15);
    let mut pixel = Ws2812::new(pixel_spi);
    let mut delay = Delay::new();

    info!(
        "Display pins: SDA=GPIO{} SCL=GPIO{}",
        board::I2C_SDA_GPIO,
        board::I2C_SCL_GPIO
    );
    info!(
        "Button pins: UP=GPIO{} DOWN=GPIO{} PUSH=GPIO{}",
        board::BUTTON_UP_GPIO,
        board::BUTTON_DOWN_GPIO,
        board::BUTTON_PUSH_GPIO
    );
    info!(
        "LED pins: WHITE=GPIO{} PIXEL=GPIO{}",
        board::WHITE_LED_GPIO,
        board::PIXEL_GPIO
    );

    boot::run(&mut display, &mut white_led, &mut pixel, &mut delay).await;

    // Holding PUSH through the splash forces a fresh Wi-Fi join.
    let force_refresh = matches!(input.is_held(Button::Push), Ok(true));
    if force_refresh {
        info!("boot: wifi refresh requested");
    }

    let radio = match esp_radio::init() {
        Ok(radio) => radio,
        Err(err) => {
            info!("esp-radio init failed: {:?}", err);
            park().await
        }
    };
    let (mut wifi_controller, interfaces) =
        match esp_radio::wifi::new(&radio, peripherals.WIFI, esp_radio::wifi::Config::default()) {
            Ok(parts) => parts,
            Err(err) => {
                info!("wifi peripheral init failed: {:?}", err);
                park().await
            }
        };

    let stack_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, mut net_runner) = embassy_net::new(
        interfaces.sta,
        stack_config,
        NET_RESOURCES.init(embassy_net::StackResources::<4>::new()),
        0x3C9D_71A4_0E55_B2C8,
    );

    let net_future = net_runner.run();
    let ui_future = async {
        let joined = wifi::ensure_connected(
            &mut wifi_controller,
            stack,
            &networks,
            watch_config.join,
            force_refresh,
            &mut display,
        )
        .await;
        boot::wifi_status(&mut display, joined.is_ok()).await;

        let mut app = WatchApp::new(input, watch_config, now_ms(boot_instant));
        let mut ntp_address = None;
        info!("Watch started");

        loop {
            let result = app.tick(now_ms(boot_instant));

            if let Some(command) = result.power {
                let switched = match command {
                    PowerCommand::On => display.power_on(),
                    PowerCommand::Off => display.power_off(),
                };
                match switched {
                    Ok(()) => info!("screen: {:?}", command),
                    Err(err) => warn!("screen: {:?} failed: {:?}", command, err),
                }
            }

            if result.render && app.power().is_on() {
                let list = app.with_screen(|screen| compose(&screen));
                if let Err(err) = execute(&list, &mut display)
                    && !display_fault_logged
                {
                    esp_println::println!("display: flush failed");
                    info!("display flush failed: {:?}", err);
                    display_fault_logged = true;
                }
            }

            match app.pending_request() {
                Some(NetRequest::Connect) => {
                    let outcome = wifi::ensure_connected(
                        &mut wifi_controller,
                        stack,
                        &networks,
                        app.config().join,
                        false,
                        &mut display,
                    )
                    .await
                    .map(|_| ());
                    app.on_connectivity(outcome, now_ms(boot_instant));
                    ntp_address = None;
                }
                Some(NetRequest::FetchTime) if app.fetch_due(now_ms(boot_instant)) => {
                    if ntp_address.is_none() {
                        ntp_address = ntp::resolve(stack, NTP_SERVER).await;
                    }
                    let reading = match ntp_address {
                        Some(address) => ntp::query(stack, address).await,
                        None => TimeReading::INVALID,
                    };
                    app.on_time_reading(reading, now_ms(boot_instant));
                }
                _ => {}
            }

            Timer::after_millis(board::POLL_INTERVAL_MS).await;
        }
    };

    let _ = embassy_futures::join::join(net_future, ui_future).await;
    unreachable!()
}
