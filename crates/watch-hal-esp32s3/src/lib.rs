#![cfg_attr(not(test), no_std)]

//! Board-level drivers for the ESP32-S3 watch: debounced push buttons, the
//! SH1106 OLED surface and the two indicator LEDs.

pub mod board;
pub mod indicator;

pub mod input {
    pub mod buttons;
}

pub mod platform {
    pub mod display;
}
