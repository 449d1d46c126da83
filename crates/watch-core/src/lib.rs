#![cfg_attr(not(test), no_std)]

//! Hardware-independent core of the NTP wristwatch: up-time tracking, wall-clock
//! resolution, network time sync, redraw scheduling, screen power and the mode
//! controller that ties them together.

pub mod app;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod connectivity;
pub mod display;
pub mod error;
pub mod input;
pub mod power;
pub mod redraw;
pub mod render;
pub mod sntp;
pub mod sync;
pub mod uptime;
