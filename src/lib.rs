//! Build-time configuration for the ESP32 display client.
//!
//! `build.rs` reads `cfg.toml` (or the file named by `DISPLAY_CONFIG`), rejects
//! invalid values and generates [`CONFIG`]. The firmware turns it into
//! [`Settings`] with [`Config::validate`] and uses the derived URLs and
//! request head to fetch the display bitmap every refresh interval.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod settings;
pub mod validate;

pub use config::{Config, CONFIG};
pub use settings::Settings;
