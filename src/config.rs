use core::fmt;

use crate::constants::{REDACTED, VERSION};
use crate::settings::Settings;
use crate::validate;

pub struct Config {
    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key (password)
    pub wifi_psk: &'static str,

    // Backend origin: scheme, host and optional port (e.g. "http://192.168.1.10:8000")
    pub backend_base_url: &'static str,

    // Display endpoint path, with leading slash (e.g. "/display/example.bmp")
    pub display_endpoint_path: &'static str,

    // Seconds between two fetches of the display image
    pub refresh_interval_seconds: u32,
}

impl Config {
    /// Checks every field and returns the typed view the client works with.
    ///
    /// The build script already rejects an invalid `cfg.toml`, so for the
    /// generated [`CONFIG`] this only fails if the generated file was tampered with.
    pub fn validate(&self) -> Result<Settings<'static>, validate::Error> {
        Settings::new(
            self.wifi_ssid,
            self.wifi_psk,
            self.backend_base_url,
            self.display_endpoint_path,
            self.refresh_interval_seconds,
        )
    }

    pub fn log_summary(&self) {
        log::info!("Display config (firmware {})", VERSION);
        log::info!("  wifi_ssid: {:?}", self.wifi_ssid);
        log::info!("  wifi_psk: {}", REDACTED);
        log::info!("  backend_base_url: {}", self.backend_base_url);
        log::info!("  display_endpoint_path: {}", self.display_endpoint_path);
        log::info!("  refresh_interval_seconds: {}", self.refresh_interval_seconds);
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_psk", &REDACTED)
            .field("backend_base_url", &self.backend_base_url)
            .field("display_endpoint_path", &self.display_endpoint_path)
            .field("refresh_interval_seconds", &self.refresh_interval_seconds)
            .finish()
    }
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));
