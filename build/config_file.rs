//! `cfg.toml` handling for the build script: locating the file, parsing it,
//! checking it and rendering the generated `CONFIG`.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use super::validate;

pub const CONFIG_ENV: &str = "DISPLAY_CONFIG";
pub const CONFIG_FILE: &str = "cfg.toml";
pub const CONFIG_EXAMPLE_FILE: &str = "cfg.toml.example";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub wifi_ssid: String,
    pub wifi_psk: String,
    pub backend_base_url: String,
    pub display_endpoint_path: String,
    pub refresh_interval_seconds: u32,
}

#[derive(Debug)]
pub enum Error {
    Toml(toml::de::Error),
    Invalid(validate::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Toml(e) => write!(f, "{}", e),
            Error::Invalid(e) => write!(f, "{}", e),
        }
    }
}

/// Where the configuration is read from, in order of precedence.
#[derive(Debug, PartialEq, Eq)]
pub enum Source {
    Env(PathBuf),
    Local(PathBuf),
    Example(PathBuf),
}

impl Source {
    pub fn path(&self) -> &Path {
        match self {
            Source::Env(path) | Source::Local(path) | Source::Example(path) => path,
        }
    }
}

/// Picks `$DISPLAY_CONFIG`, then `cfg.toml`, then `cfg.toml.example`.
/// Relative paths are taken from `crate_dir`.
pub fn resolve(env_override: Option<String>, crate_dir: &Path) -> Source {
    if let Some(path) = env_override {
        return Source::Env(crate_dir.join(path));
    }

    let local = crate_dir.join(CONFIG_FILE);
    if local.exists() {
        return Source::Local(local);
    }

    Source::Example(crate_dir.join(CONFIG_EXAMPLE_FILE))
}

pub fn parse(toml_str: &str) -> Result<RawConfig, Error> {
    let raw: RawConfig = toml::from_str(toml_str).map_err(Error::Toml)?;
    raw.check().map_err(Error::Invalid)?;
    Ok(raw)
}

impl RawConfig {
    fn check(&self) -> Result<(), validate::Error> {
        validate::check_ssid(&self.wifi_ssid)?;
        validate::check_psk(&self.wifi_psk)?;
        validate::Origin::parse(&self.backend_base_url)?;
        validate::EndpointPath::parse(&self.display_endpoint_path)?;
        validate::check_refresh_interval(self.refresh_interval_seconds)?;
        Ok(())
    }

    /// Rust source defining `CONFIG`, included by `src/config.rs`.
    pub fn to_rust(&self) -> String {
        format!(
            r#"
        pub const CONFIG: Config = Config {{
            wifi_ssid: {ssid:?},
            wifi_psk: {psk:?},
            backend_base_url: {url:?},
            display_endpoint_path: {path:?},
            refresh_interval_seconds: {intv},
        }};
    "#,
            ssid = self.wifi_ssid,
            psk = self.wifi_psk,
            url = self.backend_base_url,
            path = self.display_endpoint_path,
            intv = self.refresh_interval_seconds
        )
    }
}
