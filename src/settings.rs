use core::fmt::{self, Write};
use core::num::NonZeroU32;
use core::time::Duration;

use heapless::String;

use crate::constants::{HEALTH_PATH, REDACTED, REQUEST_BUFFER_SIZE, URL_BUFFER_SIZE};
use crate::validate::{self, EndpointPath, Origin};

#[derive(Debug)]
pub enum Error {
    Validation(validate::Error),
    Capacity, // Rendered value does not fit its buffer
}

impl From<validate::Error> for Error {
    fn from(e: validate::Error) -> Self {
        Error::Validation(e)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Capacity
    }
}

/// Validated, typed view over the display configuration.
#[derive(Clone, Copy)]
pub struct Settings<'a> {
    wifi_ssid: &'a str,
    wifi_psk: &'a str,
    origin: Origin<'a>,
    endpoint: EndpointPath<'a>,
    refresh_interval: NonZeroU32,
}

impl<'a> Settings<'a> {
    pub fn new(
        wifi_ssid: &'a str,
        wifi_psk: &'a str,
        backend_base_url: &'a str,
        display_endpoint_path: &'a str,
        refresh_interval_seconds: u32,
    ) -> Result<Self, validate::Error> {
        validate::check_ssid(wifi_ssid)?;
        validate::check_psk(wifi_psk)?;
        let origin = Origin::parse(backend_base_url)?;
        let endpoint = EndpointPath::parse(display_endpoint_path)?;
        let refresh_interval = validate::check_refresh_interval(refresh_interval_seconds)?;

        log::debug!(
            "Display settings valid: backend {} ({}:{}), endpoint {}, every {}s",
            origin,
            origin.host(),
            origin.port(),
            endpoint,
            refresh_interval
        );

        Ok(Self {
            wifi_ssid,
            wifi_psk,
            origin,
            endpoint,
            refresh_interval,
        })
    }

    pub fn wifi_ssid(&self) -> &'a str {
        self.wifi_ssid
    }

    pub fn wifi_psk(&self) -> &'a str {
        self.wifi_psk
    }

    pub fn origin(&self) -> &Origin<'a> {
        &self.origin
    }

    pub fn endpoint(&self) -> &EndpointPath<'a> {
        &self.endpoint
    }

    /// Display id served by the backend, when the endpoint is `/display/{id}.bmp`.
    pub fn display_id(&self) -> Option<&'a str> {
        self.endpoint.display_id()
    }

    pub fn refresh_interval_seconds(&self) -> u32 {
        self.refresh_interval.get()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.get().into())
    }

    /// Full URL of the display resource, e.g. "http://192.168.1.10:8000/display/example.bmp"
    pub fn display_url(&self) -> Result<String<URL_BUFFER_SIZE>, Error> {
        self.url_for(self.endpoint.as_str())
    }

    /// Backend liveness URL, e.g. "http://192.168.1.10:8000/health"
    pub fn health_url(&self) -> Result<String<URL_BUFFER_SIZE>, Error> {
        self.url_for(HEALTH_PATH)
    }

    fn url_for(&self, path: &str) -> Result<String<URL_BUFFER_SIZE>, Error> {
        let mut url = String::new();
        // Origin never ends with '/' and the path always starts with one
        write!(url, "{}{}", self.origin, path)?;
        Ok(url)
    }

    /// Writes the HTTP/1.1 request head fetching the display resource.
    pub fn write_request_head<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "GET {} HTTP/1.1\r\nHost: ", self.endpoint)?;
        self.origin.write_authority(w)?;
        w.write_str("\r\nConnection: close\r\n\r\n")
    }

    pub fn request_head(&self) -> Result<String<REQUEST_BUFFER_SIZE>, Error> {
        let mut head = String::new();
        self.write_request_head(&mut head)?;
        Ok(head)
    }
}

impl fmt::Debug for Settings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_psk", &REDACTED)
            .field("origin", &self.origin)
            .field("endpoint", &self.endpoint)
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}
