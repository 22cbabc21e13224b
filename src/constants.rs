/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest SSID allowed by 802.11, in bytes
pub const WIFI_SSID_MAX_LEN: usize = 32;
/// Longest WPA2 pre-shared key, in bytes (63 char passphrase or 64 hex digits)
pub const WIFI_PSK_MAX_LEN: usize = 64;

/// Port used when an `http` origin omits one
pub const DEFAULT_HTTP_PORT: u16 = 80;
/// Port used when an `https` origin omits one
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Capacity of a rendered URL (origin + path)
pub const URL_BUFFER_SIZE: usize = 256;
/// Capacity of a rendered HTTP request head
pub const REQUEST_BUFFER_SIZE: usize = 512;

/// Backend liveness route
pub const HEALTH_PATH: &str = "/health";

/// Backend route serving a display bitmap: `/display/{display_id}.bmp`
pub const DISPLAY_ROUTE_PREFIX: &str = "/display/";
/// File extension closing the display route, the backend only serves bitmaps
pub const DISPLAY_ROUTE_SUFFIX: &str = ".bmp";

/// Placeholder printed instead of secrets
pub const REDACTED: &str = "<redacted>";
