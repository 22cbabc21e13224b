//! Static well-formedness checks for the display configuration.
//!
//! This module only depends on `core` and the sibling `constants` module so
//! the build script can compile it too and reject a bad `cfg.toml` before
//! anything is flashed.

use core::fmt;
use core::net::Ipv6Addr;
use core::num::NonZeroU32;

use super::constants::{
    DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT, DISPLAY_ROUTE_PREFIX, DISPLAY_ROUTE_SUFFIX,
    WIFI_PSK_MAX_LEN, WIFI_SSID_MAX_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    EmptySsid,
    SsidTooLong,
    EmptyPsk,
    PskTooLong,
    ZeroRefreshInterval,
    UnsupportedScheme,
    EmptyHost,
    InvalidHost,
    InvalidPort,
    UnexpectedUserInfo,
    UnexpectedPath, // path, query or fragment inside the origin
    EmptyPath,
    RelativePath,
    InvalidPathChar,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptySsid => write!(f, "wifi_ssid must not be empty"),
            Error::SsidTooLong => {
                write!(f, "wifi_ssid must be at most {} bytes", WIFI_SSID_MAX_LEN)
            }
            Error::EmptyPsk => write!(f, "wifi_psk must not be empty"),
            Error::PskTooLong => write!(f, "wifi_psk must be at most {} bytes", WIFI_PSK_MAX_LEN),
            Error::ZeroRefreshInterval => {
                write!(f, "refresh_interval_seconds must be greater than 0")
            }
            Error::UnsupportedScheme => {
                write!(f, "backend_base_url must start with http:// or https://")
            }
            Error::EmptyHost => write!(f, "backend_base_url has no host"),
            Error::InvalidHost => write!(f, "backend_base_url has an invalid host"),
            Error::InvalidPort => write!(f, "backend_base_url port must be in 1..=65535"),
            Error::UnexpectedUserInfo => {
                write!(f, "backend_base_url must not carry user credentials")
            }
            Error::UnexpectedPath => {
                write!(f, "backend_base_url must be an origin without path, query or fragment")
            }
            Error::EmptyPath => write!(f, "display_endpoint_path must not be empty"),
            Error::RelativePath => write!(f, "display_endpoint_path must start with '/'"),
            Error::InvalidPathChar => write!(
                f,
                "display_endpoint_path may only contain URL path characters and %XX escapes"
            ),
        }
    }
}

pub fn check_ssid(ssid: &str) -> Result<(), Error> {
    if ssid.is_empty() {
        return Err(Error::EmptySsid);
    }
    if ssid.len() > WIFI_SSID_MAX_LEN {
        return Err(Error::SsidTooLong);
    }
    Ok(())
}

pub fn check_psk(psk: &str) -> Result<(), Error> {
    if psk.is_empty() {
        return Err(Error::EmptyPsk);
    }
    if psk.len() > WIFI_PSK_MAX_LEN {
        return Err(Error::PskTooLong);
    }
    Ok(())
}

pub fn check_refresh_interval(seconds: u32) -> Result<NonZeroU32, Error> {
    NonZeroU32::new(seconds).ok_or(Error::ZeroRefreshInterval)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn parse(s: &str) -> Result<Self, Error> {
        if s.eq_ignore_ascii_case("http") {
            Ok(Scheme::Http)
        } else if s.eq_ignore_ascii_case("https") {
            Ok(Scheme::Https)
        } else {
            Err(Error::UnsupportedScheme)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => DEFAULT_HTTP_PORT,
            Scheme::Https => DEFAULT_HTTPS_PORT,
        }
    }
}

/// Backend origin: scheme, host and optional port.
/// Examples: "http://192.168.1.10:8000", "https://display.local", "http://[fe80::1]:8080"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin<'a> {
    scheme: Scheme,
    /// Host as written, IPv6 literals keep their brackets
    host: &'a str,
    /// Port as written, None means the scheme default
    port: Option<u16>,
}

impl<'a> Origin<'a> {
    pub fn parse(url: &'a str) -> Result<Self, Error> {
        let url = url.trim();

        let (scheme, rest) = url.split_once("://").ok_or(Error::UnsupportedScheme)?;
        let scheme = Scheme::parse(scheme)?;

        // A single trailing slash is harmless, anything after it is not
        let authority = rest.strip_suffix('/').unwrap_or(rest);
        if authority.contains(&['/', '?', '#'][..]) {
            return Err(Error::UnexpectedPath);
        }
        if authority.contains('@') {
            return Err(Error::UnexpectedUserInfo);
        }

        let (host, port) = split_host_port(authority)?;

        Ok(Origin { scheme, host, port })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Port to connect to, falling back to the scheme default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    pub fn explicit_port(&self) -> Option<u16> {
        self.port
    }

    pub fn is_default_port(&self) -> bool {
        self.port() == self.scheme.default_port()
    }

    /// Writes `host[:port]` the way it was configured, as used by the Host header.
    pub fn write_authority<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str(self.host)?;
        if let Some(port) = self.port {
            write!(w, ":{}", port)?;
        }
        Ok(())
    }
}

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme.as_str())?;
        self.write_authority(f)
    }
}

fn split_host_port(authority: &str) -> Result<(&str, Option<u16>), Error> {
    if authority.is_empty() {
        return Err(Error::EmptyHost);
    }

    // Bracketed IPv6 literal, e.g. "[fe80::1]:8080"
    if let Some(inner) = authority.strip_prefix('[') {
        let (literal, after) = inner.split_once(']').ok_or(Error::InvalidHost)?;
        literal
            .parse::<Ipv6Addr>()
            .map_err(|_| Error::InvalidHost)?;
        let host = &authority[..literal.len() + 2];
        let port = match after {
            "" => None,
            _ => Some(parse_port(after.strip_prefix(':').ok_or(Error::InvalidHost)?)?),
        };
        return Ok((host, port));
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    if host.is_empty() {
        return Err(Error::EmptyHost);
    }
    if !host
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return Err(Error::InvalidHost);
    }

    let port = port.map(parse_port).transpose()?;
    Ok((host, port))
}

fn parse_port(s: &str) -> Result<u16, Error> {
    // u16::from_str would accept a leading '+'
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPort);
    }
    match s.parse::<u16>() {
        Ok(0) | Err(_) => Err(Error::InvalidPort),
        Ok(port) => Ok(port),
    }
}

/// Path of the display resource on the backend, sent verbatim as request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPath<'a>(&'a str);

impl<'a> EndpointPath<'a> {
    pub fn parse(path: &'a str) -> Result<Self, Error> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }
        if !path.starts_with('/') {
            return Err(Error::RelativePath);
        }
        check_path_chars(path)?;
        Ok(EndpointPath(path))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Display id for paths shaped like `/display/{display_id}.bmp`.
    pub fn display_id(&self) -> Option<&'a str> {
        let id = self
            .0
            .strip_prefix(DISPLAY_ROUTE_PREFIX)?
            .strip_suffix(DISPLAY_ROUTE_SUFFIX)?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(id)
    }
}

// RFC 3986 path: '/' separated pchars, where
// pchar = unreserved / pct-encoded / sub-delims / ":" / "@"
fn check_path_chars(path: &str) -> Result<(), Error> {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escaped = bytes.get(i + 1..i + 3).ok_or(Error::InvalidPathChar)?;
                if !escaped.iter().all(u8::is_ascii_hexdigit) {
                    return Err(Error::InvalidPathChar);
                }
                i += 3;
                continue;
            }
            b if b.is_ascii_alphanumeric() => {}
            b'-' | b'.' | b'_' | b'~' => {}
            b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=' => {}
            b':' | b'@' | b'/' => {}
            _ => return Err(Error::InvalidPathChar),
        }
        i += 1;
    }
    Ok(())
}

impl fmt::Display for EndpointPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ssid_and_psk_must_be_non_empty() {
        assert_eq!(check_ssid(""), Err(Error::EmptySsid));
        assert_eq!(check_psk(""), Err(Error::EmptyPsk));
        assert_eq!(check_ssid("your-ssid"), Ok(()));
        assert_eq!(check_psk("your-password"), Ok(()));
    }

    #[test]
    fn ssid_and_psk_length_limits() {
        let ssid = "s".repeat(WIFI_SSID_MAX_LEN);
        assert_eq!(check_ssid(&ssid), Ok(()));
        assert_eq!(check_ssid(&format!("{}s", ssid)), Err(Error::SsidTooLong));

        let psk = "p".repeat(WIFI_PSK_MAX_LEN);
        assert_eq!(check_psk(&psk), Ok(()));
        assert_eq!(check_psk(&format!("{}p", psk)), Err(Error::PskTooLong));
    }

    #[test]
    fn refresh_interval_must_be_positive() {
        assert_eq!(check_refresh_interval(0), Err(Error::ZeroRefreshInterval));
        assert_eq!(check_refresh_interval(50).map(|n| n.get()), Ok(50));
    }

    #[test]
    fn parses_origin_with_port() {
        let origin = Origin::parse("http://192.168.1.10:8000").unwrap();
        assert_eq!(origin.scheme(), Scheme::Http);
        assert_eq!(origin.host(), "192.168.1.10");
        assert_eq!(origin.port(), 8000);
        assert_eq!(origin.explicit_port(), Some(8000));
        assert!(!origin.is_default_port());
    }

    #[test]
    fn origin_port_defaults_to_scheme() {
        let http = Origin::parse("http://display.local").unwrap();
        assert_eq!(http.port(), 80);
        assert_eq!(http.explicit_port(), None);
        assert!(http.is_default_port());

        let https = Origin::parse("HTTPS://display.local/").unwrap();
        assert_eq!(https.scheme(), Scheme::Https);
        assert_eq!(https.port(), 443);
        assert_eq!(https.host(), "display.local");
    }

    #[test]
    fn origin_accepts_ipv6_literal() {
        let origin = Origin::parse("http://[fe80::1]:8080").unwrap();
        assert_eq!(origin.host(), "[fe80::1]");
        assert_eq!(origin.port(), 8080);

        let origin = Origin::parse("http://[::1]").unwrap();
        assert_eq!(origin.host(), "[::1]");
        assert_eq!(origin.explicit_port(), None);

        assert_eq!(Origin::parse("http://[]"), Err(Error::InvalidHost));
        assert_eq!(Origin::parse("http://[::1"), Err(Error::InvalidHost));
        assert_eq!(Origin::parse("http://[::1]8080"), Err(Error::InvalidHost));
        for bad in ["http://[1]", "http://[:]", "http://[...]", "http://[1:2:3:4:5:6:7:8:9:10]"] {
            assert_eq!(Origin::parse(bad), Err(Error::InvalidHost), "{}", bad);
        }
    }

    #[test]
    fn origin_rejects_bad_input() {
        assert_eq!(Origin::parse("192.168.1.10:8000"), Err(Error::UnsupportedScheme));
        assert_eq!(Origin::parse("ftp://host"), Err(Error::UnsupportedScheme));
        assert_eq!(Origin::parse("http://"), Err(Error::EmptyHost));
        assert_eq!(Origin::parse("http:///"), Err(Error::EmptyHost));
        assert_eq!(Origin::parse("http://:8000"), Err(Error::EmptyHost));
        assert_eq!(Origin::parse("http://bad host"), Err(Error::InvalidHost));
        assert_eq!(Origin::parse("http://host:0"), Err(Error::InvalidPort));
        assert_eq!(Origin::parse("http://host:65536"), Err(Error::InvalidPort));
        assert_eq!(Origin::parse("http://host:+80"), Err(Error::InvalidPort));
        assert_eq!(Origin::parse("http://host:"), Err(Error::InvalidPort));
        assert_eq!(Origin::parse("http://user:pw@host"), Err(Error::UnexpectedUserInfo));
        assert_eq!(Origin::parse("http://host/display"), Err(Error::UnexpectedPath));
        assert_eq!(Origin::parse("http://host//"), Err(Error::UnexpectedPath));
        assert_eq!(Origin::parse("http://host?x=1"), Err(Error::UnexpectedPath));
        assert_eq!(Origin::parse("http://host#top"), Err(Error::UnexpectedPath));
    }

    #[test]
    fn origin_display_keeps_configured_port() {
        let origin = Origin::parse("http://192.168.1.10:8000/").unwrap();
        assert_eq!(format!("{}", origin), "http://192.168.1.10:8000");

        let origin = Origin::parse("http://display.local").unwrap();
        assert_eq!(format!("{}", origin), "http://display.local");
    }

    #[test]
    fn endpoint_path_must_be_absolute() {
        assert_eq!(EndpointPath::parse(""), Err(Error::EmptyPath));
        assert_eq!(EndpointPath::parse("display/example.bmp"), Err(Error::RelativePath));
        assert_eq!(EndpointPath::parse("/display/ex ample.bmp"), Err(Error::InvalidPathChar));
        assert_eq!(EndpointPath::parse("/display/example.bmp?x=1"), Err(Error::InvalidPathChar));
        assert_eq!(EndpointPath::parse("/display/example.bmp\r\n"), Err(Error::InvalidPathChar));
        assert_eq!(EndpointPath::parse("/").map(|p| p.as_str()), Ok("/"));
    }

    #[test]
    fn endpoint_path_only_takes_url_path_chars() {
        for bad in [
            "/display/café.bmp",
            "/display/<x>.bmp",
            "/display/a\"b.bmp",
            "/display/{id}.bmp",
            "/display/a|b.bmp",
            "/display/a\\b.bmp",
            "/display/a^b.bmp",
            "/display/a`b.bmp",
            "/display/%zz.bmp",
            "/display/%4",
        ] {
            assert_eq!(EndpointPath::parse(bad), Err(Error::InvalidPathChar), "{}", bad);
        }

        let path = EndpointPath::parse("/display/caf%C3%A9.bmp").unwrap();
        assert_eq!(path.display_id(), Some("caf%C3%A9"));
        let path = EndpointPath::parse("/display/room_1~a(b)!;v=2:@x.bmp").unwrap();
        assert_eq!(path.display_id(), Some("room_1~a(b)!;v=2:@x"));
    }

    #[test]
    fn endpoint_display_id() {
        let path = EndpointPath::parse("/display/example.bmp").unwrap();
        assert_eq!(path.display_id(), Some("example"));

        let path = EndpointPath::parse("/display/kitchen-2.bmp").unwrap();
        assert_eq!(path.display_id(), Some("kitchen-2"));

        for other in ["/display/.bmp", "/display/a/b.bmp", "/display/example.png", "/health"] {
            let path = EndpointPath::parse(other).unwrap();
            assert_eq!(path.display_id(), None, "{}", other);
        }
    }

    #[test]
    fn error_messages_name_the_field() {
        assert_eq!(
            format!("{}", Error::RelativePath),
            "display_endpoint_path must start with '/'"
        );
        assert_eq!(
            format!("{}", Error::ZeroRefreshInterval),
            "refresh_interval_seconds must be greater than 0"
        );
    }
}
