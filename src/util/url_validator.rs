use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors produced while validating the API base URL or an article link.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The string could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP to a non-local host.
    #[error("Insecure URL: HTTPS required (except localhost)")]
    Insecure,
    /// Article link pointing at a private or loopback address.
    #[error("Private or local address not allowed: {0}")]
    PrivateHost(String),
    /// URL without a host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates the base URL of the news API.
///
/// HTTPS is required. Plain HTTP is only accepted for `localhost`,
/// `127.0.0.1` and `[::1]` so a development backend can be used.
///
/// # Examples
///
/// ```
/// use agro_radar::util::validate_api_base;
///
/// assert!(validate_api_base("https://agro-radar-360-3-0.onrender.com").is_ok());
/// assert!(validate_api_base("http://127.0.0.1:8000").is_ok());
/// assert!(validate_api_base("http://example.com").is_err());
/// assert!(validate_api_base("ftp://example.com").is_err());
/// ```
pub fn validate_api_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_local_host(&url) {
                return Err(UrlValidationError::Insecure);
            }
            tracing::warn!(base_url = %url, "Using plain HTTP API base URL (localhost only)");
        }
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validates an article link before handing it to the system browser.
///
/// Only public `http`/`https` URLs are passed to `open::that`; anything else
/// (custom schemes, file paths, private addresses) is refused with a message
/// suitable for the status bar.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, String> {
    let url = Url::parse(url_str).map_err(|e| format!("Link inválido: {}", e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("Esquema de link não suportado: {}", scheme)),
    }

    if is_local_host(&url) {
        return Err("Link aponta para endereço local".to_string());
    }

    if let Some(ip) = host_ip(&url) {
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateHost(ip.to_string()).to_string());
        }
    }

    Ok(url)
}

fn host_ip(url: &Url) -> Option<IpAddr> {
    let host = url.host_str()?;
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
        .parse()
        .ok()
}

fn is_local_host(url: &Url) -> bool {
    if url.host_str() == Some("localhost") {
        return true;
    }
    host_ip(url).is_some_and(|ip| ip.is_loopback())
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            if v6.is_loopback() || v6.is_unspecified() {
                return true;
            }
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link-local
            (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}
