use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used for comparison and dedup
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Lowercase the host
/// 4. Drop the port when it is the scheme default (80 / 443)
/// 5. Remove fragment (everything after #)
/// 6. Remove trailing slashes from the path, except for the root `/`
///
/// The query string is left untouched. Applying the function to its own
/// output yields the same URL.
///
/// # Examples
///
/// ```
/// use pathway_atlas::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/programs/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/programs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingDomain)?;
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;

    if url.port() == default_port(url.scheme()) {
        // Only fails for cannot-be-a-base URLs, which http(s) never are
        let _ = url.set_port(None);
    }

    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

/// Normalizes a URL and returns it as an owned string
pub fn normalize_str(url_str: &str) -> Result<String, UrlError> {
    normalize_url(url_str).map(String::from)
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}
