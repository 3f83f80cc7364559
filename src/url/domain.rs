use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pathway_atlas::url::extract_domain;
///
/// let url = Url::parse("https://HawaiiCareerPathways.org/index.html").unwrap();
/// assert_eq!(extract_domain(&url), Some("hawaiicareerpathways.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when `candidate` parses and its host equals `host`
///
/// Ports are ignored, so a mock server's URLs share a host with each other
/// but not with a different loopback name.
pub fn has_host(candidate: &str, host: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|u| extract_domain(&u))
        .is_some_and(|h| h.eq_ignore_ascii_case(host))
}
