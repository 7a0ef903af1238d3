use crate::UrlError;
use url::Url;

/// Document name a server returns for a directory path
pub const INDEX_DOCUMENT: &str = "index.html";

/// Normalizes a crawl start location into canonical directory form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme and a host
/// 3. Remove the fragment and query string
/// 4. Make sure the path ends with `/`, so prefix comparisons treat the
///    start location as a directory
///
/// # Arguments
///
/// * `url_str` - The start location supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Normalized start location
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use doc_crawler::url::normalize_start_url;
///
/// let url = normalize_start_url("https://example.com/docs").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/");
/// ```
pub fn normalize_start_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    url.set_query(None);

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Returns the index-document alias of a directory path
///
/// `/docs/` is served as `/docs/index.html` by most static hosts; both names
/// denote the same document. Non-directory paths have no alias.
pub fn index_alias(path: &str) -> Option<String> {
    path.ends_with('/')
        .then(|| format!("{}{}", path, INDEX_DOCUMENT))
}
