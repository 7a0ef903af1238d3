use crate::url::visited::VisitedSet;
use std::collections::HashSet;
use url::Url;

/// Decides which discovered hrefs become new frontier entries
///
/// # Rules
///
/// A candidate is rejected when:
/// - it is empty or does not resolve to an http(s) URL
/// - the resolved URL carries a fragment (anchor links are not documents)
/// - it leaves the crawl scope: scheme, host, port and path prefix of the
///   start location must all match
/// - its path ends with one of the configured ignore suffixes
/// - its path is already in the [`VisitedSet`] (checked by [`LinkFilter::accept`])
///
/// Accepted candidates are origin-relative paths; query strings are dropped.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    scope: Url,
    ignore_suffixes: Vec<String>,
}

impl LinkFilter {
    /// Creates a filter scoped to a normalized start location
    pub fn new(scope: Url, ignore_suffixes: &[String]) -> Self {
        Self {
            scope,
            ignore_suffixes: ignore_suffixes
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The start location every accepted link must live under
    pub fn scope(&self) -> &Url {
        &self.scope
    }

    /// Checks one href found on `page_url`, without consulting the visited set
    ///
    /// Returns the in-scope path on success.
    pub fn candidate(&self, href: &str, page_url: &Url) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let resolved = page_url.join(href).ok()?;

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            return None;
        }

        if resolved.fragment().is_some() {
            return None;
        }

        if !self.in_scope(&resolved) {
            return None;
        }

        let path = resolved.path();
        if self.is_ignored(path) {
            return None;
        }

        Some(path.to_string())
    }

    /// Filters every href of one page, keeping first-occurrence order
    ///
    /// A page linking to the same target twice yields one candidate.
    pub fn candidates<'a, I>(&self, hrefs: I, page_url: &Url) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        hrefs
            .into_iter()
            .filter_map(|href| self.candidate(href, page_url))
            .filter(|path| seen.insert(path.clone()))
            .collect()
    }

    /// Full check including de-duplication
    ///
    /// On acceptance the path is recorded in `visited`, so the same href is
    /// accepted at most once per set.
    pub fn accept(&self, href: &str, page_url: &Url, visited: &mut VisitedSet) -> Option<String> {
        let path = self.candidate(href, page_url)?;
        visited.insert(&path).then_some(path)
    }

    fn in_scope(&self, url: &Url) -> bool {
        url.scheme() == self.scope.scheme()
            && url.host_str() == self.scope.host_str()
            && url.port_or_known_default() == self.scope.port_or_known_default()
            && url.path().starts_with(self.scope.path())
    }

    fn is_ignored(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/').to_ascii_lowercase();
        self.ignore_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
    }
}
