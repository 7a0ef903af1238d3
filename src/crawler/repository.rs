//! Repository tree resolver
//!
//! A start location such as `https://github.com/org/repo/tree/main/docs`
//! names a markdown tree rather than a website. Instead of following links,
//! the whole tree is listed with one API call and every markdown file under
//! the sub-path becomes a seed pointing at its raw content.

use crate::crawler::FrontierEntry;
use crate::{ConfigError, CrawlError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// File extensions treated as markdown documents
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// API version header value for the tree listing endpoint
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Depth assigned to every resolved document
pub const REPOSITORY_SEED_DEPTH: u32 = 1;

/// `{owner}/{repo}/tree/{reference}/{sub_path}` parsed from a start location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub reference: String,
    /// Directory inside the repository, without leading or trailing `/`;
    /// empty for the repository root
    pub sub_path: String,
}

impl RepoLocation {
    /// Parses the path of a repository start location
    ///
    /// # Returns
    ///
    /// * `Ok(RepoLocation)` - The path has the `/owner/repo/tree/ref/...` shape
    /// * `Err(CrawlError::Usage)` - Anything else
    ///
    /// # Example
    ///
    /// ```
    /// use doc_crawler::crawler::RepoLocation;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://github.com/org/repo/tree/main/docs/").unwrap();
    /// let location = RepoLocation::parse(&url).unwrap();
    /// assert_eq!(location.reference, "main");
    /// assert_eq!(location.sub_path, "docs");
    /// ```
    pub fn parse(url: &Url) -> Result<Self, CrawlError> {
        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [owner, repo, "tree", reference, rest @ ..] => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
                reference: reference.to_string(),
                sub_path: rest.join("/"),
            }),
            _ => Err(CrawlError::Usage(format!(
                "Invalid repository URL '{}'. It must follow the format: https://{}/<owner>/<repo>/tree/<branch>/<path>",
                url,
                url.host_str().unwrap_or("github.com")
            ))),
        }
    }

    /// `owner/repo`, for messages
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns whether a repository file path lies under the sub-path
    pub fn contains(&self, path: &str) -> bool {
        self.sub_path.is_empty()
            || path
                .strip_prefix(self.sub_path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Direct raw-content URL of a file in this repository
    ///
    /// Every path segment is percent-encoded, so names containing `#`, `?`
    /// or spaces address the file itself.
    pub fn raw_url(&self, raw_base: &Url, path: &str) -> Result<Url, CrawlError> {
        let mut url = raw_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConfigError::InvalidUrl(format!("Raw base '{}' cannot hold a path", raw_base))
            })?
            .pop_if_empty()
            .extend([
                self.owner.as_str(),
                self.repo.as_str(),
                self.reference.as_str(),
            ])
            .extend(path.split('/'));

        Ok(url)
    }
}

/// Kind of a tree listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    Commit,
    #[serde(other)]
    Other,
}

/// One entry of a recursive tree listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

impl TreeEntry {
    /// Regular file with a markdown extension
    pub fn is_markdown_file(&self) -> bool {
        self.kind == TreeEntryKind::Blob && has_markdown_extension(&self.path)
    }
}

fn has_markdown_extension(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => MARKDOWN_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension)),
        _ => false,
    }
}

/// Capability to list a repository tree recursively
#[async_trait]
pub trait TreeLister: Send + Sync {
    async fn list_tree(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, CrawlError>;
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

/// [`TreeLister`] backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubTreeClient {
    client: Client,
    api_base: Url,
}

impl GitHubTreeClient {
    pub fn new(client: Client, api_base: Url) -> Self {
        Self { client, api_base }
    }

    fn tree_url(&self, owner: &str, repo: &str, reference: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}",
            self.api_base.as_str().trim_end_matches('/'),
            owner,
            repo,
            reference
        )
    }
}

#[async_trait]
impl TreeLister for GitHubTreeClient {
    async fn list_tree(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, CrawlError> {
        let slug = format!("{}/{}", owner, repo);
        let listing_error = |message: String| CrawlError::RepositoryListing {
            repo: slug.clone(),
            message,
        };

        let response = self
            .client
            .get(self.tree_url(owner, repo, reference))
            .query(&[("recursive", "1")])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| listing_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(listing_error(format!(
                "HTTP {} for tree '{}'",
                status.as_u16(),
                reference
            )));
        }

        let listing: TreeResponse = response
            .json()
            .await
            .map_err(|e| listing_error(format!("Malformed tree listing: {}", e)))?;

        if listing.truncated {
            tracing::warn!(
                "Tree listing for {}@{} was truncated; some documents will be missing",
                slug,
                reference
            );
        }

        Ok(listing.tree)
    }
}

/// Expands a repository location into seed entries
///
/// Keeps regular markdown files under the sub-path, in listing order, each
/// mapped to its raw-content URL at depth [`REPOSITORY_SEED_DEPTH`].
pub async fn resolve_repository_seeds<L>(
    lister: &L,
    location: &RepoLocation,
    raw_base: &Url,
) -> Result<Vec<FrontierEntry>, CrawlError>
where
    L: TreeLister + ?Sized,
{
    let entries = lister
        .list_tree(&location.owner, &location.repo, &location.reference)
        .await?;
    let listed = entries.len();

    let seeds = entries
        .into_iter()
        .filter(|entry| entry.is_markdown_file() && location.contains(&entry.path))
        .map(|entry| {
            Ok(FrontierEntry {
                path: location.raw_url(raw_base, &entry.path)?.to_string(),
                depth: REPOSITORY_SEED_DEPTH,
            })
        })
        .collect::<Result<Vec<_>, CrawlError>>()?;

    tracing::info!(
        "Resolved {} markdown documents out of {} tree entries in {}",
        seeds.len(),
        listed,
        location.slug()
    );

    Ok(seeds)
}
