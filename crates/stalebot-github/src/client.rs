//! GitHub REST client
//!
//! Implements [`IssueTracker`] against the GitHub REST API for a single
//! repository.
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Configurable API base URL (GitHub Enterprise, test servers)
//! - Request timeout
//! - 404/410 responses surfaced as [`GitHubError::NotFound`]
//!
//! Mutations are never retried: a failed call is reported to the caller,
//! which decides whether it matters.

use crate::wire::{
    AddLabelsRequest, ApiErrorBody, CommentRequest, CreateLabelRequest, SearchResponse,
    UpdateStateRequest, WireItem,
};
use crate::GitHubError;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use stalebot_domain::{IssueTracker, Item, Repository, SearchRequest};
use std::time::Duration;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("stalebot/", env!("CARGO_PKG_VERSION"));

/// GitHub API client bound to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_url: Url,
    repository: Repository,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a client for `repository` authenticated with `token`
    ///
    /// # Errors
    ///
    /// Returns error if the token cannot be used as a header value or the
    /// HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stalebot_domain::Repository;
    /// use stalebot_github::GitHubClient;
    ///
    /// let repo = Repository::parse("octo-org/octo-repo").unwrap();
    /// let client = GitHubClient::new("ghp_example", repo).unwrap();
    /// ```
    pub fn new(token: &str, repository: Repository) -> Result<Self, GitHubError> {
        Self::with_timeout(token, repository, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(
        token: &str,
        repository: Repository,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| GitHubError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            api_url: parse_api_url(DEFAULT_API_URL)?,
            repository,
            client,
        })
    }

    /// Point the client at a different API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, GitHubError> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    /// Base URL requests are sent to
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// URL for `segments` appended to the API base, each percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL under `/repos/{owner}/{repo}/`
    pub(crate) fn repo_endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut all = vec!["repos", self.repository.owner(), self.repository.name()];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request, turning non-success statuses into errors
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<Response, GitHubError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|error| error.message)
            .unwrap_or(body);

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(GitHubError::NotFound(format!("{}: {}", operation, message)));
        }

        Err(GitHubError::Api {
            status: status.as_u16(),
            message: format!("{}: {}", operation, message),
        })
    }
}

fn parse_api_url(api_url: &str) -> Result<Url, GitHubError> {
    let url = Url::parse(api_url.trim_end_matches('/'))
        .map_err(|e| GitHubError::InvalidUrl(format!("{}: {}", api_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(GitHubError::InvalidUrl(api_url.to_string()));
    }
    Ok(url)
}

#[async_trait]
impl IssueTracker for GitHubClient {
    type Error = GitHubError;

    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn label_exists(&self, name: &str) -> Result<bool, Self::Error> {
        let url = self.repo_endpoint(&["labels", name])?;
        match self.send(self.request(Method::GET, url), "get label").await {
            Ok(_) => Ok(true),
            Err(GitHubError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_label(&self, name: &str, color: &str) -> Result<(), Self::Error> {
        let url = self.repo_endpoint(&["labels"])?;
        let body = CreateLabelRequest { name, color };
        self.send(self.request(Method::POST, url).json(&body), "create label")
            .await?;
        tracing::debug!("Created label '{}' in {}", name, self.repository);
        Ok(())
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), Self::Error> {
        if labels.is_empty() {
            return Ok(());
        }
        let url = self.repo_endpoint(&["issues", &number.to_string(), "labels"])?;
        let body = AddLabelsRequest { labels };
        self.send(self.request(Method::POST, url).json(&body), "add labels")
            .await?;
        Ok(())
    }

    async fn remove_label(&self, number: u64, name: &str) -> Result<(), Self::Error> {
        let url = self.repo_endpoint(&["issues", &number.to_string(), "labels", name])?;
        self.send(self.request(Method::DELETE, url), "remove label")
            .await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, Self::Error> {
        let url = self.endpoint(&["search", "issues"])?;
        let per_page = request.per_page.to_string();
        let builder = self.request(Method::GET, url).query(&[
            ("q", request.query.as_str()),
            ("sort", request.sort.as_str()),
            ("order", request.order.as_str()),
            ("per_page", per_page.as_str()),
        ]);

        let response: SearchResponse = self.send(builder, "search").await?.json().await?;
        Ok(response.items.into_iter().map(Item::from).collect())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), Self::Error> {
        let url = self.repo_endpoint(&["issues", &number.to_string(), "comments"])?;
        let body = CommentRequest { body };
        self.send(self.request(Method::POST, url).json(&body), "create comment")
            .await?;
        Ok(())
    }

    async fn close(&self, number: u64) -> Result<(), Self::Error> {
        let url = self.repo_endpoint(&["issues", &number.to_string()])?;
        let body = UpdateStateRequest { state: "closed" };
        self.send(self.request(Method::PATCH, url).json(&body), "close")
            .await?;
        Ok(())
    }

    async fn get_item(&self, number: u64) -> Result<Item, Self::Error> {
        let url = self.repo_endpoint(&["issues", &number.to_string()])?;
        let wire: WireItem = self
            .send(self.request(Method::GET, url), "get issue")
            .await?
            .json()
            .await?;
        Ok(Item::from(wire))
    }
}
