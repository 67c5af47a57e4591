//! HTTP client for the contributor directory and avatar assets.

use std::{collections::HashSet, time::Duration};

use log::{debug, info, trace, warn};
use reqwest::{
    StatusCode,
    header::{ACCEPT, LINK},
};
use serde::Deserialize;
use url::{ParseError, Url};

use galleria_core::entity::{DirectoryListing, Entity};

use crate::{
    error::{AttemptError, DirectoryError},
    link,
    retry::{RetryPolicy, with_retry},
};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Entities requested per listing page.
pub const PAGE_SIZE: u32 = 100;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("galleria/", env!("CARGO_PKG_VERSION"));

/// Connection settings for a [`DirectoryClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    api_base: Url,
    timeout: Duration,
    retry: RetryPolicy,
    token: Option<String>,
    page_size: u32,
}

impl ClientOptions {
    /// Creates options pointing at `api_base` with default timeout, retry
    /// policy and page size.
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            token: None,
            page_size: PAGE_SIZE,
        }
    }

    /// Sets the per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy used for every request.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the bearer token sent with listing requests.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

/// One record of a contributors page as served by the directory.
#[derive(Debug, Deserialize)]
struct ContributorRecord {
    login: Option<String>,
    avatar_url: Option<Url>,
    html_url: Option<Url>,
    #[serde(default)]
    contributions: u64,
}

impl ContributorRecord {
    /// Converts an attributed record into an [`Entity`].
    ///
    /// Anonymous contributions carry no login and yield `None`.
    fn into_entity(self) -> Option<Entity> {
        let login = self.login?;
        match (self.avatar_url, self.html_url) {
            (Some(avatar_url), Some(html_url)) => {
                Some(Entity::new(login, avatar_url, html_url, self.contributions))
            }
            _ => {
                warn!(login = login.as_str(); "Contributor record lacks avatar or profile URL, skipping");
                None
            }
        }
    }
}

#[derive(Debug)]
struct Page {
    records: Vec<ContributorRecord>,
    next: Option<Url>,
}

/// Client for the paginated contributor directory.
///
/// A single client is meant to be shared by the listing fetch and every
/// avatar download of a run; requests reuse its connection pool.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl DirectoryClient {
    /// Builds a client from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Client`] if the HTTP client cannot be
    /// initialized.
    pub fn new(options: ClientOptions) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()?;

        Ok(Self { http, options })
    }

    /// Returns the options the client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Retrieves every attributed contributor of `owner/repo`.
    ///
    /// Pages are followed through their `Link: rel="next"` header until none
    /// remains. Anonymous entries are dropped and duplicate logins keep their
    /// first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::RemoteUnavailable`] when any page fails on
    /// every attempt of the retry policy. No partial listing is returned.
    pub async fn fetch(&self, owner: &str, repo: &str) -> Result<DirectoryListing, DirectoryError> {
        info!(owner = owner, repo = repo; "Fetching contributor directory");

        let mut listing = DirectoryListing::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.contributors_url(owner, repo)?);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!(url:% = url; "Continuation points to an already fetched page, stopping");
                break;
            }

            let page = with_retry(&self.options.retry, "directory page", |_| self.fetch_page(&url))
                .await
                .map_err(|err| DirectoryError::RemoteUnavailable {
                    url: url.to_string(),
                    attempts: self.options.retry.max_attempts(),
                    reason: err.to_string(),
                })?;
            pages += 1;

            let records = page.records.len();
            let entities: Vec<Entity> = page
                .records
                .into_iter()
                .filter_map(ContributorRecord::into_entity)
                .collect();
            let anonymous = records - entities.len();
            let accepted = listing.extend_page(entities);

            debug!(
                page = pages,
                records = records,
                anonymous = anonymous,
                accepted = accepted;
                "Fetched directory page"
            );

            next = page.next.map(|url| self.with_page_size(url));
        }

        info!(pages = pages, entities = listing.len(); "Contributor directory fetched");
        Ok(listing)
    }

    /// Downloads the raw bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::AssetUnavailable`] when every attempt fails
    /// with a transport error or a non-success status.
    pub async fn download(&self, url: &Url) -> Result<Vec<u8>, DirectoryError> {
        with_retry(&self.options.retry, "asset download", |_| self.download_once(url))
            .await
            .map_err(|err| DirectoryError::AssetUnavailable {
                url: url.to_string(),
                attempts: self.options.retry.max_attempts(),
                reason: err.to_string(),
            })
    }

    fn contributors_url(&self, owner: &str, repo: &str) -> Result<Url, DirectoryError> {
        let mut url = self.options.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contributors"]);
        url.query_pairs_mut()
            .append_pair("per_page", &self.options.page_size.to_string());
        Ok(url)
    }

    /// Adds the page size to a continuation URL that does not carry one.
    fn with_page_size(&self, mut url: Url) -> Url {
        if !url.query_pairs().any(|(name, _)| name == "per_page") {
            url.query_pairs_mut()
                .append_pair("per_page", &self.options.page_size.to_string());
        }
        url
    }

    async fn fetch_page(&self, url: &Url) -> Result<Page, AttemptError> {
        trace!(url:% = url; "Requesting directory page");

        let mut request = self.http.get(url.clone()).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.options.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(link::next_page)
            .and_then(|target| match url.join(target) {
                Ok(next) => Some(next),
                Err(err) => {
                    warn!(link = target, err:% = err; "Ignoring unparsable continuation link");
                    None
                }
            });

        let body = response.bytes().await?;
        // Empty repositories answer with 204 and no body.
        let records = if status == StatusCode::NO_CONTENT || body.is_empty() {
            Vec::new()
        } else {
            serde_json::from_slice(&body)?
        };

        Ok(Page { records, next })
    }

    async fn download_once(&self, url: &Url) -> Result<Vec<u8>, AttemptError> {
        trace!(url:% = url; "Downloading asset");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
