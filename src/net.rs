// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP access for index backends.
//!
//! ```text
//! JsonPager::new()
//!   .url() .header() .timeout()
//!        |
//!        v
//!   fetch_all::<T>(token)
//!     GET url --> Vec<T> --> Link: <...>; rel="next" --> GET next ...
//!        |
//!        v
//!   Vec<T> (all pages, in order)
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Interruption:  CancellationToken -> NetworkError::Interrupted
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{DiscoveryError, GickupError, GickupResult, NetworkError};

/// Upper bound on followed pages.
const MAX_PAGES: usize = 100;

/// Global HTTP client - initialized once, reused across all requests.
/// Falls back to a basic client if custom configuration fails.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("gickup-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Fetches a paginated JSON array endpoint with a builder pattern.
///
/// # Example
/// ```ignore
/// use gickup::net::JsonPager;
///
/// let repos: Vec<Repo> = JsonPager::new()
///     .url("https://api.github.com/users/octocat/repos?per_page=100")
///     .fetch_all(&token)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonPager {
    client: Client,
    url: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Default for JsonPager {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonPager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Set the URL of the first page.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add a custom header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches every page and concatenates the arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL is configured.
    /// - A request fails or returns a non-success status code.
    /// - A page is not a JSON array of `T`.
    /// - The token is cancelled.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        token: &CancellationToken,
    ) -> GickupResult<Vec<T>> {
        let mut next = Some(
            self.url
                .clone()
                .ok_or_else(|| GickupError::other("no URL provided"))?,
        );
        let mut items = Vec::new();
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                debug!(url = %url, max_pages = MAX_PAGES, "page limit reached");
                break;
            }
            pages += 1;

            let (page, link) = self.fetch_page::<T>(&url, token).await?;
            trace!(url = %url, items = page.len(), "fetched page");
            items.extend(page);
            next = link.as_deref().and_then(parse_next_link);
        }

        Ok(items)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &CancellationToken,
    ) -> GickupResult<(Vec<T>, Option<String>)> {
        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!(url = %url, "GET");
        let response = tokio::select! {
            response = request.send() => response.map_err(NetworkError::Reqwest)?,
            () = token.cancelled() => return Err(NetworkError::Interrupted.into()),
        };

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = tokio::select! {
            body = response.text() => body.map_err(NetworkError::Reqwest)?,
            () = token.cancelled() => return Err(NetworkError::Interrupted.into()),
        };

        let page = serde_json::from_str(&body).map_err(|e| DiscoveryError::MalformedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok((page, link))
    }
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
#[must_use]
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::parse_next_link;

    #[test]
    fn test_parse_next_link() {
        let header = r#"<https://api.github.com/user/1/repos?page=2>; rel="next", <https://api.github.com/user/1/repos?page=5>; rel="last""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://api.github.com/user/1/repos?page=2")
        );
    }

    #[test]
    fn test_parse_next_link_absent_on_last_page() {
        let header = r#"<https://api.github.com/user/1/repos?page=1>; rel="prev", <https://api.github.com/user/1/repos?page=1>; rel="first""#;
        assert_eq!(parse_next_link(header), None);
    }

    #[test]
    fn test_parse_next_link_malformed() {
        assert_eq!(parse_next_link("garbage"), None);
        assert_eq!(parse_next_link(""), None);
    }
}
