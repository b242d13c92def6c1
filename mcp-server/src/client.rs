//! HTTP client for the Libris API
//!
//! Every request carries the configured Basic credentials and asks for the
//! plain-text rendering, which is what the tools hand back to the model.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;

/// HTTP client for communicating with the Libris API
#[derive(Clone)]
pub struct LibrisClient {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
    password: String,
}

impl LibrisClient {
    /// Create a new client from environment variables
    ///
    /// Env vars:
    /// - LIBRIS_USER: manager name or member id (required)
    /// - LIBRIS_PASSWORD: manager password; members may leave it unset
    /// - LIBRIS_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let user_id = std::env::var("LIBRIS_USER")
            .context("LIBRIS_USER not set. Use the manager name or a member id.")?;
        let password = std::env::var("LIBRIS_PASSWORD").unwrap_or_default();
        let base_url = std::env::var("LIBRIS_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url, &user_id, &password)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str, user_id: &str, password: &str) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&basic_credentials(user_id, password))
                .context("Invalid credentials format")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whole catalog with availability
    pub async fn list_books(&self) -> Result<String> {
        self.get_text(&["books"], &[]).await
    }

    /// Books not currently on loan
    pub async fn available_books(&self) -> Result<String> {
        self.get_text(&["books"], &[("available", "true")]).await
    }

    /// Books whose title or author contains `query`
    pub async fn search_books(&self, query: &str) -> Result<String> {
        self.get_text(&["books"], &[("q", query)]).await
    }

    pub async fn book_details(&self, book_id: &str) -> Result<String> {
        self.get_text(&["books", book_id], &[]).await
    }

    /// Borrow a book; members may omit `member_id` to borrow for themselves
    pub async fn borrow(&self, book_id: &str, member_id: Option<&str>) -> Result<String> {
        self.post_text(
            &["books", book_id, "borrow"],
            &BorrowRequest {
                member_id: member_id.map(|s| s.to_string()),
            },
        )
        .await
    }

    pub async fn return_book(&self, book_id: &str) -> Result<String> {
        self.post_text(&["books", book_id, "return"], &serde_json::json!({}))
            .await
    }

    /// Active loans
    pub async fn loans(&self) -> Result<String> {
        self.get_text(&["loans"], &[]).await
    }

    pub async fn add_book(&self, id: &str, title: &str, author: &str) -> Result<String> {
        self.post_text(
            &["books"],
            &AddBookRequest {
                id: id.to_string(),
                title: title.to_string(),
                author: author.to_string(),
            },
        )
        .await
    }

    pub async fn register_member(&self, id: &str, name: &str) -> Result<String> {
        self.post_text(
            &["members"],
            &RegisterMemberRequest {
                id: id.to_string(),
                name: name.to_string(),
            },
        )
        .await
    }

    /// Check the configured credentials and report the role they map to
    pub async fn whoami(&self) -> Result<String> {
        self.post_text(
            &["login"],
            &LoginRequest {
                user_id: self.user_id.clone(),
                password: self.password.clone(),
            },
        )
        .await
    }

    // --- Internal helpers ---

    /// Base URL plus escaped path segments
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).context("Invalid API URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<String> {
        let url = self.url(segments)?;
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .header("Accept", "text/plain")
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", url.path()))?;

        handle_text_response(response).await
    }

    async fn post_text<T: Serialize>(&self, segments: &[&str], body: &T) -> Result<String> {
        let url = self.url(segments)?;
        let response = self
            .client
            .post(url.clone())
            .header("Accept", "text/plain")
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to POST {}", url.path()))?;

        handle_text_response(response).await
    }
}

/// `Authorization` value for HTTP Basic auth
fn basic_credentials(user_id: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", user_id, password))
    )
}

async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("API error ({}): {}", status, body);
    }

    Ok(body)
}

// --- Request Types ---

#[derive(Debug, Serialize)]
struct BorrowRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    member_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddBookRequest {
    id: String,
    title: String,
    author: String,
}

#[derive(Debug, Serialize)]
struct RegisterMemberRequest {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest {
    user_id: String,
    password: String,
}
