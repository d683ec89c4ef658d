//! HTTP client for the myFlix REST API.
//!
//! All authenticated calls read the username and token from the injected
//! [`SessionStore`] right before the request is built.

pub mod error;

pub use error::{ApiError, ErrorKind, GENERIC_ERROR_MESSAGE, REGISTRATION_FALLBACK_MESSAGE};

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Credentials, LoginResponse, Movie, User, UserDetails, UserUpdate};
use crate::session::SessionStore;

/// Client for the movie catalog and user endpoints.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// With no `timeout` a request waits as long as the HTTP stack lets it.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API URL: {}", base_url);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    // ------------------------------------------------------------------
    // Unauthenticated
    // ------------------------------------------------------------------

    /// Create a new account.
    pub async fn register(&self, details: &UserDetails) -> Result<User, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["users"]))
            .json(details);
        self.send_json(request).await
    }

    /// Exchange credentials for a token. Does not touch the session store.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .post(self.endpoint(&["login"]))
            .query(&[
                ("Username", credentials.username.as_str()),
                ("Password", credentials.password.as_str()),
            ])
            .json(credentials);
        self.send_json(request).await
    }

    // ------------------------------------------------------------------
    // Movies
    // ------------------------------------------------------------------

    pub async fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        let request = self.authorized(Method::GET, &["movies"])?;
        self.send_json(request).await
    }

    pub async fn get_movie(&self, title: &str) -> Result<Movie, ApiError> {
        let request = self.authorized(Method::GET, &["movies", title])?;
        self.send_json(request).await
    }

    /// Same route as [`get_movie`](Self::get_movie); the server resolves ids too.
    pub async fn get_movie_by_id(&self, id: &str) -> Result<Movie, ApiError> {
        let request = self.authorized(Method::GET, &["movies", id])?;
        self.send_json(request).await
    }

    pub async fn get_movies_by_director(&self, name: &str) -> Result<Vec<Movie>, ApiError> {
        let request = self.authorized(Method::GET, &["movies", "directors", name])?;
        self.send_json(request).await
    }

    pub async fn get_movies_by_genre(&self, name: &str) -> Result<Vec<Movie>, ApiError> {
        let request = self.authorized(Method::GET, &["movies", "genre", name])?;
        self.send_json(request).await
    }

    // ------------------------------------------------------------------
    // Current user
    // ------------------------------------------------------------------

    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        let username = self.current_username()?;
        let request = self.authorized(Method::GET, &["users", &username])?;
        self.send_json(request).await
    }

    pub async fn add_favorite(&self, movie_id: &str) -> Result<User, ApiError> {
        let username = self.current_username()?;
        let request = self.authorized(Method::POST, &["users", &username, "movies", movie_id])?;
        self.send_json(request).await
    }

    pub async fn remove_favorite(&self, movie_id: &str) -> Result<User, ApiError> {
        let username = self.current_username()?;
        let request =
            self.authorized(Method::DELETE, &["users", &username, "movies", movie_id])?;
        self.send_json(request).await
    }

    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let username = self.current_username()?;
        let request = self
            .authorized(Method::PUT, &["users", &username])?
            .json(update);
        self.send_json(request).await
    }

    /// Delete the account. The server answers with a plain-text confirmation.
    pub async fn delete_user(&self) -> Result<String, ApiError> {
        let username = self.current_username()?;
        let request = self.authorized(Method::DELETE, &["users", &username])?;
        self.send_text(request).await
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    /// Join percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn current_username(&self) -> Result<String, ApiError> {
        self.session.username().ok_or(ApiError::NoSession)
    }

    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::NoSession)?;
        Ok(self
            .client
            .request(method, self.endpoint(segments))
            .header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = request.build().map_err(ApiError::network)?;
        debug!(method = %request.method(), path = %request.url().path(), "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, body));
        }
        Ok(response)
    }

    async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = self.send(request).await?;
        response.text().await.map_err(ApiError::network)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_text(request).await?;
        decode_body(&body)
    }
}

/// Decode a success body; an empty body reads as `{}`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Unexpected response body");
        ApiError::Decode(e)
    })
}
