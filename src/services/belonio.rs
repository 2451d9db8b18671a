// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Belonio API client for fetching profile and gift card data.
//!
//! Handles:
//! - Password-grant login and transparent re-login
//! - Bounded retry of failed requests (no backoff)
//! - Rate limit detection (gives up on the current request)
//! - Caching the last fetched profile, card list and most recent card
//!
//! The client is not meant to be shared between concurrent callers: every
//! operation that can touch the access token takes `&mut self`.

use crate::error::{AppError, Result};
use crate::models::{Employer, Employment, Giftcard, GiftcardPage, UserProfile};
use crate::services::metrics;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// OAuth scope requested at login.
const TOKEN_SCOPE: &str = "openid profile email offline_access";
/// OAuth client the Belonio web app logs in as.
const TOKEN_CLIENT_ID: &str = "login.belonio.app";

/// Account login, kept for re-authentication.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Endpoints, retry budgets and timeouts.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_host: String,
    pub auth_host: String,
    /// Retries after the first attempt of an authenticated request
    pub retry_budget: u32,
    /// Retries after the first attempt of a token request
    pub token_retries: u32,
    pub request_timeout: Duration,
    pub token_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_host: crate::config::DEFAULT_API_HOST.to_string(),
            auth_host: crate::config::DEFAULT_AUTH_HOST.to_string(),
            retry_budget: 3,
            token_retries: 3,
            request_timeout: Duration::from_secs(10),
            token_timeout: Duration::from_secs(30),
        }
    }
}

/// Belonio API client with cached account state.
pub struct BelonioClient {
    http: reqwest::Client,
    credentials: Credentials,
    options: ClientOptions,
    access_token: Option<String>,
    user_info: Option<UserProfile>,
    giftcards: Option<Vec<Giftcard>>,
    most_recent_giftcard: Option<Giftcard>,
}

impl BelonioClient {
    /// Create a client on top of a shared HTTP client.
    pub fn new(http: reqwest::Client, credentials: Credentials, options: ClientOptions) -> Self {
        Self {
            http,
            credentials,
            options,
            access_token: None,
            user_info: None,
            giftcards: None,
            most_recent_giftcard: None,
        }
    }

    /// Start from an already issued access token instead of logging in.
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    // ─── Cached State ────────────────────────────────────────────────────────

    pub fn user_info(&self) -> Option<&UserProfile> {
        self.user_info.as_ref()
    }

    pub fn giftcards(&self) -> Option<&[Giftcard]> {
        self.giftcards.as_deref()
    }

    pub fn most_recent_giftcard(&self) -> Option<&Giftcard> {
        self.most_recent_giftcard.as_ref()
    }

    /// Active employment from the cached profile.
    pub fn current_employment(&self) -> Option<&Employment> {
        self.user_info.as_ref()?.current_employment()
    }

    pub fn current_employer(&self) -> Option<&Employer> {
        self.current_employment().map(|employment| &employment.employer)
    }

    pub fn current_employment_id(&self) -> Option<&str> {
        self.current_employment()
            .map(|employment| employment.public_id.as_str())
    }

    // ─── Fetch Pipeline ──────────────────────────────────────────────────────

    /// Fetch the user profile.
    ///
    /// Leaves the cached profile untouched if the request yields no result.
    pub async fn fetch_user_info(&mut self) -> Result<()> {
        let url = format!("{}/profiles/self", self.options.api_host);

        let Some(response) = self.request(&url, None).await? else {
            return Ok(());
        };

        // Served as text/plain, so parse the body ourselves
        if let Some(profile) = serde_json::from_str::<Option<UserProfile>>(&response.body)? {
            self.user_info = Some(profile);
        }

        Ok(())
    }

    /// Fetch all gift cards of the active employment.
    ///
    /// Fetches the profile first if it has not been loaded yet.
    pub async fn fetch_giftcards(&mut self) -> Result<()> {
        if self.user_info.is_none() {
            self.fetch_user_info().await?;
        }

        if self.user_info.is_none() {
            tracing::debug!("No profile available, skipping gift card search");
            return Ok(());
        }

        let employment_id = self
            .current_employment_id()
            .ok_or(AppError::NoActiveEmployment)?
            .to_string();

        let url = format!("{}/giftcards/search", self.options.api_host);
        let body = serde_json::json!({ "employmentPublicId": employment_id });

        let Some(response) = self.request(&url, Some(&body)).await? else {
            return Ok(());
        };

        if let Some(page) = serde_json::from_str::<Option<GiftcardPage>>(&response.body)? {
            tracing::debug!(count = page.content.len(), "Gift cards fetched");
            self.giftcards = Some(page.content);
        }

        Ok(())
    }

    /// Fetch the full record of the card with the latest valuta.
    ///
    /// Fetches the card list first if it has not been loaded yet. An empty
    /// card list clears the cached most recent card.
    pub async fn fetch_most_recent_giftcard(&mut self) -> Result<()> {
        if self.giftcards.is_none() {
            self.fetch_giftcards().await?;
        }

        let Some(giftcards) = self.giftcards.as_deref() else {
            return Ok(());
        };

        let Some(latest) = metrics::most_recent(giftcards) else {
            self.most_recent_giftcard = None;
            return Ok(());
        };

        let url = format!("{}/giftcards/{}", self.options.api_host, latest.giftcard_id);

        let Some(response) = self.request(&url, None).await? else {
            return Ok(());
        };

        if let Some(detail) = serde_json::from_str::<Option<Giftcard>>(&response.body)? {
            self.most_recent_giftcard = Some(detail);
        }

        Ok(())
    }

    // ─── Transport ───────────────────────────────────────────────────────────

    /// Log in with the stored credentials.
    ///
    /// Returns `Ok(false)` if the token endpoint refused the login.
    pub async fn login(&mut self) -> Result<bool> {
        self.access_token = request_token(&self.http, &self.credentials, &self.options).await?;
        Ok(self.access_token.is_some())
    }

    /// Send an authenticated request, POSTing `body` as JSON if present.
    ///
    /// Returns `Ok(None)` when the API answered with an error status: rate
    /// limited (no retry) or still failing once the retry budget is spent.
    /// Transport failures and timeouts, including those hit while reading
    /// the body, are retried too, but surface as an error once the budget is
    /// spent.
    pub async fn request(
        &mut self,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<ApiResponse>> {
        let mut retries_remaining = self.options.retry_budget;

        loop {
            tracing::debug!(url = %url, retries_remaining, post = body.is_some(), "Belonio request");

            if self.access_token.is_none() {
                tracing::debug!("Fetching access token");
                self.login().await?;
            }

            let Some(access_token) = self.access_token.as_deref() else {
                return Ok(None);
            };

            let builder = match body {
                Some(body) => self.http.post(url).json(body),
                None => self.http.get(url),
            };

            let builder = builder
                .bearer_auth(access_token)
                .timeout(self.options.request_timeout);

            match send_and_read(builder).await {
                Ok(response) => {
                    let status = response.status;
                    tracing::debug!(status = %status, url = %url, "Belonio response");

                    if status.as_u16() <= 400 {
                        return Ok(Some(response));
                    }

                    // Expired or revoked token shows up here too, so log in again
                    self.access_token = None;

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        tracing::warn!(url = %url, "Belonio rate limit hit (429)");
                        return Ok(None);
                    }

                    if retries_remaining > 0 {
                        retries_remaining -= 1;
                        continue;
                    }

                    tracing::error!(
                        status = %status,
                        url = %url,
                        "Error connecting to Belonio, giving up"
                    );
                    return Ok(None);
                }
                Err(err) => {
                    // A 429 always arrives as a status above, never as a
                    // transport error, so every failure here is retryable.
                    self.access_token = None;

                    if retries_remaining > 0 {
                        tracing::debug!(error = %err, url = %url, "Belonio request failed, retrying");
                        retries_remaining -= 1;
                        continue;
                    }

                    if err.is_timeout() {
                        tracing::error!(url = %url, "Timed out when connecting to Belonio");
                    } else {
                        tracing::error!(error = %err, url = %url, "Error connecting to Belonio");
                    }
                    return Err(AppError::from_transport(&err));
                }
            }
        }
    }
}

/// Status and body of a completed API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Send a request and read the whole body. The request timeout covers both,
/// so a stalled body fails the attempt like a stalled connect.
async fn send_and_read(builder: RequestBuilder) -> reqwest::Result<ApiResponse> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;
    Ok(ApiResponse { status, body })
}

/// Token response from the auth endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Password-grant login against `{auth_host}/token`.
///
/// Transport failures are retried immediately up to `token_retries` times,
/// then reported as `AppError::Auth`. A non-200 answer, or a 200 without a
/// readable token, yields `Ok(None)`.
async fn request_token(
    http: &reqwest::Client,
    credentials: &Credentials,
    options: &ClientOptions,
) -> Result<Option<String>> {
    let url = format!("{}/token", options.auth_host);
    let mut retries_remaining = options.token_retries;

    let response = loop {
        let result = http
            .post(&url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("scope", TOKEN_SCOPE),
                ("client_id", TOKEN_CLIENT_ID),
            ])
            .timeout(options.token_timeout)
            .send()
            .await;

        match result {
            Ok(response) => break response,
            Err(err) if retries_remaining > 0 => {
                tracing::debug!(error = %err, retries_remaining, "Token request failed, retrying");
                retries_remaining -= 1;
            }
            Err(err) => {
                tracing::error!(error = %err, "Error getting Belonio token");
                return Err(AppError::Auth(format!("Token request failed: {}", err)));
            }
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!(
            status = %status,
            reason = status.canonical_reason().unwrap_or(""),
            "Belonio: Failed to get token"
        );
        return Ok(None);
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to read token response: {}", e)))?;
    let token = match serde_json::from_str::<TokenResponse>(&body) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Belonio: Unreadable token response");
            return Ok(None);
        }
    };

    Ok(token.access_token.filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("jane@example.com", "hunter2");
        let debug = format!("{:?}", credentials);

        assert!(debug.contains("jane@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_accessors_without_profile() {
        let client = BelonioClient::new(
            reqwest::Client::new(),
            Credentials::new("u", "p"),
            ClientOptions::default(),
        );

        assert!(client.user_info().is_none());
        assert!(client.current_employment().is_none());
        assert!(client.current_employer().is_none());
        assert!(client.current_employment_id().is_none());
        assert!(client.giftcards().is_none());
        assert!(client.most_recent_giftcard().is_none());
        assert!(!client.has_access_token());
    }

    #[test]
    fn test_with_access_token() {
        let client = BelonioClient::new(
            reqwest::Client::new(),
            Credentials::new("u", "p"),
            ClientOptions::default(),
        )
        .with_access_token("abc");

        assert!(client.has_access_token());
    }
}
