//! API client for the Maison Manoé shop backend.
//!
//! All authenticated traffic funnels through [`ApiClient::request`], which
//! refuses to hit the network without a stored token and treats a 401 as the
//! end of the session: stored state is cleared, a login redirect is handed
//! to the navigator, and the failure is still returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{RegisterRequest, TokenResponse, UserProfile};
use crate::navigation::{NavigationIntent, Navigator};

use super::ApiError;

/// Login page path users are sent to when a session ends
pub const LOGIN_PAGE: &str = "/connexion";

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const PROFILE_PATH: &str = "/api/auth/me";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// What a successful login yields: the raw token payload and the profile
/// resolved with it (absent when the profile fetch failed).
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub token: TokenResponse,
    pub user: Option<UserProfile>,
}

/// Authenticated client for the shop API.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    /// The session state this client reads and maintains.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue an authenticated request against the API.
    ///
    /// Fails with [`ApiError::NotAuthenticated`] before any network I/O when
    /// no token is stored. A 401 response clears the session, emits a login
    /// redirect carrying the navigator's current path, and fails with
    /// [`ApiError::SessionExpired`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;

        let mut request = self
            .http
            .request(method, self.url(endpoint))
            .bearer_auth(&token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(ApiError::Network)
            .with_context(|| format!("Failed to send request to {}", endpoint))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(endpoint, "Token rejected, ending session");
            if let Err(e) = self.session.clear_auth() {
                warn!(error = %e, "Failed to clear session after 401");
            }
            let intent = NavigationIntent::login_redirect(
                LOGIN_PAGE,
                self.navigator.current_path().as_deref(),
            );
            self.navigator.navigate(&intent);
            return Err(ApiError::SessionExpired.into());
        }

        Ok(response)
    }

    pub async fn get(&self, endpoint: &str) -> Result<reqwest::Response> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    /// Create an account. Does not authenticate the caller or store anything.
    pub async fn register(&self, user: &RegisterRequest) -> Result<UserProfile> {
        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .json(user)
            .send()
            .await
            .map_err(ApiError::Network)
            .context("Failed to send registration request")?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_error_body(&body, "Registration failed").into());
        }

        response
            .json()
            .await
            .context("Failed to parse registration response")
    }

    /// Sign in and persist the issued credential.
    ///
    /// The profile fetch after login is best-effort: when it fails, the user
    /// is stored as absent and the login still succeeds.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<LoginOutcome> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Network)
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_error_body(&body, "Invalid email or password").into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        let user = match self
            .http
            .get(self.url(PROFILE_PATH))
            .bearer_auth(&token.access_token)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp.json::<UserProfile>().await.ok(),
            Ok(resp) => {
                debug!(status = %resp.status(), "Profile fetch after login failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "Profile fetch after login failed");
                None
            }
        };

        self.session
            .set_auth(&token.access_token, user.as_ref(), remember)?;

        Ok(LoginOutcome { token, user })
    }

    /// Fetch the signed-in user's profile and refresh the cached copy.
    pub async fn fetch_user_profile(&self) -> Result<UserProfile> {
        let response = self.get(PROFILE_PATH).await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_error_body(&body, "Failed to fetch user profile").into());
        }

        let user: UserProfile = response
            .json()
            .await
            .context("Failed to parse profile response")?;
        self.session.cache_user(&user)?;
        Ok(user)
    }

    /// Clear the session and send the user to the login page, optionally
    /// carrying a path to return to after signing back in.
    pub fn logout(&self, return_url: Option<&str>) -> Result<()> {
        self.session.clear_auth()?;
        let intent = NavigationIntent::login_redirect(LOGIN_PAGE, return_url);
        self.navigator.navigate(&intent);
        Ok(())
    }

    /// Redirect to the default login page when unauthenticated. No-op
    /// otherwise.
    pub fn require_auth(&self) {
        self.require_auth_at(LOGIN_PAGE);
    }

    /// Redirect to `login_url` when unauthenticated, carrying the current
    /// path as the return target.
    pub fn require_auth_at(&self, login_url: &str) {
        if !self.session.is_authenticated() {
            let intent = NavigationIntent::login_redirect(
                login_url,
                self.navigator.current_path().as_deref(),
            );
            self.navigator.navigate(&intent);
        }
    }
}
