//! Authenticated console session.
//!
//! A [`Session`] owns a fresh HTTP client whose cookie store carries the
//! console's session cookie. It lives for one present/clean-up call and is
//! dropped afterwards; nothing is shared between calls.

use reqwest::Client;

use crate::config::{ClientConfig, Credentials};
use crate::error::{ProviderError, Result};
use crate::http_client::{HttpUtils, LOG_TAG};
use crate::providers::common::create_http_client;

/// Marker shown by the console when the login is rejected.
const LOGIN_FAILED_MARKER: &str = ">Incorrect</div>";

/// Logged-in console session.
pub struct Session {
    client: Client,
    config: ClientConfig,
}

impl Session {
    /// Log in and return the session with the landing page HTML.
    ///
    /// 1. GET the base URL to obtain the session cookie
    /// 2. POST `email`/`pass` to the base URL
    /// 3. reject the landing page if it carries the "Incorrect" marker
    pub async fn login(config: &ClientConfig) -> Result<(Self, String)> {
        let Credentials::Login { username, password } = config.credentials() else {
            return Err(ProviderError::config(
                "console login requires username/password credentials",
            ));
        };
        config.credentials().ensure_not_empty()?;

        let client = create_http_client(config, true)?;
        let url = config.base_url();

        log::info!("[{LOG_TAG}] Fetching initial page: {url}");
        HttpUtils::execute_request(client.get(url), "GET", url)
            .await
            .map_err(|e| with_context(e, &format!("error fetching initial page '{url}'")))?;

        log::info!("[{LOG_TAG}] Logging in: username={username}");
        let form = [
            ("email", username.as_str()),
            ("pass", password.as_str()),
            ("submit", "Login!"),
        ];
        let (_status, body) = HttpUtils::execute_request(client.post(url).form(&form), "POST", url)
            .await
            .map_err(|e| with_context(e, "login error"))?;

        if body.contains(LOGIN_FAILED_MARKER) {
            log::warn!("[{LOG_TAG}] Login rejected for {username}");
            return Err(ProviderError::Authentication {
                raw_message: Some(LOGIN_FAILED_MARKER.to_string()),
            });
        }

        Ok((
            Self {
                client,
                config: config.clone(),
            },
            body,
        ))
    }

    /// GET a console-relative link with the session cookie.
    pub async fn get(&self, link: &str) -> Result<(u16, String)> {
        let url = self.config.url(link);
        HttpUtils::execute_request(self.client.get(&url), "GET", &url).await
    }

    /// POST a form to a console-relative path with the session cookie.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<(u16, String)> {
        let url = self.config.url(path);
        HttpUtils::execute_request(self.client.post(&url).form(form), "POST", &url).await
    }

    /// End the session. Best effort: failures are only logged.
    pub async fn logout(self) {
        log::info!("[{LOG_TAG}] Logging out...");
        if let Err(e) = self.get("?action=logout").await {
            log::warn!("[{LOG_TAG}] Logout failed: {e}");
        }
    }
}

/// Prefix transport errors with what was being attempted.
fn with_context(error: ProviderError, context: &str) -> ProviderError {
    match error {
        ProviderError::Network { detail } => ProviderError::Network {
            detail: format!("{context}: {detail}"),
        },
        ProviderError::Timeout { detail } => ProviderError::Timeout {
            detail: format!("{context}: {detail}"),
        },
        other => other,
    }
}
