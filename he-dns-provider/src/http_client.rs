//! Generic HTTP client tools
//!
//! Every console interaction is "send a request, get the status and the page
//! back". This module keeps that flow (sending, logging, reading the body,
//! mapping transport errors) in one place so the mutators only deal with
//! form fields and page markers.
//!
//! No retries happen here: the challenge orchestrator owns retry policy.

use reqwest::RequestBuilder;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// Log tag for everything this crate sends.
pub(crate) const LOG_TAG: &str = "he";

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text
    ///
    /// # Arguments
    /// * `request_builder` - configured request (URL, form body, ...)
    /// * `method_name` - request method name (for logging)
    /// * `url` - target URL (for logging)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - any HTTP status, callers decide
    /// * `Err(ProviderError::Network | ProviderError::Timeout)` - transport failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String)> {
        log::debug!("[{LOG_TAG}] {method_name} {url}");

        let response = request_builder.send().await.map_err(ProviderError::from)?;

        let status_code = response.status().as_u16();
        log::debug!("[{LOG_TAG}] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network {
                detail: format!("read response error: {e}"),
            })?;

        log::debug!(
            "[{LOG_TAG}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Fail with a submission error unless the status is HTTP 200.
    pub fn ensure_ok_status(status_code: u16) -> Result<()> {
        if status_code == 200 {
            Ok(())
        } else {
            Err(ProviderError::submission(format!(
                "got invalid status code {status_code}"
            )))
        }
    }
}
