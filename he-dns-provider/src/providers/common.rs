//! Provider 公共工具函数

use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// 创建带超时配置的 HTTP Client
///
/// `with_cookies` gives the client its own empty cookie store, which is what
/// carries the console session between requests.
pub fn create_http_client(config: &ClientConfig, with_cookies: bool) -> Result<Client> {
    let (connect_timeout, request_timeout) = config.timeouts();

    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .cookie_store(with_cookies)
        .build()
        .map_err(|e| ProviderError::Network {
            detail: format!("error creating HTTP client: {e}"),
        })
}

// ============ Response markers ============

/// Whether `body` contains any of `markers`.
pub fn contains_any(body: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| body.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn client_builds_with_and_without_cookies() {
        let config = ClientConfig::new("http://127.0.0.1:1", Credentials::login("u", "p"));
        assert!(create_http_client(&config, true).is_ok());
        assert!(create_http_client(&config, false).is_ok());
    }

    #[test]
    fn marker_search() {
        let body = "<div>Insert failed.  Unable to update.  That record already exists.</div>";
        assert!(contains_any(body, &["nope", "That record already exists."]));
        assert!(!contains_any(body, &["Successfully"]));
        assert!(!contains_any(body, &[]));
    }
}
