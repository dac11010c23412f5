//! Per-request client configuration and credential resolution.
//!
//! A [`ClientConfig`] is assembled for every challenge from three layers:
//! method defaults, the decoded [`SolverConfig`] blob, and credentials
//! resolved from the environment or a [`SecretStore`](crate::SecretStore).
//! Nothing here is cached between requests.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProviderError, Result};
use crate::types::SolverMethod;
use crate::utils::log_sanitizer::mask_secret;

/// Secret name used when a secret reference leaves it empty.
pub const DEFAULT_SECRET_NAME: &str = "he-credentials";

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Secret keys
const USERNAME_KEY: &str = "username";
const PASSWORD_KEY: &str = "password";
const API_KEY_KEY: &str = "apiKey";

// Environment variables read by `Credentials::from_env`
pub const ENV_USERNAME: &str = "HE_USERNAME";
pub const ENV_PASSWORD: &str = "HE_PASSWORD";
pub const ENV_API_KEY: &str = "HE_APIKEY";

// Environment variables read by `SolverSettings::from_env`
pub const ENV_USE_SECRETS: &str = "USE_SECRETS";
pub const ENV_SECRET_NAME: &str = "HE_SECRET_NAME";

/// Raw key/value content of one secret.
pub type SecretData = HashMap<String, Vec<u8>>;

// ============ Credentials ============

/// Credential material for exactly one method.
///
/// The variant decides the method, so a config can never carry a password
/// for the dynamic-DNS endpoint or an API key for the console.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Console account, used by the login method.
    Login {
        /// Account e-mail or username.
        username: String,
        /// Account password.
        password: String,
    },
    /// Dynamic-DNS key of the TXT record, used by the dynamic-dns method.
    ApiKey {
        /// Key generated for the record in the console.
        api_key: String,
    },
}

impl Credentials {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Login {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self::ApiKey {
            api_key: api_key.into(),
        }
    }

    /// Method these credentials belong to.
    pub fn method(&self) -> SolverMethod {
        match self {
            Self::Login { .. } => SolverMethod::Login,
            Self::ApiKey { .. } => SolverMethod::DynamicDns,
        }
    }

    /// Read credentials from `HE_USERNAME`/`HE_PASSWORD` or `HE_APIKEY`.
    pub fn from_env(method: SolverMethod) -> Result<Self> {
        Self::from_lookup(method, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(method: SolverMethod, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.is_empty() => Ok(value),
                Some(_) => Err(ProviderError::credential(format!(
                    "environment variable {key} is empty"
                ))),
                None => Err(ProviderError::credential(format!(
                    "environment variable {key} is not set"
                ))),
            }
        };

        match method {
            SolverMethod::Login => Ok(Self::login(
                required(ENV_USERNAME)?,
                required(ENV_PASSWORD)?,
            )),
            SolverMethod::DynamicDns => Ok(Self::api_key(required(ENV_API_KEY)?)),
        }
    }

    /// Extract credentials from the content of a secret.
    ///
    /// `secret_label` is the `namespace/name` pair, used in error messages.
    pub fn from_secret_data(
        method: SolverMethod,
        data: &SecretData,
        secret_label: &str,
    ) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            key_from_secret(data, key).map_err(|e| {
                ProviderError::credential(format!(
                    "unable to get {key} from secret `{secret_label}`: {e}"
                ))
            })
        };

        match method {
            SolverMethod::Login => Ok(Self::login(
                required(USERNAME_KEY)?,
                required(PASSWORD_KEY)?,
            )),
            SolverMethod::DynamicDns => Ok(Self::api_key(required(API_KEY_KEY)?)),
        }
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        let empty = match self {
            Self::Login { username, password } => username.is_empty() || password.is_empty(),
            Self::ApiKey { api_key } => api_key.is_empty(),
        };
        if empty {
            return Err(ProviderError::credential(match self {
                Self::Login { .. } => "empty username or password",
                Self::ApiKey { .. } => "empty api key",
            }));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, password } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &mask_secret(password))
                .finish(),
            Self::ApiKey { api_key } => f
                .debug_struct("ApiKey")
                .field("api_key", &mask_secret(api_key))
                .finish(),
        }
    }
}

fn key_from_secret(data: &SecretData, key: &str) -> std::result::Result<String, String> {
    let raw = data
        .get(key)
        .ok_or_else(|| format!("key {key:?} not found in secret data"))?;
    let value = std::str::from_utf8(raw)
        .map_err(|_| format!("value for key {key:?} is not valid UTF-8"))?;
    if value.is_empty() {
        return Err(format!("value for key {key:?} is empty"));
    }
    Ok(value.to_string())
}

// ============ Client Config ============

/// Everything a mutator needs for one request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    credentials: Credentials,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Build a config; `base_url` gets a trailing `/` if it lacks one.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            base_url,
            credentials,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Use the default console URL of the credentials' method.
    pub fn with_default_url(credentials: Credentials) -> Self {
        let url = credentials.method().default_base_url();
        Self::new(url, credentials)
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn method(&self) -> SolverMethod {
        self.credentials.method()
    }

    pub(crate) fn timeouts(&self) -> (Duration, Duration) {
        (self.connect_timeout, self.request_timeout)
    }

    /// Join a console-relative path or link onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

// ============ Solver Config (decoded per request) ============

/// Reference to a secret holding credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub namespace: String,
}

impl SecretRef {
    /// `(namespace, name)` after applying the fallbacks.
    pub fn resolve<'a>(
        &'a self,
        default_name: &'a str,
        fallback_namespace: &'a str,
    ) -> (&'a str, &'a str) {
        let name = if self.name.is_empty() {
            default_name
        } else {
            self.name.as_str()
        };
        let namespace = if self.namespace.is_empty() {
            fallback_namespace
        } else {
            self.namespace.as_str()
        };
        (namespace, name)
    }
}

/// Solver configuration carried inside each challenge request.
///
/// ```json
/// { "method": "login", "heUrl": "https://dns.he.net/",
///   "credentialsSecretRef": { "name": "he-credentials" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Secret with `username`/`password`, used by the login method.
    #[serde(default, deserialize_with = "null_as_default")]
    pub credentials_secret_ref: SecretRef,
    /// Secret with `apiKey`, used by the dynamic-dns method.
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key_secret_ref: SecretRef,
    /// Console base URL; defaults per method.
    #[serde(default, deserialize_with = "null_as_default")]
    pub he_url: String,
    /// `login` (default) or `dynamic-dns`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
}

/// Known keys of the config blob and of its secret references.
const CONFIG_KEYS: [&str; 6] = [
    "credentialsSecretRef",
    "apiKeySecretRef",
    "heUrl",
    "method",
    "name",
    "namespace",
];

/// `null` decodes to the field's default, like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rewrite object keys matching a known key case-insensitively to its
/// canonical spelling (`HeUrl`, `ApiKeySecretRef`, `METHOD` ...).
fn canonical_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, v)| {
                let key = CONFIG_KEYS
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(&key))
                    .map_or(key, |known| (*known).to_string());
                (key, canonical_keys(v))
            })
            .collect::<serde_json::Map<_, _>>()
            .into(),
        other => other,
    }
}

impl SolverConfig {
    /// Decode the raw blob; a missing or null blob yields the defaults.
    ///
    /// Keys match case-insensitively and `null` values count as absent.
    pub fn from_json(raw: Option<&serde_json::Value>) -> Result<Self> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(canonical_keys(value.clone())).map_err(|e| {
                ProviderError::config(format!("error decoding solver config: {e}"))
            }),
        }
    }

    /// Validated method, `login` when unset.
    pub fn method(&self) -> Result<SolverMethod> {
        if self.method.is_empty() {
            Ok(SolverMethod::default())
        } else {
            self.method.parse()
        }
    }

    /// Configured base URL, or the method's default.
    pub fn base_url(&self, method: SolverMethod) -> &str {
        if self.he_url.is_empty() {
            method.default_base_url()
        } else {
            &self.he_url
        }
    }

    /// Secret reference relevant to `method`.
    pub fn secret_ref(&self, method: SolverMethod) -> &SecretRef {
        match method {
            SolverMethod::Login => &self.credentials_secret_ref,
            SolverMethod::DynamicDns => &self.api_key_secret_ref,
        }
    }
}

// ============ Solver Settings (process level) ============

/// Where credentials come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialSource {
    /// `HE_USERNAME`/`HE_PASSWORD`/`HE_APIKEY`.
    #[default]
    Environment,
    /// A [`SecretStore`](crate::SecretStore) lookup.
    Secrets,
}

/// Process-level switches, fixed when the solver is built.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    pub credential_source: CredentialSource,
    /// Secret name used when a config leaves it empty.
    pub default_secret_name: String,
    /// Transport timeouts applied to every request.
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            credential_source: CredentialSource::default(),
            default_secret_name: DEFAULT_SECRET_NAME.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SolverSettings {
    /// Read `USE_SECRETS` and `HE_SECRET_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if lookup(ENV_USE_SECRETS).as_deref() == Some("true") {
            settings.credential_source = CredentialSource::Secrets;
        }
        if let Some(name) = lookup(ENV_SECRET_NAME).filter(|n| !n.is_empty()) {
            settings.default_secret_name = name;
        }
        settings
    }
}
