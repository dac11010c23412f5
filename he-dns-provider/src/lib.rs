//! # he-dns-provider
//!
//! DNS-01 TXT record client for [Hurricane Electric Free DNS](https://dns.he.net/).
//!
//! The service has no management API. Two strategies are supported:
//!
//! | Method | Credentials | How |
//! |--------|-------------|-----|
//! | `login` *(default)* | account username/password | drives the web console forms and reads identifiers from its HTML |
//! | `dynamic-dns` | per-record dynamic DNS key | one POST to the `nic/update` endpoint |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use he_dns_provider::{ChallengeRequest, HeSolver, SolverSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // HE_USERNAME / HE_PASSWORD are read from the environment
//!     let solver = HeSolver::new(SolverSettings::from_env());
//!
//!     let request = ChallengeRequest {
//!         resolved_fqdn: "_acme-challenge.example.com.".to_string(),
//!         resolved_zone: "example.com.".to_string(),
//!         key: "challenge-token".to_string(),
//!         ..Default::default()
//!     };
//!
//!     solver.present(&request).await?;
//!     // ... wait for the CA to validate ...
//!     solver.clean_up(&request).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Using a mutator directly
//!
//! ```rust,no_run
//! # use he_dns_provider::*;
//! # async fn example() -> Result<()> {
//! let mutator = create_mutator(ClientConfig::with_default_url(Credentials::api_key("key")))?;
//! mutator
//!     .publish(&RecordTarget::new("_acme-challenge", "example.com", "token"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::Authentication`]: the console rejected the login
//! - [`ProviderError::ZoneNotFound`] / [`ProviderError::RecordNotFound`]: lookup failed
//! - [`ProviderError::UnexpectedPage`] / [`ProviderError::Submission`]: the console answered differently than expected
//! - [`ProviderError::Network`] / [`ProviderError::Timeout`]: transport failure
//!
//! Nothing is retried internally.
//!
//! ## Limitations
//!
//! The dynamic DNS protocol cannot delete records. `clean_up` with the
//! `dynamic-dns` method overwrites the value with `UNUSED`.

mod config;
mod error;
mod factory;
mod html;
mod http_client;
mod providers;
mod session;
mod solver;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export configuration
pub use config::{
    ClientConfig, CredentialSource, Credentials, DEFAULT_SECRET_NAME, SecretData, SecretRef,
    SolverConfig, SolverSettings,
};

// Re-export factory and solver
pub use factory::create_mutator;
pub use solver::{EnvLookup, HeSolver};

// Re-export traits
pub use traits::{SecretStore, TxtRecordMutator};

// Re-export types
pub use types::{ChallengeRequest, RecordLocation, RecordTarget, SolverMethod, ZoneLocation};

// Page scraping and the console session, for callers composing their own flows
pub use html::{extract_record_location, extract_zone_location};
pub use session::Session;

// Re-export concrete mutators
pub use providers::{DynamicDnsMutator, LoginMutator, PLACEHOLDER_VALUE, RECORD_TTL};
