//! Mutator factory.

use std::sync::Arc;

use crate::config::{ClientConfig, Credentials};
use crate::error::Result;
use crate::providers::{DynamicDnsMutator, LoginMutator};
use crate::traits::TxtRecordMutator;

/// Creates a [`TxtRecordMutator`] for the given client configuration.
///
/// The strategy is determined by the [`Credentials`] variant:
/// username/password drives the console forms, an api key uses the
/// dynamic-DNS update endpoint.
///
/// # Examples
///
/// ```rust,no_run
/// use he_dns_provider::{ClientConfig, Credentials, create_mutator};
///
/// let mutator = create_mutator(ClientConfig::with_default_url(
///     Credentials::login("user", "secret"),
/// ))
/// .unwrap();
/// ```
pub fn create_mutator(config: ClientConfig) -> Result<Arc<dyn TxtRecordMutator>> {
    config.credentials().ensure_not_empty()?;

    match config.credentials() {
        Credentials::Login { .. } => Ok(Arc::new(LoginMutator::new(config))),
        Credentials::ApiKey { .. } => Ok(Arc::new(DynamicDnsMutator::new(config))),
    }
}
