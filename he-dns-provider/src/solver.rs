//! Challenge solver entry points.
//!
//! [`HeSolver`] turns a [`ChallengeRequest`] into a client configuration,
//! picks the mutator and runs it. Every call resolves its configuration and
//! credentials from scratch; the solver itself holds no per-request state.

use std::sync::Arc;

use crate::config::{ClientConfig, CredentialSource, Credentials, SolverConfig, SolverSettings};
use crate::error::{ProviderError, Result};
use crate::factory::create_mutator;
use crate::http_client::LOG_TAG;
use crate::traits::SecretStore;
use crate::types::{ChallengeRequest, RecordTarget};

/// Environment lookup used for the [`CredentialSource::Environment`] source.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// DNS-01 solver for Hurricane Electric hosted zones.
pub struct HeSolver {
    settings: SolverSettings,
    secret_store: Option<Arc<dyn SecretStore>>,
    env_lookup: EnvLookup,
}

impl HeSolver {
    /// Solver name reported to the challenge orchestrator.
    pub const NAME: &'static str = "he";

    pub fn new(settings: SolverSettings) -> Self {
        Self {
            settings,
            secret_store: None,
            env_lookup: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Secret backend used when credentials come from secrets.
    #[must_use]
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    /// Replace the process environment as credential source.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Arc::new(lookup);
        self
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Publish the challenge value.
    pub async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        let target = RecordTarget::from_request(request);
        log::info!(
            "[{LOG_TAG}] present: fqdn={}, zone={}",
            request.resolved_fqdn,
            request.resolved_zone
        );

        let result = async {
            let config = self.init_config(request).await?;
            create_mutator(config)?.publish(&target).await
        }
        .await;

        log_outcome("present", &target, &result);
        result
    }

    /// Remove the challenge value published by [`present`](Self::present).
    pub async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        let target = RecordTarget::from_request(request);
        log::info!(
            "[{LOG_TAG}] clean_up: fqdn={}, zone={}",
            request.resolved_fqdn,
            request.resolved_zone
        );

        let result = async {
            let config = self.init_config(request).await?;
            create_mutator(config)?.withdraw(&target).await
        }
        .await;

        log_outcome("clean_up", &target, &result);
        result
    }

    /// Build the client configuration for one request.
    pub async fn init_config(&self, request: &ChallengeRequest) -> Result<ClientConfig> {
        let solver_config = SolverConfig::from_json(request.config.as_ref())?;
        let method = solver_config.method()?;
        let base_url = solver_config.base_url(method);

        let credentials = match self.settings.credential_source {
            CredentialSource::Environment => {
                Credentials::from_lookup(method, |key| (self.env_lookup)(key))?
            }
            CredentialSource::Secrets => {
                let Some(store) = &self.secret_store else {
                    return Err(ProviderError::config(
                        "credentials are read from secrets but no secret store is configured",
                    ));
                };
                let (namespace, name) = solver_config.secret_ref(method).resolve(
                    &self.settings.default_secret_name,
                    &request.resource_namespace,
                );
                let label = format!("{namespace}/{name}");

                log::debug!("[{LOG_TAG}] Reading credentials from secret `{label}`");
                let data = store.get_secret(namespace, name).await.map_err(|e| {
                    ProviderError::credential(format!("unable to read secret `{label}`: {e}"))
                })?;
                Credentials::from_secret_data(method, &data, &label)?
            }
        };

        Ok(ClientConfig::new(base_url, credentials)
            .connect_timeout(self.settings.connect_timeout)
            .request_timeout(self.settings.request_timeout))
    }
}

impl Default for HeSolver {
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

fn log_outcome(operation: &str, target: &RecordTarget, result: &Result<()>) {
    match result {
        Ok(()) => log::info!("[{LOG_TAG}] {operation} succeeded for {}", target.fqdn()),
        Err(e) if e.is_expected() => {
            log::warn!("[{LOG_TAG}] {operation} failed for {}: {e}", target.fqdn());
        }
        Err(e) => log::error!("[{LOG_TAG}] {operation} failed for {}: {e}", target.fqdn()),
    }
}
