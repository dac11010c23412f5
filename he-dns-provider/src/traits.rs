use std::fmt;

use async_trait::async_trait;

use crate::config::SecretData;
use crate::error::Result;
use crate::types::{RecordTarget, SolverMethod};

/// Publish/withdraw capability shared by both mutation strategies.
///
/// Every call is self-contained: implementations open their own session and
/// release it before returning, so concurrent calls for different values under
/// the same name never interfere.
#[async_trait]
pub trait TxtRecordMutator: fmt::Debug + Send + Sync {
    /// Strategy identifier
    fn method(&self) -> SolverMethod;

    /// Make `target.value` visible under `target.fqdn()`.
    ///
    /// Must tolerate being called again with the same target.
    async fn publish(&self, target: &RecordTarget) -> Result<()>;

    /// Remove the record carrying exactly `target.value`.
    ///
    /// Other TXT records under the same name are left untouched.
    async fn withdraw(&self, target: &RecordTarget) -> Result<()>;
}

/// 凭证存储抽象 Trait
///
/// The concrete backend (Kubernetes secrets, vault, files ...) lives outside
/// this crate; the solver only needs a lookup by namespace and name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw content of a secret.
    ///
    /// # Arguments
    /// * `namespace` - namespace (or equivalent scope) of the secret
    /// * `name` - secret name
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData>;
}
