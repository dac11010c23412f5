//! Dynamic-DNS mutator
//!
//! One POST to `<base>nic/update` per operation, authenticated by the key the
//! console generates for a dynamic TXT record. The protocol cannot delete a
//! record; withdrawing overwrites the value with a placeholder instead, so
//! the record itself stays in the zone.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{ClientConfig, Credentials};
use crate::error::{ProviderError, Result};
use crate::http_client::{HttpUtils, LOG_TAG};
use crate::providers::common::create_http_client;
use crate::traits::TxtRecordMutator;
use crate::types::{RecordTarget, SolverMethod};
use crate::utils::log_sanitizer::truncate_for_log;

const UPDATE_PATH: &str = "nic/update";
/// Value written on withdraw.
pub const PLACEHOLDER_VALUE: &str = "UNUSED";

/// Update endpoint mutator.
#[derive(Debug)]
pub struct DynamicDnsMutator {
    config: ClientConfig,
}

impl DynamicDnsMutator {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    async fn update(&self, target: &RecordTarget, txt: &str) -> Result<()> {
        let Credentials::ApiKey { api_key } = self.config.credentials() else {
            return Err(ProviderError::config(
                "dynamic DNS updates require an api key",
            ));
        };
        self.config.credentials().ensure_not_empty()?;

        let client: Client = create_http_client(&self.config, false)?;
        let url = self.config.url(UPDATE_PATH);
        let hostname = target.fqdn();
        let form = [
            ("hostname", hostname.as_str()),
            ("password", api_key.as_str()),
            ("txt", txt),
        ];

        let (status, body) =
            HttpUtils::execute_request(client.post(&url).form(&form), "POST", &url)
                .await
                .map_err(|e| match e {
                    ProviderError::Network { detail } => ProviderError::Network {
                        detail: format!("submission error: {detail}"),
                    },
                    other => other,
                })?;

        check_update_response(status, &body)
    }
}

/// Accept HTTP 200 with a body starting with `good ` or `nochg `.
fn check_update_response(status: u16, body: &str) -> Result<()> {
    if !(body.starts_with("good ") || body.starts_with("nochg ")) {
        return Err(ProviderError::submission(format!(
            "submission failed, response body is '{}'",
            truncate_for_log(body)
        )));
    }
    if status != 200 {
        return Err(ProviderError::submission(format!(
            "unexpected response status {status}"
        )));
    }
    Ok(())
}

#[async_trait]
impl TxtRecordMutator for DynamicDnsMutator {
    fn method(&self) -> SolverMethod {
        SolverMethod::DynamicDns
    }

    async fn publish(&self, target: &RecordTarget) -> Result<()> {
        log::info!(
            "[{LOG_TAG}] publish (dynamic-dns): name={}, domain={}",
            target.name,
            target.domain
        );
        self.update(target, &target.value).await?;
        log::info!("[{LOG_TAG}] Successfully added record");
        Ok(())
    }

    async fn withdraw(&self, target: &RecordTarget) -> Result<()> {
        log::info!(
            "[{LOG_TAG}] withdraw (dynamic-dns): name={}, domain={}",
            target.name,
            target.domain
        );
        self.update(target, PLACEHOLDER_VALUE).await?;
        log::info!("[{LOG_TAG}] Successfully deleted record");
        Ok(())
    }
}
