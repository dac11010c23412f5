//! Console (login) mutator
//!
//! Publishes and withdraws TXT records by driving the same forms a user
//! would submit in the browser.

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{ProviderError, Result};
use crate::html::{extract_record_location, extract_zone_location};
use crate::http_client::{HttpUtils, LOG_TAG};
use crate::providers::common::contains_any;
use crate::session::Session;
use crate::traits::TxtRecordMutator;
use crate::types::{RecordTarget, SolverMethod};

/// Form handler of the console.
const FORM_PATH: &str = "index.cgi";
/// TTL given to challenge records.
pub const RECORD_TTL: &str = "7200";

const ALREADY_EXISTS_MARKER: &str =
    ">Insert failed.  Unable to update.  That record already exists.";
const REMOVED_MARKER: &str = ">Successfully removed record.<";

/// 登录控制台方式的 TXT 记录管理
#[derive(Debug)]
pub struct LoginMutator {
    config: ClientConfig,
}

impl LoginMutator {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    async fn create_record(
        &self,
        session: &Session,
        landing_html: &str,
        target: &RecordTarget,
    ) -> Result<()> {
        let zone = extract_zone_location(landing_html, &target.domain)?;

        log::info!(
            "[{LOG_TAG}] Creating the TXT record: name={}, domain={}, zone_id={}",
            target.name,
            target.domain,
            zone.zone_id
        );

        let form = [
            ("account", ""),
            ("menu", "edit_zone"),
            ("Type", "TXT"),
            ("hosted_dns_zoneid", zone.zone_id.as_str()),
            ("hosted_dns_recordid", ""),
            ("hosted_dns_editzone", "1"),
            ("Priority", ""),
            ("Name", target.name.as_str()),
            ("Content", target.value.as_str()),
            ("TTL", RECORD_TTL),
            ("hosted_dns_editrecord", "Submit"),
        ];
        let (status, body) = session.post_form(FORM_PATH, &form).await?;
        HttpUtils::ensure_ok_status(status)?;

        // an identical record already present counts as success
        let added = format!(">Successfully added new record to {}<", target.domain);
        if !contains_any(&body, &[added.as_str(), ALREADY_EXISTS_MARKER]) {
            return Err(ProviderError::submission(
                "cannot find the expected creation message in page",
            ));
        }

        log::info!("[{LOG_TAG}] Successfully created record");
        Ok(())
    }

    async fn delete_record(
        &self,
        session: &Session,
        landing_html: &str,
        target: &RecordTarget,
    ) -> Result<()> {
        let zone = extract_zone_location(landing_html, &target.domain)?;

        // the record id is only shown on the zone page
        let (_status, zone_html) = session.get(&zone.link).await?;

        let managing = format!(">Managing zone: {}<", target.domain);
        if !zone_html.contains(&managing) {
            return Err(ProviderError::UnexpectedPage { expected: managing });
        }

        let record =
            extract_record_location(&zone_html, &target.name, &target.domain, &target.value)?;

        log::info!(
            "[{LOG_TAG}] Deleting the TXT record: name={}, domain={}, zone_id={}, record_id={}",
            target.name,
            target.domain,
            zone.zone_id,
            record.record_id
        );

        let form = [
            ("hosted_dns_zoneid", zone.zone_id.as_str()),
            ("hosted_dns_recordid", record.record_id.as_str()),
            ("menu", "edit_zone"),
            ("hosted_dns_delconfirm", "delete"),
            ("hosted_dns_editzone", "1"),
            ("hosted_dns_delrecord", "1"),
        ];
        let (status, body) = session.post_form(FORM_PATH, &form).await?;
        HttpUtils::ensure_ok_status(status)?;

        if !body.contains(REMOVED_MARKER) {
            return Err(ProviderError::submission(
                "cannot find the successful deletion message in page",
            ));
        }

        log::info!("[{LOG_TAG}] Successfully deleted record");
        Ok(())
    }
}

#[async_trait]
impl TxtRecordMutator for LoginMutator {
    fn method(&self) -> SolverMethod {
        SolverMethod::Login
    }

    async fn publish(&self, target: &RecordTarget) -> Result<()> {
        log::info!(
            "[{LOG_TAG}] publish (login): name={}, domain={}",
            target.name,
            target.domain
        );

        let (session, landing_html) = Session::login(&self.config).await?;
        let result = self.create_record(&session, &landing_html, target).await;
        session.logout().await;
        result
    }

    async fn withdraw(&self, target: &RecordTarget) -> Result<()> {
        log::info!(
            "[{LOG_TAG}] withdraw (login): name={}, domain={}",
            target.name,
            target.domain
        );

        let (session, landing_html) = Session::login(&self.config).await?;
        let result = self.delete_record(&session, &landing_html, target).await;
        session.logout().await;
        result
    }
}
