//! Request and location types shared by the mutators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

// ============ Challenge Request ============

/// A DNS-01 challenge as handed over by the challenge orchestrator.
///
/// Read-only input. `resolved_fqdn` is expected to equal
/// `<subdomain>.<resolved_zone>` once trailing dots are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Fully qualified record name, e.g. `_acme-challenge.example.com.`
    pub resolved_fqdn: String,
    /// Zone the record belongs to, e.g. `example.com.`
    pub resolved_zone: String,
    /// TXT value to publish.
    pub key: String,
    /// Namespace used as the default location of referenced secrets.
    #[serde(default)]
    pub resource_namespace: String,
    /// Opaque solver configuration (decoded into `SolverConfig`).
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

// ============ Record Target ============

/// Normalized `(name, domain, value)` triple for one TXT record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTarget {
    /// Record name relative to the zone, e.g. `_acme-challenge`.
    pub name: String,
    /// Zone without trailing dot, e.g. `example.com`.
    pub domain: String,
    /// TXT value, verbatim.
    pub value: String,
}

impl RecordTarget {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            value: value.into(),
        }
    }

    /// Derive the target from a challenge request.
    ///
    /// `_acme-challenge.example.com.` in zone `example.com.` gives
    /// name `_acme-challenge` and domain `example.com`.
    pub fn from_request(request: &ChallengeRequest) -> Self {
        let name = request
            .resolved_fqdn
            .strip_suffix(request.resolved_zone.as_str())
            .unwrap_or(&request.resolved_fqdn);
        let name = name.strip_suffix('.').unwrap_or(name);
        let domain = request
            .resolved_zone
            .strip_suffix('.')
            .unwrap_or(&request.resolved_zone);

        Self::new(name, domain, request.key.clone())
    }

    /// Fully qualified record name without trailing dot.
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.name, self.domain)
    }
}

// ============ Console Locations ============

/// Where a zone lives in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLocation {
    /// Opaque `hosted_dns_zoneid` token.
    pub zone_id: String,
    /// Link to the zone detail page, relative to the console base URL.
    pub link: String,
}

/// The console's handle on a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLocation {
    /// Opaque `hosted_dns_recordid` token.
    pub record_id: String,
}

// ============ Solver Method ============

/// How records are mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Log in to the HTML console and submit the record forms.
    #[default]
    #[serde(rename = "login")]
    Login,
    /// Use the dynamic-DNS update endpoint with a per-record key.
    #[serde(rename = "dynamic-dns")]
    DynamicDns,
}

impl SolverMethod {
    /// Console base URL used when the config does not name one.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Login => "https://dns.he.net/",
            Self::DynamicDns => "https://dyn.dns.he.net/",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::DynamicDns => "dynamic-dns",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverMethod {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "dynamic-dns" => Ok(Self::DynamicDns),
            other => Err(ProviderError::config(format!(
                "invalid configuration method '{other}', valid values are 'login' or 'dynamic-dns'"
            ))),
        }
    }
}
