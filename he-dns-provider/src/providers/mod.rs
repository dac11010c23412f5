//! TXT record mutators

/// Shared utilities used by the mutators.
pub mod common;

mod dynamic_dns;
mod login;

pub use dynamic_dns::{DynamicDnsMutator, PLACEHOLDER_VALUE};
pub use login::{LoginMutator, RECORD_TTL};
