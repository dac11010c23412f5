//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use he_dns_provider::{
    ChallengeRequest, ClientConfig, Credentials, ProviderError, Result, SecretData, SecretStore,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DOMAIN: &str = "example.com";
pub const ZONE_ID: &str = "123456";
pub const RECORD_NAME: &str = "_acme-challenge";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "secret";
pub const SESSION_COOKIE: &str = "CGISESSID=abcdef0123456789";

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为指定的错误变体
#[macro_export]
macro_rules! assert_err {
    ($expr:expr, $pattern:pat $(if $guard:expr)? $(,)?) => {{
        let res = $expr;
        assert!(
            matches!(&res, Err($pattern) $(if $guard)?),
            "unexpected result: {res:?}"
        );
    }};
}

// ============ Pages ============

/// Login form served before authentication.
pub fn login_page() -> String {
    r#"<html><body>
<form name="login" method="post" action="/">
  <input type="text" name="email"><input type="password" name="pass">
  <input type="submit" name="submit" value="Login!">
</form>
</body></html>"#
        .to_string()
}

/// Page shown when the password is wrong.
pub fn login_failed_page() -> String {
    r#"<html><body><div id="dns_err" onclick="hideThis(this);">Incorrect</div>
<form name="login" method="post" action="/"></form></body></html>"#
        .to_string()
}

/// Landing page listing the given `(domain, zone_id)` pairs.
pub fn landing_page(zones: &[(&str, &str)]) -> String {
    let rows: String = zones
        .iter()
        .map(|(domain, id)| {
            format!(
                r#"<tr>
    <td><img src="/include/images/delete.png" alt="delete" onclick="delete_dom(this);" name="{domain}" value="{id}"></td>
    <td><img src="/include/images/edit.png" alt="edit" onclick="javascript:document.location.href='?hosted_dns_zoneid={id}&amp;menu=edit_zone&amp;hosted_dns_editzone'"></td>
    <td align="left"><span>{domain}</span></td>
  </tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div id="content">
<table id="domains_table" class="generictable">
  <thead><tr><th></th><th></th><th>Domain name</th></tr></thead>
  {rows}
</table>
</div>
</body></html>"#
    )
}

/// One TXT row of the zone detail table.
pub fn txt_row(id: &str, fqdn: &str, content: &str) -> String {
    format!(
        r#"<tr class="dns_tr" id="{id}" title="Click to edit this item." onclick="editRow(this)">
  <td class="hidden">{ZONE_ID}</td>
  <td class="hidden">{id}</td>
  <td width="95%" class="dns_view">{fqdn}</td>
  <td align="center"><span class="rrlabel TXT" data="TXT" alt="TXT">TXT</span></td>
  <td align="left">7200</td>
  <td align="center">-</td>
  <td align="left" data="&quot;{content}&quot;">&quot;{content}&quot;</td>
  <td class="hidden">0</td>
  <td></td>
  <td align="center" class="dns_delete" onclick="event.cancelBubble=true;deleteRecord('{id}','{fqdn}','TXT')" title="Click to delete this record."></td>
</tr>"#
    )
}

/// Zone detail page of `domain` with the given rows.
pub fn zone_page(domain: &str, rows: &[String]) -> String {
    format!(
        r#"<html><body>
<div id="dns_main_content">
<h3>Managing zone: {domain}</h3>
<table class="generictable">
<tr><th class="hidden">Zone Id</th><th class="hidden">Record Id</th><th>Name</th><th>Type</th></tr>
{}
</table>
</div>
</body></html>"#,
        rows.join("\n")
    )
}

/// Page carrying a status message after a form submission.
pub fn status_page(message: &str) -> String {
    format!(
        r#"<html><body><div id="dns_status" onclick="hideThis(this);">{message}</div></body></html>"#
    )
}

// ============ Console mock ============

/// Mount the login flow and logout on `server`.
///
/// `GET /` hands out the session cookie, `POST /` answers with `landing`.
pub async fn mount_console(server: &MockServer, landing: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("action", "logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .with_priority(1)
        .named("logout")
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; path=/").as_str())
                .set_body_string(login_page()),
        )
        .named("initial page")
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing))
        .named("login")
        .mount(server)
        .await;
}

/// Mount the zone detail page of [`ZONE_ID`].
pub async fn mount_zone_page(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("hosted_dns_zoneid", ZONE_ID))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .with_priority(1)
        .named("zone page")
        .mount(server)
        .await;
}

/// Number of requests `server` received for `GET /?action=logout`.
pub async fn logout_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.query() == Some("action=logout"))
        .count()
}

/// Bodies of every `POST` sent to `request_path`, decoded as UTF-8.
pub async fn posted_bodies(server: &MockServer, request_path: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == request_path)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

pub fn login_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), Credentials::login(USERNAME, PASSWORD))
}

pub fn challenge(key: &str, config: Option<serde_json::Value>) -> ChallengeRequest {
    ChallengeRequest {
        resolved_fqdn: format!("{RECORD_NAME}.{DOMAIN}."),
        resolved_zone: format!("{DOMAIN}."),
        key: key.to_string(),
        resource_namespace: "cert-manager".to_string(),
        config,
    }
}

// ============ Secret store ============

/// 内存凭证存储
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<HashMap<(String, String), SecretData>>,
}

impl InMemorySecretStore {
    pub fn with_secret(self, namespace: &str, name: &str, pairs: &[(&str, &str)]) -> Self {
        let data = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.as_bytes().to_vec()))
            .collect();
        if let Ok(mut secrets) = self.secrets.lock() {
            secrets.insert((namespace.to_string(), name.to_string()), data);
        }
        self
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<SecretData> {
        let secrets = self.secrets.lock().map_err(|e| ProviderError::Credential {
            detail: format!("lock poisoned: {e}"),
        })?;
        secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::Credential {
                detail: format!("secret {namespace}/{name} not found"),
            })
    }
}
