//! Console page scraping.
//!
//! The console has no API, so zone and record identifiers are recovered from
//! the markup: the zone id from the inline navigation handler of the zone
//! listing, the record id from the inline `deleteRecord(...)` handler of the
//! zone detail table. Every selector and pattern tied to the console's markup
//! lives in this module.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{ProviderError, Result};
use crate::types::{RecordLocation, ZoneLocation};

// ============ Zone listing ============

const DOMAIN_ROWS: &str = "table#domains_table > tbody > tr";
/// `onclick` of the zone "edit" icon.
const ZONE_LINK: &str = r"^javascript:document\.location\.href='(.*)'$";
const ZONE_ID: &str = r"hosted_dns_zoneid=(\d+)";

// ============ Zone detail ============

const RECORD_ROWS: &str = "div#dns_main_content > table > tbody > tr.dns_tr";
/// `onclick` of the delete cell: `deleteRecord('<id>','<name>','<type>')`.
const DELETE_RECORD: &str =
    r"^event\.cancelBubble=true;deleteRecord\(\s*'([^']*)'\s*,\s*'([^']*)'\s*,\s*'([^']*)'\s*\)$";

const TXT: &str = "TXT";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ProviderError::parse(format!("invalid selector '{css}': {e:?}")))
}

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ProviderError::parse(format!("invalid pattern: {e}")))
}

/// `<td>` children of a row, in document order.
fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect()
}

/// Locate `domain` in the zone listing shown after login.
///
/// The text of the name cell must equal `domain` exactly; no trimming or
/// case folding is applied.
///
/// Expected row shape:
///
/// ```html
/// <tr>
///   <td><img alt="delete" ...></td>
///   <td><img alt="edit" onclick="javascript:document.location.href='?hosted_dns_zoneid=123456&menu=edit_zone&hosted_dns_editzone'"></td>
///   <td><span>example.com</span></td>
/// </tr>
/// ```
pub fn extract_zone_location(landing_html: &str, domain: &str) -> Result<ZoneLocation> {
    log::debug!("extract_zone_location: domain={domain}");

    let rows = selector(DOMAIN_ROWS)?;
    let span = selector("span")?;
    let img = selector("img")?;
    let zone_link = regex(ZONE_LINK)?;
    let zone_id_re = regex(ZONE_ID)?;

    let document = Html::parse_document(landing_html);

    for row in document.select(&rows) {
        let tds = cells(row);
        let Some(name_cell) = tds.get(2) else {
            continue;
        };
        let Some(name) = name_cell.select(&span).next() else {
            continue;
        };
        if name.text().collect::<String>() != domain {
            continue;
        }

        let onclick = tds
            .get(1)
            .and_then(|td| td.select(&img).next())
            .and_then(|el| el.value().attr("onclick"))
            .ok_or_else(|| {
                ProviderError::parse(format!("no navigation handler in the row of {domain}"))
            })?;

        let link = zone_link
            .captures(onclick)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                ProviderError::parse(format!("unrecognized navigation handler: {onclick}"))
            })?;

        let zone_id = zone_id_re
            .captures(&link)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ProviderError::parse(format!("no zone id in link: {link}")))?;

        log::debug!("Zone located: domain={domain}, zone_id={zone_id}, link={link}");
        return Ok(ZoneLocation { zone_id, link });
    }

    Err(ProviderError::ZoneNotFound {
        domain: domain.to_string(),
    })
}

/// Find the TXT record `<record_name>.<domain>` whose content is exactly `value`.
///
/// Several TXT records may share a name while validations overlap; only the
/// one carrying `value` matches. Row shape (trimmed):
///
/// ```html
/// <tr class="dns_tr" id="4819821031">
///   <td class="hidden">933183</td>
///   <td class="hidden">4819821031</td>
///   <td class="dns_view">_acme-challenge.example.com</td>
///   <td><span class="rrlabel TXT" data="TXT">TXT</span></td>
///   <td>7200</td>
///   <td>-</td>
///   <td data="&quot;CONTENTS&quot;">&quot;CONTENTS&quot;</td>
///   <td class="hidden">0</td>
///   <td></td>
///   <td class="dns_delete" onclick="event.cancelBubble=true;deleteRecord('4819821031','_acme-challenge.example.com','TXT')"></td>
/// </tr>
/// ```
pub fn extract_record_location(
    zone_html: &str,
    record_name: &str,
    domain: &str,
    value: &str,
) -> Result<RecordLocation> {
    let fqdn = format!("{record_name}.{domain}");
    log::debug!("extract_record_location: fqdn={fqdn}");

    let rows = selector(RECORD_ROWS)?;
    let span = selector("span")?;
    let delete_record = regex(DELETE_RECORD)?;

    let document = Html::parse_document(zone_html);

    for row in document.select(&rows) {
        let tds = cells(row);

        let row_type = tds
            .get(3)
            .and_then(|td| td.select(&span).next())
            .and_then(|el| el.value().attr("data"));
        if row_type != Some(TXT) {
            continue;
        }

        // 属性值已由解析器反转义
        let Some(content) = tds.get(6).and_then(|td| td.value().attr("data")) else {
            log::debug!("Skipping TXT row without content attribute");
            continue;
        };
        let content = content.trim_matches('"');

        let Some(onclick) = tds
            .iter()
            .find(|td| td.value().classes().any(|c| c == "dns_delete"))
            .and_then(|td| td.value().attr("onclick"))
        else {
            log::debug!("Skipping TXT row without delete handler");
            continue;
        };

        let Some(caps) = delete_record.captures(onclick) else {
            log::debug!("Skipping TXT row with unrecognized delete handler: {onclick}");
            continue;
        };
        let (record_id, name, kind) = (&caps[1], &caps[2], &caps[3]);

        log::debug!("Parsed record: id={record_id}, name={name}, type={kind}");

        if name == fqdn && kind == TXT && content == value {
            return Ok(RecordLocation {
                record_id: record_id.to_string(),
            });
        }
    }

    Err(ProviderError::RecordNotFound { record_name: fqdn })
}
