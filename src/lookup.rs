//! Typed view of a provider `WhoisRecord` and the reshaping of it into display sections.
//!
//! Provider payloads are loosely structured: `status` may be a string or a list, whole sub-records
//! may be missing and fields occasionally carry the wrong JSON type. The record is parsed once
//! into [`LookupResult`], where every field is an `Option`, and everything downstream works on
//! those optionals.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
pub const CONTACT_UNAVAILABLE: &str = "Contact information not available";
pub const NAME_SERVERS_UNAVAILABLE: &str = "Name servers not available";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub domain_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<StatusField>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub expires_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub registrar_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub registrant: Option<Registrant>,
    #[serde(default, deserialize_with = "lenient_record")]
    pub name_servers: Option<NameServers>,
}

/// `status` arrives either as one whitespace separated string or as a list of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusField {
    Text(String),
    Tokens(Vec<String>),
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Registrant {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telephone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub street1: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameServers {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub host_names: Option<Vec<String>>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(strings_only(items)),
        _ => None,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<StatusField>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(StatusField::Text(text)),
        Value::Array(items) => Some(StatusField::Tokens(strings_only(items))),
        _ => None,
    })
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn strings_only(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect()
}

impl LookupResult {
    /// Anything that isn't a JSON object is treated as a record with every field absent.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Nominal,
    Lapsed,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nominal => "nominal",
            Self::Lapsed => "lapsed",
            Self::Warning => "warning",
        }
    }
}

/// Evaluated in order against the lower-cased token, first match wins. A token such as
/// `activeexpired` is therefore nominal.
const SEVERITY_RULES: &[(&str, Severity)] = &[
    ("active", Severity::Nominal),
    ("ok", Severity::Nominal),
    ("expired", Severity::Lapsed),
];

pub fn classify(token: &str) -> Severity {
    let token = token.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|(needle, _)| token.contains(needle))
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Warning)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusToken {
    pub text: String,
    pub severity: Severity,
}

pub fn status_tokens(status: Option<&StatusField>) -> Vec<StatusToken> {
    let tokens: Vec<String> = match status {
        Some(StatusField::Tokens(tokens)) => tokens.clone(),
        Some(StatusField::Text(text)) => text.split_whitespace().map(String::from).collect(),
        None => Vec::new(),
    };
    tokens
        .into_iter()
        .map(|text| StatusToken {
            severity: classify(&text),
            text,
        })
        .collect()
}

/// Renders the calendar date of a provider timestamp as e.g. "January 15, 2020".
pub fn format_date(timestamp: Option<&str>) -> String {
    timestamp
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(parse_date)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    // WhoisXML style offsets without a colon, e.g. `1997-09-15T04:00:00+0000`
    if let Ok(datetime) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(datetime.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Present registrant attributes in display order. Empty strings count as absent.
pub fn registrant_fields(registrant: &Registrant) -> Vec<(&'static str, String)> {
    [
        ("Name", &registrant.name),
        ("Organization", &registrant.organization),
        ("Email", &registrant.email),
        ("Phone", &registrant.telephone),
        ("Country", &registrant.country),
        ("State", &registrant.state),
        ("City", &registrant.city),
        ("Address", &registrant.street1),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| (label, value.to_string()))
    })
    .collect()
}

/// Display-ready form of a [`LookupResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct DomainReport {
    pub domain_name: String,
    pub status: Vec<StatusToken>,
    pub created: String,
    pub updated: String,
    pub expires: String,
    pub registrar: String,
    /// `None` when the registrant sub-record is missing altogether.
    pub registrant: Option<Vec<(&'static str, String)>>,
    pub name_servers: Vec<String>,
}

pub fn normalize(result: &LookupResult) -> DomainReport {
    DomainReport {
        domain_name: text_or_placeholder(result.domain_name.as_deref()),
        status: status_tokens(result.status.as_ref()),
        created: format_date(result.created_date.as_deref()),
        updated: format_date(result.updated_date.as_deref()),
        expires: format_date(result.expires_date.as_deref()),
        registrar: text_or_placeholder(result.registrar_name.as_deref()),
        registrant: result.registrant.as_ref().map(registrant_fields),
        name_servers: result
            .name_servers
            .as_ref()
            .and_then(|servers| servers.host_names.clone())
            .unwrap_or_default(),
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> LookupResult {
        LookupResult::from_value(value)
    }

    #[test]
    fn empty_or_missing_status_has_no_tokens() {
        assert!(status_tokens(Some(&StatusField::Text(String::new()))).is_empty());
        assert!(status_tokens(Some(&StatusField::Text("   ".into()))).is_empty());
        assert!(status_tokens(None).is_empty());
        assert!(normalize(&parse(json!({ "status": "" }))).status.is_empty());
        assert!(normalize(&parse(json!({}))).status.is_empty());
    }

    #[test]
    fn status_string_is_split_on_whitespace() {
        let report = normalize(&parse(json!({ "status": "active ok" })));
        assert_eq!(report.status.len(), 2);
        assert!(report
            .status
            .iter()
            .all(|token| token.severity == Severity::Nominal));

        let report = normalize(&parse(json!({
            "status": "clientDeleteProhibited \t\n clientTransferProhibited"
        })));
        let texts: Vec<_> = report.status.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            ["clientDeleteProhibited", "clientTransferProhibited"]
        );
    }

    #[test]
    fn status_list_is_taken_as_is() {
        let report = normalize(&parse(json!({ "status": ["expired"] })));
        assert_eq!(
            report.status,
            vec![StatusToken {
                text: "expired".into(),
                severity: Severity::Lapsed
            }]
        );

        let report = normalize(&parse(json!({ "status": ["ok", 7, null, "pendingDelete"] })));
        let texts: Vec<_> = report.status.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["ok", "pendingDelete"]);
    }

    #[test]
    fn status_of_wrong_type_is_absent() {
        assert_eq!(parse(json!({ "status": 42 })).status, None);
        assert_eq!(parse(json!({ "status": { "a": 1 } })).status, None);
    }

    #[test]
    fn classification_rules() {
        assert_eq!(classify("ACTIVE"), Severity::Nominal);
        assert_eq!(classify("ok"), Severity::Nominal);
        assert_eq!(classify("clientTransferProhibited"), Severity::Warning);
        assert_eq!(classify("redemptionPeriod"), Severity::Warning);
        assert_eq!(classify("Expired"), Severity::Lapsed);
        // first rule wins on overlap
        assert_eq!(classify("activeexpired"), Severity::Nominal);
        assert_eq!(classify("expiredOK"), Severity::Nominal);
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(Some("2020-01-15")), "January 15, 2020");
        assert_eq!(format_date(Some("1995-08-14T04:00:00Z")), "August 14, 1995");
        assert_eq!(
            format_date(Some("2024-08-13T07:01:38+0000")),
            "August 13, 2024"
        );
        assert_eq!(
            format_date(Some("2024-08-13T07:01:38.123456")),
            "August 13, 2024"
        );
        assert_eq!(format_date(Some("2024-03-01 00:00:00")), "March 1, 2024");
        assert_eq!(format_date(None), NOT_AVAILABLE);
        assert_eq!(format_date(Some("")), NOT_AVAILABLE);
        assert_eq!(format_date(Some("not a date")), NOT_AVAILABLE);
        assert_eq!(format_date(Some("2020-13-45")), NOT_AVAILABLE);
    }

    #[test]
    fn unparsable_dates_do_not_abort_normalization() {
        let report = normalize(&parse(json!({
            "createdDate": "yesterday",
            "updatedDate": 12345,
            "expiresDate": "2030-01-01T00:00:00Z",
        })));
        assert_eq!(report.created, NOT_AVAILABLE);
        assert_eq!(report.updated, NOT_AVAILABLE);
        assert_eq!(report.expires, "January 1, 2030");
    }

    #[test]
    fn registrant_with_only_name() {
        let report = normalize(&parse(json!({ "registrant": { "name": "Jane Doe" } })));
        assert_eq!(report.registrant, Some(vec![("Name", "Jane Doe".to_string())]));
    }

    #[test]
    fn registrant_missing_is_placeholder_state() {
        assert_eq!(normalize(&parse(json!({}))).registrant, None);
        assert_eq!(
            normalize(&parse(json!({ "registrant": null }))).registrant,
            None
        );
        assert_eq!(
            normalize(&parse(json!({ "registrant": "redacted" }))).registrant,
            None
        );
    }

    #[test]
    fn registrant_fields_keep_label_order() {
        let registrant = Registrant {
            street1: Some("1 Main St".into()),
            name: Some("Jane Doe".into()),
            telephone: Some("+1.5555550100".into()),
            email: Some(String::new()),
            country: Some("US".into()),
            ..Default::default()
        };
        let labels: Vec<_> = registrant_fields(&registrant)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, ["Name", "Phone", "Country", "Address"]);
    }

    #[test]
    fn name_servers() {
        let report = normalize(&parse(json!({
            "nameServers": { "hostNames": ["NS1.EXAMPLE.COM", "ns2.example.com"], "ips": [] }
        })));
        assert_eq!(report.name_servers, ["NS1.EXAMPLE.COM", "ns2.example.com"]);

        assert!(normalize(&parse(json!({ "nameServers": {} })))
            .name_servers
            .is_empty());
        assert!(normalize(&parse(json!({ "nameServers": { "hostNames": "ns1" } })))
            .name_servers
            .is_empty());
    }

    #[test]
    fn non_object_record_is_all_absent() {
        assert_eq!(parse(Value::Null), LookupResult::default());
        assert_eq!(parse(json!([1, 2, 3])), LookupResult::default());
    }

    #[test]
    fn domain_and_registrar_placeholders() {
        let report = normalize(&parse(json!({ "domainName": "", "registrarName": null })));
        assert_eq!(report.domain_name, NOT_AVAILABLE);
        assert_eq!(report.registrar, NOT_AVAILABLE);

        let report = normalize(&parse(json!({
            "domainName": "example.com",
            "registrarName": "RESERVED-Internet Assigned Numbers Authority"
        })));
        assert_eq!(report.domain_name, "example.com");
        assert_eq!(
            report.registrar,
            "RESERVED-Internet Assigned Numbers Authority"
        );
    }
}
