use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::LookupError;

const USER_AGENT: &str = concat!("whois_lookup/", env!("CARGO_PKG_VERSION"));

/// Envelope returned by the WHOIS provider. Exactly one of the two fields is expected, but a
/// body with neither is treated as an empty record.
#[derive(Debug, Deserialize)]
struct ProviderEnvelope {
    #[serde(rename = "WhoisRecord")]
    whois_record: Option<Value>,
    #[serde(rename = "ErrorMessage")]
    error_message: Option<ProviderErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorMessage {
    msg: Option<String>,
}

/// Client for the third party WHOIS JSON API. Each call is a single request: no caching, no
/// retries, and no timeout beyond the transport default.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl WhoisClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the raw `WhoisRecord` object for `domain`, ready to be forwarded verbatim.
    #[instrument(skip(self))]
    pub async fn lookup(&self, domain: &str) -> Result<Value, LookupError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "WHOIS provider returned an error status");
            return Err(LookupError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "WHOIS provider response received");
        parse_envelope(&body)
    }
}

fn parse_envelope(body: &str) -> Result<Value, LookupError> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let envelope: ProviderEnvelope = serde_json::from_str(body)?;
    if let Some(error) = envelope.error_message {
        let msg = error.msg.unwrap_or_else(|| String::from("API error"));
        return Err(LookupError::Provider(msg));
    }
    Ok(envelope
        .whois_record
        .unwrap_or_else(|| Value::Object(Map::new())))
}
