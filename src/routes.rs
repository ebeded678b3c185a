use askama::Template;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::{
    error::LookupError,
    form_verification::verify_domain,
    lookup::{self, DomainReport, LookupResult},
    whois::WhoisClient,
};

#[derive(Clone)]
pub struct AppState {
    client: WhoisClient,
}

impl AppState {
    pub fn new(client: WhoisClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Default)]
struct DomainQuery {
    /// `Some("")` when the form was submitted empty, `None` when there was no `domain` at all.
    domain: Option<String>,
}

impl DomainQuery {
    fn from_raw(raw: Option<&str>) -> Self {
        // Decoded as pairs so an empty `domain=` survives instead of collapsing to `None`.
        let pairs: Vec<(String, String)> = raw
            .and_then(|query| serde_html_form::from_str(query).ok())
            .unwrap_or_default();
        let domain = pairs
            .into_iter()
            .find(|(key, _)| key == "domain")
            .map(|(_, value)| value);
        Self { domain }
    }
}

#[derive(Template)]
#[template(path = "search.html")]
struct SearchPage {
    domain: String,
    error: Option<String>,
    report: Option<DomainReport>,
    contact_unavailable: &'static str,
    name_servers_unavailable: &'static str,
}

impl SearchPage {
    fn new(domain: String) -> Self {
        Self {
            domain,
            error: None,
            report: None,
            contact_unavailable: lookup::CONTACT_UNAVAILABLE,
            name_servers_unavailable: lookup::NAME_SERVERS_UNAVAILABLE,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/api/whois", get(whois_json))
        .with_state(state)
}

/// Forwards the provider's record as JSON. Only a missing domain is rejected here; shape checks
/// are the search form's job.
async fn whois_json(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = DomainQuery::from_raw(raw.as_deref());
    let domain = match query.domain.filter(|domain| !domain.is_empty()) {
        Some(domain) => domain,
        None => return LookupError::MissingDomain.into_response(),
    };

    match state.client.lookup(&domain).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => {
            error!(%err, %domain, "WHOIS lookup failed");
            err.into_response()
        }
    }
}

async fn search_page(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let page = match DomainQuery::from_raw(raw.as_deref()).domain {
        Some(domain) => search(&state.client, domain).await,
        None => SearchPage::new(String::new()),
    };

    match page.render() {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(err) => {
            error!(%err, "rendering search page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page").into_response()
        }
    }
}

async fn search(client: &WhoisClient, domain: String) -> SearchPage {
    let mut page = SearchPage::new(domain);
    match run_lookup(client, &page.domain).await {
        Ok(report) => page.report = Some(report),
        Err(err) => {
            if err.is_input_error() {
                info!(%err, domain = %page.domain, "rejected search input");
            } else {
                warn!(%err, domain = %page.domain, "search failed");
            }
            page.error = Some(err.to_string());
        }
    }
    page
}

async fn run_lookup(client: &WhoisClient, domain: &str) -> Result<DomainReport, LookupError> {
    let domain = verify_domain(domain)?;
    let record = client.lookup(domain).await?;
    Ok(lookup::normalize(&LookupResult::from_value(record)))
}
