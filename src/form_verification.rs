use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LookupError;

// Single registrable label followed by an alphabetic TLD, e.g. `example.com`.
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9]?\.[a-zA-Z]{2,}$")
        .expect("domain pattern is a valid regex")
});

/// Checks a user supplied domain before any lookup is attempted. An empty input is reported as
/// missing, anything else that doesn't fit `label.tld` as invalid. Passing this check says nothing
/// about whether the provider knows the domain.
pub fn verify_domain(input: &str) -> Result<&str, LookupError> {
    if input.is_empty() {
        return Err(LookupError::MissingDomain);
    }
    if !DOMAIN_PATTERN.is_match(input) {
        return Err(LookupError::InvalidDomain);
    }
    Ok(input)
}
