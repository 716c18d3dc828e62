//! Host extraction — reduce a URL or bare host reference to a canonical host.
//!
//! Parsing goes through the `url` crate so the authority is split the way a
//! browser or HTTP client splits it: userinfo ends at the last `@`, IPv6
//! literals keep their colons, backslashes act as path separators for web
//! schemes. Text without `://` is parsed as if it were `http://`.

use crate::utils::paths::normalize_host;
use std::fmt;
use thiserror::Error;
use url::{Host, Url};

/// Scheme assumed for candidates that do not carry one.
const DEFAULT_SCHEME: &str = "http://";

/// A canonical lowercase hostname (or IP literal, without brackets).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedHost(String);

impl ExtractedHost {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ExtractedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why no host could be determined. Callers decide the safe default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoHost {
    #[error("empty destination")]
    Empty,
    #[error("malformed destination '{input}': {source}")]
    Malformed {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("destination '{0}' has no host component")]
    MissingHost(String),
    #[error("destination '{0}' is computed at run time")]
    Dynamic(String),
}

/// Extract the destination host from a candidate string.
pub fn extract_host(candidate: &str) -> Result<ExtractedHost, NoHost> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(NoHost::Empty);
    }

    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{DEFAULT_SCHEME}{trimmed}"))
    }
    .map_err(|source| NoHost::Malformed {
        input: trimmed.to_string(),
        source,
    })?;

    let host = match parsed.host() {
        Some(Host::Domain(domain)) => normalize_host(domain),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => String::new(),
    };

    if host.is_empty() {
        return Err(NoHost::MissingHost(trimmed.to_string()));
    }
    Ok(ExtractedHost(host))
}
