//! URL validation gate in front of the QR writer
//!
//! A URL is accepted only when it parses as an absolute URL that carries both a
//! scheme and a non-empty host. Everything else (empty input, bare hostnames,
//! `mailto:` style URLs without an authority, free text) is rejected.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use url::Url;

/// A URL that passed validation.
///
/// Keeps the text exactly as it was supplied, which is what ends up encoded in
/// the QR code, alongside the parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ValidatedUrl {
    raw: String,
    #[serde(skip)]
    parsed: Url,
}

impl ValidatedUrl {
    /// Validate `input` without logging.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = Url::parse(input).map_err(|_| Error::InvalidUrl(input.to_string()))?;

        // Url fills in a host for `http:example.com` and friends; the text itself
        // must carry `scheme://authority`.
        if !has_authority(input, parsed.scheme()) {
            return Err(Error::InvalidUrl(input.to_string()));
        }

        match parsed.host_str() {
            Some(host) if !host.is_empty() => Ok(Self {
                raw: input.to_string(),
                parsed,
            }),
            _ => Err(Error::InvalidUrl(input.to_string())),
        }
    }

    /// The URL text as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host component, guaranteed non-empty.
    pub fn host(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }
}

/// True when `input` spells out `<scheme>://` followed by a non-empty authority.
fn has_authority(input: &str, scheme: &str) -> bool {
    let trimmed = input.trim_matches(|c: char| c <= ' ');
    let Some((prefix, rest)) = trimmed.split_once("://") else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case(scheme) {
        return false;
    }
    let end = rest.find(['/', '?', '#', '\\']).unwrap_or(rest.len());
    !rest[..end].is_empty()
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for ValidatedUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl From<ValidatedUrl> for String {
    fn from(url: ValidatedUrl) -> Self {
        url.raw
    }
}

/// Check whether `input` has a scheme and a non-empty host.
///
/// Rejections are logged at error level.
pub fn is_valid_url(input: &str) -> bool {
    validate(input).is_some()
}

/// Like [`is_valid_url`] but hands back the validated URL.
pub fn validate(input: &str) -> Option<ValidatedUrl> {
    match ValidatedUrl::parse(input) {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::error!("{err}");
            None
        }
    }
}
