// url.rs - Absolute URL value object.
//
// Parsing is delegated to the `url` crate (WHATWG URL standard). We keep
// the caller's original string rather than the normalized serialization so
// that reading the field back returns exactly what was supplied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ValidationError};

/// A string known to parse as an absolute URL (scheme required).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Url(String);

impl Url {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        // The parser strips whitespace and control characters before parsing,
        // so they are checked against the stored string here.
        if value.chars().any(|c| c.is_ascii_whitespace() || c.is_control()) {
            tracing::debug!(input = ?value, "rejected url with whitespace");
            return Err(invalid_url());
        }
        match ::url::Url::parse(&value) {
            Ok(_) => Ok(Self(value)),
            Err(e) => {
                tracing::debug!(input = %value, error = %e, "rejected url");
                Err(invalid_url())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_url() -> ValidationError {
    ValidationError::new("url", "Invalid URL format", ErrorCode::InvalidUrl)
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Url {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> Self {
        url.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        for raw in [
            "https://evidence.example.com/soc2/access-review.pdf",
            "http://localhost:8080/report",
            "s3://audit-bucket/2024/q1/screenshot.png",
            "file:///var/evidence/policy.docx",
        ] {
            let url = Url::new(raw).unwrap();
            assert_eq!(url.as_str(), raw);
        }
    }

    #[test]
    fn keeps_original_spelling() {
        // The parser would normalize this to "https://example.com/"; we keep the input.
        let url = Url::new("HTTPS://Example.com").unwrap();
        assert_eq!(url.to_string(), "HTTPS://Example.com");
    }

    #[test]
    fn rejects_relative_and_garbage() {
        for raw in [
            "",
            "not a url",
            "/relative/path",
            "example.com/x",
            "http://",
            "ht\ttps://example.com",
            "https://exa\nmple.com",
            "  https://example.com  ",
            "https://example.com/\r",
            "https://example.com/a b",
        ] {
            let err = Url::new(raw).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidUrl);
            assert_eq!(err.field, "url");
        }
    }

    #[test]
    fn deserializing_invalid_url_fails() {
        let ok = serde_json::from_str::<Url>("\"https://ok.example\"");
        assert!(ok.is_ok());
        assert!(serde_json::from_str::<Url>("\"nope\"").is_err());
    }
}
