//! Validated field newtypes.
//!
//! Parsing happens once, at the type boundary; everything downstream can
//! rely on these invariants instead of re-checking strings.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("RSIN must consist of exactly 9 digits, got {0:?}")]
    InvalidRsin(String),

    #[error("identificatie is limited to 40 characters from [a-zA-Z0-9_-], got {0:?}")]
    InvalidIdentificatie(String),

    #[error("expected an absolute http(s) URL of at most 1000 characters: {0}")]
    InvalidUrl(String),

    #[error("product code must be 1 to 20 characters, got {0:?}")]
    InvalidProductCode(String),
}

pub type FieldResult<T> = Result<T, FieldError>;

/// RSIN of the organization that registered the Verzoek.
///
/// Exactly nine digits. The 11-proef checksum of the source system is
/// deliberately not enforced; organization codes are treated as opaque
/// 9-digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rsin(String);

impl Rsin {
    pub fn new(value: impl Into<String>) -> FieldResult<Self> {
        let value = value.into();
        if value.len() != 9 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::InvalidRsin(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Business identifier of a Verzoek within its organization.
///
/// Blank is allowed and is not a key value: blank identifiers never
/// conflict with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identificatie(String);

impl Identificatie {
    pub fn new(value: impl Into<String>) -> FieldResult<Self> {
        let value = value.into();
        let ok = value.len() <= 40
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !ok {
            return Err(FieldError::InvalidIdentificatie(value));
        }
        Ok(Self(value))
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// URL-reference to a resource in another API. A weak reference: it
/// identifies the resource but carries no lifecycle coupling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUrl(url::Url);

impl ResourceUrl {
    pub fn parse(value: &str) -> FieldResult<Self> {
        if value.len() > 1000 {
            return Err(FieldError::InvalidUrl(format!(
                "{} characters is over the 1000 character limit",
                value.len()
            )));
        }
        let url = url::Url::parse(value).map_err(|e| FieldError::InvalidUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(FieldError::InvalidUrl(format!(
                "unsupported scheme {other:?}"
            ))),
        }
    }

    pub fn as_url(&self) -> &url::Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Identifying code of a PRODUCT, for when no URL into the product API is
/// available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    pub fn new(value: impl Into<String>) -> FieldResult<Self> {
        let value = value.into();
        if value.is_empty() || value.len() > 20 {
            return Err(FieldError::InvalidProductCode(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($name:ident, $parse:path) => {
        impl TryFrom<String> for $name {
            type Error = FieldError;

            fn try_from(value: String) -> FieldResult<Self> {
                $parse(&value)
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(value: &str) -> FieldResult<Self> {
                $parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

fn parse_rsin(s: &str) -> FieldResult<Rsin> {
    Rsin::new(s)
}
fn parse_identificatie(s: &str) -> FieldResult<Identificatie> {
    Identificatie::new(s)
}
fn parse_resource_url(s: &str) -> FieldResult<ResourceUrl> {
    ResourceUrl::parse(s)
}
fn parse_product_code(s: &str) -> FieldResult<ProductCode> {
    ProductCode::new(s)
}

string_conversions!(Rsin, parse_rsin);
string_conversions!(Identificatie, parse_identificatie);
string_conversions!(ResourceUrl, parse_resource_url);
string_conversions!(ProductCode, parse_product_code);
