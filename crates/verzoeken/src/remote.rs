//! Remote reference validation.
//!
//! A link record may only be created when its remote-pointing URL can be
//! confirmed to exist and to look like the resource it claims to be. An
//! unreachable remote is a validation failure, not something to tolerate
//! silently. No retries happen here; retry policy belongs to callers and
//! is out of scope.

use crate::config::ConfigError;
use crate::config::VerzoekenConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use verzoeken_types::prelude::ResourceKind;
use verzoeken_types::prelude::ResourceUrl;

pub use auth::AuthResolver;
pub use auth::Credential;

pub mod auth;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteValidationError {
    #[error("remote API could not be reached for {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("remote API returned HTTP {status} for {url}")]
    Rejected { url: String, status: u16 },

    #[error("{url} is not a valid {resource}: diverging field(s) {}", fields.join(", "))]
    SchemaInvalid {
        url: String,
        resource: &'static str,
        fields: Vec<String>,
    },
}

impl RemoteValidationError {
    /// Stable machine-readable error code for the exposition layer.
    pub fn code(&self) -> &'static str {
        match self {
            RemoteValidationError::Unavailable { .. } => "bad-url",
            RemoteValidationError::Rejected { .. } => "invalid-resource",
            RemoteValidationError::SchemaInvalid { .. } => "invalid-resource",
        }
    }
}

/// The capability the lifecycle workflow requires: confirm that a URL
/// points at a well-formed resource of the expected kind.
#[async_trait]
pub trait RemoteCheck: Send + Sync {
    async fn validate(
        &self,
        url: &ResourceUrl,
        kind: ResourceKind,
    ) -> Result<(), RemoteValidationError>;
}

/// Structural requirements per remote resource kind: top-level fields
/// that must be present and non-null in the fetched representation.
pub struct SchemaRegistry {
    required: HashMap<ResourceKind, Vec<&'static str>>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let required = HashMap::from([
            (
                ResourceKind::EnkelvoudigInformatieObject,
                vec!["url", "identificatie", "creatiedatum", "titel"],
            ),
            (
                ResourceKind::ContactMoment,
                vec!["url", "bronorganisatie", "registratiedatum"],
            ),
            (
                ResourceKind::Zaak,
                vec!["url", "identificatie", "zaaktype", "startdatum"],
            ),
            (ResourceKind::Product, vec!["url"]),
            (
                ResourceKind::Klant,
                vec!["url", "bronorganisatie", "klantnummer"],
            ),
        ]);
        Self { required }
    }
}

impl SchemaRegistry {
    /// Check a fetched representation, returning the diverging fields.
    pub fn verify(&self, kind: ResourceKind, body: &serde_json::Value) -> Result<(), Vec<String>> {
        let Some(object) = body.as_object() else {
            return Err(vec!["<lichaam is geen JSON-object>".to_string()]);
        };
        let missing: Vec<String> = self
            .required
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|field| object.get(**field).map_or(true, |v| v.is_null()))
            .map(|field| field.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

/// The production [`RemoteCheck`]: fetches the URL over HTTP with resolved
/// credentials and verifies the response body against the schema registry.
pub struct RemoteReferenceValidator {
    client: reqwest::Client,
    auth: AuthResolver,
    schemas: SchemaRegistry,
}

impl RemoteReferenceValidator {
    pub fn from_config(config: &VerzoekenConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.remote_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            auth: AuthResolver::from_config(&config.remote_apis),
            schemas: SchemaRegistry::default(),
        })
    }
}

#[async_trait]
impl RemoteCheck for RemoteReferenceValidator {
    async fn validate(
        &self,
        url: &ResourceUrl,
        kind: ResourceKind,
    ) -> Result<(), RemoteValidationError> {
        let mut request = self.client.get(url.as_str());
        if let Some(credential) = self.auth.resolve(url) {
            request = request.bearer_auth(credential.token());
        }
        // Timeouts land here as well and are indistinguishable from an
        // unreachable host on purpose.
        let response = request
            .send()
            .await
            .map_err(|e| RemoteValidationError::Unavailable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteValidationError::Rejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|_| RemoteValidationError::SchemaInvalid {
                    url: url.to_string(),
                    resource: kind.resource_name(),
                    fields: vec!["<lichaam is geen JSON-object>".to_string()],
                })?;
        self.schemas
            .verify(kind, &body)
            .map_err(|fields| RemoteValidationError::SchemaInvalid {
                url: url.to_string(),
                resource: kind.resource_name(),
                fields,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_registry_flags_missing_and_null_fields() {
        let registry = SchemaRegistry::default();
        let complete = json!({
            "url": "https://drc.example.com/api/v1/eio/1",
            "identificatie": "DOC-1",
            "creatiedatum": "2020-05-20",
            "titel": "Aanvraagformulier",
        });
        registry
            .verify(ResourceKind::EnkelvoudigInformatieObject, &complete)
            .unwrap();

        let broken = json!({
            "url": "https://drc.example.com/api/v1/eio/1",
            "identificatie": null,
            "titel": "Aanvraagformulier",
        });
        let fields = registry
            .verify(ResourceKind::EnkelvoudigInformatieObject, &broken)
            .unwrap_err();
        assert_eq!(fields, vec!["identificatie", "creatiedatum"]);
    }

    #[test]
    fn non_object_bodies_are_schema_violations() {
        let registry = SchemaRegistry::default();
        assert!(registry
            .verify(ResourceKind::Product, &json!(["niet", "een", "object"]))
            .is_err());
    }

    #[test]
    fn error_codes_are_stable() {
        let unavailable = RemoteValidationError::Unavailable {
            url: "https://drc.example.com".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(unavailable.code(), "bad-url");
        let rejected = RemoteValidationError::Rejected {
            url: "https://drc.example.com".into(),
            status: 404,
        };
        assert_eq!(rejected.code(), "invalid-resource");
    }
}
