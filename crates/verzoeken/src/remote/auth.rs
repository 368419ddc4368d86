//! Credential resolution for outgoing validation fetches.

use crate::config::RemoteApiConfig;
use verzoeken_types::prelude::ResourceUrl;

/// A bearer token for one remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Maps a resource URL to the credential configured for its API.
///
/// Resolution is by URL prefix, longest match first, so a deployment can
/// configure both `https://api.example.com/` and a more specific
/// `https://api.example.com/documenten/` with distinct tokens.
#[derive(Debug, Default)]
pub struct AuthResolver {
    // Sorted by descending root length.
    roots: Vec<(String, Credential)>,
}

impl AuthResolver {
    pub fn from_config(apis: &[RemoteApiConfig]) -> Self {
        let mut roots: Vec<(String, Credential)> = apis
            .iter()
            .filter_map(|api| {
                api.token
                    .as_ref()
                    .map(|token| (api.api_root.clone(), Credential::new(token)))
            })
            .collect();
        roots.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { roots }
    }

    pub fn resolve(&self, url: &ResourceUrl) -> Option<&Credential> {
        let target = url.as_str();
        self.roots
            .iter()
            .find(|(root, _)| target.starts_with(root.as_str()))
            .map(|(_, credential)| credential)
    }
}
