//! The Verzoek anchor entity.

use crate::constants::VerzoekStatus;
use crate::fields::Identificatie;
use crate::fields::ResourceUrl;
use crate::fields::Rsin;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A persisted Verzoek.
///
/// `uuid` is the system-generated opaque identifier used as the external
/// reference key. `identificatie` is the caller-supplied business
/// identifier, unique within `bronorganisatie` when non-blank and immutable
/// once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verzoek {
    pub uuid: Uuid,
    pub bronorganisatie: Rsin,
    pub identificatie: Identificatie,
    pub externe_identificatie: Identificatie,
    pub klant: Option<ResourceUrl>,
    pub registratiedatum: DateTime<Utc>,
    pub tekst: String,
    pub voorkeurskanaal: String,
    pub status: VerzoekStatus,
    /// Predecessor this Verzoek revokes, if any.
    pub in_te_trekken_verzoek: Option<Uuid>,
    /// Predecessor this Verzoek supplements, if any.
    pub aangevulde_verzoek: Option<Uuid>,
}

/// Input for creating a Verzoek. The uuid and (when absent) the
/// registration timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerzoek {
    pub bronorganisatie: Rsin,
    #[serde(default)]
    pub identificatie: Identificatie,
    #[serde(default)]
    pub externe_identificatie: Identificatie,
    #[serde(default)]
    pub klant: Option<ResourceUrl>,
    #[serde(default)]
    pub registratiedatum: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tekst: String,
    #[serde(default)]
    pub voorkeurskanaal: String,
    pub status: VerzoekStatus,
    #[serde(default)]
    pub in_te_trekken_verzoek: Option<Uuid>,
    #[serde(default)]
    pub aangevulde_verzoek: Option<Uuid>,
}

/// Full-representation update of a Verzoek.
///
/// Every field is present so the immutability guard can detect attempts to
/// change fields that may not change after creation; only status, tekst,
/// voorkeurskanaal and externe_identificatie are actually writable.
/// `registratiedatum: None` means "keep the stored value".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerzoekUpdate {
    pub bronorganisatie: Rsin,
    #[serde(default)]
    pub identificatie: Identificatie,
    #[serde(default)]
    pub externe_identificatie: Identificatie,
    #[serde(default)]
    pub klant: Option<ResourceUrl>,
    #[serde(default)]
    pub registratiedatum: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tekst: String,
    #[serde(default)]
    pub voorkeurskanaal: String,
    pub status: VerzoekStatus,
    #[serde(default)]
    pub in_te_trekken_verzoek: Option<Uuid>,
    #[serde(default)]
    pub aangevulde_verzoek: Option<Uuid>,
}

impl VerzoekUpdate {
    /// An update that keeps everything as stored. Useful as a baseline for
    /// mutating individual writable fields.
    pub fn unchanged(verzoek: &Verzoek) -> Self {
        Self {
            bronorganisatie: verzoek.bronorganisatie.clone(),
            identificatie: verzoek.identificatie.clone(),
            externe_identificatie: verzoek.externe_identificatie.clone(),
            klant: verzoek.klant.clone(),
            registratiedatum: Some(verzoek.registratiedatum),
            tekst: verzoek.tekst.clone(),
            voorkeurskanaal: verzoek.voorkeurskanaal.clone(),
            status: verzoek.status,
            in_te_trekken_verzoek: verzoek.in_te_trekken_verzoek,
            aangevulde_verzoek: verzoek.aangevulde_verzoek,
        }
    }
}

/// Filter for listing Verzoeken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerzoekFilter {
    pub bronorganisatie: Option<Rsin>,
    pub identificatie: Option<Identificatie>,
    pub status: Option<VerzoekStatus>,
}
