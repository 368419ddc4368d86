//! Validation guards run by the relation lifecycle workflow.
//!
//! Guards are explicit objects invoked in a fixed pipeline order
//! (immutability, shape, uniqueness), each checking one candidate against
//! the state visible in the caller's transaction.

use crate::mutations::StateMutationResult;
use crate::query;
use thiserror::Error;
use uuid::Uuid;
use verzoeken_sqlite::rusqlite::Transaction;
use verzoeken_types::prelude::*;

/// A rejected candidate. Every variant carries the offending field(s) and
/// maps to a stable error code for the exposition layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("immutable field(s) changed after creation: {}", fields.join(", "))]
    ImmutableField { fields: Vec<&'static str> },

    #[error("a {kind} relation with the same ({}) already exists", fields.join(", "))]
    DuplicateRelation {
        kind: RelationKind,
        fields: Vec<&'static str>,
    },

    #[error(
        "identificatie {identificatie} is already taken within organization {bronorganisatie}"
    )]
    DuplicateIdentification {
        bronorganisatie: Rsin,
        identificatie: Identificatie,
    },

    #[error("{field}: {reason}")]
    Shape {
        field: &'static str,
        reason: String,
        code: &'static str,
    },
}

impl GuardError {
    /// Stable machine-readable error code for the exposition layer.
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::ImmutableField { .. } => "wijzigen-niet-toegelaten",
            GuardError::DuplicateRelation { .. } => "unique",
            GuardError::DuplicateIdentification { .. } => "identificatie-niet-uniek",
            GuardError::Shape { code, .. } => code,
        }
    }
}

/// A validation step in the lifecycle pipeline. Checks only; no guard has
/// side effects.
pub trait Guard {
    fn check(&self, txn: &Transaction<'_>) -> StateMutationResult<()>;
}

/// Rejects updates that change fields declared immutable on [`Verzoek`].
///
/// Applies only to updates; creation has no persisted instance to diverge
/// from. Re-supplying the current value is not a change. A blank
/// identificatie may be set once; after that it is frozen.
pub struct ImmutabilityGuard<'a> {
    pub existing: &'a Verzoek,
    pub candidate: &'a VerzoekUpdate,
}

impl Guard for ImmutabilityGuard<'_> {
    fn check(&self, _txn: &Transaction<'_>) -> StateMutationResult<()> {
        let mut fields = Vec::new();
        if self.candidate.bronorganisatie != self.existing.bronorganisatie {
            fields.push("bronorganisatie");
        }
        if !self.existing.identificatie.is_blank()
            && self.candidate.identificatie != self.existing.identificatie
        {
            fields.push("identificatie");
        }
        if self.candidate.klant != self.existing.klant {
            fields.push("klant");
        }
        if let Some(registratiedatum) = self.candidate.registratiedatum {
            if registratiedatum != self.existing.registratiedatum {
                fields.push("registratiedatum");
            }
        }
        if self.candidate.in_te_trekken_verzoek != self.existing.in_te_trekken_verzoek {
            fields.push("inTeTrekkenVerzoek");
        }
        if self.candidate.aangevulde_verzoek != self.existing.aangevulde_verzoek {
            fields.push("aangevuldeVerzoek");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(GuardError::ImmutableField { fields }.into())
        }
    }
}

/// Rejects a relation candidate whose composite key is already present.
///
/// Must run in the same transaction as the insert; the unique index backs
/// it up when two writers race.
pub struct UniquenessGuard<'a> {
    pub candidate: &'a RelationCandidate,
}

impl Guard for UniquenessGuard<'_> {
    fn check(&self, txn: &Transaction<'_>) -> StateMutationResult<()> {
        let (target, field) = match self.candidate {
            RelationCandidate::InformatieObject(c) => {
                (c.informatieobject.as_str(), "informatieobject")
            }
            RelationCandidate::ContactMoment(c) => (c.contactmoment.as_str(), "contactmoment"),
            RelationCandidate::Object(c) => (c.object.as_str(), "object"),
            RelationCandidate::Klant(c) => (c.klant.as_str(), "klant"),
            // Products carry no composite uniqueness constraint.
            RelationCandidate::Product(_) => return Ok(()),
        };
        let kind = self.candidate.kind();
        if query::relation_exists(txn, kind, self.candidate.verzoek(), target)? {
            return Err(GuardError::DuplicateRelation {
                kind,
                fields: vec!["verzoek", field],
            }
            .into());
        }
        Ok(())
    }
}

/// Enforces uniqueness of (bronorganisatie, identificatie) for non-blank
/// business identifiers, independent of the uuid primary key.
pub struct IdentificationGuard<'a> {
    pub bronorganisatie: &'a Rsin,
    pub identificatie: &'a Identificatie,
    /// Skipped when re-checking during an update of this record.
    pub exclude: Option<Uuid>,
}

impl Guard for IdentificationGuard<'_> {
    fn check(&self, txn: &Transaction<'_>) -> StateMutationResult<()> {
        if query::identification_taken(txn, self.bronorganisatie, self.identificatie, self.exclude)?
        {
            return Err(GuardError::DuplicateIdentification {
                bronorganisatie: self.bronorganisatie.clone(),
                identificatie: self.identificatie.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Entity-specific shape rules. Needs no storage access, so it runs before
/// any transaction is opened.
pub fn check_relation_shape(candidate: &RelationCandidate) -> Result<(), GuardError> {
    match candidate {
        RelationCandidate::Product(c) => {
            // "At least one" of the reference forms, not mutual exclusion.
            if c.product.is_none() && c.product_code.is_none() {
                return Err(GuardError::Shape {
                    field: "product",
                    reason: "product or productIdentificatie must be provided".into(),
                    code: "invalid-product",
                });
            }
            Ok(())
        }
        // Object type validity is enforced by the enum at the type
        // boundary; the remaining candidates have no shape rule.
        _ => Ok(()),
    }
}
