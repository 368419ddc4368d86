//! The Verzoek entity store.
//!
//! Facade over the anchor entity and its five relation collections. All
//! relation creation is delegated to the [`RelationLifecycle`]; Verzoek
//! writes run their own guards (identification uniqueness on create,
//! immutability on update) inside one write transaction.

use crate::config::ConfigError;
use crate::config::VerzoekenConfig;
use crate::remote::RemoteCheck;
use crate::remote::RemoteReferenceValidator;
use crate::sync::SyncHook;
use crate::workflow::RelationLifecycle;
use crate::workflow::WorkflowError;
use crate::workflow::WorkflowResult;
use chrono::Utc;
use std::sync::Arc;
use tracing::*;
use uuid::Uuid;
use verzoeken_sqlite::db::DbWrite;
use verzoeken_state::prelude::*;
use verzoeken_state::query;
use verzoeken_types::prelude::*;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct VerzoekStore {
    db: DbWrite,
    remote: Arc<dyn RemoteCheck>,
    lifecycle: RelationLifecycle,
}

impl VerzoekStore {
    pub fn new(db: DbWrite, remote: Arc<dyn RemoteCheck>, sync: Arc<dyn SyncHook>) -> Self {
        let lifecycle = RelationLifecycle::new(db.clone(), remote.clone(), sync);
        Self {
            db,
            remote,
            lifecycle,
        }
    }

    /// Open the database named by the configuration and wire up the
    /// production remote validator.
    pub fn open(config: &VerzoekenConfig, sync: Arc<dyn SyncHook>) -> Result<Self, ConfigError> {
        let db = DbWrite::open(&config.database_dir)?;
        let remote = Arc::new(RemoteReferenceValidator::from_config(config)?);
        Ok(Self::new(db, remote, sync))
    }

    pub fn lifecycle(&self) -> &RelationLifecycle {
        &self.lifecycle
    }

    /// Create a Verzoek. The uuid is assigned here; a missing
    /// registratiedatum defaults to now. A non-blank identificatie must be
    /// unique within the bronorganisatie, and a klant reference must
    /// resolve to a valid remote resource.
    #[instrument(skip(self, new), fields(bronorganisatie = %new.bronorganisatie))]
    pub async fn create_verzoek(&self, new: NewVerzoek) -> WorkflowResult<Verzoek> {
        if let Some(klant) = &new.klant {
            self.remote.validate(klant, ResourceKind::Klant).await?;
        }
        let verzoek = Verzoek {
            uuid: Uuid::new_v4(),
            bronorganisatie: new.bronorganisatie,
            identificatie: new.identificatie,
            externe_identificatie: new.externe_identificatie,
            klant: new.klant,
            registratiedatum: new.registratiedatum.unwrap_or_else(Utc::now),
            tekst: new.tekst,
            voorkeurskanaal: new.voorkeurskanaal,
            status: new.status,
            in_te_trekken_verzoek: new.in_te_trekken_verzoek,
            aangevulde_verzoek: new.aangevulde_verzoek,
        };
        let stored = verzoek.clone();
        let result: Result<(), StateMutationError> = self
            .db
            .async_commit(move |txn| {
                IdentificationGuard {
                    bronorganisatie: &stored.bronorganisatie,
                    identificatie: &stored.identificatie,
                    exclude: None,
                }
                .check(txn)?;
                insert_verzoek(txn, &stored)
            })
            .await;
        match result {
            Ok(()) => Ok(verzoek),
            Err(e) if e.is_unique_violation() => Err(GuardError::DuplicateIdentification {
                bronorganisatie: verzoek.bronorganisatie,
                identificatie: verzoek.identificatie,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_verzoek(&self, uuid: Uuid) -> WorkflowResult<Option<Verzoek>> {
        self.db
            .async_reader(move |txn| query::get_verzoek(&txn, uuid).map_err(WorkflowError::from))
            .await
    }

    pub async fn list_verzoeken(&self, filter: VerzoekFilter) -> WorkflowResult<Vec<Verzoek>> {
        self.db
            .async_reader(move |txn| {
                query::list_verzoeken(&txn, &filter).map_err(WorkflowError::from)
            })
            .await
    }

    /// Full-representation update. Immutable fields must be re-supplied
    /// with their stored values; a blank identificatie may be set once,
    /// subject to the same uniqueness rule as on create.
    #[instrument(skip(self, update), fields(verzoek = %uuid))]
    pub async fn update_verzoek(
        &self,
        uuid: Uuid,
        update: VerzoekUpdate,
    ) -> WorkflowResult<Verzoek> {
        let bronorganisatie = update.bronorganisatie.clone();
        let identificatie = update.identificatie.clone();
        let result: WorkflowResult<Verzoek> = self
            .db
            .async_commit(move |txn| {
                let existing =
                    query::get_verzoek(txn, uuid)?.ok_or(WorkflowError::VerzoekMissing(uuid))?;
                ImmutabilityGuard {
                    existing: &existing,
                    candidate: &update,
                }
                .check(txn)?;
                if existing.identificatie.is_blank() && !update.identificatie.is_blank() {
                    IdentificationGuard {
                        bronorganisatie: &update.bronorganisatie,
                        identificatie: &update.identificatie,
                        exclude: Some(uuid),
                    }
                    .check(txn)?;
                }
                let verzoek = Verzoek {
                    uuid,
                    bronorganisatie: update.bronorganisatie,
                    identificatie: update.identificatie,
                    externe_identificatie: update.externe_identificatie,
                    klant: update.klant,
                    registratiedatum: update
                        .registratiedatum
                        .unwrap_or(existing.registratiedatum),
                    tekst: update.tekst,
                    voorkeurskanaal: update.voorkeurskanaal,
                    status: update.status,
                    in_te_trekken_verzoek: update.in_te_trekken_verzoek,
                    aangevulde_verzoek: update.aangevulde_verzoek,
                };
                update_verzoek(txn, &verzoek)?;
                Ok(verzoek)
            })
            .await;
        match result {
            Err(WorkflowError::Database(e)) if e.is_unique_violation() => {
                Err(GuardError::DuplicateIdentification {
                    bronorganisatie,
                    identificatie,
                }
                .into())
            }
            other => other,
        }
    }

    /// Delete a Verzoek; its relation rows go with it by cascade. Returns
    /// whether anything existed.
    pub async fn delete_verzoek(&self, uuid: Uuid) -> WorkflowResult<bool> {
        self.db
            .async_commit::<WorkflowError, _, _>(move |txn| Ok(delete_verzoek(txn, uuid)?))
            .await
    }

    /// The Verzoek revoking this one, if any.
    pub async fn intrekkende(&self, uuid: Uuid) -> WorkflowResult<Option<Uuid>> {
        self.db
            .async_reader(move |txn| {
                query::intrekkende_verzoek(&txn, uuid).map_err(WorkflowError::from)
            })
            .await
    }

    /// The Verzoek supplementing this one, if any.
    pub async fn aanvullende(&self, uuid: Uuid) -> WorkflowResult<Option<Uuid>> {
        self.db
            .async_reader(move |txn| {
                query::aanvullende_verzoek(&txn, uuid).map_err(WorkflowError::from)
            })
            .await
    }

    pub async fn add_informatieobject(
        &self,
        new: NewVerzoekInformatieObject,
    ) -> WorkflowResult<VerzoekInformatieObject> {
        match self
            .lifecycle
            .create_relation(RelationCandidate::InformatieObject(new))
            .await?
        {
            Relation::InformatieObject(r) => Ok(r),
            _ => unreachable!("lifecycle preserves the candidate kind"),
        }
    }

    pub async fn add_contactmoment(
        &self,
        new: NewVerzoekContactMoment,
    ) -> WorkflowResult<VerzoekContactMoment> {
        match self
            .lifecycle
            .create_relation(RelationCandidate::ContactMoment(new))
            .await?
        {
            Relation::ContactMoment(r) => Ok(r),
            _ => unreachable!("lifecycle preserves the candidate kind"),
        }
    }

    pub async fn add_object(&self, new: NewObjectVerzoek) -> WorkflowResult<ObjectVerzoek> {
        match self
            .lifecycle
            .create_relation(RelationCandidate::Object(new))
            .await?
        {
            Relation::Object(r) => Ok(r),
            _ => unreachable!("lifecycle preserves the candidate kind"),
        }
    }

    pub async fn add_product(&self, new: NewVerzoekProduct) -> WorkflowResult<VerzoekProduct> {
        match self
            .lifecycle
            .create_relation(RelationCandidate::Product(new))
            .await?
        {
            Relation::Product(r) => Ok(r),
            _ => unreachable!("lifecycle preserves the candidate kind"),
        }
    }

    pub async fn add_klant(&self, new: NewKlantVerzoek) -> WorkflowResult<KlantVerzoek> {
        match self
            .lifecycle
            .create_relation(RelationCandidate::Klant(new))
            .await?
        {
            Relation::Klant(r) => Ok(r),
            _ => unreachable!("lifecycle preserves the candidate kind"),
        }
    }

    pub async fn informatieobjecten(
        &self,
        verzoek: Uuid,
    ) -> WorkflowResult<Vec<VerzoekInformatieObject>> {
        self.db
            .async_reader(move |txn| {
                query::informatieobjecten_van(&txn, verzoek).map_err(WorkflowError::from)
            })
            .await
    }

    pub async fn contactmomenten(
        &self,
        verzoek: Uuid,
    ) -> WorkflowResult<Vec<VerzoekContactMoment>> {
        self.db
            .async_reader(move |txn| {
                query::contactmomenten_van(&txn, verzoek).map_err(WorkflowError::from)
            })
            .await
    }

    pub async fn objecten(&self, verzoek: Uuid) -> WorkflowResult<Vec<ObjectVerzoek>> {
        self.db
            .async_reader(move |txn| query::objecten_van(&txn, verzoek).map_err(WorkflowError::from))
            .await
    }

    pub async fn producten(&self, verzoek: Uuid) -> WorkflowResult<Vec<VerzoekProduct>> {
        self.db
            .async_reader(move |txn| {
                query::producten_van(&txn, verzoek).map_err(WorkflowError::from)
            })
            .await
    }

    pub async fn klanten(&self, verzoek: Uuid) -> WorkflowResult<Vec<KlantVerzoek>> {
        self.db
            .async_reader(move |txn| query::klanten_van(&txn, verzoek).map_err(WorkflowError::from))
            .await
    }
}
