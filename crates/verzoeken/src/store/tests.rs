use super::*;
use crate::remote::RemoteValidationError;
use crate::sync::NoopSyncHook;
use async_trait::async_trait;
use chrono::TimeZone;
use verzoeken_sqlite::test_utils::test_db;
use verzoeken_sqlite::test_utils::TestDb;

struct AlwaysValid;

#[async_trait]
impl RemoteCheck for AlwaysValid {
    async fn validate(
        &self,
        _url: &ResourceUrl,
        _kind: ResourceKind,
    ) -> Result<(), RemoteValidationError> {
        Ok(())
    }
}

struct Rejecting(u16);

#[async_trait]
impl RemoteCheck for Rejecting {
    async fn validate(
        &self,
        url: &ResourceUrl,
        _kind: ResourceKind,
    ) -> Result<(), RemoteValidationError> {
        Err(RemoteValidationError::Rejected {
            url: url.to_string(),
            status: self.0,
        })
    }
}

fn store(test: &TestDb, remote: impl RemoteCheck + 'static) -> VerzoekStore {
    VerzoekStore::new(test.db(), Arc::new(remote), Arc::new(NoopSyncHook))
}

fn url(s: &str) -> ResourceUrl {
    ResourceUrl::parse(s).unwrap()
}

fn new_verzoek(identificatie: &str) -> NewVerzoek {
    NewVerzoek {
        bronorganisatie: Rsin::new("123456789").unwrap(),
        identificatie: Identificatie::new(identificatie).unwrap(),
        externe_identificatie: Identificatie::blank(),
        klant: None,
        registratiedatum: None,
        tekst: String::new(),
        voorkeurskanaal: String::new(),
        status: VerzoekStatus::Ontvangen,
        in_te_trekken_verzoek: None,
        aangevulde_verzoek: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_assigns_uuid_and_defaults_the_timestamp() {
    let test = test_db();
    let store = store(&test, AlwaysValid);

    let before = Utc::now();
    let created = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();
    assert!(created.registratiedatum >= before);

    let loaded = store.get_verzoek(created.uuid).await.unwrap().unwrap();
    assert_eq!(loaded, created);

    // A caller-supplied timestamp is kept as-is.
    let mut explicit = new_verzoek("REQ-2");
    explicit.registratiedatum = Some(Utc.with_ymd_and_hms(2020, 5, 20, 13, 33, 0).unwrap());
    let created = store.create_verzoek(explicit.clone()).await.unwrap();
    assert_eq!(Some(created.registratiedatum), explicit.registratiedatum);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identification_within_the_organization_is_rejected() {
    let test = test_db();
    let store = store(&test, AlwaysValid);

    store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();
    let err = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap_err();
    assert_eq!(err.code(), "identificatie-niet-uniek");

    // Same identifier under another organization is allowed.
    let mut other_org = new_verzoek("REQ-1");
    other_org.bronorganisatie = Rsin::new("987654321").unwrap();
    store.create_verzoek(other_org).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn klant_reference_is_validated_remotely() {
    let test = test_db();
    let store = store(&test, Rejecting(404));

    let mut with_klant = new_verzoek("REQ-1");
    with_klant.klant = Some(url("https://klanten.example.com/api/v1/klanten/7"));
    let err = store.create_verzoek(with_klant).await.unwrap_err();
    assert_eq!(err.code(), "invalid-resource");

    // Nothing was persisted.
    let all = store.list_verzoeken(VerzoekFilter::default()).await.unwrap();
    assert!(all.is_empty());

    // Without a klant there is nothing to validate.
    store.create_verzoek(new_verzoek("REQ-2")).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn writable_fields_can_be_updated() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let created = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    let mut update = VerzoekUpdate::unchanged(&created);
    update.status = VerzoekStatus::InBehandeling;
    update.tekst = "Aanvraag parkeervergunning".into();
    let updated = store.update_verzoek(created.uuid, update).await.unwrap();
    assert_eq!(updated.status, VerzoekStatus::InBehandeling);

    let loaded = store.get_verzoek(created.uuid).await.unwrap().unwrap();
    assert_eq!(loaded, updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn immutable_fields_cannot_be_updated() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let created = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    let mut update = VerzoekUpdate::unchanged(&created);
    update.bronorganisatie = Rsin::new("987654321").unwrap();
    let err = store.update_verzoek(created.uuid, update).await.unwrap_err();
    assert_eq!(err.code(), "wijzigen-niet-toegelaten");

    // Stored representation is untouched.
    let loaded = store.get_verzoek(created.uuid).await.unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn setting_a_blank_identificatie_respects_uniqueness() {
    let test = test_db();
    let store = store(&test, AlwaysValid);

    store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();
    let blank = store.create_verzoek(new_verzoek("")).await.unwrap();

    let mut taken = VerzoekUpdate::unchanged(&blank);
    taken.identificatie = Identificatie::new("REQ-1").unwrap();
    let err = store.update_verzoek(blank.uuid, taken).await.unwrap_err();
    assert_eq!(err.code(), "identificatie-niet-uniek");

    let mut free = VerzoekUpdate::unchanged(&blank);
    free.identificatie = Identificatie::new("REQ-2").unwrap();
    let updated = store.update_verzoek(blank.uuid, free).await.unwrap();
    assert_eq!(updated.identificatie.as_str(), "REQ-2");
}

#[tokio::test(flavor = "multi_thread")]
async fn updating_a_missing_verzoek_reports_it() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let ghost = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    let update = VerzoekUpdate::unchanged(&ghost);
    let missing = Uuid::new_v4();
    let err = store.update_verzoek(missing, update).await.unwrap_err();
    match err {
        WorkflowError::VerzoekMissing(uuid) => assert_eq!(uuid, missing),
        other => panic!("expected VerzoekMissing, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_verzoek_takes_its_relations_along() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let created = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    store
        .add_klant(NewKlantVerzoek {
            verzoek: created.uuid,
            klant: url("https://klanten.example.com/api/v1/klanten/7"),
            rol: KlantRol::Initiator,
            indicatie_machtiging: None,
        })
        .await
        .unwrap();

    assert!(store.delete_verzoek(created.uuid).await.unwrap());
    assert!(store.klanten(created.uuid).await.unwrap().is_empty());
    assert!(store.get_verzoek(created.uuid).await.unwrap().is_none());

    // Idempotent from the caller's perspective; just reports nothing was
    // there.
    assert!(!store.delete_verzoek(created.uuid).await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn typed_relation_creators_return_concrete_records() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let created = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    let object = store
        .add_object(NewObjectVerzoek {
            verzoek: created.uuid,
            object: url("https://zaken.example.com/api/v1/zaken/1"),
            object_type: ObjectType::Zaak,
        })
        .await
        .unwrap();
    assert_eq!(object.object_type, ObjectType::Zaak);

    let product = store
        .add_product(NewVerzoekProduct {
            verzoek: created.uuid,
            product: None,
            product_code: Some("PASPOORT".parse().unwrap()),
        })
        .await
        .unwrap();
    assert_eq!(store.producten(created.uuid).await.unwrap(), vec![product]);
    assert_eq!(store.objecten(created.uuid).await.unwrap(), vec![object]);
}

#[tokio::test(flavor = "multi_thread")]
async fn predecessor_edges_are_navigable_both_ways() {
    let test = test_db();
    let store = store(&test, AlwaysValid);
    let original = store.create_verzoek(new_verzoek("REQ-1")).await.unwrap();

    let mut revoking = new_verzoek("REQ-2");
    revoking.in_te_trekken_verzoek = Some(original.uuid);
    let revoking = store.create_verzoek(revoking).await.unwrap();

    assert_eq!(
        store.intrekkende(original.uuid).await.unwrap(),
        Some(revoking.uuid)
    );
    assert_eq!(store.aanvullende(original.uuid).await.unwrap(), None);
}
