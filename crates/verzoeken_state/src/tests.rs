use crate::prelude::*;
use chrono::Utc;
use uuid::Uuid;
use verzoeken_sqlite::test_utils::test_db;
use verzoeken_types::prelude::*;

fn verzoek(bronorganisatie: &str, identificatie: &str) -> Verzoek {
    Verzoek {
        uuid: Uuid::new_v4(),
        bronorganisatie: Rsin::new(bronorganisatie).unwrap(),
        identificatie: Identificatie::new(identificatie).unwrap(),
        externe_identificatie: Identificatie::blank(),
        klant: None,
        registratiedatum: Utc::now(),
        tekst: String::new(),
        voorkeurskanaal: String::new(),
        status: VerzoekStatus::Ontvangen,
        in_te_trekken_verzoek: None,
        aangevulde_verzoek: None,
    }
}

fn url(s: &str) -> ResourceUrl {
    ResourceUrl::parse(s).unwrap()
}

#[test]
fn verzoek_round_trips_through_storage() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let mut stored = verzoek("123456789", "REQ-1");
    stored.klant = Some(url("https://klanten.example.com/api/v1/klanten/7"));
    stored.tekst = "Aanvraag parkeervergunning".into();
    insert_verzoek(&mut txn, &stored).unwrap();

    let loaded = get_verzoek(&txn, stored.uuid).unwrap().unwrap();
    // Timestamps survive the rfc3339 round trip with their original
    // precision, so whole-struct equality is fair game.
    assert_eq!(loaded, stored);
}

#[test]
fn listing_filters_on_organization_and_status() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let mut a = verzoek("123456789", "REQ-1");
    a.status = VerzoekStatus::InBehandeling;
    let b = verzoek("987654321", "REQ-2");
    insert_verzoek(&mut txn, &a).unwrap();
    insert_verzoek(&mut txn, &b).unwrap();

    let filter = VerzoekFilter {
        bronorganisatie: Some(Rsin::new("123456789").unwrap()),
        status: Some(VerzoekStatus::InBehandeling),
        ..Default::default()
    };
    let found = list_verzoeken(&txn, &filter).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uuid, a.uuid);
}

#[test]
fn identification_guard_is_scoped_to_the_organization() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    insert_verzoek(&mut txn, &verzoek("123456789", "REQ-1")).unwrap();

    let same_org = verzoek("123456789", "REQ-1");
    let guard = IdentificationGuard {
        bronorganisatie: &same_org.bronorganisatie,
        identificatie: &same_org.identificatie,
        exclude: None,
    };
    match guard.check(&txn) {
        Err(StateMutationError::Guard(e @ GuardError::DuplicateIdentification { .. })) => {
            assert_eq!(e.code(), "identificatie-niet-uniek");
        }
        other => panic!("expected DuplicateIdentification, got {other:?}"),
    }

    // Same identifier under a different organization is fine.
    let other_org = verzoek("987654321", "REQ-1");
    IdentificationGuard {
        bronorganisatie: &other_org.bronorganisatie,
        identificatie: &other_org.identificatie,
        exclude: None,
    }
    .check(&txn)
    .unwrap();
}

#[test]
fn blank_identifications_never_conflict() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    insert_verzoek(&mut txn, &verzoek("123456789", "")).unwrap();
    insert_verzoek(&mut txn, &verzoek("123456789", "")).unwrap();

    let blank = Identificatie::blank();
    IdentificationGuard {
        bronorganisatie: &Rsin::new("123456789").unwrap(),
        identificatie: &blank,
        exclude: None,
    }
    .check(&txn)
    .unwrap();
}

#[test]
fn uniqueness_guard_finds_existing_pair() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let v = verzoek("123456789", "REQ-1");
    insert_verzoek(&mut txn, &v).unwrap();
    let document = url("https://drc.example.com/api/v1/eio/1");
    insert_relation(
        &mut txn,
        &Relation::InformatieObject(VerzoekInformatieObject {
            uuid: Uuid::new_v4(),
            verzoek: v.uuid,
            informatieobject: document.clone(),
        }),
    )
    .unwrap();

    let candidate = RelationCandidate::InformatieObject(NewVerzoekInformatieObject {
        verzoek: v.uuid,
        informatieobject: document,
    });
    match (UniquenessGuard { candidate: &candidate }).check(&txn) {
        Err(StateMutationError::Guard(GuardError::DuplicateRelation { kind, fields })) => {
            assert_eq!(kind, RelationKind::InformatieObject);
            assert_eq!(fields, vec!["verzoek", "informatieobject"]);
        }
        other => panic!("expected DuplicateRelation, got {other:?}"),
    }

    // The same document under another verzoek does not conflict.
    let w = verzoek("123456789", "REQ-2");
    insert_verzoek(&mut txn, &w).unwrap();
    let candidate = RelationCandidate::InformatieObject(NewVerzoekInformatieObject {
        verzoek: w.uuid,
        informatieobject: url("https://drc.example.com/api/v1/eio/1"),
    });
    UniquenessGuard { candidate: &candidate }.check(&txn).unwrap();
}

#[test]
fn immutability_guard_accepts_unchanged_and_rejects_changes() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let existing = verzoek("123456789", "REQ-1");
    insert_verzoek(&mut txn, &existing).unwrap();

    // Re-supplying every current value, including the identificatie, is
    // not a violation.
    let unchanged = VerzoekUpdate::unchanged(&existing);
    ImmutabilityGuard {
        existing: &existing,
        candidate: &unchanged,
    }
    .check(&txn)
    .unwrap();

    let mut changed = VerzoekUpdate::unchanged(&existing);
    changed.bronorganisatie = Rsin::new("987654321").unwrap();
    changed.identificatie = Identificatie::new("REQ-2").unwrap();
    match (ImmutabilityGuard {
        existing: &existing,
        candidate: &changed,
    })
    .check(&txn)
    {
        Err(StateMutationError::Guard(e @ GuardError::ImmutableField { .. })) => {
            assert_eq!(e.code(), "wijzigen-niet-toegelaten");
            match e {
                GuardError::ImmutableField { fields } => {
                    assert_eq!(fields, vec!["bronorganisatie", "identificatie"]);
                }
                _ => unreachable!(),
            }
        }
        other => panic!("expected ImmutableField, got {other:?}"),
    }
}

#[test]
fn blank_identificatie_may_be_set_once() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let existing = verzoek("123456789", "");
    insert_verzoek(&mut txn, &existing).unwrap();

    let mut set_it = VerzoekUpdate::unchanged(&existing);
    set_it.identificatie = Identificatie::new("REQ-1").unwrap();
    ImmutabilityGuard {
        existing: &existing,
        candidate: &set_it,
    }
    .check(&txn)
    .unwrap();
}

#[test]
fn product_shape_requires_at_least_one_reference_form() {
    let neither = RelationCandidate::Product(NewVerzoekProduct {
        verzoek: Uuid::new_v4(),
        product: None,
        product_code: None,
    });
    let err = check_relation_shape(&neither).unwrap_err();
    assert_eq!(err.code(), "invalid-product");

    let both = RelationCandidate::Product(NewVerzoekProduct {
        verzoek: Uuid::new_v4(),
        product: Some(url("https://producten.example.com/api/v1/producten/1")),
        product_code: Some("PASPOORT".parse().unwrap()),
    });
    check_relation_shape(&both).unwrap();
}

#[test]
fn deleting_a_verzoek_cascades_to_its_relations() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let v = verzoek("123456789", "REQ-1");
    insert_verzoek(&mut txn, &v).unwrap();
    let relation_uuid = Uuid::new_v4();
    insert_relation(
        &mut txn,
        &Relation::ContactMoment(VerzoekContactMoment {
            uuid: relation_uuid,
            verzoek: v.uuid,
            contactmoment: url("https://cmc.example.com/api/v1/contactmomenten/1"),
        }),
    )
    .unwrap();

    assert!(delete_verzoek(&mut txn, v.uuid).unwrap());
    assert!(!relation_present(&txn, RelationKind::ContactMoment, relation_uuid).unwrap());
}

#[test]
fn racing_insert_surfaces_as_constraint_violation() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let v = verzoek("123456789", "REQ-1");
    insert_verzoek(&mut txn, &v).unwrap();
    // A second writer that passed the guard before our insert committed
    // lands on the unique index instead.
    let err = insert_verzoek(&mut txn, &verzoek("123456789", "REQ-1")).unwrap_err();
    assert!(err.is_unique_violation());
}

#[test]
fn predecessor_references_must_exist() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let predecessor = verzoek("123456789", "REQ-1");
    insert_verzoek(&mut txn, &predecessor).unwrap();

    let mut revoking = verzoek("123456789", "REQ-2");
    revoking.in_te_trekken_verzoek = Some(predecessor.uuid);
    insert_verzoek(&mut txn, &revoking).unwrap();

    assert_eq!(
        intrekkende_verzoek(&txn, predecessor.uuid).unwrap(),
        Some(revoking.uuid)
    );

    let mut dangling = verzoek("123456789", "REQ-3");
    dangling.aangevulde_verzoek = Some(Uuid::new_v4());
    match insert_verzoek(&mut txn, &dangling) {
        Err(StateMutationError::VerzoekMissing(_)) => {}
        other => panic!("expected VerzoekMissing, got {other:?}"),
    }
}

#[test]
fn relation_collections_are_per_verzoek() {
    let test = test_db();
    let mut conn = test.db().conn().unwrap();
    let mut txn = conn.transaction().unwrap();

    let v = verzoek("123456789", "REQ-1");
    let w = verzoek("123456789", "REQ-2");
    insert_verzoek(&mut txn, &v).unwrap();
    insert_verzoek(&mut txn, &w).unwrap();

    let mine = ObjectVerzoek {
        uuid: Uuid::new_v4(),
        verzoek: v.uuid,
        object: url("https://zaken.example.com/api/v1/zaken/1"),
        object_type: ObjectType::Zaak,
    };
    let theirs = ObjectVerzoek {
        uuid: Uuid::new_v4(),
        verzoek: w.uuid,
        object: url("https://zaken.example.com/api/v1/zaken/2"),
        object_type: ObjectType::Zaak,
    };
    insert_relation(&mut txn, &Relation::Object(mine.clone())).unwrap();
    insert_relation(&mut txn, &Relation::Object(theirs)).unwrap();

    assert_eq!(objecten_van(&txn, v.uuid).unwrap(), vec![mine]);
}
