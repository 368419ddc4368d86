//! Write mutations against the verzoeken database.
//!
//! Every function takes the caller's [`Transaction`]: the lifecycle
//! workflow runs its uniqueness pre-check and the insert in one
//! transaction, so nothing here opens or commits one.

use crate::query;
use uuid::Uuid;
use verzoeken_sqlite::rusqlite::named_params;
use verzoeken_sqlite::rusqlite::Transaction;
use verzoeken_types::prelude::*;

pub use error::*;

mod error;

#[macro_export]
macro_rules! sql_insert {
    ($txn:expr, $table:ident, { $($field:literal : $val:expr , )+ $(,)? }) => {{
        let table = stringify!($table);
        let fieldnames = &[ $( { $field } ,)+ ].join(",");
        let fieldvars = &[ $( { format!(":{}", $field) } ,)+ ].join(",");
        let sql = format!("INSERT INTO {} ({}) VALUES ({})", table, fieldnames, fieldvars);
        let mut stmt = $txn.prepare_cached(&sql)?;
        stmt.execute(&[$(
            (format!(":{}", $field).as_str(), &$val as &dyn verzoeken_sqlite::rusqlite::ToSql),
        )+])
    }};
}

/// Insert a [`Verzoek`]. Predecessor references must point at existing
/// rows.
pub fn insert_verzoek(txn: &mut Transaction<'_>, verzoek: &Verzoek) -> StateMutationResult<()> {
    for predecessor in [verzoek.in_te_trekken_verzoek, verzoek.aangevulde_verzoek]
        .into_iter()
        .flatten()
    {
        if query::verzoek_row_id(txn, predecessor)?.is_none() {
            return Err(StateMutationError::VerzoekMissing(predecessor));
        }
    }
    sql_insert!(txn, Verzoek, {
        "uuid": verzoek.uuid.to_string(),
        "bronorganisatie": verzoek.bronorganisatie.as_str(),
        "identificatie": verzoek.identificatie.as_str(),
        "externe_identificatie": verzoek.externe_identificatie.as_str(),
        "klant": verzoek.klant.as_ref().map(|u| u.as_str().to_string()),
        "registratiedatum": verzoek.registratiedatum.to_rfc3339(),
        "tekst": verzoek.tekst,
        "voorkeurskanaal": verzoek.voorkeurskanaal,
        "status": verzoek.status.as_str(),
        "in_te_trekken_verzoek": verzoek.in_te_trekken_verzoek.map(|u| u.to_string()),
        "aangevulde_verzoek": verzoek.aangevulde_verzoek.map(|u| u.to_string()),
    })?;
    Ok(())
}

/// Overwrite the stored representation of a Verzoek. Immutability is the
/// guard's concern; by the time this runs the new representation has been
/// checked.
pub fn update_verzoek(txn: &mut Transaction<'_>, verzoek: &Verzoek) -> StateMutationResult<bool> {
    for predecessor in [verzoek.in_te_trekken_verzoek, verzoek.aangevulde_verzoek]
        .into_iter()
        .flatten()
    {
        if query::verzoek_row_id(txn, predecessor)?.is_none() {
            return Err(StateMutationError::VerzoekMissing(predecessor));
        }
    }
    let rows = txn.execute(
        "UPDATE Verzoek SET
            bronorganisatie = :bronorganisatie,
            identificatie = :identificatie,
            externe_identificatie = :externe_identificatie,
            klant = :klant,
            registratiedatum = :registratiedatum,
            tekst = :tekst,
            voorkeurskanaal = :voorkeurskanaal,
            status = :status,
            in_te_trekken_verzoek = :in_te_trekken_verzoek,
            aangevulde_verzoek = :aangevulde_verzoek
         WHERE uuid = :uuid",
        named_params! {
            ":uuid": verzoek.uuid.to_string(),
            ":bronorganisatie": verzoek.bronorganisatie.as_str(),
            ":identificatie": verzoek.identificatie.as_str(),
            ":externe_identificatie": verzoek.externe_identificatie.as_str(),
            ":klant": verzoek.klant.as_ref().map(|u| u.as_str().to_string()),
            ":registratiedatum": verzoek.registratiedatum.to_rfc3339(),
            ":tekst": verzoek.tekst,
            ":voorkeurskanaal": verzoek.voorkeurskanaal,
            ":status": verzoek.status.as_str(),
            ":in_te_trekken_verzoek": verzoek.in_te_trekken_verzoek.map(|u| u.to_string()),
            ":aangevulde_verzoek": verzoek.aangevulde_verzoek.map(|u| u.to_string()),
        },
    )?;
    Ok(rows > 0)
}

/// Insert a link record. The owning Verzoek must exist.
pub fn insert_relation(txn: &mut Transaction<'_>, relation: &Relation) -> StateMutationResult<()> {
    let verzoek_id = query::verzoek_row_id(txn, relation.verzoek())?
        .ok_or(StateMutationError::VerzoekMissing(relation.verzoek()))?;
    match relation {
        Relation::InformatieObject(r) => {
            sql_insert!(txn, VerzoekInformatieObject, {
                "uuid": r.uuid.to_string(),
                "verzoek_id": verzoek_id,
                "informatieobject": r.informatieobject.as_str(),
            })?;
        }
        Relation::ContactMoment(r) => {
            sql_insert!(txn, VerzoekContactMoment, {
                "uuid": r.uuid.to_string(),
                "verzoek_id": verzoek_id,
                "contactmoment": r.contactmoment.as_str(),
            })?;
        }
        Relation::Object(r) => {
            sql_insert!(txn, ObjectVerzoek, {
                "uuid": r.uuid.to_string(),
                "verzoek_id": verzoek_id,
                "object": r.object.as_str(),
                "object_type": r.object_type.as_str(),
            })?;
        }
        Relation::Product(r) => {
            sql_insert!(txn, VerzoekProduct, {
                "uuid": r.uuid.to_string(),
                "verzoek_id": verzoek_id,
                "product": r.product.as_ref().map(|u| u.as_str().to_string()),
                "product_code": r.product_code.as_ref().map(|c| c.as_str().to_string()),
            })?;
        }
        Relation::Klant(r) => {
            sql_insert!(txn, KlantVerzoek, {
                "uuid": r.uuid.to_string(),
                "verzoek_id": verzoek_id,
                "klant": r.klant.as_str(),
                "rol": r.rol.as_str(),
                "indicatie_machtiging": r.indicatie_machtiging.map(|i| i.as_str().to_string()),
            })?;
        }
    }
    Ok(())
}

/// Physically remove a link row, bypassing any higher-level bookkeeping.
/// This is the compensating delete for a failed synchronization; the row
/// must not outlive the failure. Returns whether a row went away.
pub fn delete_relation_physical(
    txn: &mut Transaction<'_>,
    kind: RelationKind,
    uuid: Uuid,
) -> StateMutationResult<bool> {
    let table = crate::query::relation_table(kind);
    let sql = format!("DELETE FROM {table} WHERE uuid = :uuid");
    let rows = txn.execute(&sql, named_params! { ":uuid": uuid.to_string() })?;
    Ok(rows > 0)
}

/// Delete a Verzoek; its link rows go with it by cascade.
pub fn delete_verzoek(txn: &mut Transaction<'_>, uuid: Uuid) -> StateMutationResult<bool> {
    let rows = txn.execute(
        "DELETE FROM Verzoek WHERE uuid = :uuid",
        named_params! { ":uuid": uuid.to_string() },
    )?;
    Ok(rows > 0)
}
