//! Read queries over the verzoeken database.

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;
use verzoeken_sqlite::rusqlite::named_params;
use verzoeken_sqlite::rusqlite::OptionalExtension;
use verzoeken_sqlite::rusqlite::Row;
use verzoeken_sqlite::rusqlite::ToSql;
use verzoeken_sqlite::rusqlite::Transaction;
use verzoeken_types::prelude::*;

pub use error::*;

mod error;

/// Map a `SELECT * FROM Verzoek` row back to the domain type.
fn row_to_verzoek(row: &Row<'_>) -> StateQueryResult<Verzoek> {
    Ok(Verzoek {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        bronorganisatie: Rsin::new(row.get::<_, String>("bronorganisatie")?)?,
        identificatie: Identificatie::new(row.get::<_, String>("identificatie")?)?,
        externe_identificatie: Identificatie::new(
            row.get::<_, String>("externe_identificatie")?,
        )?,
        klant: row
            .get::<_, Option<String>>("klant")?
            .map(|s| ResourceUrl::parse(&s))
            .transpose()?,
        registratiedatum: parse_timestamp(row.get::<_, String>("registratiedatum")?)?,
        tekst: row.get("tekst")?,
        voorkeurskanaal: row.get("voorkeurskanaal")?,
        status: row.get::<_, String>("status")?.parse()?,
        in_te_trekken_verzoek: row
            .get::<_, Option<String>>("in_te_trekken_verzoek")?
            .map(parse_uuid)
            .transpose()?,
        aangevulde_verzoek: row
            .get::<_, Option<String>>("aangevulde_verzoek")?
            .map(parse_uuid)
            .transpose()?,
    })
}

fn parse_uuid(s: String) -> StateQueryResult<Uuid> {
    Ok(Uuid::parse_str(&s)?)
}

fn parse_timestamp(s: String) -> StateQueryResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(&s)?.with_timezone(&Utc))
}

/// The storage-level rowid for a Verzoek, if it exists.
pub fn verzoek_row_id(txn: &Transaction<'_>, uuid: Uuid) -> StateQueryResult<Option<i64>> {
    Ok(txn
        .query_row(
            "SELECT id FROM Verzoek WHERE uuid = :uuid",
            named_params! { ":uuid": uuid.to_string() },
            |row| row.get(0),
        )
        .optional()?)
}

pub fn get_verzoek(txn: &Transaction<'_>, uuid: Uuid) -> StateQueryResult<Option<Verzoek>> {
    txn.query_row(
        "SELECT * FROM Verzoek WHERE uuid = :uuid",
        named_params! { ":uuid": uuid.to_string() },
        |row| Ok(row_to_verzoek(row)),
    )
    .optional()?
    .transpose()
}

pub fn list_verzoeken(
    txn: &Transaction<'_>,
    filter: &VerzoekFilter,
) -> StateQueryResult<Vec<Verzoek>> {
    let mut sql = "SELECT * FROM Verzoek WHERE 1 = 1".to_string();
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(bronorganisatie) = &filter.bronorganisatie {
        sql.push_str(" AND bronorganisatie = :bronorganisatie");
        params.push((":bronorganisatie", bronorganisatie.as_str().to_string()));
    }
    if let Some(identificatie) = &filter.identificatie {
        sql.push_str(" AND identificatie = :identificatie");
        params.push((":identificatie", identificatie.as_str().to_string()));
    }
    if let Some(status) = &filter.status {
        sql.push_str(" AND status = :status");
        params.push((":status", status.as_str().to_string()));
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = txn.prepare_cached(&sql)?;
    let params: Vec<(&str, &dyn ToSql)> = params
        .iter()
        .map(|(name, value)| (*name, value as &dyn ToSql))
        .collect();
    let rows = stmt.query_map(params.as_slice(), |row| Ok(row_to_verzoek(row)))?;
    rows.map(|r| r?).collect()
}

/// The Verzoek that revokes the given one, if any (reverse edge of
/// `in_te_trekken_verzoek`).
pub fn intrekkende_verzoek(txn: &Transaction<'_>, uuid: Uuid) -> StateQueryResult<Option<Uuid>> {
    reverse_edge(txn, "in_te_trekken_verzoek", uuid)
}

/// The Verzoek that supplements the given one, if any (reverse edge of
/// `aangevulde_verzoek`).
pub fn aanvullende_verzoek(txn: &Transaction<'_>, uuid: Uuid) -> StateQueryResult<Option<Uuid>> {
    reverse_edge(txn, "aangevulde_verzoek", uuid)
}

fn reverse_edge(
    txn: &Transaction<'_>,
    column: &str,
    uuid: Uuid,
) -> StateQueryResult<Option<Uuid>> {
    let sql = format!("SELECT uuid FROM Verzoek WHERE {column} = :uuid");
    txn.query_row(
        &sql,
        named_params! { ":uuid": uuid.to_string() },
        |row| row.get::<_, String>(0),
    )
    .optional()?
    .map(parse_uuid)
    .transpose()
}

/// Is a non-blank business identifier already taken within the
/// organization? `exclude` skips the record being updated.
pub fn identification_taken(
    txn: &Transaction<'_>,
    bronorganisatie: &Rsin,
    identificatie: &Identificatie,
    exclude: Option<Uuid>,
) -> StateQueryResult<bool> {
    if identificatie.is_blank() {
        return Ok(false);
    }
    let count: i64 = txn.query_row(
        "SELECT COUNT(*) FROM Verzoek
         WHERE bronorganisatie = :bronorganisatie
           AND identificatie = :identificatie
           AND uuid != :exclude",
        named_params! {
            ":bronorganisatie": bronorganisatie.as_str(),
            ":identificatie": identificatie.as_str(),
            ":exclude": exclude.map(|u| u.to_string()).unwrap_or_default(),
        },
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Does a relation row with this composite key already exist?
pub fn relation_exists(
    txn: &Transaction<'_>,
    kind: RelationKind,
    verzoek: Uuid,
    target: &str,
) -> StateQueryResult<bool> {
    let (table, column) = match kind {
        RelationKind::InformatieObject => ("VerzoekInformatieObject", "informatieobject"),
        RelationKind::ContactMoment => ("VerzoekContactMoment", "contactmoment"),
        RelationKind::Object => ("ObjectVerzoek", "object"),
        RelationKind::Klant => ("KlantVerzoek", "klant"),
        // No composite key to conflict on.
        RelationKind::Product => return Ok(false),
    };
    let sql = format!(
        "SELECT COUNT(*) FROM {table} AS r
         JOIN Verzoek AS v ON v.id = r.verzoek_id
         WHERE v.uuid = :verzoek AND r.{column} = :target"
    );
    let count: i64 = txn.query_row(
        &sql,
        named_params! { ":verzoek": verzoek.to_string(), ":target": target },
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Is a relation row with this uuid present? Used to verify compensating
/// deletes.
pub fn relation_present(
    txn: &Transaction<'_>,
    kind: RelationKind,
    uuid: Uuid,
) -> StateQueryResult<bool> {
    let table = relation_table(kind);
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE uuid = :uuid");
    let count: i64 = txn.query_row(
        &sql,
        named_params! { ":uuid": uuid.to_string() },
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn relation_table(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::InformatieObject => "VerzoekInformatieObject",
        RelationKind::ContactMoment => "VerzoekContactMoment",
        RelationKind::Object => "ObjectVerzoek",
        RelationKind::Product => "VerzoekProduct",
        RelationKind::Klant => "KlantVerzoek",
    }
}

macro_rules! relations_of {
    ($fn_name:ident, $table:literal, $record:ident, |$row:ident, $verzoek:ident| $build:expr) => {
        pub fn $fn_name(
            txn: &Transaction<'_>,
            verzoek: Uuid,
        ) -> StateQueryResult<Vec<$record>> {
            let mut stmt = txn.prepare_cached(concat!(
                "SELECT r.*, v.uuid AS verzoek_uuid FROM ",
                $table,
                " AS r JOIN Verzoek AS v ON v.id = r.verzoek_id
                 WHERE v.uuid = :verzoek ORDER BY r.id"
            ))?;
            let rows = stmt.query_map(
                named_params! { ":verzoek": verzoek.to_string() },
                |$row| {
                    let build = |$verzoek: Uuid| -> StateQueryResult<$record> { $build };
                    Ok(parse_uuid($row.get::<_, String>("verzoek_uuid")?).and_then(build))
                },
            )?;
            rows.map(|r| r?).collect()
        }
    };
}

relations_of!(
    informatieobjecten_van,
    "VerzoekInformatieObject",
    VerzoekInformatieObject,
    |row, verzoek| Ok(VerzoekInformatieObject {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        verzoek,
        informatieobject: ResourceUrl::parse(&row.get::<_, String>("informatieobject")?)?,
    })
);

relations_of!(
    contactmomenten_van,
    "VerzoekContactMoment",
    VerzoekContactMoment,
    |row, verzoek| Ok(VerzoekContactMoment {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        verzoek,
        contactmoment: ResourceUrl::parse(&row.get::<_, String>("contactmoment")?)?,
    })
);

relations_of!(
    objecten_van,
    "ObjectVerzoek",
    ObjectVerzoek,
    |row, verzoek| Ok(ObjectVerzoek {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        verzoek,
        object: ResourceUrl::parse(&row.get::<_, String>("object")?)?,
        object_type: row.get::<_, String>("object_type")?.parse()?,
    })
);

relations_of!(
    producten_van,
    "VerzoekProduct",
    VerzoekProduct,
    |row, verzoek| Ok(VerzoekProduct {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        verzoek,
        product: row
            .get::<_, Option<String>>("product")?
            .map(|s| ResourceUrl::parse(&s))
            .transpose()?,
        product_code: row
            .get::<_, Option<String>>("product_code")?
            .map(ProductCode::new)
            .transpose()?,
    })
);

relations_of!(
    klanten_van,
    "KlantVerzoek",
    KlantVerzoek,
    |row, verzoek| Ok(KlantVerzoek {
        uuid: parse_uuid(row.get::<_, String>("uuid")?)?,
        verzoek,
        klant: ResourceUrl::parse(&row.get::<_, String>("klant")?)?,
        rol: row.get::<_, String>("rol")?.parse()?,
        indicatie_machtiging: row
            .get::<_, Option<String>>("indicatie_machtiging")?
            .map(|s| s.parse())
            .transpose()?,
    })
);
