//! Link records: persisted relations from a Verzoek to resources hosted by
//! other APIs.
//!
//! Every field of a link record is immutable after creation. Records are
//! deleted either by cascade (the owning Verzoek is removed) or by the
//! compensating delete inside the relation lifecycle workflow.

use crate::constants::IndicatieMachtiging;
use crate::constants::KlantRol;
use crate::constants::ObjectType;
use crate::fields::ProductCode;
use crate::fields::ResourceUrl;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The kind of remote resource a reference points at, used to pick the
/// schema the remote representation is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    EnkelvoudigInformatieObject,
    ContactMoment,
    Zaak,
    Product,
    Klant,
}

impl ResourceKind {
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::EnkelvoudigInformatieObject => "EnkelvoudigInformatieObject",
            Self::ContactMoment => "ContactMoment",
            Self::Zaak => "Zaak",
            Self::Product => "Product",
            Self::Klant => "Klant",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_name())
    }
}

/// Discriminant for the five relation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    InformatieObject,
    ContactMoment,
    Object,
    Product,
    Klant,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InformatieObject => "verzoekinformatieobject",
            Self::ContactMoment => "verzoekcontactmoment",
            Self::Object => "objectverzoek",
            Self::Product => "verzoekproduct",
            Self::Klant => "klantverzoek",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerzoekInformatieObject {
    pub uuid: Uuid,
    pub verzoek: Uuid,
    pub informatieobject: ResourceUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerzoekContactMoment {
    pub uuid: Uuid,
    pub verzoek: Uuid,
    pub contactmoment: ResourceUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVerzoek {
    pub uuid: Uuid,
    pub verzoek: Uuid,
    pub object: ResourceUrl,
    pub object_type: ObjectType,
}

/// Relation to a PRODUCT, either by URL into the product API or by bare
/// product code. At least one of the two reference forms must be present;
/// both at once is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerzoekProduct {
    pub uuid: Uuid,
    pub verzoek: Uuid,
    pub product: Option<ResourceUrl>,
    pub product_code: Option<ProductCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlantVerzoek {
    pub uuid: Uuid,
    pub verzoek: Uuid,
    pub klant: ResourceUrl,
    pub rol: KlantRol,
    pub indicatie_machtiging: Option<IndicatieMachtiging>,
}

macro_rules! new_relation {
    ($(#[$doc:meta])* $name:ident from $record:ident { $($field:ident : $ty:ty,)+ }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub verzoek: Uuid,
            $(pub $field: $ty,)+
        }

        impl $name {
            /// Materialize the record under a freshly assigned uuid.
            pub fn into_record(self, uuid: Uuid) -> $record {
                $record {
                    uuid,
                    verzoek: self.verzoek,
                    $($field: self.$field,)+
                }
            }
        }
    };
}

new_relation!(
    NewVerzoekInformatieObject from VerzoekInformatieObject {
        informatieobject: ResourceUrl,
    }
);

new_relation!(
    NewVerzoekContactMoment from VerzoekContactMoment {
        contactmoment: ResourceUrl,
    }
);

new_relation!(
    NewObjectVerzoek from ObjectVerzoek {
        object: ResourceUrl,
        object_type: ObjectType,
    }
);

new_relation!(
    NewVerzoekProduct from VerzoekProduct {
        product: Option<ResourceUrl>,
        product_code: Option<ProductCode>,
    }
);

new_relation!(
    NewKlantVerzoek from KlantVerzoek {
        klant: ResourceUrl,
        rol: KlantRol,
        indicatie_machtiging: Option<IndicatieMachtiging>,
    }
);

/// A not-yet-persisted relation, as accepted by the lifecycle workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationCandidate {
    InformatieObject(NewVerzoekInformatieObject),
    ContactMoment(NewVerzoekContactMoment),
    Object(NewObjectVerzoek),
    Product(NewVerzoekProduct),
    Klant(NewKlantVerzoek),
}

impl RelationCandidate {
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::InformatieObject(_) => RelationKind::InformatieObject,
            Self::ContactMoment(_) => RelationKind::ContactMoment,
            Self::Object(_) => RelationKind::Object,
            Self::Product(_) => RelationKind::Product,
            Self::Klant(_) => RelationKind::Klant,
        }
    }

    pub fn verzoek(&self) -> Uuid {
        match self {
            Self::InformatieObject(c) => c.verzoek,
            Self::ContactMoment(c) => c.verzoek,
            Self::Object(c) => c.verzoek,
            Self::Product(c) => c.verzoek,
            Self::Klant(c) => c.verzoek,
        }
    }

    /// Materialize the record under a freshly assigned uuid.
    pub fn into_record(self, uuid: Uuid) -> Relation {
        match self {
            Self::InformatieObject(c) => Relation::InformatieObject(c.into_record(uuid)),
            Self::ContactMoment(c) => Relation::ContactMoment(c.into_record(uuid)),
            Self::Object(c) => Relation::Object(c.into_record(uuid)),
            Self::Product(c) => Relation::Product(c.into_record(uuid)),
            Self::Klant(c) => Relation::Klant(c.into_record(uuid)),
        }
    }

    /// The remote-pointing fields of this candidate, paired with the field
    /// name they surface under in error reports.
    pub fn remote_refs(&self) -> Vec<(&'static str, &ResourceUrl, ResourceKind)> {
        match self {
            Self::InformatieObject(c) => vec![(
                "informatieobject",
                &c.informatieobject,
                ResourceKind::EnkelvoudigInformatieObject,
            )],
            Self::ContactMoment(c) => {
                vec![("contactmoment", &c.contactmoment, ResourceKind::ContactMoment)]
            }
            Self::Object(c) => vec![("object", &c.object, ResourceKind::Zaak)],
            Self::Product(c) => c
                .product
                .iter()
                .map(|url| ("product", url, ResourceKind::Product))
                .collect(),
            Self::Klant(c) => vec![("klant", &c.klant, ResourceKind::Klant)],
        }
    }
}

/// A persisted relation, as returned by the lifecycle workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    InformatieObject(VerzoekInformatieObject),
    ContactMoment(VerzoekContactMoment),
    Object(ObjectVerzoek),
    Product(VerzoekProduct),
    Klant(KlantVerzoek),
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::InformatieObject(_) => RelationKind::InformatieObject,
            Self::ContactMoment(_) => RelationKind::ContactMoment,
            Self::Object(_) => RelationKind::Object,
            Self::Product(_) => RelationKind::Product,
            Self::Klant(_) => RelationKind::Klant,
        }
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            Self::InformatieObject(r) => r.uuid,
            Self::ContactMoment(r) => r.uuid,
            Self::Object(r) => r.uuid,
            Self::Product(r) => r.uuid,
            Self::Klant(r) => r.uuid,
        }
    }

    pub fn verzoek(&self) -> Uuid {
        match self {
            Self::InformatieObject(r) => r.verzoek,
            Self::ContactMoment(r) => r.verzoek,
            Self::Object(r) => r.verzoek,
            Self::Product(r) => r.verzoek,
            Self::Klant(r) => r.verzoek,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> ResourceUrl {
        ResourceUrl::parse(s).unwrap()
    }

    #[test]
    fn product_candidate_without_url_has_no_remote_refs() {
        let candidate = RelationCandidate::Product(NewVerzoekProduct {
            verzoek: Uuid::new_v4(),
            product: None,
            product_code: Some("PASPOORT".parse().unwrap()),
        });
        assert!(candidate.remote_refs().is_empty());
    }

    #[test]
    fn informatieobject_candidate_exposes_document_ref() {
        let candidate = RelationCandidate::InformatieObject(NewVerzoekInformatieObject {
            verzoek: Uuid::new_v4(),
            informatieobject: url("https://drc.example.com/api/v1/eio/1"),
        });
        let refs = candidate.remote_refs();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, "informatieobject");
        assert_eq!(refs[0].2, ResourceKind::EnkelvoudigInformatieObject);
    }
}
