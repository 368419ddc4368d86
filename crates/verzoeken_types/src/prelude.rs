//! Common use for consumers of this crate.

pub use crate::constants::IndicatieMachtiging;
pub use crate::constants::KlantRol;
pub use crate::constants::ObjectType;
pub use crate::constants::UnknownValue;
pub use crate::constants::VerzoekStatus;
pub use crate::fields::FieldError;
pub use crate::fields::FieldResult;
pub use crate::fields::Identificatie;
pub use crate::fields::ProductCode;
pub use crate::fields::ResourceUrl;
pub use crate::fields::Rsin;
pub use crate::relation::KlantVerzoek;
pub use crate::relation::NewKlantVerzoek;
pub use crate::relation::NewObjectVerzoek;
pub use crate::relation::NewVerzoekContactMoment;
pub use crate::relation::NewVerzoekInformatieObject;
pub use crate::relation::NewVerzoekProduct;
pub use crate::relation::ObjectVerzoek;
pub use crate::relation::Relation;
pub use crate::relation::RelationCandidate;
pub use crate::relation::RelationKind;
pub use crate::relation::ResourceKind;
pub use crate::relation::VerzoekContactMoment;
pub use crate::relation::VerzoekInformatieObject;
pub use crate::relation::VerzoekProduct;
pub use crate::verzoek::NewVerzoek;
pub use crate::verzoek::Verzoek;
pub use crate::verzoek::VerzoekFilter;
pub use crate::verzoek::VerzoekUpdate;
