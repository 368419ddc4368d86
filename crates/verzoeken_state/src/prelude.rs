//! Common use for consumers of this crate.

pub use crate::guard::check_relation_shape;
pub use crate::guard::Guard;
pub use crate::guard::GuardError;
pub use crate::guard::IdentificationGuard;
pub use crate::guard::ImmutabilityGuard;
pub use crate::guard::UniquenessGuard;
pub use crate::mutations::delete_relation_physical;
pub use crate::mutations::delete_verzoek;
pub use crate::mutations::insert_relation;
pub use crate::mutations::insert_verzoek;
pub use crate::mutations::update_verzoek;
pub use crate::mutations::StateMutationError;
pub use crate::mutations::StateMutationResult;
pub use crate::query::aanvullende_verzoek;
pub use crate::query::contactmomenten_van;
pub use crate::query::get_verzoek;
pub use crate::query::identification_taken;
pub use crate::query::informatieobjecten_van;
pub use crate::query::intrekkende_verzoek;
pub use crate::query::klanten_van;
pub use crate::query::list_verzoeken;
pub use crate::query::objecten_van;
pub use crate::query::producten_van;
pub use crate::query::relation_exists;
pub use crate::query::relation_present;
pub use crate::query::verzoek_row_id;
pub use crate::query::StateQueryError;
pub use crate::query::StateQueryResult;
