//! Domain types for the Verzoeken relation engine.
//!
//! A [`Verzoek`](verzoek::Verzoek) is the anchor entity; the five relation
//! records in [`relation`] tie a Verzoek to resources owned by other APIs
//! (documents, contact moments, objects, products, clients). Remote URLs are
//! weak references: they identify a resource but confer no ownership over
//! its lifecycle.

pub mod constants;
pub mod fields;
pub mod prelude;
pub mod relation;
pub mod verzoek;
