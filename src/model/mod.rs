//! Resource data model
//!
//! The declarative layer shared by all three API integrations: typed
//! resources with permissive decoding, wire enums with graceful
//! fallback, filter compilation, and sort-key rendering.
//!
//! # Module Structure
//!
//! - [`resource`] - Envelope types and the [`ApiResource`] contract
//! - [`decode`] - Permissive decoding and wire-faithful timestamps
//! - [`enums`] - Explicit-table wire enums and [`Fallback`]
//! - [`filter`] - Typed filters compiled to `filter[...]` parameters
//! - [`ordering`] - Sort directives rendered as `field` / `-field`

pub mod decode;
pub mod enums;
pub mod filter;
pub mod ordering;
pub mod resource;

pub use decode::{permissive_from_value, DeclaredFields, WireDateTime};
pub use enums::{ApiEnum, EnumParseOptions, Fallback};
pub use filter::{ListFilter, QueryValue};
pub use ordering::{Ordering, SortField};
pub use resource::{
    display_form, envelope_payload, ApiResource, Dialect, Envelope, Linkage, LinkageData,
    NoRelationships, Relationship, RelationshipLinks, ResourceLinks,
};
