//! Core filter/sort mapping library for FilterKit.
//!
//! Translates untyped request parameters into backend-native filter and
//! sort expressions: BSON documents for a document store, and parameterized
//! conditions accumulated into a query builder for a relational store.

pub mod domain;
pub mod infrastructure;

pub use domain::common::SecurityConfig;
pub use domain::filtering::entities::{FieldKind, FieldMap, FieldSchema};
pub use domain::filtering::ports::{
    IdentifierCodec, ParameterAccessor, QueryAccumulator, RelationService, SearchPatterns,
    SqlParam,
};
pub use infrastructure::document::DocumentQueryMapper;
pub use infrastructure::params::RequestParams;
pub use infrastructure::relational::{ConditionList, RelationalQueryMapper, SeaQueryAccumulator};
pub use infrastructure::security::SignedIdCodec;
pub use infrastructure::text::AccentFolding;
