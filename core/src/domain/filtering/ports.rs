use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::Value;

use crate::domain::common::SecurityConfig;
use crate::domain::filtering::value_objects::Param;

/// Typed access to one raw parameter source.
///
/// Getters never fail: an absent or uncoercible parameter comes back with
/// no value and the mapping continues without it.
#[cfg_attr(test, mockall::automock)]
pub trait ParameterAccessor: Send + Sync {
    fn get_string(&self, path: &str) -> Param<String>;
    fn get_int(&self, path: &str) -> Param<i64>;
    fn get_float(&self, path: &str) -> Param<f64>;
    fn get_date(&self, path: &str) -> Param<NaiveDate>;
    fn get_datetime(&self, path: &str) -> Param<DateTime<Utc>>;
    fn get_boolean(&self, path: &str) -> Param<bool>;
}

/// Opaque encoding of numeric identifiers exposed to clients.
#[cfg_attr(test, mockall::automock)]
pub trait IdentifierCodec: Send + Sync {
    fn is_id(&self, config: &SecurityConfig, raw: &str) -> bool;
    fn decode_id(&self, config: &SecurityConfig, raw: &str) -> Option<i64>;
    fn encode_id(&self, config: &SecurityConfig, id: i64) -> String;
}

/// Locale-tolerant search pattern construction for free-text filters.
#[cfg_attr(test, mockall::automock)]
pub trait SearchPatterns: Send + Sync {
    fn create_find_regex(&self, term: &str) -> String;
}

/// Translates a logical field path into a backend column alias.
///
/// Returning `None` (or an empty alias) rejects the path.
#[cfg_attr(test, mockall::automock)]
pub trait RelationService: Send + Sync {
    fn translate_params(&self, path: &str) -> Option<String>;
}

/// One bound value in a relational condition.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Value(Value),
    List(Vec<Value>),
}

/// Conjunctive accumulation of parameterized SQL conditions.
///
/// `condition` uses named `:placeholder` markers; `params` carries the
/// matching bind values. Implementations expose the accumulated SQL and
/// parameters to the embedding system.
pub trait QueryAccumulator {
    fn and_where(&mut self, condition: &str, params: Vec<(String, SqlParam)>);
}
