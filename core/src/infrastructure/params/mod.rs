//! Default parameter accessor over a flat `path → raw value` map (the
//! decoded query string).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::domain::filtering::ports::{ParameterAccessor, RelationService};
use crate::domain::filtering::value_objects::{Param, ParamValue};

const NULL_SENTINEL: &str = "null";
const RANGE_DELIMITER: char = ';';

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M"];

/// Parameter accessor reading from a request-like string map, optionally
/// translating parameter names through a relation service.
pub struct RequestParams<'a> {
    source: &'a HashMap<String, String>,
    relations: Option<&'a dyn RelationService>,
}

impl<'a> RequestParams<'a> {
    pub fn new(source: &'a HashMap<String, String>) -> Self {
        Self {
            source,
            relations: None,
        }
    }

    /// Like [`RequestParams::new`], but parameter names are translated into
    /// backend column aliases before being used in conditions.
    pub fn with_relations(
        source: &'a HashMap<String, String>,
        relations: &'a dyn RelationService,
    ) -> Self {
        Self {
            source,
            relations: Some(relations),
        }
    }

    fn name_for(&self, path: &str) -> String {
        self.relations
            .and_then(|relations| relations.translate_params(path))
            .filter(|translated| !translated.is_empty())
            .unwrap_or_else(|| path.to_string())
    }

    fn raw(&self, path: &str) -> Option<&str> {
        self.source
            .get(path)
            .map(String::as_str)
            .filter(|raw| !raw.is_empty())
    }

    fn scalar<T>(&self, path: &str, parse: impl Fn(&str) -> Option<T>) -> Param<T> {
        let name = self.name_for(path);
        let value = match self.raw(path) {
            None => None,
            Some(NULL_SENTINEL) => Some(ParamValue::Null),
            Some(raw) => match parse(raw) {
                Some(value) => Some(ParamValue::Single(value)),
                None => {
                    debug!(path, raw, "parameter dropped: uncoercible value");
                    None
                }
            },
        };
        Param { name, value }
    }

    fn ranged<T>(&self, path: &str, parse: impl Fn(&str) -> Option<T>) -> Param<T> {
        let name = self.name_for(path);
        let value = match self.raw(path) {
            None => None,
            Some(NULL_SENTINEL) => Some(ParamValue::Null),
            Some(raw) => match raw.split_once(RANGE_DELIMITER) {
                Some((lower, upper)) => match (parse(lower), parse(upper)) {
                    (Some(lower), Some(upper)) => Some(ParamValue::Range(lower, upper)),
                    _ => {
                        debug!(path, raw, "parameter dropped: uncoercible range bound");
                        None
                    }
                },
                None => match parse(raw) {
                    Some(value) => Some(ParamValue::Single(value)),
                    None => {
                        debug!(path, raw, "parameter dropped: uncoercible value");
                        None
                    }
                },
            },
        };
        Param { name, value }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_boolean(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

impl ParameterAccessor for RequestParams<'_> {
    fn get_string(&self, path: &str) -> Param<String> {
        self.scalar(path, |raw| Some(raw.to_string()))
    }

    fn get_int(&self, path: &str) -> Param<i64> {
        self.ranged(path, |raw| raw.parse().ok())
    }

    fn get_float(&self, path: &str) -> Param<f64> {
        self.ranged(path, |raw| raw.parse().ok())
    }

    fn get_date(&self, path: &str) -> Param<NaiveDate> {
        self.ranged(path, parse_date)
    }

    fn get_datetime(&self, path: &str) -> Param<DateTime<Utc>> {
        self.ranged(path, parse_datetime)
    }

    fn get_boolean(&self, path: &str) -> Param<bool> {
        self.scalar(path, parse_boolean)
    }
}
