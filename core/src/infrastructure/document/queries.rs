//! Condition builders merging parameter values into a BSON filter
//! document.

use bson::{Bson, Document, doc};

use crate::domain::filtering::entities::FieldRef;
use crate::domain::filtering::value_objects::{Param, ParamValue};

const LIST_DELIMITER: char = ',';

/// Membership (`$in`) for comma-delimited lists, equality otherwise.
///
/// List members failing `filter` are dropped before `parse`; a singular
/// value failing `filter` emits no condition.
pub fn in_or_eq(
    param: &Param<String>,
    query: &mut Document,
    field: &FieldRef<'_>,
    filter: impl Fn(&str) -> bool,
    parse: impl Fn(&str) -> Bson,
) {
    let key = field.key();
    match &param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Null) => {
            query.insert(key, Bson::Null);
        }
        Some(ParamValue::Single(value)) if value.contains(LIST_DELIMITER) => {
            let members: Vec<Bson> = value
                .split(LIST_DELIMITER)
                .filter(|member| filter(member))
                .map(|member| parse(member))
                .collect();
            query.insert(key, doc! { "$in": members });
        }
        Some(ParamValue::Single(value)) => {
            if filter(value) {
                query.insert(key, parse(value));
            }
        }
    }
}

/// Equality for present values, null-equality for the null sentinel.
pub fn eq_or_null(
    param: &Param<String>,
    query: &mut Document,
    field: &FieldRef<'_>,
    parse: impl Fn(&str) -> Bson,
) {
    let key = field.key();
    match &param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Null) => {
            query.insert(key, Bson::Null);
        }
        Some(ParamValue::Single(value)) => {
            query.insert(key, parse(value));
        }
    }
}

/// Closed `$gte`/`$lte` range for pairs, equality for scalars.
pub fn between_or_eq<T>(
    param: &Param<T>,
    query: &mut Document,
    field: &FieldRef<'_>,
    parse: impl Fn(&T) -> Bson,
) {
    let key = field.key();
    match &param.value {
        None => {}
        Some(ParamValue::Null) => {
            query.insert(key, Bson::Null);
        }
        Some(ParamValue::Range(lower, upper)) => {
            query.insert(key, doc! { "$gte": parse(lower), "$lte": parse(upper) });
        }
        Some(ParamValue::Single(value)) => {
            query.insert(key, parse(value));
        }
    }
}

/// Tri-state boolean: `true` matches explicitly-true fields, the null
/// sentinel matches unset fields, and `false` matches fields that are
/// false or unset (absence of a flag implies negation).
pub fn true_or_null(param: &Param<bool>, query: &mut Document, field: &FieldRef<'_>) {
    let key = field.key();
    match param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Single(true)) => {
            query.insert(key, true);
        }
        Some(ParamValue::Null) => {
            query.insert(key, Bson::Null);
        }
        Some(ParamValue::Single(false)) => {
            let eq_false = doc! { key.clone(): false };
            let is_null = doc! { key: Bson::Null };
            query.insert("$or", vec![eq_false, is_null]);
        }
    }
}
