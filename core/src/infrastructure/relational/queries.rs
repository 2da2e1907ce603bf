//! Condition builders appending parameterized SQL conditions to a query
//! accumulator.

use sea_orm::Value;

use crate::domain::filtering::ports::{QueryAccumulator, SqlParam};
use crate::domain::filtering::value_objects::{Param, ParamValue};

const LIST_DELIMITER: char = ',';

/// Placeholder names must stay syntactically valid and unique per column
/// reference, so path separators are flattened.
fn placeholder(name: &str) -> String {
    name.replace('.', "_")
}

/// Membership (`IN`) for comma-delimited lists, equality otherwise.
pub fn in_or_eq(
    param: &Param<String>,
    qb: &mut dyn QueryAccumulator,
    filter: impl Fn(&str) -> bool,
    parse: impl Fn(&str) -> Value,
) {
    let pname = placeholder(&param.name);
    match &param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Null) => {
            qb.and_where(&format!("{} IS NULL", param.name), Vec::new());
        }
        Some(ParamValue::Single(value)) if value.contains(LIST_DELIMITER) => {
            let members: Vec<Value> = value
                .split(LIST_DELIMITER)
                .filter(|member| filter(member))
                .map(|member| parse(member))
                .collect();
            qb.and_where(
                &format!("{} IN (:{})", param.name, pname),
                vec![(pname.clone(), SqlParam::List(members))],
            );
        }
        Some(ParamValue::Single(value)) => {
            if filter(value) {
                qb.and_where(
                    &format!("{} = :{}", param.name, pname),
                    vec![(pname.clone(), SqlParam::Value(parse(value)))],
                );
            }
        }
    }
}

/// Case-insensitive containment match on text columns.
pub fn like(param: &Param<String>, qb: &mut dyn QueryAccumulator, parse: impl Fn(&str) -> String) {
    let pname = placeholder(&param.name);
    match &param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Null) => {
            qb.and_where(&format!("{} IS NULL", param.name), Vec::new());
        }
        Some(ParamValue::Single(value)) => {
            qb.and_where(
                &format!("{} LIKE :{} COLLATE utf8_general_ci", param.name, pname),
                vec![(
                    pname.clone(),
                    SqlParam::Value(Value::from(format!("%{}%", parse(value)))),
                )],
            );
        }
    }
}

/// Closed `BETWEEN` for pairs, equality for scalars. Range bounds bind
/// placeholders suffixed `0`/`1`.
pub fn between_or_eq<T>(
    param: &Param<T>,
    qb: &mut dyn QueryAccumulator,
    parse: impl Fn(&T) -> Value,
) {
    let pname = placeholder(&param.name);
    match &param.value {
        None => {}
        Some(ParamValue::Null) => {
            qb.and_where(&format!("{} IS NULL", param.name), Vec::new());
        }
        Some(ParamValue::Range(lower, upper)) => {
            qb.and_where(
                &format!("{} BETWEEN :{}0 AND :{}1", param.name, pname, pname),
                vec![
                    (format!("{pname}0"), SqlParam::Value(parse(lower))),
                    (format!("{pname}1"), SqlParam::Value(parse(upper))),
                ],
            );
        }
        Some(ParamValue::Single(value)) => {
            qb.and_where(
                &format!("{} = :{}", param.name, pname),
                vec![(pname.clone(), SqlParam::Value(parse(value)))],
            );
        }
    }
}

/// Tri-state boolean: `false` also matches NULL columns, since an unset
/// flag implies negation.
pub fn true_or_null(param: &Param<bool>, qb: &mut dyn QueryAccumulator) {
    let pname = placeholder(&param.name);
    match param.value {
        None | Some(ParamValue::Range(..)) => {}
        Some(ParamValue::Single(true)) => {
            qb.and_where(
                &format!("{} = :{}", param.name, pname),
                vec![(pname.clone(), SqlParam::Value(Value::from(true)))],
            );
        }
        Some(ParamValue::Null) => {
            qb.and_where(&format!("{} IS NULL", param.name), Vec::new());
        }
        Some(ParamValue::Single(false)) => {
            qb.and_where(
                &format!("({} = :{} OR {} IS NULL)", param.name, pname, param.name),
                vec![(pname.clone(), SqlParam::Value(Value::from(false)))],
            );
        }
    }
}
