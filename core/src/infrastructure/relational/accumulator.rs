//! Query accumulator implementations: a plain readable condition list and
//! a sea-query adapter.

use sea_orm::Value;
use sea_orm::sea_query::{ConditionalStatement, Expr, SelectStatement};

use crate::domain::filtering::ports::{QueryAccumulator, SqlParam};

/// Plain accumulation of condition expressions and named bind values,
/// readable back by the embedding system and by tests.
#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    conditions: Vec<String>,
    params: Vec<(String, SqlParam)>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn params(&self) -> &[(String, SqlParam)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders the accumulated conjunction, e.g. for a `WHERE` clause.
    pub fn to_sql(&self) -> String {
        self.conditions.join(" AND ")
    }
}

impl QueryAccumulator for ConditionList {
    fn and_where(&mut self, condition: &str, params: Vec<(String, SqlParam)>) {
        self.conditions.push(condition.to_string());
        self.params.extend(params);
    }
}

/// Appends conditions to a sea-query select, substituting `:name`
/// placeholders with bound values.
pub struct SeaQueryAccumulator<'a> {
    select: &'a mut SelectStatement,
}

impl<'a> SeaQueryAccumulator<'a> {
    pub fn new(select: &'a mut SelectStatement) -> Self {
        Self { select }
    }
}

impl QueryAccumulator for SeaQueryAccumulator<'_> {
    fn and_where(&mut self, condition: &str, params: Vec<(String, SqlParam)>) {
        let (expr, values) = bind_named(condition, &params);
        if values.is_empty() {
            self.select.and_where(Expr::cust(expr.as_str()));
        } else {
            self.select
                .and_where(Expr::cust_with_values(expr.as_str(), values));
        }
    }
}

/// Rewrites `:name` placeholders into positional markers in order of
/// appearance, expanding list parameters into one marker per member.
fn bind_named(condition: &str, params: &[(String, SqlParam)]) -> (String, Vec<Value>) {
    let mut expr = String::with_capacity(condition.len());
    let mut values = Vec::new();
    let mut rest = condition;

    while let Some(start) = rest.find(':') {
        let (head, tail) = rest.split_at(start);
        expr.push_str(head);

        let name_end = tail[1..]
            .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
            .map_or(tail.len(), |offset| offset + 1);
        let name = &tail[1..name_end];

        match params.iter().find(|(pname, _)| pname == name) {
            Some((_, SqlParam::Value(value))) => {
                expr.push('?');
                values.push(value.clone());
            }
            Some((_, SqlParam::List(members))) => {
                let markers: Vec<&str> = members.iter().map(|_| "?").collect();
                expr.push_str(&markers.join(", "));
                values.extend(members.iter().cloned());
            }
            // not a placeholder we know; keep the text as written
            None => expr.push_str(&tail[..name_end]),
        }

        rest = &tail[name_end..];
    }

    expr.push_str(rest);
    (expr, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::*;

    #[test]
    fn test_condition_list_accumulates_conjunctively() {
        let mut qb = ConditionList::new();
        qb.and_where(
            "test.qtty = :test_qtty",
            vec![("test_qtty".into(), SqlParam::Value(Value::from(7_i64)))],
        );
        qb.and_where("test.init IS NULL", Vec::new());

        assert_eq!(qb.to_sql(), "test.qtty = :test_qtty AND test.init IS NULL");
        assert_eq!(qb.params().len(), 1);
    }

    #[test]
    fn test_bind_named_substitutes_in_order() {
        let (expr, values) = bind_named(
            "test.qtty BETWEEN :test_qtty0 AND :test_qtty1",
            &[
                ("test_qtty0".to_string(), SqlParam::Value(Value::from(1_i64))),
                ("test_qtty1".to_string(), SqlParam::Value(Value::from(3_i64))),
            ],
        );

        assert_eq!(expr, "test.qtty BETWEEN ? AND ?");
        assert_eq!(values, vec![Value::from(1_i64), Value::from(3_i64)]);
    }

    #[test]
    fn test_bind_named_expands_lists() {
        let (expr, values) = bind_named(
            "test.permalink IN (:test_permalink)",
            &[(
                "test_permalink".to_string(),
                SqlParam::List(vec![Value::from("a"), Value::from("b")]),
            )],
        );

        assert_eq!(expr, "test.permalink IN (?, ?)");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_bind_named_leaves_unknown_markers_untouched() {
        let (expr, values) = bind_named("created_at < NOW():::timestamp", &[]);

        assert_eq!(expr, "created_at < NOW():::timestamp");
        assert!(values.is_empty());
    }

    #[test]
    fn test_sea_query_accumulator_renders_bound_conditions() {
        let mut select = Query::select();
        select.column(Asterisk).from(Alias::new("test"));

        let mut qb = SeaQueryAccumulator::new(&mut select);
        qb.and_where(
            "test.qtty = :test_qtty",
            vec![("test_qtty".into(), SqlParam::Value(Value::from(7_i64)))],
        );
        qb.and_where("test.init IS NULL", Vec::new());

        let sql = select.to_string(MysqlQueryBuilder);

        assert!(sql.contains("test.qtty = 7"), "unexpected sql: {sql}");
        assert!(sql.contains("test.init IS NULL"), "unexpected sql: {sql}");
    }

    #[test]
    fn test_sea_query_accumulator_expands_membership_lists() {
        let mut select = Query::select();
        select.column(Asterisk).from(Alias::new("test"));

        let mut qb = SeaQueryAccumulator::new(&mut select);
        qb.and_where(
            "test.permalink IN (:test_permalink)",
            vec![(
                "test_permalink".into(),
                SqlParam::List(vec![Value::from("a"), Value::from("b")]),
            )],
        );

        let sql = select.to_string(MysqlQueryBuilder);

        assert!(sql.contains("IN ('a', 'b')"), "unexpected sql: {sql}");
    }
}
