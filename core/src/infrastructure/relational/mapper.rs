//! Schema-driven mapping of request parameters into relational filter
//! conditions and sort specifications.

use sea_orm::{Order, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::common::SecurityConfig;
use crate::domain::filtering::entities::{FieldKind, FieldMap, FieldSchema};
use crate::domain::filtering::ports::{
    IdentifierCodec, ParameterAccessor, QueryAccumulator, RelationService,
};
use crate::domain::filtering::schema::accepted_field_paths;

use super::queries;

/// Maps request parameters into conditions on a query accumulator and
/// into backend-qualified sort specifications.
///
/// Shares the document mapper's best-effort policy: absent or invalid
/// parameters emit no condition and raise no error.
pub struct RelationalQueryMapper<I> {
    security: SecurityConfig,
    id_codec: I,
}

impl<I> RelationalQueryMapper<I>
where
    I: IdentifierCodec,
{
    pub fn new(security: SecurityConfig, id_codec: I) -> Self {
        Self { security, id_codec }
    }

    /// Appends one condition per schema-accepted parameter to `qb`.
    /// Empty `alias` or `schema` leaves the accumulator untouched.
    pub fn parse_filter(
        &self,
        alias: &str,
        params: &impl ParameterAccessor,
        schema: &FieldMap,
        qb: &mut dyn QueryAccumulator,
    ) {
        if alias.is_empty() || schema.is_empty() {
            return;
        }

        for (name, entry) in schema {
            match entry {
                FieldSchema::Nested(sub) => {
                    self.parse_filter(&format!("{alias}.{name}"), params, sub, qb);
                }
                // complements address document sub-objects; relational
                // columns filter on the base name
                FieldSchema::Scalar(kind) | FieldSchema::Complemented(kind, _) => {
                    self.dispatch(qb, alias, params, name, *kind);
                }
            }
        }
    }

    fn dispatch(
        &self,
        qb: &mut dyn QueryAccumulator,
        alias: &str,
        params: &impl ParameterAccessor,
        name: &str,
        kind: FieldKind,
    ) {
        let path = format!("{alias}.{name}");

        match kind {
            FieldKind::Id => {
                let param = params.get_string(&path);
                if param.is_absent() {
                    debug!(%path, "parameter absent, no condition emitted");
                }
                queries::in_or_eq(
                    &param,
                    qb,
                    |value| self.id_codec.is_id(&self.security, value),
                    |value| Value::BigInt(self.id_codec.decode_id(&self.security, value)),
                );
            }
            FieldKind::ObjectId => {
                let mut param = params.get_string(&path);
                if param.is_absent() {
                    let fallback = format!("{}.{}", alias, name.replace('_', ""));
                    param = params.get_string(&fallback);
                }
                queries::in_or_eq(
                    &param,
                    qb,
                    |value| Uuid::parse_str(value).is_ok(),
                    |value| match Uuid::parse_str(value) {
                        Ok(reference) => Value::from(reference),
                        Err(_) => Value::Uuid(None),
                    },
                );
            }
            FieldKind::Permalink => {
                let param = params.get_string(&path);
                queries::in_or_eq(&param, qb, |_| true, |value| Value::from(value));
            }
            FieldKind::Text => {
                let param = params.get_string(&path);
                queries::like(&param, qb, str::to_string);
            }
            FieldKind::Integer => {
                let param = params.get_int(&path);
                queries::between_or_eq(&param, qb, |value| Value::from(*value));
            }
            FieldKind::Float => {
                let param = params.get_float(&path);
                queries::between_or_eq(&param, qb, |value| Value::from(*value));
            }
            FieldKind::Date => {
                let param = params.get_date(&path);
                queries::between_or_eq(&param, qb, |value| Value::from(*value));
            }
            FieldKind::DateTime => {
                let param = params.get_datetime(&path);
                queries::between_or_eq(&param, qb, |value| Value::from(*value));
            }
            FieldKind::Boolean => {
                let param = params.get_boolean(&path);
                queries::true_or_null(&param, qb);
            }
        }
    }

    /// Parses a comma-delimited `field[:direction]` sort specification.
    ///
    /// Schema acceptance is checked on the alias-relative path while the
    /// recorded key is the translated, backend-qualified alias; items the
    /// translator rejects are dropped entirely.
    pub fn parse_sorting(
        &self,
        alias: &str,
        schema: &FieldMap,
        sort_param: &str,
        relations: Option<&dyn RelationService>,
    ) -> Vec<(String, Order)> {
        let mut sort = Vec::new();
        if sort_param.is_empty() {
            return sort;
        }

        let accepted = accepted_field_paths(schema, None);
        let prefix = format!("{alias}.");

        for item in sort_param.split(',') {
            let (raw_key, direction) = match item.split_once(':') {
                Some((key, direction)) => (key, Some(direction)),
                None => (item, None),
            };

            let translated = match relations {
                Some(service) => match service.translate_params(raw_key) {
                    Some(translated) if !translated.is_empty() => translated,
                    _ => continue,
                },
                None => raw_key.to_string(),
            };

            let key = raw_key.strip_prefix(&prefix).unwrap_or(raw_key);
            if !accepted.iter().any(|path| path == key) {
                continue;
            }

            let order = match direction {
                Some(direction) if direction.eq_ignore_ascii_case("desc") => Order::Desc,
                _ => Order::Asc,
            };
            sort.push((translated, order));
        }

        sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filtering::ports::{MockRelationService, SqlParam};
    use crate::infrastructure::params::RequestParams;
    use crate::infrastructure::relational::accumulator::ConditionList;
    use crate::infrastructure::security::SignedIdCodec;
    use std::collections::HashMap;

    fn schema() -> FieldMap {
        serde_json::from_value(serde_json::json!({
            "uuid": "objectid",
            "code": "id",
            "permalink": "permalink",
            "name": "string",
            "qtty": "integer",
            "active": "boolean",
            "tests": {
                "permalink": "permalink"
            }
        }))
        .unwrap()
    }

    fn security() -> SecurityConfig {
        SecurityConfig::new("123456", 5)
    }

    fn mapper() -> RelationalQueryMapper<SignedIdCodec> {
        RelationalQueryMapper::new(security(), SignedIdCodec)
    }

    fn source(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_filter_requires_alias_and_schema() {
        let source = source(&[("test.qtty", "7")]);
        let params = RequestParams::new(&source);

        let mut qb = ConditionList::new();
        mapper().parse_filter("", &params, &schema(), &mut qb);
        mapper().parse_filter("test", &params, &FieldMap::new(), &mut qb);

        assert!(qb.is_empty());
    }

    #[test]
    fn test_parse_filter_appends_conditions_in_schema_order() {
        let source = source(&[
            ("test.qtty", "1;3"),
            ("test.active", "false"),
            ("test.tests.permalink", "0002"),
        ]);
        let params = RequestParams::new(&source);

        let mut qb = ConditionList::new();
        mapper().parse_filter("test", &params, &schema(), &mut qb);

        assert_eq!(
            qb.conditions(),
            [
                "test.qtty BETWEEN :test_qtty0 AND :test_qtty1",
                "(test.active = :test_active OR test.active IS NULL)",
                "test.tests.permalink = :test_tests_permalink",
            ]
        );
    }

    #[test]
    fn test_parse_filter_decodes_ids() {
        let codec = SignedIdCodec;
        let encoded = codec.encode_id(&security(), 42);
        let source_map = source(&[("test.code", &encoded)]);
        let params = RequestParams::new(&source_map);

        let mut qb = ConditionList::new();
        mapper().parse_filter("test", &params, &schema(), &mut qb);

        assert_eq!(qb.conditions(), ["test.code = :test_code"]);
        assert_eq!(
            qb.params(),
            [(
                "test_code".to_string(),
                SqlParam::Value(Value::BigInt(Some(42)))
            )]
        );
    }

    #[test]
    fn test_parse_filter_validates_opaque_references() {
        let valid = Uuid::new_v4().to_string();
        let source_map = source(&[("test.uuid", &format!("{valid},not-a-uuid"))]);
        let params = RequestParams::new(&source_map);

        let mut qb = ConditionList::new();
        mapper().parse_filter("test", &params, &schema(), &mut qb);

        assert_eq!(qb.conditions(), ["test.uuid IN (:test_uuid)"]);
        match &qb.params()[0].1 {
            SqlParam::List(members) => assert_eq!(members.len(), 1),
            other => panic!("expected list binding, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_filter_like_for_text_fields() {
        let source = source(&[("test.name", "abc")]);
        let params = RequestParams::new(&source);

        let mut qb = ConditionList::new();
        mapper().parse_filter("test", &params, &schema(), &mut qb);

        assert_eq!(
            qb.conditions(),
            ["test.name LIKE :test_name COLLATE utf8_general_ci"]
        );
    }

    #[test]
    fn test_parse_sorting_without_translator_uses_raw_paths() {
        let sort = mapper().parse_sorting("test", &schema(), "test.qtty:desc,test.name", None);

        assert_eq!(
            sort,
            vec![
                ("test.qtty".to_string(), Order::Desc),
                ("test.name".to_string(), Order::Asc)
            ]
        );
    }

    #[test]
    fn test_parse_sorting_translator_supplies_backend_aliases() {
        let mut relations = MockRelationService::new();
        relations
            .expect_translate_params()
            .returning(|path| match path {
                "test.qtty" => Some("entity.qtty".to_string()),
                _ => None,
            });

        let sort = mapper().parse_sorting(
            "test",
            &schema(),
            "test.qtty:DESC,test.name",
            Some(&relations),
        );

        // `test.name` is schema-accepted but the translator rejected it
        assert_eq!(sort, vec![("entity.qtty".to_string(), Order::Desc)]);
    }

    #[test]
    fn test_parse_sorting_skips_fields_outside_schema() {
        let sort = mapper().parse_sorting("test", &schema(), "test.unknown:desc", None);

        assert!(sort.is_empty());
    }

    #[test]
    fn test_parse_filter_is_idempotent() {
        let source = source(&[("test.qtty", "7")]);
        let params = RequestParams::new(&source);
        let mapper = mapper();

        let mut first = ConditionList::new();
        let mut second = ConditionList::new();
        mapper.parse_filter("test", &params, &schema(), &mut first);
        mapper.parse_filter("test", &params, &schema(), &mut second);

        assert_eq!(first.conditions(), second.conditions());
        assert_eq!(first.params(), second.params());
    }
}
