//! Schema-driven mapping of request parameters into document-store
//! filter and sort documents.

use bson::oid::ObjectId;
use bson::{Bson, Document};

use crate::domain::common::SecurityConfig;
use crate::domain::filtering::entities::{FieldKind, FieldMap, FieldRef, FieldSchema};
use crate::domain::filtering::ports::{IdentifierCodec, ParameterAccessor, SearchPatterns};
use crate::domain::filtering::schema::{accepted_field_paths, leaf_at};

use super::queries;

/// Maps request parameters into document-store filters and sorts.
///
/// Mapping is best-effort by design: absent parameters and values failing
/// type validation emit no condition, so callers needing strictness must
/// inspect the returned filter for the conditions they expect.
pub struct DocumentQueryMapper<I, S> {
    security: SecurityConfig,
    id_codec: I,
    patterns: S,
}

impl<I, S> DocumentQueryMapper<I, S>
where
    I: IdentifierCodec,
    S: SearchPatterns,
{
    pub fn new(security: SecurityConfig, id_codec: I, patterns: S) -> Self {
        Self {
            security,
            id_codec,
            patterns,
        }
    }

    /// Builds a filter document from the parameters the schema accepts
    /// under `alias`. Returns `None` when `alias` or `schema` is empty.
    pub fn parse_filter(
        &self,
        alias: &str,
        params: &impl ParameterAccessor,
        schema: &FieldMap,
    ) -> Option<Document> {
        if alias.is_empty() || schema.is_empty() {
            return None;
        }

        let mut query = Document::new();

        for (name, entry) in schema {
            match entry {
                FieldSchema::Nested(sub) => {
                    let sub_alias = format!("{alias}.{name}");
                    if let Some(subquery) = self.parse_filter(&sub_alias, params, sub) {
                        for (key, condition) in subquery {
                            query.insert(format!("{name}.{key}"), condition);
                        }
                    }
                }
                FieldSchema::Scalar(kind) => {
                    let field = FieldRef {
                        name,
                        kind: *kind,
                        compl_name: None,
                    };
                    self.dispatch(&mut query, alias, params, &field);
                }
                FieldSchema::Complemented(kind, compl) => {
                    let field = FieldRef {
                        name,
                        kind: *kind,
                        compl_name: Some(compl),
                    };
                    self.dispatch(&mut query, alias, params, &field);
                }
            }
        }

        Some(query)
    }

    fn dispatch(
        &self,
        query: &mut Document,
        alias: &str,
        params: &impl ParameterAccessor,
        field: &FieldRef<'_>,
    ) {
        let path = format!("{}.{}", alias, field.name);

        match field.kind {
            FieldKind::ObjectId => {
                let mut param = params.get_string(&path);
                if param.is_absent() {
                    // accommodate naming variants like `_id` → `id`
                    let fallback = format!("{}.{}", alias, field.name.replace('_', ""));
                    param = params.get_string(&fallback);
                }
                queries::in_or_eq(
                    &param,
                    query,
                    field,
                    |value| ObjectId::parse_str(value).is_ok(),
                    |value| {
                        ObjectId::parse_str(value)
                            .map_or(Bson::Null, Bson::ObjectId)
                    },
                );
            }
            FieldKind::Id => {
                let param = params.get_string(&path);
                queries::in_or_eq(
                    &param,
                    query,
                    field,
                    |value| self.id_codec.is_id(&self.security, value),
                    |value| {
                        self.id_codec
                            .decode_id(&self.security, value)
                            .map_or(Bson::Null, Bson::Int64)
                    },
                );
            }
            FieldKind::Permalink => {
                let param = params.get_string(&path);
                queries::in_or_eq(&param, query, field, |_| true, |value| {
                    Bson::String(value.to_string())
                });
            }
            FieldKind::Text => {
                let param = params.get_string(&path);
                queries::eq_or_null(&param, query, field, |value| {
                    Bson::RegularExpression(bson::Regex {
                        pattern: self.patterns.create_find_regex(value),
                        options: "i".to_string(),
                    })
                });
            }
            FieldKind::Integer => {
                let param = params.get_int(&path);
                queries::between_or_eq(&param, query, field, |value| Bson::Int64(*value));
            }
            FieldKind::Float => {
                let param = params.get_float(&path);
                queries::between_or_eq(&param, query, field, |value| Bson::Double(*value));
            }
            FieldKind::Date => {
                let param = params.get_date(&path);
                queries::between_or_eq(&param, query, field, |value| {
                    Bson::DateTime(bson::DateTime::from_chrono(
                        value.and_time(chrono::NaiveTime::MIN).and_utc(),
                    ))
                });
            }
            FieldKind::DateTime => {
                let param = params.get_datetime(&path);
                queries::between_or_eq(&param, query, field, |value| {
                    Bson::DateTime(bson::DateTime::from_chrono(*value))
                });
            }
            FieldKind::Boolean => {
                let param = params.get_boolean(&path);
                queries::true_or_null(&param, query, field);
            }
        }
    }

    /// Parses a comma-delimited `field[:direction]` sort specification into
    /// a sort document. Fields outside the schema are silently skipped;
    /// complemented fields sort on their dotted sub-path.
    pub fn parse_sorting(&self, alias: &str, schema: &FieldMap, sort_param: &str) -> Document {
        let mut sort = Document::new();
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

            let key = raw_key.strip_prefix(&prefix).unwrap_or(raw_key);
            if !accepted.iter().any(|path| path == key) {
                continue;
            }

            let sort_key = match leaf_at(schema, key) {
                Some(FieldSchema::Complemented(_, compl)) => format!("{key}.{compl}"),
                _ => key.to_string(),
            };

            let order: i32 = match direction {
                Some(direction) if direction.eq_ignore_ascii_case("desc") => -1,
                _ => 1,
            };
            sort.insert(sort_key, order);
        }

        sort
    }
}
