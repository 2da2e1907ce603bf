use super::entities::{FieldMap, FieldSchema};

/// Enumerates the dotted field paths a schema accepts, depth-first in
/// declaration order. Used for sort-field membership checks.
pub fn accepted_field_paths(schema: &FieldMap, alias: Option<&str>) -> Vec<String> {
    let mut paths = Vec::new();

    for (name, entry) in schema {
        let path = match alias {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.clone(),
        };

        match entry {
            FieldSchema::Nested(sub) => {
                paths.extend(accepted_field_paths(sub, Some(&path)));
            }
            FieldSchema::Scalar(_) | FieldSchema::Complemented(..) => paths.push(path),
        }
    }

    paths
}

/// Resolves the schema entry a dotted path points at, descending through
/// nested schemas.
pub fn leaf_at<'a>(schema: &'a FieldMap, path: &str) -> Option<&'a FieldSchema> {
    match path.split_once('.') {
        Some((head, rest)) => match schema.get(head) {
            Some(FieldSchema::Nested(sub)) => leaf_at(sub, rest),
            _ => None,
        },
        None => schema.get(path),
    }
}
