// src/core/sql.rs
//! Partial-update helper: turns a sparse field map into a `SET` fragment

use serde_json::{Map, Value};

use crate::error::{JobsError, JobsResult};

/// How a logical field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMapping {
    /// Stored under a different column name
    Column(&'static str),
    /// Stored under its own name
    Default,
}

/// Static table of the fields a resource accepts and the columns they land in.
///
/// Fields that are not listed still resolve to themselves, so callers that
/// need to reject unknown fields check [`FieldNameMap::allows`] first.
#[derive(Debug, Clone, Default)]
pub struct FieldNameMap {
    entries: Vec<(&'static str, ColumnMapping)>,
}

impl FieldNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str) -> Self {
        self.entries.push((name, ColumnMapping::Default));
        self
    }

    pub fn column(mut self, name: &'static str, column: &'static str) -> Self {
        self.entries.push((name, ColumnMapping::Column(column)));
        self
    }

    pub fn allows(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| *name == field)
    }

    pub fn column_for<'a>(&self, field: &'a str) -> &'a str {
        match self.entries.iter().find(|(name, _)| *name == field) {
            Some((_, ColumnMapping::Column(column))) => *column,
            _ => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateClause {
    /// `"col1"=$1, "col2"=$2`
    pub set_cols: String,
    /// Values in placeholder order
    pub values: Vec<Value>,
}

impl UpdateClause {
    /// Placeholder index for the first parameter after the `SET` values.
    pub fn next_index(&self) -> usize {
        self.values.len() + 1
    }
}

/// Builds the `SET` clause of a parameterized update.
///
/// Keys are taken in insertion order; duplicate columns are emitted as given.
pub fn sql_for_partial_update(
    data_to_update: &Map<String, Value>,
    name_map: &FieldNameMap,
) -> JobsResult<UpdateClause> {
    if data_to_update.is_empty() {
        return Err(JobsError::bad_request("No data"));
    }

    let mut cols = Vec::with_capacity(data_to_update.len());
    let mut values = Vec::with_capacity(data_to_update.len());

    for (idx, (field, value)) in data_to_update.iter().enumerate() {
        cols.push(format!("\"{}\"=${}", name_map.column_for(field), idx + 1));
        values.push(value.clone());
    }

    Ok(UpdateClause {
        set_cols: cols.join(", "),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_builds_clause_in_key_order() {
        let data = as_map(json!({"nums": 1, "person": "Tony"}));
        let map = FieldNameMap::new()
            .column("nums", "nums")
            .column("person", "person");

        let clause = sql_for_partial_update(&data, &map).unwrap();
        assert_eq!(clause.set_cols, "\"nums\"=$1, \"person\"=$2");
        assert_eq!(clause.values, vec![json!(1), json!("Tony")]);
        assert_eq!(clause.next_index(), 3);
    }

    #[test]
    fn test_unmapped_fields_keep_their_name() {
        let data = as_map(json!({"firstName": "Aliya", "age": 32}));
        let map = FieldNameMap::new().column("firstName", "first_name");

        let clause = sql_for_partial_update(&data, &map).unwrap();
        assert_eq!(clause.set_cols, "\"first_name\"=$1, \"age\"=$2");
        assert_eq!(clause.values, vec![json!("Aliya"), json!(32)]);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let data = as_map(json!({"zeta": 1, "alpha": 2, "mid": null}));
        let clause = sql_for_partial_update(&data, &FieldNameMap::new()).unwrap();

        assert_eq!(clause.set_cols, "\"zeta\"=$1, \"alpha\"=$2, \"mid\"=$3");
        assert_eq!(clause.values, vec![json!(1), json!(2), Value::Null]);
    }

    #[test]
    fn test_duplicate_columns_are_not_collapsed() {
        let data = as_map(json!({"companyHandle": "c1", "company_handle": "c2"}));
        let map = FieldNameMap::new()
            .column("companyHandle", "company_handle")
            .field("company_handle");

        let clause = sql_for_partial_update(&data, &map).unwrap();
        assert_eq!(
            clause.set_cols,
            "\"company_handle\"=$1, \"company_handle\"=$2"
        );
        assert_eq!(clause.values.len(), 2);
    }

    #[test]
    fn test_token_count_matches_value_count() {
        let data = as_map(json!({"a": 1, "b": 2, "c": 3, "d": 4}));
        let clause = sql_for_partial_update(&data, &FieldNameMap::new()).unwrap();

        assert_eq!(clause.set_cols.split(", ").count(), data.len());
        assert_eq!(clause.values.len(), data.len());
    }

    #[test]
    fn test_empty_data_is_rejected() {
        let err = sql_for_partial_update(&Map::new(), &FieldNameMap::new()).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "Bad request: No data");
    }

    #[test]
    fn test_field_name_map_lookups() {
        let map = FieldNameMap::new().field("title").column("logoUrl", "logo_url");

        assert!(map.allows("title"));
        assert!(!map.allows("id"));
        assert_eq!(map.column_for("title"), "title");
        assert_eq!(map.column_for("logoUrl"), "logo_url");
        assert_eq!(map.column_for("other"), "other");
        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["title", "logoUrl"]);
    }
}
