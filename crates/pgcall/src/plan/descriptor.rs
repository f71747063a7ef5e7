//! Query and mutation descriptors: the structured, language-agnostic input of
//! the assembly layer.
//!
//! Descriptors are plain data (and serde-friendly, so a route layer can build
//! them straight from decoded request payloads). Raw tokens inside them, such
//! as table/column names, `!`-prefixed filter keys, and direction keys with
//! digit suffixes, stay raw here and are validated when the descriptor is
//! lowered to a plan. Insertion order of `filters` and `ordering` is clause
//! order and bound-value order.

use crate::ident::LimitPolicy;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Which columns a SELECT projects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSpec {
    /// Every column (`*`).
    All,
    /// An explicit, ordered column list.
    Columns(Vec<String>),
}

impl ColumnSpec {
    /// Decode the raw caller form: the sentinel `"all"` (or `"*"`), a single
    /// column, or a comma-separated list (whitespace around commas trimmed).
    pub fn parse(raw: &str) -> Self {
        if raw == "all" || raw == "*" {
            return Self::All;
        }
        Self::Columns(
            raw.split(',')
                .map(|col| col.trim().to_string())
                .collect(),
        )
    }

    /// Build from an explicit column list.
    pub fn columns<I, S>(cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Columns(cols.into_iter().map(Into::into).collect())
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self::All
    }
}

/// A multi-table projection and the equality keys relating the tables.
///
/// The first `join_keys` entry is the anchor: it provides the FROM table, and
/// every subsequent table joins to it via `table.key = anchor.anchor_key`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Per-table column selection, in projection order.
    pub columns_per_table: Vec<(String, ColumnSpec)>,
    /// `(table, key column)` pairs, anchor first.
    pub join_keys: Vec<(String, String)>,
}

impl JoinSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table's projected columns.
    pub fn columns(mut self, table: &str, cols: ColumnSpec) -> Self {
        self.columns_per_table.push((table.to_string(), cols));
        self
    }

    /// Add a table and its join-key column. The first call names the anchor.
    pub fn on(mut self, table: &str, key: &str) -> Self {
        self.join_keys.push((table.to_string(), key.to_string()));
        self
    }
}

/// A structured description of an intended SELECT.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Row-count policy; also decides the executed result shape.
    pub limit: LimitPolicy,
    pub join: Option<JoinSpec>,
    /// Projection when there is no join (joins project per table).
    pub columns: ColumnSpec,
    pub table: String,
    /// `(raw key, value)` pairs; a `!` key prefix means not-equal.
    pub filters: Vec<(String, Value)>,
    /// `(raw direction key, column)` pairs.
    pub ordering: Vec<(String, String)>,
}

impl QueryDescriptor {
    /// Start a descriptor over a single table.
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Start a descriptor over a simulated two-sided join. The anchor table
    /// of `spec` doubles as the FROM table.
    pub fn join(spec: JoinSpec) -> Self {
        let table = spec
            .join_keys
            .first()
            .map(|(table, _)| table.clone())
            .unwrap_or_default();
        Self {
            table,
            join: Some(spec),
            ..Self::default()
        }
    }

    pub fn columns(mut self, columns: ColumnSpec) -> Self {
        self.columns = columns;
        self
    }

    /// Add an equality filter: `column = value`.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Add a not-equal filter: `column != value`.
    pub fn ne(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((format!("!{column}"), value.into()));
        self
    }

    /// Add a filter under its raw key (optionally `!`-prefixed), as decoded
    /// request data supplies it.
    pub fn push_filter(mut self, raw_key: &str, value: impl Into<Value>) -> Self {
        self.filters.push((raw_key.to_string(), value.into()));
        self
    }

    /// Order ascending by `column`.
    pub fn order_asc(self, column: &str) -> Self {
        self.push_order("ASC", column)
    }

    /// Order descending by `column`.
    pub fn order_desc(self, column: &str) -> Self {
        self.push_order("DESC", column)
    }

    /// Add an ordering term under its raw direction key (`ASC`, `DESC2`, ...).
    pub fn push_order(mut self, raw_direction: &str, column: &str) -> Self {
        self.ordering
            .push((raw_direction.to_string(), column.to_string()));
        self
    }

    pub fn limit(mut self, policy: LimitPolicy) -> Self {
        self.limit = policy;
        self
    }

    /// Shorthand for `limit(LimitPolicy::One)`.
    pub fn one(self) -> Self {
        self.limit(LimitPolicy::One)
    }
}

/// The CRUD operation a [`MutationDescriptor`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    DeleteAll,
}

/// A structured description of an intended INSERT/UPDATE/DELETE.
///
/// `Delete` carries exactly one key pair by construction, so the statement it
/// produces is never ambiguous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationDescriptor {
    pub kind: MutationKind,
    pub table: String,
    /// Columns to insert/update, in SET order.
    pub data: Vec<(String, Value)>,
    /// Key column and comparison value for `Update`/`Delete`.
    pub key: Option<(String, Value)>,
    /// Generated-key column reported back for `Create`.
    pub returning: String,
}

impl MutationDescriptor {
    fn new(kind: MutationKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
            data: Vec::new(),
            key: None,
            returning: "id".to_string(),
        }
    }

    /// Insert a row; chain [`set`](Self::set) for each column.
    pub fn create(table: &str) -> Self {
        Self::new(MutationKind::Create, table)
    }

    /// Update the row(s) where `key_column = key`.
    pub fn update(table: &str, key_column: &str, key: impl Into<Value>) -> Self {
        let mut descriptor = Self::new(MutationKind::Update, table);
        descriptor.key = Some((key_column.to_string(), key.into()));
        descriptor
    }

    /// Delete the row(s) where `key_column = key`.
    pub fn delete(table: &str, key_column: &str, key: impl Into<Value>) -> Self {
        let mut descriptor = Self::new(MutationKind::Delete, table);
        descriptor.key = Some((key_column.to_string(), key.into()));
        descriptor
    }

    /// Delete every row of `table`. Unconditional and irreversible.
    pub fn delete_all(table: &str) -> Self {
        Self::new(MutationKind::DeleteAll, table)
    }

    /// Add a column/value pair, in SET order.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.data.push((column.to_string(), value.into()));
        self
    }

    /// Override the generated-key column reported for `Create`.
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = column.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_spec_sentinel() {
        assert_eq!(ColumnSpec::parse("all"), ColumnSpec::All);
        assert_eq!(ColumnSpec::parse("*"), ColumnSpec::All);
    }

    #[test]
    fn column_spec_single() {
        assert_eq!(
            ColumnSpec::parse("name"),
            ColumnSpec::columns(["name"])
        );
    }

    #[test]
    fn column_spec_list_trims() {
        assert_eq!(
            ColumnSpec::parse("id_usuarios, nombre ,apellido"),
            ColumnSpec::columns(["id_usuarios", "nombre", "apellido"])
        );
    }

    #[test]
    fn ne_marks_raw_key() {
        let descriptor = QueryDescriptor::table("users").ne("status", "archived");
        assert_eq!(descriptor.filters[0].0, "!status");
    }

    #[test]
    fn join_anchor_becomes_table() {
        let descriptor = QueryDescriptor::join(
            JoinSpec::new()
                .on("tabla_usuarios", "id_usuarios")
                .on("tabla_roles", "id_usuarios"),
        );
        assert_eq!(descriptor.table, "tabla_usuarios");
    }

    #[test]
    fn descriptor_roundtrips_through_serde() {
        let descriptor = QueryDescriptor::table("users")
            .columns(ColumnSpec::parse("id, name"))
            .eq("activo", 1i64)
            .order_asc("name")
            .one();
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: QueryDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn delete_key_is_single_by_construction() {
        let descriptor = MutationDescriptor::delete("users", "id", 5i64);
        assert_eq!(
            descriptor.key,
            Some(("id".to_string(), Value::from(5i64)))
        );
        assert!(descriptor.data.is_empty());
    }
}
