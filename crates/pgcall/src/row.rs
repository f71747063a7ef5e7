//! Normalized result rows.

use crate::error::{CallError, CallResult};
use crate::value::Value;
use tokio_postgres::{Row, SimpleQueryRow};

/// A result row normalized to insertion-ordered column-name/value pairs.
///
/// One shape serves name-keyed, positional, and mixed access, so every
/// execution path, descriptor-driven or raw, returns the same thing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    cols: Vec<(String, Value)>,
}

impl Record {
    pub(crate) fn from_row(row: &Row) -> CallResult<Self> {
        let mut cols = Vec::with_capacity(row.len());
        for (i, column) in row.columns().iter().enumerate() {
            let value: Value = row
                .try_get(i)
                .map_err(|e| CallError::decode(column.name(), e.to_string()))?;
            cols.push((column.name().to_string(), value));
        }
        Ok(Self { cols })
    }

    pub(crate) fn from_simple(row: &SimpleQueryRow) -> CallResult<Self> {
        let mut cols = Vec::with_capacity(row.len());
        for (i, column) in row.columns().iter().enumerate() {
            let cell = row
                .try_get(i)
                .map_err(|e| CallError::decode(column.name(), e.to_string()))?;
            let value = cell.map(Value::from).unwrap_or_else(Value::null);
            cols.push((column.name().to_string(), value));
        }
        Ok(Self { cols })
    }

    /// Value of the first column named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cols
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }

    /// Value at `index`, in result order.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.cols.get(index).map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cols.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cols.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, Value)> {
        self.cols
    }
}

impl<S> FromIterator<(S, Value)> for Record
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            cols: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_iter([
            ("id", Value::from(5i64)),
            ("name", Value::from("John")),
            ("deleted_at", Value::null()),
        ])
    }

    #[test]
    fn get_by_name() {
        let record = sample();
        assert_eq!(record.get("name"), Some(&Value::from("John")));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn get_by_index() {
        let record = sample();
        assert_eq!(record.get_index(0), Some(&Value::from(5i64)));
        assert_eq!(record.get_index(3), None);
    }

    #[test]
    fn preserves_column_order() {
        let record = sample();
        let names: Vec<&str> = record.columns().collect();
        assert_eq!(names, ["id", "name", "deleted_at"]);
    }

    #[test]
    fn null_cells_are_null_values() {
        let record = sample();
        assert!(record.get("deleted_at").is_some_and(Value::is_null));
    }
}
