//! CRUD assembly: descriptor → validated plan → statement.

use crate::error::{CallError, CallResult};
use crate::ident::{Ident, IdentKind};
use crate::plan::Statement;
use crate::plan::descriptor::{MutationDescriptor, MutationKind};
use crate::value::Value;

/// A fully validated mutation, ready to render.
#[derive(Clone, Debug)]
pub(crate) enum MutationPlan {
    Insert {
        table: Ident,
        columns: Vec<Ident>,
        values: Vec<Value>,
        returning: Ident,
    },
    Update {
        table: Ident,
        set: Vec<(Ident, Value)>,
        key: (Ident, Value),
    },
    Delete {
        table: Ident,
        key: (Ident, Value),
    },
    DeleteAll {
        table: Ident,
    },
}

impl MutationPlan {
    pub(crate) fn from_descriptor(descriptor: &MutationDescriptor) -> CallResult<Self> {
        let table = Ident::parse(&descriptor.table, IdentKind::Table)?;
        match descriptor.kind {
            MutationKind::Create => {
                if descriptor.data.is_empty() {
                    return Err(CallError::Mutation(
                        "create requires at least one column".to_string(),
                    ));
                }
                let mut columns = Vec::with_capacity(descriptor.data.len());
                let mut values = Vec::with_capacity(descriptor.data.len());
                for (column, value) in &descriptor.data {
                    columns.push(Ident::parse(column, IdentKind::Column)?);
                    values.push(value.clone());
                }
                Ok(Self::Insert {
                    table,
                    columns,
                    values,
                    returning: Ident::parse(&descriptor.returning, IdentKind::Column)?,
                })
            }
            MutationKind::Update => {
                if descriptor.data.is_empty() {
                    return Err(CallError::Mutation(
                        "update requires at least one SET column".to_string(),
                    ));
                }
                let mut set = Vec::with_capacity(descriptor.data.len());
                for (column, value) in &descriptor.data {
                    set.push((Ident::parse(column, IdentKind::Column)?, value.clone()));
                }
                Ok(Self::Update {
                    table,
                    set,
                    key: parse_key(descriptor, "update")?,
                })
            }
            MutationKind::Delete => Ok(Self::Delete {
                table,
                key: parse_key(descriptor, "delete")?,
            }),
            MutationKind::DeleteAll => Ok(Self::DeleteAll { table }),
        }
    }

    pub(crate) fn render(&self) -> Statement {
        match self {
            Self::Insert {
                table,
                columns,
                values,
                returning,
            } => {
                let mut sql = String::from("INSERT INTO ");
                sql.push_str(table.as_str());
                sql.push_str(" (");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    sql.push_str(column.as_str());
                }
                sql.push_str(") VALUES (");
                for i in 1..=columns.len() {
                    if i > 1 {
                        sql.push_str(", ");
                    }
                    sql.push('$');
                    sql.push_str(&i.to_string());
                }
                sql.push_str(") RETURNING ");
                sql.push_str(returning.as_str());
                Statement {
                    sql,
                    values: values.clone(),
                }
            }
            Self::Update { table, set, key } => {
                let mut sql = String::from("UPDATE ");
                sql.push_str(table.as_str());
                sql.push_str(" SET ");
                let mut values = Vec::with_capacity(set.len() + 1);
                for (i, (column, value)) in set.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    values.push(value.clone());
                    sql.push_str(column.as_str());
                    sql.push_str(" = $");
                    sql.push_str(&values.len().to_string());
                }
                let (key_column, key_value) = key;
                values.push(key_value.clone());
                sql.push_str(" WHERE ");
                sql.push_str(key_column.as_str());
                sql.push_str(" = $");
                sql.push_str(&values.len().to_string());
                Statement { sql, values }
            }
            Self::Delete { table, key } => {
                let (key_column, key_value) = key;
                let mut sql = String::from("DELETE FROM ");
                sql.push_str(table.as_str());
                sql.push_str(" WHERE ");
                sql.push_str(key_column.as_str());
                sql.push_str(" = $1");
                Statement {
                    sql,
                    values: vec![key_value.clone()],
                }
            }
            Self::DeleteAll { table } => Statement {
                sql: format!("DELETE FROM {table}"),
                values: Vec::new(),
            },
        }
    }
}

fn parse_key(descriptor: &MutationDescriptor, verb: &str) -> CallResult<(Ident, Value)> {
    let (column, value) = descriptor
        .key
        .as_ref()
        .ok_or_else(|| CallError::Mutation(format!("{verb} requires a key column")))?;
    Ok((Ident::parse(column, IdentKind::Column)?, value.clone()))
}

/// Assemble an INSERT/UPDATE/DELETE statement and its bound values.
///
/// Validation failures abort before any SQL text is produced.
pub fn build_mutation(descriptor: &MutationDescriptor) -> CallResult<Statement> {
    Ok(MutationPlan::from_descriptor(descriptor)?.render())
}
