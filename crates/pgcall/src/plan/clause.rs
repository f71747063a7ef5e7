//! Typed clause fragments.
//!
//! Descriptors lower into these structures, with every identifier already
//! validated, and SQL text is rendered from them only at the very end of
//! assembly, so tests can assert on structure instead of string shapes.

use crate::ident::{Ident, OrderDirection};
use crate::value::Value;

/// The projected column set of a SELECT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Projection {
    /// `*`
    Star,
    /// Plain validated columns.
    Columns(Vec<Ident>),
    /// Join projection: columns qualified per table, in table order.
    Qualified(Vec<(Ident, TableColumns)>),
}

/// One table's share of a join projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TableColumns {
    /// `table.*`
    All,
    Columns(Vec<Ident>),
}

impl Projection {
    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Self::Star => out.push('*'),
            Self::Columns(cols) => {
                for (i, col) in cols.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(col.as_str());
                }
            }
            Self::Qualified(parts) => {
                let mut first = true;
                for (table, cols) in parts {
                    match cols {
                        TableColumns::All => {
                            if !first {
                                out.push_str(", ");
                            }
                            first = false;
                            out.push_str(table.as_str());
                            out.push_str(".*");
                        }
                        TableColumns::Columns(cols) => {
                            for col in cols {
                                if !first {
                                    out.push_str(", ");
                                }
                                first = false;
                                out.push_str(table.as_str());
                                out.push('.');
                                out.push_str(col.as_str());
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Which side of the simulated bidirectional join is being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JoinKind {
    Left,
    Right,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

/// The FROM clause: a single table, or the anchor-chained join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FromClause {
    Table(Ident),
    /// `(table, key column)` pairs, anchor first; always two or more entries.
    Join(Vec<(Ident, Ident)>),
}

impl FromClause {
    pub(crate) fn write_sql(&self, kind: JoinKind, out: &mut String) {
        match self {
            Self::Table(table) => out.push_str(table.as_str()),
            Self::Join(tables) => {
                let Some(((anchor, anchor_key), rest)) = tables.split_first() else {
                    return;
                };
                out.push_str(anchor.as_str());
                for (table, key) in rest {
                    out.push(' ');
                    out.push_str(kind.as_sql());
                    out.push(' ');
                    out.push_str(table.as_str());
                    out.push_str(" ON ");
                    out.push_str(table.as_str());
                    out.push('.');
                    out.push_str(key.as_str());
                    out.push_str(" = ");
                    out.push_str(anchor.as_str());
                    out.push('.');
                    out.push_str(anchor_key.as_str());
                }
            }
        }
    }
}

/// Comparison operator of a filter predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Ne,
}

impl CmpOp {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

/// One WHERE predicate; contributes exactly one placeholder and one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Predicate {
    pub(crate) column: Ident,
    pub(crate) op: CmpOp,
    pub(crate) value: Value,
}

/// Render the filter clause, pushing each predicate's value in order.
///
/// Placeholder indices continue from `values.len()`, so rendering the same
/// predicates a second time (the RIGHT side of a union) numbers and binds a
/// fresh copy.
pub(crate) fn write_filters(predicates: &[Predicate], out: &mut String, values: &mut Vec<Value>) {
    for (i, predicate) in predicates.iter().enumerate() {
        out.push_str(if i == 0 { " WHERE " } else { " AND " });
        values.push(predicate.value.clone());
        out.push_str(predicate.column.as_str());
        out.push(' ');
        out.push_str(predicate.op.as_sql());
        out.push_str(" $");
        out.push_str(&values.len().to_string());
    }
}

/// One ORDER BY term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OrderTerm {
    pub(crate) column: Ident,
    pub(crate) direction: OrderDirection,
}

pub(crate) fn write_ordering(terms: &[OrderTerm], out: &mut String) {
    for (i, term) in terms.iter().enumerate() {
        out.push_str(if i == 0 { " ORDER BY " } else { ", " });
        out.push_str(term.column.as_str());
        if let Some(direction) = term.direction.as_sql() {
            out.push(' ');
            out.push_str(direction);
        }
    }
}
