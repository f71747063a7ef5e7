//! SELECT assembly: descriptor → validated plan → statement.

use crate::error::{CallError, CallResult};
use crate::ident::{Ident, IdentKind, LimitPolicy, OrderDirection};
use crate::plan::Statement;
use crate::plan::clause::{
    CmpOp, FromClause, JoinKind, OrderTerm, Predicate, Projection, TableColumns, write_filters,
    write_ordering,
};
use crate::plan::descriptor::{ColumnSpec, QueryDescriptor};
use crate::value::Value;

/// A fully validated SELECT, ready to render.
///
/// Construction performs every identifier/direction/limit check; rendering is
/// infallible, so no partial SQL can exist when validation fails.
#[derive(Clone, Debug)]
pub(crate) struct SelectPlan {
    projection: Projection,
    from: FromClause,
    filters: Vec<Predicate>,
    ordering: Vec<OrderTerm>,
    limit: LimitPolicy,
}

impl SelectPlan {
    pub(crate) fn from_descriptor(descriptor: &QueryDescriptor) -> CallResult<Self> {
        let from = match &descriptor.join {
            None => FromClause::Table(Ident::parse(&descriptor.table, IdentKind::Table)?),
            Some(join) => {
                if join.join_keys.len() < 2 {
                    return Err(CallError::Join(format!(
                        "a simulated join needs at least two tables, got {}",
                        join.join_keys.len()
                    )));
                }
                let mut tables = Vec::with_capacity(join.join_keys.len());
                for (table, key) in &join.join_keys {
                    tables.push((
                        Ident::parse(table, IdentKind::Table)?,
                        Ident::parse(key, IdentKind::Column)?,
                    ));
                }
                FromClause::Join(tables)
            }
        };

        let projection = match &descriptor.join {
            None => plain_projection(&descriptor.columns)?,
            Some(join) => {
                let mut parts = Vec::with_capacity(join.columns_per_table.len());
                for (table, spec) in &join.columns_per_table {
                    let table = Ident::parse(table, IdentKind::Table)?;
                    let cols = match spec {
                        ColumnSpec::All => TableColumns::All,
                        ColumnSpec::Columns(cols) => {
                            TableColumns::Columns(parse_columns(cols)?)
                        }
                    };
                    parts.push((table, cols));
                }
                if parts.is_empty() {
                    Projection::Star
                } else {
                    Projection::Qualified(parts)
                }
            }
        };

        let mut filters = Vec::with_capacity(descriptor.filters.len());
        for (raw_key, value) in &descriptor.filters {
            let (op, name) = match raw_key.strip_prefix('!') {
                Some(rest) => (CmpOp::Ne, rest),
                None => (CmpOp::Eq, raw_key.as_str()),
            };
            filters.push(Predicate {
                column: Ident::parse(name, IdentKind::Column)?,
                op,
                value: value.clone(),
            });
        }

        let mut ordering = Vec::with_capacity(descriptor.ordering.len());
        for (raw_direction, column) in &descriptor.ordering {
            ordering.push(OrderTerm {
                column: Ident::parse(column, IdentKind::Column)?,
                direction: OrderDirection::parse(raw_direction)?,
            });
        }

        Ok(Self {
            projection,
            from,
            filters,
            ordering,
            limit: descriptor.limit,
        })
    }

    pub(crate) fn render(&self) -> Statement {
        let mut sql = String::new();
        let mut values = Vec::new();

        self.write_body(JoinKind::Left, &mut sql, &mut values);
        if matches!(self.from, FromClause::Join(_)) {
            // Simulated bidirectional join: the RIGHT variant unioned onto the
            // LEFT one. Placeholder numbering continues and the filter values
            // are bound a second time.
            sql.push_str(" UNION ");
            self.write_body(JoinKind::Right, &mut sql, &mut values);
        }

        write_ordering(&self.ordering, &mut sql);

        match self.limit {
            LimitPolicy::One => sql.push_str(" LIMIT 1"),
            LimitPolicy::All => {}
            LimitPolicy::Fixed(n) => {
                sql.push_str(" LIMIT ");
                sql.push_str(&n.to_string());
            }
        }

        Statement { sql, values }
    }

    fn write_body(&self, kind: JoinKind, sql: &mut String, values: &mut Vec<Value>) {
        sql.push_str("SELECT ");
        self.projection.write_sql(sql);
        sql.push_str(" FROM ");
        self.from.write_sql(kind, sql);
        write_filters(&self.filters, sql, values);
    }
}

fn plain_projection(columns: &ColumnSpec) -> CallResult<Projection> {
    match columns {
        ColumnSpec::All => Ok(Projection::Star),
        ColumnSpec::Columns(cols) => {
            // callers sometimes pass the sentinel inside a one-element list
            if cols.len() == 1 && cols[0] == "all" {
                return Ok(Projection::Star);
            }
            Ok(Projection::Columns(parse_columns(cols)?))
        }
    }
}

fn parse_columns(cols: &[String]) -> CallResult<Vec<Ident>> {
    cols.iter()
        .map(|col| Ident::parse(col, IdentKind::Column))
        .collect()
}

/// Assemble a SELECT statement and its positionally-ordered bound values.
///
/// Validation failures abort before any SQL text is produced.
pub fn build_select(descriptor: &QueryDescriptor) -> CallResult<Statement> {
    Ok(SelectPlan::from_descriptor(descriptor)?.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::descriptor::JoinSpec;

    #[test]
    fn select_star() {
        let stmt = build_select(&QueryDescriptor::table("users")).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users");
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn select_columns() {
        let stmt = build_select(
            &QueryDescriptor::table("users").columns(ColumnSpec::parse("id, name")),
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT id, name FROM users");
    }

    #[test]
    fn sentinel_inside_column_list() {
        let stmt = build_select(
            &QueryDescriptor::table("users").columns(ColumnSpec::columns(["all"])),
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users");
    }

    #[test]
    fn filters_in_insertion_order() {
        let stmt = build_select(
            &QueryDescriptor::table("users")
                .eq("activo", 1i64)
                .eq("rol", "administrador"),
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users WHERE activo = $1 AND rol = $2"
        );
        assert_eq!(
            stmt.values,
            vec![Value::from(1i64), Value::from("administrador")]
        );
    }

    #[test]
    fn negative_filter() {
        let stmt = build_select(&QueryDescriptor::table("users").ne("status", "archived")).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE status != $1");
        assert_eq!(stmt.values, vec![Value::from("archived")]);
    }

    #[test]
    fn no_filters_no_where() {
        let stmt = build_select(&QueryDescriptor::table("users")).unwrap();
        assert!(!stmt.sql.contains("WHERE"));
    }

    #[test]
    fn ordering_with_direction_suffixes() {
        let stmt = build_select(
            &QueryDescriptor::table("users")
                .order_asc("nombre")
                .push_order("ASC2", "fecha")
                .push_order("DESC", "tipo"),
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users ORDER BY nombre ASC, fecha ASC, tipo DESC"
        );
    }

    #[test]
    fn ordering_without_direction() {
        let stmt =
            build_select(&QueryDescriptor::table("users").push_order("", "nombre")).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users ORDER BY nombre");
    }

    #[test]
    fn limit_one() {
        let stmt = build_select(&QueryDescriptor::table("users").one()).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users LIMIT 1");
    }

    #[test]
    fn limit_fixed() {
        let stmt =
            build_select(&QueryDescriptor::table("users").limit(LimitPolicy::Fixed(5))).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users LIMIT 5");
    }

    #[test]
    fn limit_all_appends_nothing() {
        let stmt = build_select(&QueryDescriptor::table("users")).unwrap();
        assert!(!stmt.sql.contains("LIMIT"));
    }

    #[test]
    fn join_simulated_union() {
        let descriptor = QueryDescriptor::join(
            JoinSpec::new()
                .columns(
                    "tabla_usuarios",
                    ColumnSpec::parse("id_usuarios, nombre, apellido"),
                )
                .columns("tabla_roles", ColumnSpec::parse("tipo, vigencia"))
                .on("tabla_usuarios", "id_usuarios")
                .on("tabla_roles", "id_usuarios"),
        )
        .eq("tabla_usuarios.id_usuarios", 1i64);
        let stmt = build_select(&descriptor).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT tabla_usuarios.id_usuarios, tabla_usuarios.nombre, tabla_usuarios.apellido, \
             tabla_roles.tipo, tabla_roles.vigencia \
             FROM tabla_usuarios LEFT JOIN tabla_roles \
             ON tabla_roles.id_usuarios = tabla_usuarios.id_usuarios \
             WHERE tabla_usuarios.id_usuarios = $1 \
             UNION \
             SELECT tabla_usuarios.id_usuarios, tabla_usuarios.nombre, tabla_usuarios.apellido, \
             tabla_roles.tipo, tabla_roles.vigencia \
             FROM tabla_usuarios RIGHT JOIN tabla_roles \
             ON tabla_roles.id_usuarios = tabla_usuarios.id_usuarios \
             WHERE tabla_usuarios.id_usuarios = $2"
        );
        assert_eq!(stmt.values, vec![Value::from(1i64), Value::from(1i64)]);
    }

    #[test]
    fn join_table_star() {
        let descriptor = QueryDescriptor::join(
            JoinSpec::new()
                .columns("users", ColumnSpec::All)
                .on("users", "id")
                .on("orders", "user_id"),
        );
        let stmt = build_select(&descriptor).unwrap();
        assert!(stmt.sql.starts_with("SELECT users.* FROM users LEFT JOIN orders"));
    }

    #[test]
    fn join_ordering_and_limit_trail_the_union() {
        let descriptor = QueryDescriptor::join(
            JoinSpec::new()
                .on("users", "id")
                .on("orders", "user_id"),
        )
        .order_desc("users.id")
        .limit(LimitPolicy::Fixed(10));
        let stmt = build_select(&descriptor).unwrap();
        let union_at = stmt.sql.find(" UNION ").unwrap();
        let order_at = stmt.sql.find(" ORDER BY ").unwrap();
        assert!(order_at > union_at);
        assert!(stmt.sql.ends_with("ORDER BY users.id DESC LIMIT 10"));
        assert_eq!(stmt.sql.matches("ORDER BY").count(), 1);
    }

    #[test]
    fn join_requires_two_tables() {
        let descriptor = QueryDescriptor::join(JoinSpec::new().on("users", "id"));
        assert!(matches!(
            build_select(&descriptor),
            Err(CallError::Join(_))
        ));
    }

    #[test]
    fn join_with_three_tables_chains_to_anchor() {
        let descriptor = QueryDescriptor::join(
            JoinSpec::new()
                .on("users", "id")
                .on("orders", "user_id")
                .on("invoices", "user_id"),
        );
        let stmt = build_select(&descriptor).unwrap();
        assert!(stmt.sql.contains(
            "FROM users LEFT JOIN orders ON orders.user_id = users.id \
             LEFT JOIN invoices ON invoices.user_id = users.id"
        ));
    }

    #[test]
    fn invalid_table_aborts_before_sql() {
        let result = build_select(&QueryDescriptor::table("users; DROP TABLE users"));
        assert!(matches!(result, Err(CallError::Identifier { .. })));
    }

    #[test]
    fn invalid_filter_column_aborts() {
        let result =
            build_select(&QueryDescriptor::table("users").eq("name = '' OR 1=1 --", "x"));
        assert!(matches!(result, Err(CallError::Identifier { .. })));
    }

    #[test]
    fn invalid_order_direction_aborts() {
        let result =
            build_select(&QueryDescriptor::table("users").push_order("SIDEWAYS", "name"));
        assert!(matches!(result, Err(CallError::OrderDirection(_))));
    }
}
