//! Statement execution and result normalization.
//!
//! Values bind positionally, in the exact order the assembler produced them,
//! and always through [`bind`], the one seam between the untyped value list
//! and the wire parameters. Each call re-prepares; there is no statement
//! cache, no timeout, and no automatic retry.

use crate::db::Database;
use crate::error::{CallError, CallResult};
use crate::ident::LimitPolicy;
use crate::plan::descriptor::{MutationDescriptor, MutationKind, QueryDescriptor};
use crate::plan::{Statement, build_mutation, build_select};
use crate::row::Record;
use crate::value::Value;
use std::time::Instant;
use tokio_postgres::SimpleQueryMessage;
use tokio_postgres::types::ToSql;

/// Result of executing a [`QueryDescriptor`], shaped by its limit policy.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched {
    /// Limit policy `One`: the matching row, if any.
    One(Option<Record>),
    /// Limit policy `All`/`Fixed`: every returned row, in result order.
    Many(Vec<Record>),
}

/// Result of executing a [`MutationDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub enum Mutated {
    /// `Create`: the generated key of the inserted row.
    Created(Value),
    /// `Update`/`Delete`/`DeleteAll`: the number of rows touched.
    Affected(u64),
}

/// Present bound values to the driver.
fn bind(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Database {
    /// Execute a query descriptor.
    pub async fn fetch(&self, descriptor: &QueryDescriptor) -> CallResult<Fetched> {
        let statement = build_select(descriptor)?;
        let rows = self.run_query(&statement).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(Record::from_row(row)?);
        }
        Ok(match descriptor.limit {
            LimitPolicy::One => Fetched::One(records.into_iter().next()),
            LimitPolicy::All | LimitPolicy::Fixed(_) => Fetched::Many(records),
        })
    }

    /// Execute with limit policy `One` regardless of the descriptor's own
    /// policy, so SQL and result shape always agree.
    pub async fn fetch_one(&self, descriptor: &QueryDescriptor) -> CallResult<Option<Record>> {
        let mut descriptor = descriptor.clone();
        descriptor.limit = LimitPolicy::One;
        match self.fetch(&descriptor).await? {
            Fetched::One(record) => Ok(record),
            Fetched::Many(records) => Ok(records.into_iter().next()),
        }
    }

    /// Execute and collect every returned row.
    pub async fn fetch_all(&self, descriptor: &QueryDescriptor) -> CallResult<Vec<Record>> {
        match self.fetch(descriptor).await? {
            Fetched::One(record) => Ok(record.into_iter().collect()),
            Fetched::Many(records) => Ok(records),
        }
    }

    /// Execute a mutation descriptor.
    pub async fn mutate(&self, descriptor: &MutationDescriptor) -> CallResult<Mutated> {
        let statement = build_mutation(descriptor)?;
        match descriptor.kind {
            MutationKind::Create => {
                let rows = self.run_query(&statement).await?;
                let row = rows.first().ok_or_else(|| {
                    CallError::Other(format!(
                        "INSERT returned no {} value",
                        descriptor.returning
                    ))
                })?;
                let record = Record::from_row(row)?;
                let key = record
                    .get(&descriptor.returning)
                    .cloned()
                    .unwrap_or_else(Value::null);
                Ok(Mutated::Created(key))
            }
            MutationKind::Update | MutationKind::Delete | MutationKind::DeleteAll => {
                Ok(Mutated::Affected(self.run_execute(&statement).await?))
            }
        }
    }

    /// Run trusted, fully-literal SQL and return the first row, if any.
    ///
    /// No identifier validation and no value binding happen on this path. It
    /// exists for static statements only and must never see caller-influenced
    /// text.
    pub async fn raw_one(&self, sql: &str) -> CallResult<Option<Record>> {
        Ok(self.raw_all(sql).await?.into_iter().next())
    }

    /// Run trusted, fully-literal SQL and return every row.
    ///
    /// Same safety contract as [`raw_one`](Database::raw_one).
    pub async fn raw_all(&self, sql: &str) -> CallResult<Vec<Record>> {
        let started = Instant::now();
        tracing::debug!(target: "pgcall.sql", sql = %sql, "executing raw statement");
        let messages = self
            .client()
            .simple_query(sql)
            .await
            .map_err(|e| CallError::execution(sql, e))?;
        let mut records = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                records.push(Record::from_simple(&row)?);
            }
        }
        tracing::debug!(
            target: "pgcall.sql",
            rows = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "raw statement complete"
        );
        Ok(records)
    }

    async fn run_query(&self, statement: &Statement) -> CallResult<Vec<tokio_postgres::Row>> {
        let params = bind(&statement.values);
        let started = Instant::now();
        tracing::debug!(
            target: "pgcall.sql",
            param_count = params.len(),
            sql = %statement.sql,
            "executing query"
        );
        let rows = self
            .client()
            .query(statement.sql.as_str(), &params)
            .await
            .map_err(|e| CallError::execution(&statement.sql, e))?;
        tracing::debug!(
            target: "pgcall.sql",
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query complete"
        );
        Ok(rows)
    }

    async fn run_execute(&self, statement: &Statement) -> CallResult<u64> {
        let params = bind(&statement.values);
        let started = Instant::now();
        tracing::debug!(
            target: "pgcall.sql",
            param_count = params.len(),
            sql = %statement.sql,
            "executing statement"
        );
        let affected = self
            .client()
            .execute(statement.sql.as_str(), &params)
            .await
            .map_err(|e| CallError::execution(&statement.sql, e))?;
        tracing::debug!(
            target: "pgcall.sql",
            affected,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "statement complete"
        );
        Ok(affected)
    }
}
