//! # pgcall
//!
//! A descriptor-driven PostgreSQL query layer.
//!
//! Callers describe a query or mutation as data (columns, table, optional
//! join, filter predicates, ordering, row-limit policy) and pgcall validates
//! every raw identifier, lowers the descriptor to a typed clause plan, renders
//! parameterized SQL, executes it over a single owned connection, and
//! normalizes rows into uniform records.
//!
//! ## Guarantees
//!
//! - Every table/column name is validated against an injection-safe grammar
//!   before it can appear in SQL text.
//! - Values only ever reach the server through positional placeholders, never
//!   by interpolation, and value order always matches placeholder order.
//! - Validation failures abort before any SQL text exists; no partial
//!   statement is ever executed.
//!
//! ## Example
//!
//! ```ignore
//! use pgcall::{
//!     ColumnSpec, Database, DatabaseConfig, MutationDescriptor, Mutated, QueryDescriptor,
//! };
//!
//! let config = DatabaseConfig::from_env()?;
//! let db = Database::connect(&config).await?;
//!
//! // INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id
//! let created = db
//!     .mutate(&MutationDescriptor::create("users")
//!         .set("name", "John")
//!         .set("email", "john@x.com"))
//!     .await?;
//!
//! // SELECT id, name FROM users WHERE activo = $1 ORDER BY name ASC
//! let users = db
//!     .fetch_all(&QueryDescriptor::table("users")
//!         .columns(ColumnSpec::parse("id, name"))
//!         .eq("activo", 1)
//!         .order_asc("name"))
//!     .await?;
//!
//! db.close().await;
//! # Ok::<(), pgcall::CallError>(())
//! ```
//!
//! A two-sided join is simulated: the statement renders once with `LEFT JOIN`
//! and once with `RIGHT JOIN`, the two sides joined by `UNION` (which also
//! de-duplicates), with the filter values bound once per side.

pub mod config;
pub mod db;
pub mod error;
pub mod exec;
pub mod ident;
pub mod plan;
pub mod row;
pub mod value;

pub use config::DatabaseConfig;
pub use db::Database;
pub use error::{CallError, CallResult};
pub use exec::{Fetched, Mutated};
pub use ident::{Ident, IdentKind, LimitPolicy, OrderDirection};
pub use plan::descriptor::{
    ColumnSpec, JoinSpec, MutationDescriptor, MutationKind, QueryDescriptor,
};
pub use plan::{Statement, build_mutation, build_select};
pub use row::Record;
pub use value::Value;
