//! Example demonstrating descriptor-driven CRUD.
//!
//! Run with:
//!   cargo run --example descriptor_crud -p pgcall
//!
//! Requires DB_HOST / DB_USER / DB_PASS / DB_NAME (e.g. in a local .env) and a
//! table like:
//!   CREATE TABLE users (
//!       id bigserial PRIMARY KEY,
//!       name text NOT NULL,
//!       email text NOT NULL,
//!       activo int NOT NULL DEFAULT 1
//!   );

use pgcall::{
    CallResult, ColumnSpec, Database, DatabaseConfig, Mutated, MutationDescriptor,
    QueryDescriptor, Value,
};

#[tokio::main]
async fn main() -> CallResult<()> {
    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config).await?;

    let created = db
        .mutate(
            &MutationDescriptor::create("users")
                .set("name", "John")
                .set("email", "john@x.com"),
        )
        .await?;
    let id = match created {
        Mutated::Created(id) => id,
        Mutated::Affected(_) => Value::null(),
    };
    println!("created user {id}");

    let user = db
        .fetch_one(
            &QueryDescriptor::table("users")
                .columns(ColumnSpec::parse("name, email"))
                .eq("id", id.clone()),
        )
        .await?;
    println!("fetched: {user:?}");

    let updated = db
        .mutate(&MutationDescriptor::update("users", "id", id.clone()).set("name", "Jane"))
        .await?;
    println!("updated: {updated:?}");

    let active = db
        .fetch_all(
            &QueryDescriptor::table("users")
                .columns(ColumnSpec::parse("id, name"))
                .eq("activo", 1i64)
                .order_asc("name"),
        )
        .await?;
    println!("{} active users", active.len());

    let removed = db
        .mutate(&MutationDescriptor::delete("users", "id", id))
        .await?;
    println!("removed: {removed:?}");

    db.close().await;
    Ok(())
}
