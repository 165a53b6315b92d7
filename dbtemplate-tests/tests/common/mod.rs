//! Shared fixtures for dbtemplate integration tests
#![allow(dead_code)]

use dbtemplate::{params, Entity, Row, RowExt, SqliteSource, Template};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once per binary. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Client entity. `age` has no mutator, so population never touches it.
#[derive(Debug, Default, Clone, PartialEq, Entity)]
pub struct Client {
    pub id: String,
    pub password: String,
    pub name: String,
    #[dbtemplate(skip)]
    pub age: i32,
}

impl Client {
    pub fn new(id: &str, password: &str, name: &str, age: i32) -> Self {
        Self {
            id: id.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            age,
        }
    }
}

/// Explicit mapper reading every column, `age` included.
pub fn client_mapper(row: &dyn Row) -> dbtemplate::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        password: row.get("password")?,
        name: row.get("name")?,
        age: row.get("age")?,
    })
}

pub fn jun() -> Client {
    Client::new("jun", "0000", "hyunjun", 30)
}

pub fn min() -> Client {
    Client::new("min", "1111", "hyunmin", 29)
}

pub const CREATE_USERS: &str = "CREATE TABLE users (
    id TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    name TEXT NOT NULL,
    age INTEGER NOT NULL
)";

pub const INSERT_USER: &str = "INSERT INTO users (id, password, name, age) VALUES (?, ?, ?, ?)";

/// Template over a fresh named in-memory database with an empty `users` table.
pub fn empty_template(db_name: &str) -> Template<SqliteSource> {
    init_tracing();
    let source = SqliteSource::memory(db_name).unwrap();
    source.execute_batch(CREATE_USERS).unwrap();
    Template::new(source)
}

pub fn insert_client(template: &Template<SqliteSource>, client: &Client) {
    template
        .execute_update(
            INSERT_USER,
            &params![client.id, client.password, client.name, client.age],
        )
        .unwrap();
}

/// Template whose `users` table holds jun and min.
pub fn seeded_template(db_name: &str) -> Template<SqliteSource> {
    let template = empty_template(db_name);
    insert_client(&template, &jun());
    insert_client(&template, &min());
    template
}
