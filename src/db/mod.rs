use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

use crate::config::DatabaseKind;
use crate::models::group::DEFAULT_GROUP_NAME;

/// Connection pool for whichever store `DATABASE_URL` selected.
#[derive(Debug, Clone)]
pub enum Db {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl Db {
    pub fn kind(&self) -> DatabaseKind {
        match self {
            Db::Sqlite(_) => DatabaseKind::Sqlite,
            Db::Postgres(_) => DatabaseKind::Postgres,
        }
    }
}

/// Run the same sqlx code against either pool. The statements used by the
/// services are written in the SQL both stores accept ($N placeholders,
/// RETURNING, ON CONFLICT).
macro_rules! with_pool {
    ($db:expr, $pool:ident => $body:expr) => {
        match $db {
            $crate::db::Db::Sqlite($pool) => $body,
            $crate::db::Db::Postgres($pool) => $body,
        }
    };
}
pub(crate) use with_pool;

pub async fn create_pool(database_url: &str) -> anyhow::Result<Db> {
    match DatabaseKind::from_url(database_url)? {
        DatabaseKind::Sqlite => Ok(Db::Sqlite(create_sqlite_pool(database_url).await?)),
        DatabaseKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(20)
                .acquire_timeout(Duration::from_secs(5))
                .connect(database_url)
                .await?;
            Ok(Db::Postgres(pool))
        }
    }
}

async fn create_sqlite_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection, so keep exactly one around.
    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Run the schema migrations embedded from ./migrations/<store>/
pub async fn run_migrations(db: &Db) -> anyhow::Result<()> {
    match db {
        Db::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite").run(pool).await?,
        Db::Postgres(pool) => sqlx::migrate!("./migrations/postgres").run(pool).await?,
    }
    Ok(())
}

/// Make sure the default group exists (idempotent, safe on every startup).
pub async fn ensure_default_group(db: &Db) -> anyhow::Result<()> {
    let inserted = with_pool!(db, pool => {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(DEFAULT_GROUP_NAME)
            .execute(pool)
            .await?
            .rows_affected()
    });
    if inserted > 0 {
        tracing::info!("Created default group \"{}\"", DEFAULT_GROUP_NAME);
    }
    Ok(())
}

/// Pool + schema + default group, in the order startup needs them.
pub async fn connect_and_prepare(database_url: &str) -> anyhow::Result<Db> {
    let db = create_pool(database_url).await?;
    run_migrations(&db).await?;
    ensure_default_group(&db).await?;
    Ok(db)
}
