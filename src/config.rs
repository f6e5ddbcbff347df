use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://reminders.db?mode=rwc";

/// Which relational store a connection string points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    /// Local file (or in-memory) database, the default.
    Sqlite,
    /// Network database reached through a `postgres://` / `postgresql://` URL.
    Postgres,
}

impl DatabaseKind {
    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "sqlite" => Ok(DatabaseKind::Sqlite),
            "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            _ => Err(anyhow::anyhow!(
                "Unsupported DATABASE_URL scheme {:?}: expected sqlite://, postgres:// or postgresql://",
                scheme
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = normalize_database_url(
            &optional("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        );
        DatabaseKind::from_url(&database_url)?;

        Ok(Self {
            database_url,
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: optional("PORT")
                .unwrap_or_else(|| "5000".into())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT: {}", e))?,
            static_dir: optional("STATIC_DIR").unwrap_or_else(|| "static".into()),
        })
    }

    pub fn database_kind(&self) -> anyhow::Result<DatabaseKind> {
        DatabaseKind::from_url(&self.database_url)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Accepts the `sqlite:///relative.db` spelling some tools write and maps it
/// onto the `sqlite://` form sqlx understands.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("sqlite:///") {
        Some(path) => format!("sqlite://{path}"),
        None => url.to_string(),
    }
}
