pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use std::sync::Arc;

use tera::Tera;

use config::Config;
use db::Db;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<Config>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(db: Db, config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            config: Arc::new(config),
            templates: Arc::new(views::load_templates()?),
        })
    }
}
