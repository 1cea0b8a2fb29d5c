use std::sync::Arc;

use crate::attrs::repo::AttrStore;
use crate::config::AppConfig;
use crate::db::{self, PgStore};
use crate::recipes::repo::RecipeStore;
use crate::users::repo::UserStore;

/// Everything the handlers need from persistence.
pub trait Store: UserStore + AttrStore + RecipeStore {}

impl<T> Store for T where T: UserStore + AttrStore + RecipeStore {}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let store = Arc::new(PgStore::new(pool)) as Arc<dyn Store>;
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }
}
