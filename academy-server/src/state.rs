//! Application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::ordering::{HealPolicy, OrderEngine};
use crate::roster::{CourseModules, ProjectGallery, TeamRoster};
use crate::store::{ContentStore, MemoryStore, PgStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state, generic over the storage backend
pub struct AppState<S> {
    pub team: Arc<TeamRoster<S>>,
    pub projects: Arc<ProjectGallery<S>>,
    pub courses: Arc<CourseModules<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            team: self.team.clone(),
            projects: self.projects.clone(),
            courses: self.courses.clone(),
        }
    }
}

impl<S: ContentStore> AppState<S> {
    pub fn new(store: Arc<S>, heal: HealPolicy) -> Self {
        let engine = OrderEngine::new(store, heal);
        Self {
            team: Arc::new(TeamRoster::new(engine.clone())),
            projects: Arc::new(ProjectGallery::new(engine.clone())),
            courses: Arc::new(CourseModules::new(engine)),
        }
    }
}

/// Storage backend selected at startup
pub enum Backend {
    Memory(AppState<MemoryStore>),
    Postgres(AppState<PgStore>),
}

impl Backend {
    /// Connect to PostgreSQL and run migrations, or fall back to the memory store
    pub async fn from_config(config: &Config) -> Result<Self, BoxError> {
        match &config.database_url {
            Some(url) => {
                let pool = PgPool::connect(url).await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!(serializable = config.db_serializable, "PostgreSQL store ready");
                let store = PgStore::new(pool, config.db_serializable);
                Ok(Self::Postgres(AppState::new(Arc::new(store), config.heal_policy)))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
                Ok(Self::Memory(AppState::new(
                    Arc::new(MemoryStore::new()),
                    config.heal_policy,
                )))
            }
        }
    }
}
