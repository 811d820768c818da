//! The engine context shared by every service

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::EngineSettings;
use crate::external::ForecastProvider;
use crate::store::{CropCatalog, FieldStore, ForecastCache, GddStore, MemoryStore, PgStore, ReadingStore};

/// Collaborators and settings, built once per process and passed to each
/// service by reference.
#[derive(Clone)]
pub struct EngineContext {
    pub fields: Arc<dyn FieldStore>,
    pub readings: Arc<dyn ReadingStore>,
    pub catalog: Arc<dyn CropCatalog>,
    pub forecasts: Arc<dyn ForecastCache>,
    pub gdd: Arc<dyn GddStore>,
    /// `None` when no weather provider is configured
    pub provider: Option<Arc<dyn ForecastProvider>>,
    pub settings: EngineSettings,
}

impl EngineContext {
    /// Context backed by PostgreSQL
    pub fn postgres(
        db: PgPool,
        provider: Option<Arc<dyn ForecastProvider>>,
        settings: EngineSettings,
    ) -> Self {
        let store = Arc::new(PgStore::new(db));
        Self {
            fields: store.clone(),
            readings: store.clone(),
            catalog: store.clone(),
            forecasts: store.clone(),
            gdd: store,
            provider,
            settings,
        }
    }

    /// Context backed by a single in-memory store
    pub fn in_memory(
        store: Arc<MemoryStore>,
        provider: Option<Arc<dyn ForecastProvider>>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            fields: store.clone(),
            readings: store.clone(),
            catalog: store.clone(),
            forecasts: store.clone(),
            gdd: store,
            provider,
            settings,
        }
    }
}
