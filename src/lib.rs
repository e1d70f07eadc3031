pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::models::Discount;
use crate::services::WalletService;
use crate::store::{EventStore, KeyValueStore, MemoryEventStore, MemoryKvStore};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub events: Arc<dyn EventStore>,
    pub wallet: WalletService,
}

impl AppState {
    pub fn with_stores(
        config: config::Config,
        events: Arc<dyn EventStore>,
        kv: Arc<dyn KeyValueStore>,
    ) -> Arc<Self> {
        let wallet = WalletService::new(kv, config.wallet.clone(), Discount::demo_catalogue());
        Arc::new(Self { config, events, wallet })
    }

    /// Wires Postgres and Redis when configured, in-memory stores otherwise.
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let mut events: Arc<dyn EventStore> = match &config.database {
            Some(db_config) => {
                let db = database::Database::connect(db_config).await?;
                db.run_migrations().await?;
                Arc::new(db.event_store())
            }
            None => {
                info!("DATABASE_URL not set, using in-memory event store");
                Arc::new(MemoryEventStore::new())
            }
        };

        if config.features.seed_demo_events {
            store::seed_if_empty(events.as_ref()).await?;
        }

        let kv: Arc<dyn KeyValueStore> = match &config.redis {
            Some(redis_config) => {
                let redis = Arc::new(redis_client::RedisClient::new(&redis_config.url).await?);
                info!("Redis connected");
                let cache = cache::CacheService::new(
                    redis.clone(),
                    events,
                    config.cache.events_ttl_seconds,
                );
                cache.warmup_cache().await;
                events = Arc::new(cache);
                redis
            }
            None => {
                info!("REDIS_URL not set, using in-memory key-value store");
                Arc::new(MemoryKvStore::new())
            }
        };

        Ok(Self::with_stores(config, events, kv))
    }
}

/// Full HTTP application.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Bubble API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
