use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::BubbleResult;
use crate::models::Event;
use crate::store::{EventStore, KeyValueStore};

pub const EVENTS_CACHE_KEY: &str = "bubble:events";

/// Read-through cache of the event list in front of an `EventStore`.
#[derive(Clone)]
pub struct CacheService {
    kv: Arc<dyn KeyValueStore>,
    store: Arc<dyn EventStore>,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(kv: Arc<dyn KeyValueStore>, store: Arc<dyn EventStore>, ttl_seconds: u64) -> Self {
        Self { kv, store, ttl_seconds }
    }

    // Прогрев кеша при старте
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");
        match self.list_events().await {
            Ok(events) => info!("Cache warmup done, {} events", events.len()),
            Err(e) => warn!("Cache warmup failed: {:?}", e),
        }
    }

    async fn get_events_from_cache(&self) -> BubbleResult<Option<Vec<Event>>> {
        match self.kv.get(EVENTS_CACHE_KEY).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn save_events_to_cache(&self, events: &[Event]) -> BubbleResult<()> {
        let data = serde_json::to_string(events)?;
        self.kv.set_ex(EVENTS_CACHE_KEY, &data, self.ttl_seconds).await
    }

    pub async fn invalidate(&self) -> BubbleResult<()> {
        self.kv.delete(EVENTS_CACHE_KEY).await
    }
}

#[async_trait]
impl EventStore for CacheService {
    async fn list_events(&self) -> BubbleResult<Vec<Event>> {
        // Сначала пробуем кеш
        match self.get_events_from_cache().await {
            Ok(Some(events)) => return Ok(events),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable events cache: {:?}", e),
        }

        // Если в кеше нет - идем в БД
        let events = self.store.list_events().await?;
        if let Err(e) = self.save_events_to_cache(&events).await {
            warn!("Failed to cache events: {:?}", e);
        }
        Ok(events)
    }

    async fn get_event(&self, id: &str) -> BubbleResult<Option<Event>> {
        self.store.get_event(id).await
    }

    async fn create_event(&self, event: &Event) -> BubbleResult<()> {
        self.store.create_event(event).await?;
        self.invalidate().await
    }

    async fn count_events(&self) -> BubbleResult<u64> {
        self.store.count_events().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::demo_events;
    use crate::store::{MemoryEventStore, MemoryKvStore};
    use chrono::Utc;

    fn cache_over(events: Vec<Event>) -> (CacheService, MemoryEventStore, MemoryKvStore) {
        let store = MemoryEventStore::with_events(events);
        let kv = MemoryKvStore::new();
        let cache = CacheService::new(Arc::new(kv.clone()), Arc::new(store.clone()), 60);
        (cache, store, kv)
    }

    #[tokio::test]
    async fn list_populates_cache() {
        let (cache, _store, kv) = cache_over(demo_events(Utc::now()));
        assert!(kv.get(EVENTS_CACHE_KEY).await.unwrap().is_none());

        let events = cache.list_events().await.unwrap();
        let cached: Vec<Event> =
            serde_json::from_str(&kv.get(EVENTS_CACHE_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(cached, events);
    }

    #[tokio::test]
    async fn create_invalidates_cache() {
        let now = Utc::now();
        let (cache, _store, kv) = cache_over(demo_events(now));
        cache.warmup_cache().await;
        assert!(kv.get(EVENTS_CACHE_KEY).await.unwrap().is_some());

        let mut extra = demo_events(now).remove(0);
        extra.id = "new".to_string();
        cache.create_event(&extra).await.unwrap();
        assert!(kv.get(EVENTS_CACHE_KEY).await.unwrap().is_none());
        assert_eq!(cache.list_events().await.unwrap().len(), 9);
    }

    #[tokio::test]
    async fn corrupt_cache_falls_back_to_store() {
        let (cache, _store, kv) = cache_over(demo_events(Utc::now()));
        kv.set(EVENTS_CACHE_KEY, "not json").await.unwrap();
        assert_eq!(cache.list_events().await.unwrap().len(), 8);
    }
}
