use async_trait::async_trait;
use sqlx::PgPool;

use super::EventStore;
use crate::error::BubbleResult;
use crate::models::{Event, EventRow};

const EVENT_COLUMNS: &str = "id, title, occurs_at, city, tags, image_url, recommended_majors, \
     is_paid, price_amount, distance_bucket, is_opposite_major";

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_events(&self) -> BubbleResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY occurs_at, created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn get_event(&self, id: &str) -> BubbleResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    async fn create_event(&self, event: &Event) -> BubbleResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, occurs_at, city, tags, image_url, recommended_majors,
                is_paid, price_amount, distance_bucket, is_opposite_major
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(event.occurs_at)
        .bind(&event.city)
        .bind(&event.tags)
        .bind(&event.image_url)
        .bind(&event.recommended_majors)
        .bind(event.is_paid)
        .bind(event.price_amount)
        .bind(event.distance_bucket.as_str())
        .bind(event.is_opposite_major)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Inserted event {} ({})", event.id, event.title);
        Ok(())
    }

    async fn count_events(&self) -> BubbleResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
