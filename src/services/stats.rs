//! Statistics service

use crate::{
    api::stats::{CategoryUnits, StatsResponse},
    error::AppResult,
    models::enums::Category,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counts: catalog size, unit totals, open records,
    /// per-category unit breakdown.
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await?;

        let (total_units, borrowed_units): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_quantity), 0)::bigint,
                   COALESCE(SUM(borrowed_quantity), 0)::bigint
            FROM items
            "#,
        )
        .fetch_one(pool)
        .await?;

        let active_records = self.repository.records.count_active().await?;

        let categories = self
            .repository
            .items
            .unit_counts_by_category()
            .await?
            .into_iter()
            .map(|(code, total, borrowed)| CategoryUnits {
                category: Category::from(code).to_string(),
                total_units: total,
                borrowed_units: borrowed,
            })
            .collect();

        Ok(StatsResponse {
            item_count,
            total_units,
            borrowed_units,
            available_units: total_units - borrowed_units,
            active_records,
            categories,
        })
    }
}
