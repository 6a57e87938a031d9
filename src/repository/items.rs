//! Items repository: catalog CRUD and the availability ledger
//!
//! All mutations of `borrowed_quantity` live in this file: the conditional
//! reserve/release updates used inside checkout and return transactions, and
//! the administrative overwrite. Every path keeps the invariant
//! `0 <= borrowed_quantity <= total_quantity`.

use chrono::Utc;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, UpdateItem},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

/// Atomically take `quantity` units of an item. The WHERE clause re-validates
/// availability and the manual state in the same statement, so a concurrent
/// checkout cannot over-commit. Returns false when the condition failed.
pub(crate) async fn reserve_units<'e, E>(executor: E, item_id: i32, quantity: i32) -> AppResult<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE items
        SET borrowed_quantity = borrowed_quantity + $2, updated_at = $3
        WHERE id = $1
          AND state = 0
          AND borrowed_quantity + $2 <= total_quantity
        "#,
    )
    .bind(item_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Atomically give back `quantity` units, clamping at zero.
pub(crate) async fn release_units<'e, E>(executor: E, item_id: i32, quantity: i32) -> AppResult<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        UPDATE items
        SET borrowed_quantity = GREATEST(borrowed_quantity - $2, 0), updated_at = $3
        WHERE id = $1
        "#,
    )
    .bind(item_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all items
    pub async fn list(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY category, name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Create an item
    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let row = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category, location, total_quantity, borrowed_quantity, state)
            VALUES ($1, $2, $3, $4, 0, 0)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.category)
        .bind(&data.location)
        .bind(data.total_quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an item. Lowering `total_quantity` below the currently
    /// borrowed count is rejected to keep the ledger invariant.
    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.location, "location");
        add_field!(data.total_quantity, "total_quantity");
        add_field!(data.state, "state");

        let mut query = format!("UPDATE items SET {} WHERE id = {}", sets.join(", "), id);
        if let Some(total) = data.total_quantity {
            query.push_str(&format!(" AND borrowed_quantity <= {}", total));
        }
        query.push_str(" RETURNING *");

        let mut builder = sqlx::query_as::<_, Item>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.location);
        bind_field!(data.total_quantity);
        bind_field!(data.state);

        match builder.fetch_optional(&self.pool).await? {
            Some(item) => Ok(item),
            None => {
                // Distinguish a missing item from a rejected quantity change
                let current = self.get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Cannot set total_quantity below the {} borrowed units of '{}'",
                    current.borrowed_quantity, current.name
                )))
            }
        }
    }

    /// Hard-delete an item from the catalog. Operator-only; borrow records
    /// referencing it are kept as the audit trail.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }

    /// Attach an uploaded image URL
    pub async fn set_image_url(&self, id: i32, url: &str) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "UPDATE items SET image_url = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Administrative overwrite of the borrowed count. Bypasses the clamped
    /// arithmetic intentionally, but still rejects values outside
    /// `[0, total_quantity]` before writing.
    pub async fn force_set_borrowed(&self, id: i32, value: i32) -> AppResult<Item> {
        if value < 0 {
            return Err(AppError::Validation(
                "borrowed_quantity must not be negative".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET borrowed_quantity = $2, updated_at = $3
            WHERE id = $1 AND $2 <= total_quantity
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(value)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(item) => Ok(item),
            None => {
                let current = self.get_by_id(id).await?;
                Err(AppError::Validation(format!(
                    "borrowed_quantity {} is outside [0, {}] for '{}'",
                    value, current.total_quantity, current.name
                )))
            }
        }
    }

    /// Sum of owned and borrowed units per category code (for stats)
    pub async fn unit_counts_by_category(&self) -> AppResult<Vec<(i16, i64, i64)>> {
        let rows = sqlx::query_as::<_, (i16, i64, i64)>(
            r#"
            SELECT category,
                   COALESCE(SUM(total_quantity), 0)::bigint,
                   COALESCE(SUM(borrowed_quantity), 0)::bigint
            FROM items
            GROUP BY category
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
