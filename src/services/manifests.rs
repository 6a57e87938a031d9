//! Manifest service: builds the borrow manifest of a checkout

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    manifest::{Manifest, ManifestLine},
    models::enums::Category,
    repository::Repository,
};

#[derive(Clone)]
pub struct ManifestsService {
    repository: Repository,
}

impl ManifestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Assemble the manifest of a committed checkout. Returned records are
    /// included; the manifest documents the original hand-off.
    pub async fn build(&self, checkout_id: Uuid) -> AppResult<Manifest> {
        let records = self.repository.records.list_for_checkout(checkout_id).await?;
        let first = records
            .first()
            .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", checkout_id)))?;

        Ok(Manifest {
            borrower_name: first.borrower_name.clone(),
            borrower_contact: first.borrower_contact.clone(),
            generated_at: Utc::now(),
            lines: records
                .iter()
                .map(|r| ManifestLine {
                    item_id: r.item_id,
                    name: r.item_name.clone(),
                    category: Category::from(r.category),
                    quantity: r.quantity,
                })
                .collect(),
        })
    }
}
