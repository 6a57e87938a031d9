//! Inventory service: catalog CRUD, ledger override, image attachment

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::item::{CreateItem, Item, ItemWithStatus, UpdateItem},
    repository::Repository,
    services::storage::ObjectStorage,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    storage: Arc<dyn ObjectStorage>,
}

impl InventoryService {
    pub fn new(repository: Repository, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { repository, storage }
    }

    /// List all items with computed availability status
    pub async fn list(&self) -> AppResult<Vec<ItemWithStatus>> {
        let items = self.repository.items.list().await?;
        Ok(items.into_iter().map(ItemWithStatus::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ItemWithStatus> {
        let item = self.repository.items.get_by_id(id).await?;
        Ok(item.into())
    }

    /// Create an item, optionally with a photo. A storage failure degrades
    /// to "item saved without image" and is reported in the returned
    /// warning, never silently dropped.
    pub async fn create(
        &self,
        data: &CreateItem,
        image: Option<(Vec<u8>, String)>,
    ) -> AppResult<(Item, Option<String>)> {
        let item = self.repository.items.create(data).await?;

        let (url, warning) =
            resolve_image_upload(self.storage.as_ref(), item.id, image, &item.name).await;
        let item = match url {
            Some(url) => self.repository.items.set_image_url(item.id, &url).await?,
            None => item,
        };
        Ok((item, warning))
    }

    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        self.repository.items.update(id, data).await
    }

    /// Operator-only hard delete
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.items.delete(id).await
    }

    /// Attach or replace the item photo. Unlike creation, a storage failure
    /// here fails the request outright; there is nothing to degrade to.
    pub async fn attach_image(
        &self,
        id: i32,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<Item> {
        // Existence check before the upload round-trip
        let item = self.repository.items.get_by_id(id).await?;
        let key = image_key(item.id, content_type);
        let url = self.storage.upload(&key, bytes, content_type).await?;
        self.repository.items.set_image_url(id, &url).await
    }

    /// Administrative overwrite of the borrowed count
    pub async fn force_set_borrowed(&self, id: i32, value: i32) -> AppResult<ItemWithStatus> {
        let item = self.repository.items.force_set_borrowed(id, value).await?;
        Ok(item.into())
    }
}

/// Object key for an item photo, extension derived from the content type
fn image_key(item_id: i32, content_type: &str) -> String {
    let extension = match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    };
    format!("items/{}.{}", item_id, extension)
}

/// Try to upload an item photo. Returns `(public_url, warning)`; a storage
/// failure yields no URL and a warning naming the item, so the surrounding
/// create is never blocked by the object store.
async fn resolve_image_upload(
    storage: &dyn ObjectStorage,
    item_id: i32,
    image: Option<(Vec<u8>, String)>,
    item_name: &str,
) -> (Option<String>, Option<String>) {
    let Some((bytes, content_type)) = image else {
        return (None, None);
    };

    let key = image_key(item_id, &content_type);
    match storage.upload(&key, bytes, &content_type).await {
        Ok(url) => (Some(url), None),
        Err(e) => {
            tracing::warn!("Image upload for '{}' failed: {}", item_name, e);
            (
                None,
                Some(format!("'{}' was saved without its image: {}", item_name, e)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::storage::MockObjectStorage;

    #[test]
    fn image_key_maps_content_type_to_extension() {
        assert_eq!(image_key(4, "image/png"), "items/4.png");
        assert_eq!(image_key(4, "image/jpeg"), "items/4.jpg");
        assert_eq!(image_key(9, "application/octet-stream"), "items/9.jpg");
    }

    #[tokio::test]
    async fn upload_failure_degrades_to_item_without_image() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .returning(|_, _, _| Err(AppError::Storage("connection reset".to_string())));

        let (url, warning) =
            resolve_image_upload(&storage, 4, Some((vec![1, 2, 3], "image/png".to_string())), "Drill")
                .await;

        assert!(url.is_none());
        let warning = warning.expect("degradation must be reported");
        assert!(warning.contains("Drill"));
        assert!(warning.contains("without its image"));
    }

    #[tokio::test]
    async fn upload_success_yields_public_url() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .returning(|key, _, _| Ok(format!("https://cdn.example.org/{}", key)));

        let (url, warning) =
            resolve_image_upload(&storage, 4, Some((vec![1], "image/png".to_string())), "Drill")
                .await;

        assert_eq!(url.as_deref(), Some("https://cdn.example.org/items/4.png"));
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn no_image_is_not_a_warning() {
        let storage = MockObjectStorage::new();
        let (url, warning) = resolve_image_upload(&storage, 4, None, "Drill").await;
        assert!(url.is_none());
        assert!(warning.is_none());
    }
}
