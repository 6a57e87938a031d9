//! Business logic services

pub mod borrows;
pub mod inventory;
pub mod manifests;
pub mod session;
pub mod stats;
pub mod storage;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub inventory: inventory::InventoryService,
    pub borrows: borrows::BorrowsService,
    pub manifests: manifests::ManifestsService,
    pub stats: stats::StatsService,
    pub sessions: session::SessionService,
}

impl Services {
    /// Create all services with the given repository and storage client
    pub fn new(repository: Repository, storage: Arc<dyn storage::ObjectStorage>) -> Self {
        Self {
            inventory: inventory::InventoryService::new(repository.clone(), storage),
            borrows: borrows::BorrowsService::new(repository.clone()),
            manifests: manifests::ManifestsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            sessions: session::SessionService::new(),
        }
    }
}
