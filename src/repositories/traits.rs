//! Repository trait definitions
//!
//! Every collection repository implements [`Repository`], which gives the
//! web layer one CRUD contract regardless of table layout.

use async_trait::async_trait;

use crate::errors::RepositoryResult;

/// Core repository trait providing CRUD operations
///
/// # Type Parameters
///
/// * `T` - The entity type (e.g. Game, Promotion)
/// * `ID` - The identifier type (Uuid for every collection here)
#[async_trait]
pub trait Repository<T, ID: Send + 'static>: Send + Sync {
    /// Request type for creating new entities
    type CreateRequest;
    /// Request type for updating existing entities
    type UpdateRequest;
    /// Query type for filtering listings
    type Query;

    /// Find an entity by its ID
    ///
    /// * `Ok(Some(T))` - Entity found
    /// * `Ok(None)` - Entity not found
    async fn find_by_id(&self, id: ID) -> RepositoryResult<Option<T>>;

    /// Find every entity matching a query
    async fn find_all(&self, query: Self::Query) -> RepositoryResult<Vec<T>>;

    /// Create a new entity with generated ID and timestamps
    async fn create(&self, request: Self::CreateRequest) -> RepositoryResult<T>;

    /// Apply the provided fields of `request` to an existing entity
    ///
    /// Returns `RepositoryError::RecordNotFound` when `id` is unknown.
    async fn update(&self, id: ID, request: Self::UpdateRequest) -> RepositoryResult<T>;

    /// Delete an entity by ID, returning the removed row
    ///
    /// Returns `RepositoryError::RecordNotFound` when `id` is unknown.
    async fn delete(&self, id: ID) -> RepositoryResult<T>;

    /// Count entities matching a query
    async fn count(&self, query: Self::Query) -> RepositoryResult<u64>;

    /// Check if an entity exists by ID
    async fn exists(&self, id: ID) -> RepositoryResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Repositories whose records carry an on/off flag
#[async_trait]
pub trait ToggleRepository<T, ID: Send + 'static>: Repository<T, ID> {
    /// Set the flag, or flip it when `value` is `None`
    async fn set_active(&self, id: ID, value: Option<bool>) -> RepositoryResult<T>;
}

/// Paginated result wrapper
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
}

/// Repositories that can page through large listings
#[async_trait]
pub trait PaginatedRepository<T, ID: Send + 'static>: Repository<T, ID> {
    async fn find_paginated(
        &self,
        query: Self::Query,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<PaginatedResult<T>>;
}
