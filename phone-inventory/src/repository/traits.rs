//! Repository trait for phone persistence
//!
//! Async methods use RPITIT (Return Position Impl Trait In Traits), so no
//! `async_trait` boxing is involved.

use std::future::Future;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Page, Pagination};
use crate::models::{NewPhone, Phone, PhoneChanges, PhoneId};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// CRUD operations over the phone inventory
///
/// Implementations are shared across request tasks behind an `Arc`, so they
/// must be `Send + Sync`. Listings are always ordered by `id` ascending.
pub trait PhoneRepository: Send + Sync + 'static {
    /// Fetch one page of phones together with the table totals.
    ///
    /// A page past the end yields an empty item list, not an error.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Page<Phone>>> + Send;

    /// Insert a new phone and return the stored row with its generated id
    /// and timestamps
    fn create(&self, data: NewPhone) -> impl Future<Output = RepositoryResult<Phone>> + Send;

    /// Returns `Ok(None)` when no phone has this id
    fn find_by_id(
        &self,
        id: PhoneId,
    ) -> impl Future<Output = RepositoryResult<Option<Phone>>> + Send;

    /// Apply the provided subset of fields and refresh `updated_at`.
    ///
    /// Fails with `NotFound` if the phone does not exist.
    fn update(
        &self,
        id: PhoneId,
        changes: PhoneChanges,
    ) -> impl Future<Output = RepositoryResult<Phone>> + Send;

    /// Permanently remove a phone. Fails with `NotFound` if absent.
    fn delete(&self, id: PhoneId) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Short backend name for logs and readiness output
    fn backend(&self) -> &'static str;

    /// Cheap connectivity check used by the readiness probe
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Like [`find_by_id`](Self::find_by_id) but absence is an error
    fn get(&self, id: PhoneId) -> impl Future<Output = RepositoryResult<Phone>> + Send {
        async move {
            self.find_by_id(id).await?.ok_or_else(|| {
                RepositoryError::not_found("Phone", id.to_string())
                    .with_operation(RepositoryOperation::FindById)
            })
        }
    }
}
