//! Phone persistence
//!
//! [`PhoneRepository`] is the seam between the HTTP handlers and storage.
//! Two backends implement it:
//!
//! - [`PgPhoneRepository`]: the `phones` table via sqlx
//! - [`MemoryPhoneRepository`]: an in-process map for development and tests
//!
//! [`PhoneStore`] picks one at startup based on configuration.
//!
//! # Example
//!
//! ```rust
//! use phone_inventory::models::NewPhone;
//! use phone_inventory::repository::{MemoryPhoneRepository, Pagination, PhoneRepository};
//! use rust_decimal::Decimal;
//!
//! # tokio_test_block(async {
//! let repo = MemoryPhoneRepository::new();
//! let phone = repo
//!     .create(NewPhone {
//!         company: "apple".into(),
//!         model: "iphone 16 pro".into(),
//!         quantity: 12345,
//!         price: Decimal::from(1099),
//!     })
//!     .await?;
//!
//! let page = repo.list(Pagination::default()).await?;
//! assert_eq!(page.items[0].id, phone.id);
//! # Ok::<(), phone_inventory::repository::RepositoryError>(())
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod memory;
mod pagination;
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryPhoneRepository;
pub use pagination::{Page, Pagination, PER_PAGE};
pub use postgres::PgPhoneRepository;
pub use traits::{PhoneRepository, RepositoryResult};

use crate::models::{NewPhone, Phone, PhoneChanges, PhoneId};

/// Backend selected at startup
#[derive(Debug)]
pub enum PhoneStore {
    Postgres(PgPhoneRepository),
    Memory(MemoryPhoneRepository),
}

impl PhoneRepository for PhoneStore {
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Page<Phone>> {
        match self {
            Self::Postgres(repo) => repo.list(pagination).await,
            Self::Memory(repo) => repo.list(pagination).await,
        }
    }

    async fn create(&self, data: NewPhone) -> RepositoryResult<Phone> {
        match self {
            Self::Postgres(repo) => repo.create(data).await,
            Self::Memory(repo) => repo.create(data).await,
        }
    }

    async fn find_by_id(&self, id: PhoneId) -> RepositoryResult<Option<Phone>> {
        match self {
            Self::Postgres(repo) => repo.find_by_id(id).await,
            Self::Memory(repo) => repo.find_by_id(id).await,
        }
    }

    async fn update(&self, id: PhoneId, changes: PhoneChanges) -> RepositoryResult<Phone> {
        match self {
            Self::Postgres(repo) => repo.update(id, changes).await,
            Self::Memory(repo) => repo.update(id, changes).await,
        }
    }

    async fn delete(&self, id: PhoneId) -> RepositoryResult<()> {
        match self {
            Self::Postgres(repo) => repo.delete(id).await,
            Self::Memory(repo) => repo.delete(id).await,
        }
    }

    fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(repo) => repo.backend(),
            Self::Memory(repo) => repo.backend(),
        }
    }

    async fn ping(&self) -> RepositoryResult<()> {
        match self {
            Self::Postgres(repo) => repo.ping().await,
            Self::Memory(repo) => repo.ping().await,
        }
    }
}
