//! In-process phone store
//!
//! Used when no `[database]` section is configured and throughout the test
//! suite. Writers are serialised through a single `RwLock`; ids come from a
//! monotonically increasing counter and are never reused after a delete.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Page, Pagination};
use super::traits::{PhoneRepository, RepositoryResult};
use crate::models::{NewPhone, Phone, PhoneChanges, PhoneId};

/// Scale of the `price` column
const PRICE_SCALE: u32 = 2;

/// Smallest magnitude that no longer fits `NUMERIC(10,2)`
const PRICE_LIMIT: i64 = 100_000_000;

/// Store prices the way `NUMERIC(10,2)` does: exactly two decimal places,
/// at most eight digits before the point
fn to_column_scale(price: Decimal, operation: RepositoryOperation) -> RepositoryResult<Decimal> {
    let mut price = price;
    price.rescale(PRICE_SCALE);
    if price.abs() >= Decimal::from(PRICE_LIMIT) {
        return Err(RepositoryError::database_error(
            operation,
            "numeric field overflow",
        ));
    }
    Ok(price)
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<PhoneId, Phone>,
    last_id: PhoneId,
}

/// Phone store backed by an ordered map
#[derive(Debug, Default)]
pub struct MemoryPhoneRepository {
    inner: RwLock<Inner>,
}

impl MemoryPhoneRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhoneRepository for MemoryPhoneRepository {
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Page<Phone>> {
        let inner = self.inner.read().await;
        let total = inner.rows.len() as u64;
        let skip = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(pagination.limit).unwrap_or(usize::MAX);

        let items = inner.rows.values().skip(skip).take(take).cloned().collect();
        Ok(Page::new(items, &pagination, total))
    }

    async fn create(&self, data: NewPhone) -> RepositoryResult<Phone> {
        let price = to_column_scale(data.price, RepositoryOperation::Create)?;

        let mut inner = self.inner.write().await;
        let id = inner.last_id.checked_add(1).ok_or_else(|| {
            RepositoryError::database_error(RepositoryOperation::Create, "phone id sequence exhausted")
        })?;
        inner.last_id = id;

        let now = Utc::now();
        let phone = Phone {
            id,
            company: data.company,
            model: data.model,
            quantity: data.quantity,
            price,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(id, phone.clone());
        Ok(phone)
    }

    async fn find_by_id(&self, id: PhoneId) -> RepositoryResult<Option<Phone>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: PhoneId, mut changes: PhoneChanges) -> RepositoryResult<Phone> {
        let mut inner = self.inner.write().await;
        let phone = inner.rows.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found("Phone", id.to_string())
                .with_operation(RepositoryOperation::Update)
        })?;

        changes.price = changes
            .price
            .map(|price| to_column_scale(price, RepositoryOperation::Update))
            .transpose()?;
        phone.apply(changes, Utc::now());
        Ok(phone.clone())
    }

    async fn delete(&self, id: PhoneId) -> RepositoryResult<()> {
        self.inner
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| {
                RepositoryError::not_found("Phone", id.to_string())
                    .with_operation(RepositoryOperation::Delete)
            })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
