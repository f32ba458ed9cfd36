//! PostgreSQL phone store

use sqlx::PgPool;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Page, Pagination};
use super::traits::{PhoneRepository, RepositoryResult};
use crate::models::{NewPhone, Phone, PhoneChanges, PhoneId};

const PHONE_COLUMNS: &str = "id, company, model, quantity, price, created_at, updated_at";

/// Phone store backed by the `phones` table
#[derive(Debug, Clone)]
pub struct PgPhoneRepository {
    pool: PgPool,
}

impl PgPhoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn at(operation: RepositoryOperation) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| RepositoryError::from(e).with_operation(operation)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl PhoneRepository for PgPhoneRepository {
    async fn list(&self, pagination: Pagination) -> RepositoryResult<Page<Phone>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phones")
            .fetch_one(&self.pool)
            .await
            .map_err(at(RepositoryOperation::Count))?;

        let items = sqlx::query_as::<_, Phone>(&format!(
            "SELECT {PHONE_COLUMNS} FROM phones ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(to_i64(pagination.limit))
        .bind(to_i64(pagination.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(at(RepositoryOperation::List))?;

        Ok(Page::new(items, &pagination, total.max(0) as u64))
    }

    async fn create(&self, data: NewPhone) -> RepositoryResult<Phone> {
        sqlx::query_as::<_, Phone>(&format!(
            "INSERT INTO phones (company, model, quantity, price) \
             VALUES ($1, $2, $3, $4) RETURNING {PHONE_COLUMNS}"
        ))
        .bind(data.company)
        .bind(data.model)
        .bind(data.quantity)
        .bind(data.price)
        .fetch_one(&self.pool)
        .await
        .map_err(at(RepositoryOperation::Create))
    }

    async fn find_by_id(&self, id: PhoneId) -> RepositoryResult<Option<Phone>> {
        sqlx::query_as::<_, Phone>(&format!(
            "SELECT {PHONE_COLUMNS} FROM phones WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(at(RepositoryOperation::FindById))
    }

    async fn update(&self, id: PhoneId, changes: PhoneChanges) -> RepositoryResult<Phone> {
        sqlx::query_as::<_, Phone>(&format!(
            "UPDATE phones SET \
                company = COALESCE($2, company), \
                model = COALESCE($3, model), \
                quantity = COALESCE($4, quantity), \
                price = COALESCE($5, price), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {PHONE_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.company)
        .bind(changes.model)
        .bind(changes.quantity)
        .bind(changes.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(at(RepositoryOperation::Update))?
        .ok_or_else(|| {
            RepositoryError::not_found("Phone", id.to_string())
                .with_operation(RepositoryOperation::Update)
        })
    }

    async fn delete(&self, id: PhoneId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM phones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(at(RepositoryOperation::Delete))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Phone", id.to_string())
                .with_operation(RepositoryOperation::Delete));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(at(RepositoryOperation::Ping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{RepositoryErrorKind, PER_PAGE};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_error_mapping_keeps_operation() {
        let err = at(RepositoryOperation::Delete)(sqlx::Error::PoolTimedOut);
        assert_eq!(err.operation, RepositoryOperation::Delete);
        assert_eq!(err.kind, RepositoryErrorKind::Timeout);
    }

    #[test]
    fn test_bind_values_clamp() {
        assert_eq!(to_i64(3), 3);
        assert_eq!(to_i64(u64::MAX), i64::MAX);
    }

    // The tests below run against a live server:
    // DATABASE_URL=postgres://... cargo test -- --ignored

    fn iphone(price: &str) -> NewPhone {
        NewPhone {
            company: "apple".to_string(),
            model: "iphone 16 pro".to_string(),
            quantity: 12345,
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_partial_update_keeps_other_columns(pool: PgPool) {
        let repo = PgPhoneRepository::new(pool);
        let created = repo.create(iphone("1099")).await.unwrap();
        assert_eq!(created.price.to_string(), "1099.00");

        let updated = repo
            .update(
                created.id,
                PhoneChanges {
                    price: Some(Decimal::from(500)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price.to_string(), "500.00");
        assert_eq!(updated.company, "apple");
        assert_eq!(updated.model, "iphone 16 pro");
        assert_eq!(updated.quantity, 12345);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_price_column_scale_and_precision(pool: PgPool) {
        let repo = PgPhoneRepository::new(pool);

        let phone = repo.create(iphone("19.999")).await.unwrap();
        assert_eq!(phone.price.to_string(), "20.00");

        let err = repo.create(iphone("100000000")).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::DatabaseError);
        assert_eq!(err.operation, RepositoryOperation::Create);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_pages_and_missing_rows(pool: PgPool) {
        let repo = PgPhoneRepository::new(pool);
        for _ in 0..4 {
            repo.create(iphone("10")).await.unwrap();
        }

        let second = repo.list(Pagination::page(2, PER_PAGE)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.total_items, 4);
        assert_eq!(second.total_pages, 2);
        let last_id = second.items[0].id;

        repo.delete(last_id).await.unwrap();
        assert!(repo.find_by_id(last_id).await.unwrap().is_none());
        assert!(repo.delete(last_id).await.unwrap_err().is_not_found());

        let err = repo
            .update(last_id, PhoneChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::Update);

        repo.ping().await.unwrap();
    }
}
