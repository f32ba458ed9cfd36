//! `/phones` request handlers
//!
//! Id-scoped handlers resolve the path id through [`find_or_fail`] before
//! doing anything else, so an unknown or malformed id always ends in a bare
//! 404. Create bodies go through the validation rules; update bodies are
//! applied as given.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::{Map, Value};
use validator::Validate;

use super::error::{ApiError, ApiOperation};
use super::response::{
    DeletedResponse, PhoneResponse, CREATED_MESSAGE, SHOW_MESSAGE, UPDATED_MESSAGE,
};
use crate::models::{Phone, PhoneChanges, PhoneId};
use crate::repository::{Page, Pagination, PhoneRepository};
use crate::state::AppState;
use crate::validation::{CreatePhoneRequest, ValidationErrors};

/// Last value given for a query key.
///
/// The listing reads its query as raw pairs so that junk like `?page=abc`
/// or a repeated `page` key never fails extraction.
fn last_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Resolve a raw path id to a stored phone, or `NotFound`
pub async fn find_or_fail<R: PhoneRepository>(
    repository: &R,
    raw_id: &str,
    operation: ApiOperation,
) -> Result<Phone, ApiError> {
    let not_found = || ApiError::not_found("Phone", raw_id).with_operation(operation);

    let id: PhoneId = raw_id.trim().parse().map_err(|_| not_found())?;
    repository
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from(e).with_operation(operation))?
        .ok_or_else(not_found)
}

/// Parse a request body as a JSON object.
///
/// Missing, malformed or non-object bodies read as an empty object.
fn body_object(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            if !body.is_empty() {
                tracing::debug!("Request body is not JSON: {}", e);
            }
            Map::new()
        }
    }
}

/// `GET /phones?page=N`
pub async fn list<R: PhoneRepository>(
    State(state): State<AppState<R>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Page<Phone>>, ApiError> {
    let pagination = Pagination::from_query(last_param(&params, "page"));

    let page = state
        .repository()
        .list(pagination)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::List))?;

    tracing::debug!(
        page = page.current_page,
        returned = page.items.len(),
        total = page.total_items,
        "Listed phones"
    );

    Ok(Json(page))
}

/// `POST /phones`
pub async fn create<R: PhoneRepository>(
    State(state): State<AppState<R>>,
    body: Bytes,
) -> Result<PhoneResponse, ApiError> {
    let request = CreatePhoneRequest::from_body(&body_object(&body))
        .map_err(|e| ApiError::internal(ApiOperation::Create, e.to_string()))?;
    request
        .validate()
        .map_err(|errors| ApiError::validation_failed(ValidationErrors::from(&errors)))?;

    // Passing the rules does not guarantee the value fits its column
    let new_phone = request
        .into_new_phone()
        .map_err(|message| ApiError::internal(ApiOperation::Create, message))?;

    let phone = state
        .repository()
        .create(new_phone)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Create))?;

    tracing::info!(phone_id = phone.id, company = %phone.company, "Phone created");
    Ok(PhoneResponse::new(CREATED_MESSAGE, phone))
}

/// `GET /phones/{id}`
pub async fn show<R: PhoneRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<PhoneResponse, ApiError> {
    let phone = find_or_fail(state.repository(), &id, ApiOperation::Get).await?;

    tracing::debug!(phone_id = phone.id, "Fetched phone");
    Ok(PhoneResponse::new(SHOW_MESSAGE, phone))
}

/// `PUT|PATCH /phones/{id}`
pub async fn update<R: PhoneRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<PhoneResponse, ApiError> {
    let phone = find_or_fail(state.repository(), &id, ApiOperation::Update).await?;

    let changes = PhoneChanges::from_body(&body_object(&body))
        .map_err(|message| ApiError::internal(ApiOperation::Update, message))?;

    // Nothing recognised in the body: the row is left untouched
    if changes.is_empty() {
        return Ok(PhoneResponse::new(UPDATED_MESSAGE, phone));
    }

    let phone = state
        .repository()
        .update(phone.id, changes)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Update))?;

    tracing::info!(phone_id = phone.id, "Phone updated");
    Ok(PhoneResponse::new(UPDATED_MESSAGE, phone))
}

/// `DELETE /phones/{id}`
pub async fn destroy<R: PhoneRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<DeletedResponse, ApiError> {
    let phone = find_or_fail(state.repository(), &id, ApiOperation::Delete).await?;

    state
        .repository()
        .delete(phone.id)
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Delete))?;

    tracing::info!(phone_id = phone.id, "Phone deleted");
    Ok(DeletedResponse::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiErrorKind;
    use crate::models::NewPhone;
    use crate::repository::MemoryPhoneRepository;
    use rust_decimal::Decimal;

    async fn repo_with_one() -> MemoryPhoneRepository {
        let repo = MemoryPhoneRepository::new();
        repo.create(NewPhone {
            company: "samsung".to_string(),
            model: "galaxy s24".to_string(),
            quantity: 20000,
            price: Decimal::from(899),
        })
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_find_or_fail_resolves() {
        let repo = repo_with_one().await;
        let phone = find_or_fail(&repo, "1", ApiOperation::Get).await.unwrap();
        assert_eq!(phone.company, "samsung");
    }

    #[tokio::test]
    async fn test_find_or_fail_rejects_unknown_and_malformed_ids() {
        let repo = repo_with_one().await;
        for raw in ["2", "abc", "1.5", "", "-1"] {
            let err = find_or_fail(&repo, raw, ApiOperation::Update)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::NotFound, "id {raw:?}");
            assert_eq!(err.operation, ApiOperation::Update);
        }
    }

    #[test]
    fn test_last_param_wins() {
        let params = vec![
            ("page".to_string(), "1".to_string()),
            ("sort".to_string(), "id".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        assert_eq!(last_param(&params, "page"), Some("2"));
        assert_eq!(last_param(&params, "limit"), None);
    }

    #[test]
    fn test_body_object_keeps_out_of_range_numbers() {
        let body = body_object(br#"{"company": "apple", "price": 1e400}"#);
        assert_eq!(body.len(), 2);
        assert_eq!(body["price"].to_string(), "1e400");
    }

    #[test]
    fn test_body_object_is_lenient() {
        assert!(body_object(b"").is_empty());
        assert!(body_object(b"not json").is_empty());
        assert!(body_object(b"[1, 2]").is_empty());
        assert_eq!(body_object(br#"{"price": "500"}"#).len(), 1);
    }
}
