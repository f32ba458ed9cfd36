//! Phone record and its write-side inputs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{coerce_decimal, coerce_integer, coerce_text};

/// Phone identifier (surrogate primary key)
pub type PhoneId = i64;

/// A persisted phone record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Phone {
    pub id: PhoneId,
    pub company: String,
    pub model: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Phone {
    /// Apply a partial update in place, touching `updated_at`
    pub fn apply(&mut self, changes: PhoneChanges, now: DateTime<Utc>) {
        if let Some(company) = changes.company {
            self.company = company;
        }
        if let Some(model) = changes.model {
            self.model = model;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        self.updated_at = now;
    }
}

/// Fields for inserting a new phone, produced by [`crate::validation::CreatePhoneRequest::into_new_phone`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhone {
    pub company: String,
    pub model: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Partial update: `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneChanges {
    pub company: Option<String>,
    pub model: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
}

impl PhoneChanges {
    /// Collect every recognised field from a request body.
    ///
    /// No business rules are checked here. A value is rejected only when it
    /// cannot be stored in its column at all (e.g. `quantity: "many"`).
    /// Unknown keys are ignored.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, String> {
        let mut changes = Self::default();

        if let Some(value) = body.get("company") {
            changes.company = Some(coerce_text("company", value)?);
        }
        if let Some(value) = body.get("model") {
            changes.model = Some(coerce_text("model", value)?);
        }
        if let Some(value) = body.get("quantity") {
            changes.quantity = Some(coerce_integer("quantity", value)?);
        }
        if let Some(value) = body.get("price") {
            changes.price = Some(coerce_decimal("price", value)?);
        }

        Ok(changes)
    }

    /// Whether the update carries no recognised fields
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.model.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }
}
