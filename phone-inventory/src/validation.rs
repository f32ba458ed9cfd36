//! Request validation for phone creation
//!
//! [`CreatePhoneRequest`] holds the raw body fields and declares the create
//! rules through `validator`. A missing or blank field only reports
//! `required`; otherwise every failing rule contributes a message, so a field
//! can collect several messages at once.
//!
//! String inputs are trimmed before any rule runs.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use validator::{Validate, ValidateLength, ValidationError};

use crate::models::NewPhone;

/// Exact number of digits required for `quantity`
pub const QUANTITY_DIGITS: usize = 5;

/// A non-blank body value, with strings already trimmed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Input(Value);

impl Input {
    /// Wrap a body value, or `None` when it counts as missing
    pub fn present(value: Value) -> Option<Self> {
        let value = match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        };
        (!is_blank(&value)).then_some(Self(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    fn into_value(self) -> Value {
        self.0
    }
}

/// Character length for strings, element count for collections
impl ValidateLength<u64> for Input {
    fn length(&self) -> Option<u64> {
        let len = match &self.0 {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            other => other.to_string().chars().count(),
        };
        Some(len as u64)
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Input>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Input::present)
}

/// Body of `POST /phones`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePhoneRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "The company field is required."),
        custom(function = "string_input", message = "The company field must be a string."),
        length(
            max = 255,
            message = "The company field must not be greater than 255 characters."
        )
    )]
    pub company: Option<Input>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "The model field is required."),
        custom(function = "string_input", message = "The model field must be a string."),
        length(
            max = 255,
            message = "The model field must not be greater than 255 characters."
        )
    )]
    pub model: Option<Input>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "The quantity field is required."),
        custom(function = "integer_input", message = "The quantity field must be an integer."),
        custom(function = "five_digits", message = "The quantity field must be 5 digits.")
    )]
    pub quantity: Option<Input>,

    #[serde(default, deserialize_with = "present")]
    #[validate(
        required(message = "The price field is required."),
        custom(function = "numeric_input", message = "The price field must be a number."),
        custom(function = "minimum_price", message = "The price field must be at least 0.01.")
    )]
    pub price: Option<Input>,
}

impl CreatePhoneRequest {
    /// Read the create fields out of a request body; unknown keys are ignored
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(body.clone()))
    }

    /// Convert a validated request into an insertable record.
    ///
    /// Fails only for values that pass the rules but cannot be stored, such
    /// as a price beyond the decimal range.
    pub fn into_new_phone(self) -> Result<NewPhone, String> {
        let raw = |input: Option<Input>| input.map_or(Value::Null, Input::into_value);

        Ok(NewPhone {
            company: coerce_text("company", &raw(self.company))?,
            model: coerce_text("model", &raw(self.model))?,
            quantity: coerce_integer("quantity", &raw(self.quantity))?,
            price: coerce_decimal("price", &raw(self.price))?,
        })
    }
}

fn rule(passes: bool, code: &'static str) -> Result<(), ValidationError> {
    if passes {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn string_input(input: &Input) -> Result<(), ValidationError> {
    rule(input.value().is_string(), "string")
}

fn integer_input(input: &Input) -> Result<(), ValidationError> {
    rule(integer_value(input.value()).is_some(), "integer")
}

fn five_digits(input: &Input) -> Result<(), ValidationError> {
    rule(has_digits(input.value(), QUANTITY_DIGITS), "digits")
}

fn numeric_input(input: &Input) -> Result<(), ValidationError> {
    rule(numeric_text(input.value()).is_some(), "numeric")
}

fn minimum_price(input: &Input) -> Result<(), ValidationError> {
    rule(at_least(input, Decimal::new(1, 2)), "min")
}

/// Size comparison for a numeric field: the number itself when the value is
/// numeric, otherwise its length
fn at_least(input: &Input, min: Decimal) -> bool {
    let Some(text) = numeric_text(input.value()) else {
        return input
            .length()
            .is_some_and(|len| Decimal::from(len) >= min);
    };
    match parse_decimal(&text) {
        Some(value) => value >= min,
        // Beyond the decimal range: only the magnitude and sign matter here
        None => text
            .parse::<f64>()
            .ok()
            .zip(min.to_f64())
            .is_some_and(|(value, min)| value >= min),
    }
}

/// Field name to violation messages, as sent in the 401 body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the fields that failed
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Presence first, then type, then size
fn rule_rank(code: &str) -> u8 {
    match code {
        "required" => 0,
        "string" | "integer" | "numeric" => 1,
        _ => 2,
    }
}

impl From<&validator::ValidationErrors> for ValidationErrors {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, failures) in errors.field_errors() {
            let mut failures: Vec<&ValidationError> = failures.iter().collect();
            failures.sort_by_key(|failure| rule_rank(&failure.code));

            for failure in failures {
                let message = match &failure.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field),
                };
                out.add(&field, message);
            }
        }
        out
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => integer_from_number(n),
        Value::String(s) => integer_from_text(s),
        _ => None,
    }
}

fn has_digits(value: &Value, len: usize) -> bool {
    let text = match value {
        Value::Number(n) => match integer_from_number(n) {
            Some(i) => i.to_string(),
            None => return false,
        },
        Value::String(s) => s.clone(),
        _ => return false,
    };
    text.len() == len && text.bytes().all(|b| b.is_ascii_digit())
}

fn integer_from_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn integer_from_text(s: &str) -> Option<i64> {
    let t = s.trim();
    let digits = t.strip_prefix(['+', '-']).unwrap_or(t);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse::<i64>().ok()
}

/// Textual form of a JSON number or numeric string, `None` when not numeric.
///
/// Magnitude is not checked: `1e400` is numeric even though no column can
/// hold it.
fn numeric_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    let numeric = text.chars().all(allowed)
        && text.chars().any(|c| c.is_ascii_digit())
        && text.parse::<f64>().is_ok();
    numeric.then_some(text)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

/// Convert a body value into a text column value
pub(crate) fn coerce_text(field: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(format!("Column '{}' cannot be null", field)),
        _ => Err(format!("Invalid value for '{}': expected a string", field)),
    }
}

/// Convert a body value into an integer column value
pub(crate) fn coerce_integer(field: &str, value: &Value) -> Result<i32, String> {
    if value.is_null() {
        return Err(format!("Column '{}' cannot be null", field));
    }
    let wide = integer_value(value)
        .ok_or_else(|| format!("Invalid value for '{}': expected an integer", field))?;

    i32::try_from(wide).map_err(|_| format!("Value out of range for '{}'", field))
}

/// Convert a body value into a decimal column value
pub(crate) fn coerce_decimal(field: &str, value: &Value) -> Result<Decimal, String> {
    if value.is_null() {
        return Err(format!("Column '{}' cannot be null", field));
    }
    let text = numeric_text(value)
        .ok_or_else(|| format!("Invalid value for '{}': expected a number", field))?;

    parse_decimal(&text).ok_or_else(|| format!("Numeric value out of range for '{}'", field))
}
