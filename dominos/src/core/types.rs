//! Configuration document types.
//!
//! The document is persisted as JSON with camelCase keys. These types are the
//! typed view used once a document has passed [`crate::core::validator`]; the
//! validator itself runs on the raw JSON so it can report absent blocks.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::redact::mask_card_number;

/// Root persisted entity: customer, payment, store and preset data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub customer: CustomerInfo,
    pub payment: PaymentInfo,
    pub store: StoreInfo,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
}

/// Stored card details. Kept in cleartext on disk; see `config show` masking.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Card number, digits only. Hand-edited files may hold a JSON number.
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
    /// `MM/YY`.
    pub expiration: String,
    pub security_code: String,
    pub postal_code: String,
    #[serde(default, deserialize_with = "non_negative_amount")]
    pub tip_amount: Decimal,
}

impl std::fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentInfo")
            .field("number", &mask_card_number(&self.number))
            .field("expiration", &self.expiration)
            .field("security_code", &"***")
            .field("postal_code", &self.postal_code)
            .field("tip_amount", &self.tip_amount)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Store id as a string of digits.
    #[serde(rename = "storeID", deserialize_with = "string_or_number")]
    pub store_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Accept `"1234"` or `1234`; hand-edited documents use both.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            json_kind(&other)
        ))),
    }
}

/// Kind of a JSON value, for errors that must not echo the value itself.
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Accept `5`, `5.5`, `"5.00"` or `"$5"`; `null` is zero, negatives are rejected.
fn non_negative_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => return Ok(Decimal::ZERO),
        serde_json::Value::String(text) => text.trim().trim_start_matches('$').to_string(),
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected an amount, got {}",
                json_kind(&other)
            )));
        }
    };
    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| serde::de::Error::custom(format!("invalid amount '{raw}'")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(serde::de::Error::custom("amount must not be negative"));
    }
    Ok(amount)
}

/// Named template of line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name shown in summaries.
    pub name: String,
    pub items: Vec<PresetItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetItem {
    pub code: String,
    /// Zero is rejected at parse time.
    pub qty: NonZeroU32,
}
