//! Provider-native order, store and tracking types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::redact::mask_card_number;

/// Failure reported by the ordering provider. The message is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Customer as the provider sees it: one free-text address line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A single-unit line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub code: String,
}

impl Item {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Charged amounts returned by pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    /// Customer-facing total.
    pub customer: Decimal,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Payment {
    pub amount: Decimal,
    pub number: String,
    pub expiration: String,
    pub security_code: String,
    pub postal_code: String,
    pub tip_amount: Decimal,
}

impl std::fmt::Debug for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payment")
            .field("amount", &self.amount)
            .field("number", &mask_card_number(&self.number))
            .field("postal_code", &self.postal_code)
            .field("tip_amount", &self.tip_amount)
            .finish_non_exhaustive()
    }
}

/// Delivery order bound to a store and a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub customer: Customer,
    pub store_id: u32,
    pub items: Vec<Item>,
    pub payments: Vec<Payment>,
    /// Assigned by the provider during validation.
    pub order_id: Option<String>,
    /// Set by pricing.
    pub amounts: Option<Amounts>,
}

impl Order {
    pub fn new(customer: Customer, store_id: u32) -> Self {
        Self {
            customer,
            store_id,
            items: Vec::new(),
            payments: Vec::new(),
            order_id: None,
            amounts: None,
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }
}

/// Store returned by the nearby-store lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStore {
    pub store_id: String,
    pub description: String,
    pub distance_miles: f64,
    pub phone: Option<String>,
    pub online_capable: bool,
    pub delivery_capable: bool,
}

/// Order status returned by the phone lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedOrder {
    pub status: String,
    pub order_id: Option<String>,
    pub store_id: Option<String>,
    /// Timestamp as reported by the tracker.
    pub taken_at: Option<String>,
    pub checklist: Vec<StatusItem>,
    pub estimated_wait_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub name: String,
    pub complete: bool,
}
