//! Ordering provider boundary.
//!
//! The [`OrderingProvider`] trait decouples the order pipeline, setup wizard
//! and tracking lookup from the actual ordering backend. [`http::HttpProvider`]
//! talks to the public ordering API; tests use a scripted provider that
//! returns predetermined results without touching the network.

pub mod http;
pub mod types;

use async_trait::async_trait;

pub use types::{
    Amounts, Customer, Item, NearbyStore, Order, Payment, ProviderError, StatusItem, TrackedOrder,
};

/// Capabilities the CLI needs from an ordering backend.
///
/// Every call is a single attempt; callers never retry.
#[async_trait]
pub trait OrderingProvider: Send + Sync {
    /// Check the order's items and address. May assign `order.order_id`.
    async fn validate(&self, order: &mut Order) -> Result<(), ProviderError>;

    /// Price the order. Stores the result in `order.amounts` and returns it.
    async fn price(&self, order: &mut Order) -> Result<Amounts, ProviderError>;

    /// Place the order with the payments already attached.
    async fn place(&self, order: &mut Order) -> Result<(), ProviderError>;

    /// Stores near a free-text address, in provider order.
    async fn nearby_stores(&self, address: &str) -> Result<Vec<NearbyStore>, ProviderError>;

    /// Active orders for a phone number, most relevant first.
    async fn orders_by_phone(&self, phone: &str) -> Result<Vec<TrackedOrder>, ProviderError>;
}
