//! Test-only fixtures: a complete configuration document, an in-memory
//! prompter and a scripted ordering provider.

use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::core::types::ConfigDocument;
use crate::io::prompt::Prompter;
use crate::provider::{Amounts, NearbyStore, Order, OrderingProvider, ProviderError, TrackedOrder};

/// Prompter reading scripted answers and writing into a buffer.
pub type ScriptedPrompter = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

/// Complete, valid document as raw JSON.
pub fn sample_document_json() -> Value {
    json!({
        "customer": {
            "firstName": "Test",
            "lastName": "User",
            "email": "test@example.com",
            "phone": "555-123-4567",
            "address": {
                "street": "123 Main St",
                "city": "Portland",
                "region": "OR",
                "postalCode": "97201"
            }
        },
        "payment": {
            "number": "4111111111111111",
            "expiration": "12/27",
            "securityCode": "123",
            "postalCode": "97201",
            "tipAmount": 5
        },
        "store": {
            "storeID": "1234",
            "name": "Downtown Portland",
            "phone": "503-555-0100"
        },
        "presets": {
            "test": {
                "name": "Test Pizza",
                "items": [{"code": "PIZZA123", "qty": 1}]
            }
        }
    })
}

/// [`sample_document_json`] parsed into the typed document.
pub fn sample_document() -> ConfigDocument {
    serde_json::from_value(sample_document_json()).expect("sample document parses")
}

pub fn scripted_prompter(answers: &str) -> ScriptedPrompter {
    Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

/// Everything the prompter printed.
pub fn written(prompter: ScriptedPrompter) -> String {
    let (_, output) = prompter.into_parts();
    String::from_utf8(output).expect("utf8 output")
}

/// Store `id` described as `Store <id>`, 1.5 miles away.
pub fn nearby_store(id: &str, online: bool, delivery: bool) -> NearbyStore {
    NearbyStore {
        store_id: id.to_string(),
        description: format!("Store {id}"),
        distance_miles: 1.5,
        phone: Some(format!("555-000-{id:0>4}")),
        online_capable: online,
        delivery_capable: delivery,
    }
}

/// Provider returning predetermined results and recording every call.
///
/// Defaults: validation and placement succeed, pricing returns 20.00, store
/// lookup and tracking return nothing.
pub struct ScriptedProvider {
    validate: Result<(), ProviderError>,
    price: Result<Decimal, ProviderError>,
    place: Result<(), ProviderError>,
    stores: Result<Vec<NearbyStore>, ProviderError>,
    orders: Result<Vec<TrackedOrder>, ProviderError>,
    calls: Mutex<Vec<&'static str>>,
    lookups: Mutex<Vec<String>>,
    phones: Mutex<Vec<String>>,
    placed: Mutex<Vec<Order>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            validate: Ok(()),
            price: Ok(Decimal::new(2000, 2)),
            place: Ok(()),
            stores: Ok(Vec::new()),
            orders: Ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
            phones: Mutex::new(Vec::new()),
            placed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_validate(mut self, result: Result<(), ProviderError>) -> Self {
        self.validate = result;
        self
    }

    pub fn with_price(mut self, result: Result<Decimal, ProviderError>) -> Self {
        self.price = result;
        self
    }

    pub fn with_place(mut self, result: Result<(), ProviderError>) -> Self {
        self.place = result;
        self
    }

    pub fn with_stores(mut self, result: Result<Vec<NearbyStore>, ProviderError>) -> Self {
        self.stores = result;
        self
    }

    pub fn with_orders(mut self, result: Result<Vec<TrackedOrder>, ProviderError>) -> Self {
        self.orders = result;
        self
    }

    /// Order-call names (`validate`, `price`, `place`) in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Addresses passed to the store lookup.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookups lock").clone()
    }

    /// Phone numbers passed to the tracking lookup.
    pub fn phones(&self) -> Vec<String> {
        self.phones.lock().expect("phones lock").clone()
    }

    /// Orders as they were when `place` was called.
    pub fn placed(&self) -> Vec<Order> {
        self.placed.lock().expect("placed lock").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl OrderingProvider for ScriptedProvider {
    async fn validate(&self, order: &mut Order) -> Result<(), ProviderError> {
        self.record("validate");
        self.validate.clone()?;
        order.order_id = Some("scripted-order".to_string());
        Ok(())
    }

    async fn price(&self, order: &mut Order) -> Result<Amounts, ProviderError> {
        self.record("price");
        let amounts = Amounts {
            customer: self.price.clone()?,
        };
        order.amounts = Some(amounts);
        Ok(amounts)
    }

    async fn place(&self, order: &mut Order) -> Result<(), ProviderError> {
        self.record("place");
        self.placed.lock().expect("placed lock").push(order.clone());
        self.place.clone()
    }

    async fn nearby_stores(&self, address: &str) -> Result<Vec<NearbyStore>, ProviderError> {
        self.lookups
            .lock()
            .expect("lookups lock")
            .push(address.to_string());
        self.stores.clone()
    }

    async fn orders_by_phone(&self, phone: &str) -> Result<Vec<TrackedOrder>, ProviderError> {
        self.phones
            .lock()
            .expect("phones lock")
            .push(phone.to_string());
        self.orders.clone()
    }
}
