//! [`OrderingProvider`] over the public ordering and tracker HTTP APIs.
//!
//! Requests and responses are modelled as private wire structs with the
//! provider's PascalCase field names; conversion to and from the
//! provider-native types in [`super::types`] is kept in plain functions so it
//! can be tested without a network.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::OrderingProvider;
use super::types::{Amounts, NearbyStore, Order, Payment, ProviderError, StatusItem, TrackedOrder};
use crate::core::address::split_street;
use crate::core::input_rules::digits_only;
use crate::settings::ProviderSettings;

/// Response `Status` the API uses to signal a rejected request.
const STATUS_FAILURE: i64 = -1;

/// HTTP-backed provider. One attempt per call, no timeouts.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    order_api: String,
    tracker_api: String,
}

impl HttpProvider {
    pub fn new(settings: &ProviderSettings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("dpz-market", HeaderValue::from_static("UNITED_STATES"));
        let client = Client::builder()
            .user_agent(concat!("dominos-cli/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            order_api: settings.order_api.trim_end_matches('/').to_string(),
            tracker_api: settings.tracker_api.trim_end_matches('/').to_string(),
        })
    }

    async fn post_order(
        &self,
        endpoint: &str,
        order: &Order,
    ) -> Result<OrderResponse, ProviderError> {
        let url = format!("{}/{endpoint}", self.order_api);
        let envelope = OrderEnvelope {
            order: WireOrder::from_order(order),
        };
        let response = self
            .client
            .post(&url)
            .json(&envelope)
            .send()
            .await
            .map_err(transport_error)?;
        let body: OrderResponse = read_json(response).await?;
        if body.status == STATUS_FAILURE {
            return Err(rejection(&body.status_items));
        }
        debug!(endpoint, status = body.status, "order request accepted");
        Ok(body)
    }
}

#[async_trait]
impl OrderingProvider for HttpProvider {
    #[instrument(skip_all, fields(store_id = order.store_id))]
    async fn validate(&self, order: &mut Order) -> Result<(), ProviderError> {
        let body = self
            .post_order("validate-order", order)
            .await
            .inspect_err(log_failure)?;
        apply_response(order, &body);
        Ok(())
    }

    #[instrument(skip_all, fields(store_id = order.store_id))]
    async fn price(&self, order: &mut Order) -> Result<Amounts, ProviderError> {
        let body = self
            .post_order("price-order", order)
            .await
            .inspect_err(log_failure)?;
        apply_response(order, &body);
        order
            .amounts
            .ok_or_else(|| ProviderError::new("Pricing response did not include an order total"))
    }

    #[instrument(skip_all, fields(store_id = order.store_id, order_id = ?order.order_id))]
    async fn place(&self, order: &mut Order) -> Result<(), ProviderError> {
        let body = self
            .post_order("place-order", order)
            .await
            .inspect_err(log_failure)?;
        apply_response(order, &body);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn nearby_stores(&self, address: &str) -> Result<Vec<NearbyStore>, ProviderError> {
        let (street, rest) = split_street(address);
        let url = format!("{}/store-locator", self.order_api);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("s", street.as_str()),
                ("c", rest.as_str()),
                ("type", "Delivery"),
            ])
            .send()
            .await
            .map_err(transport_error)
            .inspect_err(log_failure)?;
        let body: StoreLocatorResponse = read_json(response).await.inspect_err(log_failure)?;
        if body.status == STATUS_FAILURE {
            let err = rejection(&body.status_items);
            log_failure(&err);
            return Err(err);
        }
        debug!(count = body.stores.len(), "store locator returned stores");
        Ok(body.stores.into_iter().map(NearbyStore::from).collect())
    }

    #[instrument(skip_all)]
    async fn orders_by_phone(&self, phone: &str) -> Result<Vec<TrackedOrder>, ProviderError> {
        let url = format!("{}/orders", self.tracker_api);
        let response = self
            .client
            .get(&url)
            .query(&[("phonenumber", digits_only(phone))])
            .send()
            .await
            .map_err(transport_error)
            .inspect_err(log_failure)?;
        let body: TrackerResponse = read_json(response).await.inspect_err(log_failure)?;
        Ok(body.into_orders())
    }
}

fn log_failure(err: &ProviderError) {
    warn!(err = %err, "provider call failed");
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::new(format!("Could not reach the ordering service: {err}"))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::new(format!(
            "Ordering service responded with HTTP {status}"
        )));
    }
    response.json::<T>().await.map_err(|err| {
        ProviderError::new(format!("Unexpected response from ordering service: {err}"))
    })
}

/// Failure built from the response's status item codes.
fn rejection(items: &[WireStatusCode]) -> ProviderError {
    let codes: Vec<&str> = items
        .iter()
        .map(|item| item.code.as_str())
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        ProviderError::new("Order was rejected by the store")
    } else {
        ProviderError::new(codes.join(", "))
    }
}

fn apply_response(order: &mut Order, body: &OrderResponse) {
    let Some(wire) = &body.order else {
        return;
    };
    if let Some(order_id) = wire.order_id.as_ref().and_then(value_to_string) {
        order.order_id = Some(order_id);
    }
    if let Some(amounts) = &wire.amounts {
        order.amounts = Some(Amounts {
            customer: amounts.customer,
        });
    }
}

fn card_type(number: &str) -> &'static str {
    let digits = digits_only(number);
    if digits.starts_with("34") || digits.starts_with("37") {
        "AMEX"
    } else if digits.starts_with('4') {
        "VISA"
    } else if digits.starts_with('5') || digits.starts_with('2') {
        "MASTERCARD"
    } else if digits.starts_with('6') {
        "DISCOVER"
    } else {
        ""
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn value_to_minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Serialize)]
struct OrderEnvelope {
    #[serde(rename = "Order")]
    order: WireOrder,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireOrder {
    address: WireAddress,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    #[serde(rename = "StoreID")]
    store_id: String,
    service_method: &'static str,
    order_channel: &'static str,
    order_method: &'static str,
    language_code: &'static str,
    #[serde(rename = "SourceOrganizationURI")]
    source_organization_uri: &'static str,
    version: &'static str,
    products: Vec<WireProduct>,
    payments: Vec<WirePayment>,
    #[serde(rename = "OrderID")]
    order_id: String,
}

impl WireOrder {
    fn from_order(order: &Order) -> Self {
        Self {
            address: WireAddress::from_line(&order.customer.address),
            first_name: order.customer.first_name.clone(),
            last_name: order.customer.last_name.clone(),
            email: order.customer.email.clone(),
            phone: digits_only(&order.customer.phone),
            store_id: order.store_id.to_string(),
            service_method: "Delivery",
            order_channel: "OLO",
            order_method: "Web",
            language_code: "en",
            source_organization_uri: "order.dominos.com",
            version: "1.0",
            products: order
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| WireProduct {
                    code: item.code.clone(),
                    qty: 1,
                    id: index + 1,
                    is_new: true,
                    options: serde_json::Map::new(),
                })
                .collect(),
            payments: order
                .payments
                .iter()
                .map(WirePayment::from_payment)
                .collect(),
            order_id: order.order_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireAddress {
    street: String,
    city: String,
    region: String,
    postal_code: String,
    #[serde(rename = "Type")]
    kind: &'static str,
}

impl WireAddress {
    /// `street, city, region postal` with the region and postal code in
    /// either one or two comma-separated parts.
    fn from_line(line: &str) -> Self {
        let parts: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let part = |index: usize| parts.get(index).copied().unwrap_or_default().to_string();
        let tail = parts.get(2..).unwrap_or_default().join(" ");
        let (region, postal_code) = match tail.rsplit_once(' ') {
            Some((region, postal)) => (region.trim().to_string(), postal.to_string()),
            None => (tail, String::new()),
        };
        Self {
            street: part(0),
            city: part(1),
            region,
            postal_code,
            kind: "House",
        }
    }
}

#[derive(Debug, Serialize)]
struct WireProduct {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Qty")]
    qty: u32,
    #[serde(rename = "ID")]
    id: usize,
    #[serde(rename = "isNew")]
    is_new: bool,
    #[serde(rename = "Options")]
    options: serde_json::Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WirePayment {
    #[serde(rename = "Type")]
    kind: &'static str,
    amount: Decimal,
    number: String,
    card_type: &'static str,
    expiration: String,
    security_code: String,
    postal_code: String,
    tip_amount: Decimal,
}

// Card data must never reach a log line.
impl std::fmt::Debug for WirePayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WirePayment")
            .field("amount", &self.amount)
            .field("card_type", &self.card_type)
            .finish_non_exhaustive()
    }
}

impl WirePayment {
    fn from_payment(payment: &Payment) -> Self {
        Self {
            kind: "CreditCard",
            amount: payment.amount,
            number: digits_only(&payment.number),
            card_type: card_type(&payment.number),
            expiration: digits_only(&payment.expiration),
            security_code: payment.security_code.clone(),
            postal_code: payment.postal_code.clone(),
            tip_amount: payment.tip_amount,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    order: Option<WireOrderResult>,
    #[serde(default)]
    status_items: Vec<WireStatusCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireOrderResult {
    #[serde(rename = "OrderID", default)]
    order_id: Option<Value>,
    #[serde(default)]
    amounts: Option<WireAmounts>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireAmounts {
    customer: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireStatusCode {
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoreLocatorResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    stores: Vec<WireStore>,
    #[serde(default)]
    status_items: Vec<WireStatusCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireStore {
    #[serde(rename = "StoreID")]
    store_id: Value,
    #[serde(default)]
    address_description: String,
    #[serde(default)]
    min_distance: f64,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    is_online_capable: bool,
    #[serde(default)]
    is_delivery_store: bool,
}

impl From<WireStore> for NearbyStore {
    fn from(store: WireStore) -> Self {
        let description = store
            .address_description
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        NearbyStore {
            store_id: value_to_string(&store.store_id).unwrap_or_default(),
            description,
            distance_miles: store.min_distance,
            phone: store.phone.filter(|phone| !phone.trim().is_empty()),
            online_capable: store.is_online_capable,
            delivery_capable: store.is_delivery_store,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrackerResponse {
    List(Vec<WireTrackedOrder>),
    Wrapped {
        #[serde(alias = "Orders", default)]
        orders: Vec<WireTrackedOrder>,
    },
}

impl TrackerResponse {
    fn into_orders(self) -> Vec<TrackedOrder> {
        let orders = match self {
            TrackerResponse::List(orders) | TrackerResponse::Wrapped { orders } => orders,
        };
        orders.into_iter().map(TrackedOrder::from).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireTrackedOrder {
    #[serde(default)]
    order_status: String,
    #[serde(rename = "OrderID", default)]
    order_id: Option<Value>,
    #[serde(rename = "StoreID", default)]
    store_id: Option<Value>,
    #[serde(default)]
    order_taken_time: Option<String>,
    #[serde(default)]
    status_items: Vec<WireStatusItem>,
    #[serde(default)]
    estimated_wait_minutes: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireStatusItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    complete: bool,
}

impl From<WireTrackedOrder> for TrackedOrder {
    fn from(order: WireTrackedOrder) -> Self {
        TrackedOrder {
            status: order.order_status,
            order_id: order.order_id.as_ref().and_then(value_to_string),
            store_id: order.store_id.as_ref().and_then(value_to_string),
            taken_at: order.order_taken_time.filter(|time| !time.is_empty()),
            checklist: order
                .status_items
                .into_iter()
                .map(|item| StatusItem {
                    name: item.name,
                    complete: item.complete,
                })
                .collect(),
            estimated_wait_minutes: order
                .estimated_wait_minutes
                .as_ref()
                .and_then(value_to_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::{Customer, Item};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn order() -> Order {
        let mut order = Order::new(
            Customer {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: "test@example.com".to_string(),
                phone: "555-123-4567".to_string(),
                address: "123 Main St, Portland, OR 97201".to_string(),
            },
            1234,
        );
        order.add_item(Item::new("14SCREEN"));
        order.add_item(Item::new("14SCREEN"));
        order
    }

    #[test]
    fn order_envelope_uses_provider_field_names() {
        let mut order = order();
        order.order_id = Some("abc123".to_string());
        order.payments.push(Payment {
            amount: dec!(23.45),
            number: "4111111111111111".to_string(),
            expiration: "12/27".to_string(),
            security_code: "123".to_string(),
            postal_code: "97201".to_string(),
            tip_amount: dec!(5),
        });

        let value = serde_json::to_value(OrderEnvelope {
            order: WireOrder::from_order(&order),
        })
        .expect("serialize");
        let wire = &value["Order"];

        assert_eq!(wire["StoreID"], "1234");
        assert_eq!(wire["ServiceMethod"], "Delivery");
        assert_eq!(wire["Phone"], "5551234567");
        assert_eq!(wire["OrderID"], "abc123");
        assert_eq!(wire["Address"]["Street"], "123 Main St");
        assert_eq!(wire["Address"]["City"], "Portland");
        assert_eq!(wire["Address"]["Region"], "OR");
        assert_eq!(wire["Address"]["PostalCode"], "97201");
        assert_eq!(wire["Address"]["Type"], "House");
        assert_eq!(wire["Products"].as_array().expect("products").len(), 2);
        assert_eq!(
            wire["Products"][1],
            json!({"Code": "14SCREEN", "Qty": 1, "ID": 2, "isNew": true, "Options": {}})
        );
        assert_eq!(wire["Payments"][0]["Type"], "CreditCard");
        assert_eq!(wire["Payments"][0]["CardType"], "VISA");
        assert_eq!(wire["Payments"][0]["Expiration"], "1227");
    }

    #[test]
    fn address_line_splits_region_and_postal_code() {
        let four = WireAddress::from_line("1 Elm St, Salem, OR, 97301");
        assert_eq!(
            (four.region.as_str(), four.postal_code.as_str()),
            ("OR", "97301")
        );

        let street_only = WireAddress::from_line("1 Elm St");
        assert_eq!(street_only.street, "1 Elm St");
        assert_eq!(street_only.city, "");
        assert_eq!(street_only.postal_code, "");
    }

    #[test]
    fn failure_status_joins_status_codes() {
        let body: OrderResponse = serde_json::from_value(json!({
            "Status": -1,
            "StatusItems": [{"Code": "PosOrderIncomplete"}, {"Code": "ServiceMethodNotAllowed"}]
        }))
        .expect("parse");
        assert_eq!(body.status, STATUS_FAILURE);
        assert_eq!(
            rejection(&body.status_items).message,
            "PosOrderIncomplete, ServiceMethodNotAllowed"
        );
        assert_eq!(rejection(&[]).message, "Order was rejected by the store");
    }

    #[test]
    fn response_sets_order_id_and_total() {
        let body: OrderResponse = serde_json::from_value(json!({
            "Status": 1,
            "Order": {"OrderID": "xyz", "Amounts": {"Customer": 27.31, "Menu": 22.0}}
        }))
        .expect("parse");
        let mut order = order();
        apply_response(&mut order, &body);
        assert_eq!(order.order_id.as_deref(), Some("xyz"));
        assert_eq!(
            order.amounts.map(|amounts| amounts.customer),
            Some(dec!(27.31))
        );
    }

    #[test]
    fn store_locator_maps_stores() {
        let body: StoreLocatorResponse = serde_json::from_value(json!({
            "Status": 0,
            "Stores": [{
                "StoreID": "7890",
                "AddressDescription": "100 Oak Ave\nPortland, OR 97201\n",
                "MinDistance": 1.25,
                "Phone": "503-555-0100",
                "IsOnlineCapable": true,
                "IsDeliveryStore": false
            }, {
                "StoreID": 42,
                "Phone": ""
            }]
        }))
        .expect("parse");
        let stores: Vec<NearbyStore> = body.stores.into_iter().map(NearbyStore::from).collect();

        assert_eq!(stores[0].store_id, "7890");
        assert_eq!(stores[0].description, "100 Oak Ave, Portland, OR 97201");
        assert_eq!(stores[0].phone.as_deref(), Some("503-555-0100"));
        assert!(stores[0].online_capable);
        assert!(!stores[0].delivery_capable);
        assert_eq!(stores[1].store_id, "42");
        assert_eq!(stores[1].phone, None);
    }

    #[test]
    fn tracker_accepts_list_and_wrapped_shapes() {
        let list: TrackerResponse = serde_json::from_value(json!([{
            "OrderStatus": "Oven",
            "OrderID": 1001,
            "StoreID": "1234",
            "OrderTakenTime": "2026-10-19T18:00:00Z",
            "StatusItems": [{"Name": "Prep", "Complete": true}, {"Name": "Oven"}],
            "EstimatedWaitMinutes": "20"
        }]))
        .expect("parse list");
        let orders = list.into_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, "Oven");
        assert_eq!(orders[0].order_id.as_deref(), Some("1001"));
        assert_eq!(
            orders[0].checklist[1],
            StatusItem {
                name: "Oven".to_string(),
                complete: false
            }
        );
        assert_eq!(orders[0].estimated_wait_minutes, Some(20));

        let wrapped: TrackerResponse =
            serde_json::from_value(json!({"orders": []})).expect("parse wrapped");
        assert!(wrapped.into_orders().is_empty());
    }

    #[test]
    fn card_type_follows_number_prefix() {
        assert_eq!(card_type("4111 1111 1111 1111"), "VISA");
        assert_eq!(card_type("5500000000000004"), "MASTERCARD");
        assert_eq!(card_type("340000000000009"), "AMEX");
        assert_eq!(card_type("6011000000000004"), "DISCOVER");
        assert_eq!(card_type(""), "");
    }

    #[test]
    fn wire_payment_debug_hides_card_data() {
        let payment = WirePayment::from_payment(&Payment {
            amount: dec!(10),
            number: "4111111111111111".to_string(),
            expiration: "12/27".to_string(),
            security_code: "987".to_string(),
            postal_code: "97201".to_string(),
            tip_amount: dec!(0),
        });
        let debug = format!("{payment:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("987"));
    }

    #[test]
    fn new_trims_trailing_slashes() {
        let provider = HttpProvider::new(&ProviderSettings {
            order_api: "http://localhost:9000/power/".to_string(),
            tracker_api: "http://localhost:9001/".to_string(),
        })
        .expect("provider");
        assert_eq!(provider.order_api, "http://localhost:9000/power");
        assert_eq!(provider.tracker_api, "http://localhost:9001");
    }
}
