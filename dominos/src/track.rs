//! `dominos track [phone]`: status of the most recent active order.

use std::io::{BufRead, Write};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::error::{CliError, ProviderStage};
use crate::io::config_store::ConfigStore;
use crate::io::progress::with_spinner;
use crate::io::prompt::Prompter;
use crate::provider::{OrderingProvider, TrackedOrder};

/// Provider messages containing this are treated as an empty result.
const NO_ORDERS_MARKER: &str = "No orders";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    NoActiveOrders,
    Found(TrackedOrder),
}

/// Look up orders for `phone`, falling back to `customer.phone` from the
/// stored document. `now` anchors the "minutes ago" line.
pub async fn run_track<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
    store: &ConfigStore,
    phone: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TrackOutcome, CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    let phone = resolve_phone(store, phone)?;

    let result = with_spinner(
        "Tracking order...",
        "Order found",
        "Tracking failed",
        provider.orders_by_phone(&phone),
    )
    .await;
    let orders = match result {
        Ok(orders) => orders,
        Err(err) if err.message.contains(NO_ORDERS_MARKER) => {
            debug!(%err, "tracker reported no orders");
            Vec::new()
        }
        Err(err) => return Err(CliError::provider(ProviderStage::Track, err)),
    };

    let Some(order) = orders.into_iter().next() else {
        prompter.say("No active orders found for this phone number")?;
        return Ok(TrackOutcome::NoActiveOrders);
    };
    for line in render_order(&order, now) {
        prompter.say(line)?;
    }
    Ok(TrackOutcome::Found(order))
}

fn resolve_phone(store: &ConfigStore, explicit: Option<&str>) -> Result<String, CliError> {
    if let Some(phone) = explicit.map(str::trim).filter(|phone| !phone.is_empty()) {
        return Ok(phone.to_string());
    }
    let raw = store.load_raw()?;
    raw.as_ref()
        .and_then(|doc| doc.pointer("/customer/phone"))
        .and_then(|phone| phone.as_str())
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string)
        .ok_or(CliError::NoPhone)
}

/// Output lines for one tracked order.
pub fn render_order(order: &TrackedOrder, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("Order Status: {}", order.status),
        String::new(),
    ];
    if let Some(id) = &order.order_id {
        lines.push(format!("Order #{id}"));
    }
    if let Some(store_id) = &order.store_id {
        lines.push(format!("Store ID: {store_id}"));
    }
    if let Some(taken_at) = order.taken_at.as_deref().and_then(parse_timestamp) {
        let minutes = (now - taken_at).num_minutes();
        lines.push(format!("Ordered: {minutes} minutes ago"));
    }
    if !order.checklist.is_empty() {
        lines.push(String::new());
        lines.push("Progress:".to_string());
        for item in &order.checklist {
            let icon = if item.complete { '✓' } else { '○' };
            lines.push(format!("  {icon} {}", item.name));
        }
    }
    if let Some(minutes) = order.estimated_wait_minutes.filter(|minutes| *minutes > 0) {
        lines.push(String::new());
        lines.push(format!("Estimated time: {minutes} minutes"));
    }
    lines
}

/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS` taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
