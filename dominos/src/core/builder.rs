//! Turn a configuration document and a preset name into a provider order.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::address::format_address_line;
use crate::core::types::{ConfigDocument, Preset};
use crate::provider::{Customer, Item, Order, Payment};

/// Lookup miss for a preset name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Preset '{name}' not found. Available presets: {}", available_keys(.available))]
pub struct PresetNotFound {
    pub name: String,
    /// `(key, display name)` for every configured preset.
    pub available: Vec<(String, String)>,
}

fn available_keys(available: &[(String, String)]) -> String {
    available
        .iter()
        .map(|(key, _)| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Order built from a preset, plus the preset it came from.
#[derive(Debug, Clone)]
pub struct PresetOrder<'a> {
    pub preset_name: String,
    pub preset: &'a Preset,
    pub order: Order,
}

pub struct OrderBuilder<'a> {
    config: &'a ConfigDocument,
}

impl<'a> OrderBuilder<'a> {
    pub fn new(config: &'a ConfigDocument) -> Self {
        Self { config }
    }

    /// Build an order for `preset_name`.
    ///
    /// Each preset item with `qty = n` becomes `n` single-unit items, in preset
    /// order.
    pub fn build_from_preset(&self, preset_name: &str) -> Result<PresetOrder<'a>, PresetNotFound> {
        let config = self.config;
        let Some(preset) = config.presets.get(preset_name) else {
            return Err(PresetNotFound {
                name: preset_name.to_string(),
                available: config
                    .presets
                    .iter()
                    .map(|(key, preset)| (key.clone(), preset.name.clone()))
                    .collect(),
            });
        };

        let info = &config.customer;
        let customer = Customer {
            first_name: info.first_name.clone(),
            last_name: info.last_name.clone(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            address: format_address_line(&info.address),
        };

        let mut order = Order::new(customer, parse_store_id(&config.store.store_id));
        for item in &preset.items {
            for _ in 0..item.qty.get() {
                order.add_item(Item::new(item.code.clone()));
            }
        }

        Ok(PresetOrder {
            preset_name: preset_name.to_string(),
            preset,
            order,
        })
    }

    /// Payment for `amount` using the stored card and tip.
    pub fn build_payment(&self, amount: Decimal) -> Payment {
        let payment = &self.config.payment;
        Payment {
            amount,
            number: payment.number.clone(),
            expiration: payment.expiration.clone(),
            security_code: payment.security_code.clone(),
            postal_code: payment.postal_code.clone(),
            tip_amount: payment.tip_amount,
        }
    }
}

/// Leading-digit integer parse; a store id with no leading digits becomes 0
/// and is left for the provider to reject.
fn parse_store_id(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PresetItem;
    use crate::test_support::sample_document;
    use rust_decimal_macros::dec;
    use std::num::NonZeroU32;

    #[test]
    fn builds_order_bound_to_store_and_customer() {
        let doc = sample_document();
        let built = OrderBuilder::new(&doc)
            .build_from_preset("test")
            .expect("build");

        assert_eq!(built.order.store_id, 1234);
        assert_eq!(built.order.items, vec![Item::new("PIZZA123")]);
        assert_eq!(built.order.customer.first_name, "Test");
        assert_eq!(
            built.order.customer.address,
            "123 Main St, Portland, OR 97201"
        );
        assert_eq!(built.preset.name, "Test Pizza");
        assert!(built.order.payments.is_empty());
    }

    #[test]
    fn expands_quantities_in_preset_order() {
        let mut doc = sample_document();
        doc.presets.get_mut("test").expect("preset").items = vec![
            PresetItem {
                code: "14SCREEN".to_string(),
                qty: NonZeroU32::new(2).expect("nonzero"),
            },
            PresetItem {
                code: "20BCOKE".to_string(),
                qty: NonZeroU32::MIN,
            },
        ];

        let built = OrderBuilder::new(&doc)
            .build_from_preset("test")
            .expect("build");
        let codes: Vec<&str> = built
            .order
            .items
            .iter()
            .map(|item| item.code.as_str())
            .collect();
        assert_eq!(codes, vec!["14SCREEN", "14SCREEN", "20BCOKE"]);
    }

    #[test]
    fn missing_preset_lists_available_names() {
        let doc = sample_document();
        let err = OrderBuilder::new(&doc)
            .build_from_preset("nonexistent")
            .expect_err("missing preset");

        let message = err.to_string();
        assert!(message.contains("not found"));
        assert!(message.contains("test"));
        assert_eq!(
            err.available,
            vec![("test".to_string(), "Test Pizza".to_string())]
        );
    }

    #[test]
    fn payment_carries_amount_card_and_tip() {
        let doc = sample_document();
        let payment = OrderBuilder::new(&doc).build_payment(dec!(23.45));
        assert_eq!(payment.amount, dec!(23.45));
        assert_eq!(payment.number, "4111111111111111");
        assert_eq!(payment.expiration, "12/27");
        assert_eq!(payment.security_code, "123");
        assert_eq!(payment.postal_code, "97201");
        assert_eq!(payment.tip_amount, dec!(5));
    }

    #[test]
    fn store_id_parses_leading_digits() {
        assert_eq!(parse_store_id("1234"), 1234);
        assert_eq!(parse_store_id(" 77abc"), 77);
        assert_eq!(parse_store_id("abc"), 0);
    }
}
