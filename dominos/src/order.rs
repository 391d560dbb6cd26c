//! Orchestration for `dominos order <preset>`.
//!
//! Loads and validates the configuration document, builds the preset's
//! order, then validates, prices, confirms and places it through the
//! ordering provider. Every provider call is a single attempt.

use std::io::{BufRead, Write};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::builder::{OrderBuilder, PresetOrder};
use crate::core::input_rules::is_decline;
use crate::core::redact::masked_document;
use crate::core::types::ConfigDocument;
use crate::core::validator::validate_document;
use crate::error::{CliError, ProviderStage};
use crate::io::config_store::ConfigStore;
use crate::io::progress::with_spinner;
use crate::io::prompt::Prompter;
use crate::provider::OrderingProvider;
use crate::setup::run_setup;

/// Pipeline position, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    NoConfig,
    ConfigInvalid,
    PresetMissing,
    Validating,
    Validated,
    Pricing,
    Priced,
    AwaitingConfirmation,
    Cancelled,
    Placing,
    Placed,
    Failed,
}

/// How a successful `order` invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// No configuration existed; setup ran and the user must add a preset.
    SetupCompleted,
    /// The user declined at confirmation.
    Cancelled,
    Placed {
        order_id: Option<String>,
        total: Decimal,
    },
}

fn enter(state: OrderState) {
    debug!(?state, "order state");
}

/// Run the order pipeline for `preset_name`.
pub async fn run_order<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
    store: &ConfigStore,
    preset_name: &str,
) -> Result<OrderOutcome, CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    if !store.exists() {
        enter(OrderState::NoConfig);
        prompter.say("No configuration found. Running setup...")?;
        run_setup(prompter, provider, store).await?;
        prompter.say("")?;
        prompter.say("Setup complete! Now add a preset to your config:")?;
        prompter.say("  dominos config edit")?;
        prompter.say("")?;
        prompter.say("Then try ordering again.")?;
        return Ok(OrderOutcome::SetupCompleted);
    }

    let doc = load_valid_document(store)?;
    let builder = OrderBuilder::new(&doc);
    let PresetOrder {
        preset, mut order, ..
    } = builder.build_from_preset(preset_name).map_err(|err| {
        enter(OrderState::PresetMissing);
        CliError::from(err)
    })?;

    prompter.say(format!("Building order: {}", preset.name))?;
    prompter.say("")?;

    enter(OrderState::Validating);
    with_spinner(
        "Validating order...",
        "Order validated",
        "Validation failed",
        provider.validate(&mut order),
    )
    .await
    .map_err(|err| failed(ProviderStage::Validate, err))?;
    enter(OrderState::Validated);

    enter(OrderState::Pricing);
    let amounts = with_spinner(
        "Getting price...",
        "Order priced",
        "Pricing failed",
        provider.price(&mut order),
    )
    .await
    .map_err(|err| failed(ProviderStage::Price, err))?;
    enter(OrderState::Priced);

    let total = amounts.customer;
    prompter.say("")?;
    prompter.say(format!(
        "Total: ${total:.2} (includes ${:.2} tip)",
        doc.payment.tip_amount
    ))?;
    prompter.say("")?;
    prompter.say("Order Summary:")?;
    for item in &preset.items {
        prompter.say(format!("  • {}x {}", item.qty, item.code))?;
    }

    enter(OrderState::AwaitingConfirmation);
    let answer = prompter.ask_free("\nPlace this order? (Y/n): ")?;
    if is_decline(&answer) {
        enter(OrderState::Cancelled);
        prompter.say("Order cancelled")?;
        return Ok(OrderOutcome::Cancelled);
    }

    order.payments.push(builder.build_payment(total));

    enter(OrderState::Placing);
    with_spinner(
        "Placing order...",
        "Order placed successfully!",
        "Order failed",
        provider.place(&mut order),
    )
    .await
    .map_err(|err| failed(ProviderStage::Place, err))?;
    enter(OrderState::Placed);
    info!(order_id = ?order.order_id, %total, "order placed");

    prompter.say("")?;
    prompter.say("✓ Order placed!")?;
    prompter.say("")?;
    prompter.say("Order details:")?;
    prompter.say(format!("  Store: {}", doc.store.name))?;
    if let Some(phone) = doc.store.phone.as_deref().filter(|phone| !phone.is_empty()) {
        prompter.say(format!("  Phone: {phone}"))?;
    }
    prompter.say("")?;
    prompter.say("Track your order: dominos track")?;

    Ok(OrderOutcome::Placed {
        order_id: order.order_id,
        total,
    })
}

fn failed(stage: ProviderStage, err: impl std::fmt::Display) -> CliError {
    enter(OrderState::Failed);
    CliError::provider(stage, err)
}

/// Load the stored document, reporting every validator defect at once.
fn load_valid_document(store: &ConfigStore) -> Result<ConfigDocument, CliError> {
    let raw = store.load_raw()?.ok_or(CliError::ConfigMissing)?;
    let defects = validate_document(&raw);
    if !defects.is_empty() {
        enter(OrderState::ConfigInvalid);
        return Err(CliError::ConfigInvalid { defects });
    }
    match ConfigDocument::deserialize(&raw) {
        Ok(doc) => Ok(doc),
        Err(_) => {
            enter(OrderState::ConfigInvalid);
            Err(CliError::ConfigInvalid {
                defects: vec![parse_defect(&raw)],
            })
        }
    }
}

/// Describe why `raw` failed to parse, using the masked copy so the card
/// number never reaches the message.
fn parse_defect(raw: &Value) -> String {
    match ConfigDocument::deserialize(&masked_document(raw)) {
        Err(err) => err.to_string(),
        Ok(_) => "Invalid payment.number (must be a string of digits)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::test_support::{
        ScriptedProvider, nearby_store, sample_document, sample_document_json, scripted_prompter,
        written,
    };
    use rust_decimal_macros::dec;
    use std::fs;

    fn store_with_sample() -> (tempfile::TempDir, ConfigStore) {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::in_dir(temp.path());
        store.save(&sample_document()).expect("save");
        (temp, store)
    }

    #[tokio::test]
    async fn confirmed_order_is_priced_then_placed_with_payment() {
        let (_temp, store) = store_with_sample();
        let provider = ScriptedProvider::new().with_price(Ok(dec!(23.45)));
        let mut prompter = scripted_prompter("\n");

        let outcome = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect("order");

        assert_eq!(
            outcome,
            OrderOutcome::Placed {
                order_id: Some("scripted-order".to_string()),
                total: dec!(23.45),
            }
        );
        assert_eq!(provider.calls(), vec!["validate", "price", "place"]);
        let placed = provider.placed();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].payments.len(), 1);
        assert_eq!(placed[0].payments[0].amount, dec!(23.45));
        assert_eq!(placed[0].payments[0].tip_amount, dec!(5));

        let output = written(prompter);
        assert!(output.contains("Building order: Test Pizza"));
        assert!(output.contains("Total: $23.45 (includes $5.00 tip)"));
        assert!(output.contains("  • 1x PIZZA123"));
        assert!(output.contains("✓ Order placed!"));
        assert!(output.contains("  Store: Downtown Portland"));
        assert!(output.contains("  Phone: 503-555-0100"));
    }

    #[tokio::test]
    async fn answer_starting_with_n_cancels_before_placing() {
        let (_temp, store) = store_with_sample();
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("Nope\n");

        let outcome = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect("order");

        assert_eq!(outcome, OrderOutcome::Cancelled);
        assert_eq!(provider.calls(), vec!["validate", "price"]);
        assert!(written(prompter).contains("Order cancelled"));
    }

    #[tokio::test]
    async fn validation_failure_stops_pipeline() {
        let (_temp, store) = store_with_sample();
        let provider = ScriptedProvider::new()
            .with_validate(Err(ProviderError::new("Invalid product code PIZZA123")));
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("validation failure");

        assert_eq!(err.to_string(), "Invalid product code PIZZA123");
        assert_eq!(err.exit_code(), crate::exit_codes::PROVIDER_FAILURE);
        assert_eq!(provider.calls(), vec!["validate"]);
    }

    #[tokio::test]
    async fn pricing_failure_never_prompts() {
        let (_temp, store) = store_with_sample();
        let provider =
            ScriptedProvider::new().with_price(Err(ProviderError::new("Store is closed")));
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("pricing failure");

        assert!(matches!(
            err,
            CliError::Provider {
                stage: ProviderStage::Price,
                ..
            }
        ));
        assert!(!written(prompter).contains("Place this order?"));
    }

    #[tokio::test]
    async fn payment_rejection_suggests_editing_config() {
        let (_temp, store) = store_with_sample();
        let provider = ScriptedProvider::new()
            .with_place(Err(ProviderError::new("payment declined by issuer")));
        let mut prompter = scripted_prompter("y\n");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("place failure");

        assert_eq!(err.exit_code(), crate::exit_codes::PROVIDER_FAILURE);
        assert!(err.hint().expect("hint").contains("dominos config edit"));
    }

    #[tokio::test]
    async fn unknown_preset_is_a_config_error() {
        let (_temp, store) = store_with_sample();
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "large")
            .await
            .expect_err("missing preset");

        assert!(matches!(err, CliError::PresetNotFound(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_document_reports_all_defects() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::in_dir(temp.path());
        let mut raw = sample_document_json();
        raw["customer"]["email"] = "".into();
        raw["payment"]["number"] = serde_json::Value::Null;
        fs::write(store.location(), raw.to_string()).expect("write");
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("invalid config");

        match err {
            CliError::ConfigInvalid { defects } => assert_eq!(
                defects,
                vec![
                    "Missing customer.email".to_string(),
                    "Missing payment.number".to_string()
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_config_runs_setup_and_stops() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::in_dir(temp.path());
        let provider =
            ScriptedProvider::new().with_stores(Ok(vec![nearby_store("200", true, true)]));
        let answers = "\
123 Main St, Portland, OR, 97201
Test
User
555-123-4567
test@example.com
1
4111111111111111
12/27
123
97201
3
y
";
        let mut prompter = scripted_prompter(answers);

        let outcome = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect("setup");

        assert_eq!(outcome, OrderOutcome::SetupCompleted);
        assert!(store.exists());
        assert!(provider.calls().is_empty());
        assert!(written(prompter).contains("Then try ordering again."));
    }

    fn store_with_raw(raw: &serde_json::Value) -> (tempfile::TempDir, ConfigStore) {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::in_dir(temp.path());
        fs::write(store.location(), raw.to_string()).expect("write");
        (temp, store)
    }

    #[tokio::test]
    async fn numeric_card_number_is_placed_as_digits() {
        let mut raw = sample_document_json();
        raw["payment"]["number"] = serde_json::json!(4111111111111111u64);
        let (_temp, store) = store_with_raw(&raw);
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("y\n");

        run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect("order");

        let placed = provider.placed();
        assert_eq!(placed[0].payments[0].number, "4111111111111111");
    }

    #[tokio::test]
    async fn parse_failure_never_echoes_card_number() {
        let mut raw = sample_document_json();
        raw["payment"]["number"] = serde_json::json!(4111111111111111u64);
        raw["presets"]["test"]["items"][0]["qty"] = "two".into();
        let (_temp, store) = store_with_raw(&raw);
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("string quantity");

        match &err {
            CliError::ConfigInvalid { defects } => {
                assert_eq!(defects.len(), 1);
                assert!(defects[0].contains("two"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.to_string().contains("4111111111111111"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_is_a_config_error() {
        let mut raw = sample_document_json();
        raw["presets"]["test"]["items"][0]["qty"] = 0.into();
        let (_temp, store) = store_with_raw(&raw);
        let provider = ScriptedProvider::new();
        let mut prompter = scripted_prompter("");

        let err = run_order(&mut prompter, &provider, &store, "test")
            .await
            .expect_err("zero quantity");

        assert!(matches!(err, CliError::ConfigInvalid { .. }));
        assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
        assert!(provider.calls().is_empty());
    }
}
