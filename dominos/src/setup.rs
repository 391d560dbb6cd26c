//! Interactive first-time setup.
//!
//! Collects contact details, looks up nearby delivery stores, lets the user
//! pick one, collects card details and returns a complete
//! [`ConfigDocument`] with no presets. [`run_setup`] additionally saves it.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use tracing::{debug, info, instrument};

use crate::core::address::parse_address;
use crate::core::input_rules::{
    delivery_stores, digits_only, is_yes, parse_choice, parse_tip, validate_address,
    validate_email, validate_phone, validate_store_choice,
};
use crate::core::types::{ConfigDocument, CustomerInfo, PaymentInfo, StoreInfo};
use crate::error::{CliError, ProviderStage};
use crate::io::config_store::ConfigStore;
use crate::io::progress::with_spinner;
use crate::io::prompt::Prompter;
use crate::provider::{NearbyStore, OrderingProvider};

/// Run the wizard and return the assembled document. Nothing is persisted.
#[instrument(skip_all)]
pub async fn run_wizard<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
) -> Result<ConfigDocument, CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    prompter.say("")?;
    prompter.say("👋 Welcome to Dominos CLI!")?;
    prompter.say("")?;
    prompter.say("No configuration found. Let's set up your account.")?;
    prompter.say("")?;

    let address = prompter.ask("Delivery Address: ", validate_address)?;
    let first_name = prompter.ask_free("First Name: ")?;
    let last_name = prompter.ask_free("Last Name: ")?;
    let phone = prompter.ask("Phone: ", validate_phone)?;
    let email = prompter.ask("Email: ", validate_email)?;

    let stores = find_stores(prompter, provider, &address).await?;
    let store = choose_store(prompter, stores)?;

    prompter.say("")?;
    prompter.say("Payment Information:")?;
    let card_number = prompter.ask_free("Card Number: ")?;
    let expiration = prompter.ask_free("Expiration (MM/YY): ")?;
    let security_code = prompter.ask_free("CVV: ")?;
    let billing_zip = prompter.ask_free("Billing Zip: ")?;
    let tip = prompter.ask_free("Default Tip Amount ($): ")?;

    prompter.say("")?;
    prompter.say("⚠️  WARNING: Payment info will be stored in plaintext")?;
    prompter.say("    Keep your config file secure!")?;
    prompter.say("")?;

    let confirm = prompter.ask_free("Continue? (y/N): ")?;
    if !is_yes(&confirm) {
        debug!("setup declined at confirmation");
        return Err(CliError::UserCancelled);
    }

    Ok(ConfigDocument {
        customer: CustomerInfo {
            first_name,
            last_name,
            email,
            phone,
            address: parse_address(&address),
        },
        payment: PaymentInfo {
            number: digits_only(&card_number),
            expiration,
            security_code,
            postal_code: billing_zip,
            tip_amount: parse_tip(&tip),
        },
        store: StoreInfo {
            store_id: store.store_id,
            name: store.description,
            phone: store.phone,
        },
        presets: BTreeMap::new(),
    })
}

/// Run the wizard, save the result and tell the user what to do next.
pub async fn run_setup<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
    store: &ConfigStore,
) -> Result<ConfigDocument, CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    let doc = run_wizard(prompter, provider).await?;
    store.save(&doc)?;
    info!(path = %store.location().display(), "configuration saved");

    prompter.say("")?;
    prompter.say("✓ Configuration saved!")?;
    prompter.say(format!("Location: {}", store.location().display()))?;
    prompter.say("")?;
    prompter.say("You're ready to order! Try:")?;
    prompter.say("  dominos config edit   (to add order presets)")?;
    Ok(doc)
}

async fn find_stores<R, W, P>(
    prompter: &mut Prompter<R, W>,
    provider: &P,
    address: &str,
) -> Result<Vec<NearbyStore>, CliError>
where
    R: BufRead,
    W: Write,
    P: OrderingProvider + ?Sized,
{
    let found = with_spinner(
        "Finding nearby stores...",
        "Stores found",
        "Could not find stores",
        provider.nearby_stores(address),
    )
    .await
    .map_err(|err| {
        CliError::provider(
            ProviderStage::StoreLookup,
            format!("Store lookup failed: {err}"),
        )
    })?;

    let stores = delivery_stores(found);
    debug!(count = stores.len(), "delivery stores after filtering");
    if stores.is_empty() {
        return Err(CliError::provider(
            ProviderStage::StoreLookup,
            "No nearby stores accept online delivery orders for this address",
        ));
    }
    prompter.say(format!("Found {} stores", stores.len()))?;
    Ok(stores)
}

fn choose_store<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    stores: Vec<NearbyStore>,
) -> Result<NearbyStore, CliError> {
    prompter.say("")?;
    prompter.say("Select your preferred store:")?;
    for (index, store) in stores.iter().enumerate() {
        prompter.say(format!(
            "  {}. {} ({:.1} miles)",
            index + 1,
            store.description,
            store.distance_miles
        ))?;
    }

    let count = stores.len();
    let answer = prompter.ask("\nChoice: ", |input| validate_store_choice(input, count))?;
    let index = parse_choice(&answer)
        .and_then(|choice| choice.checked_sub(1))
        .ok_or_else(|| CliError::Input(anyhow::anyhow!("invalid store choice '{answer}'")))?;
    stores
        .into_iter()
        .nth(index)
        .ok_or_else(|| CliError::Input(anyhow::anyhow!("invalid store choice '{answer}'")))
}
