//! Validators and normalizers for interactive setup answers.
//!
//! Validators return `Err(reason)` to have the prompt print the reason and ask
//! again.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::provider::NearbyStore;

/// Maximum number of stores offered in the setup menu.
pub const MAX_STORE_CHOICES: usize = 5;

pub fn validate_address(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Address is required".to_string());
    }
    Ok(())
}

/// Phone numbers need at least 10 digits once punctuation is stripped.
pub fn validate_phone(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    if digits_only(input).len() < 10 {
        return Err("Invalid phone number".to_string());
    }
    Ok(())
}

pub fn validate_email(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !input.contains('@') {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

/// Accept a 1-based menu index in `[1, count]`.
pub fn validate_store_choice(input: &str, count: usize) -> Result<(), String> {
    match parse_choice(input) {
        Some(choice) if (1..=count).contains(&choice) => Ok(()),
        _ => Err("Invalid choice".to_string()),
    }
}

/// Parse a menu answer (leading/trailing whitespace ignored).
pub fn parse_choice(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}

/// Keep stores that take online delivery orders, at most
/// [`MAX_STORE_CHOICES`], in provider order.
pub fn delivery_stores(stores: Vec<NearbyStore>) -> Vec<NearbyStore> {
    stores
        .into_iter()
        .filter(|store| store.online_capable && store.delivery_capable)
        .take(MAX_STORE_CHOICES)
        .collect()
}

pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a tip amount; blank, unparseable or negative input becomes zero.
pub fn parse_tip(input: &str) -> Decimal {
    let trimmed = input.trim().trim_start_matches('$');
    Decimal::from_str(trimmed)
        .ok()
        .filter(|tip| tip.is_sign_positive())
        .unwrap_or(Decimal::ZERO)
}

/// `y`/`Y` only.
pub fn is_yes(input: &str) -> bool {
    input.eq_ignore_ascii_case("y")
}

/// Anything starting with `n`/`N` declines; empty input accepts.
pub fn is_decline(input: &str) -> bool {
    input
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&'n'))
}
