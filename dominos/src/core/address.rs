//! Free-text address handling.
//!
//! Addresses are entered as a single line and split on commas into positional
//! parts. This is best-effort: an address with an unusual comma count lands
//! its parts in the wrong fields, and the user fixes that with `config edit`.

use crate::core::types::Address;

/// Split `street, city, region, postal` into an [`Address`].
///
/// The fourth part is the postal code; with fewer parts the last part is used
/// (so `"1 Main St, Portland, OR 97201"` yields region and postal code both
/// equal to `"OR 97201"`).
pub fn parse_address(raw: &str) -> Address {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let part = |index: usize| parts.get(index).copied().unwrap_or_default();

    let postal_code = [part(3), parts.last().copied().unwrap_or_default()]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default();

    Address {
        street: part(0).to_string(),
        city: part(1).to_string(),
        region: part(2).to_string(),
        postal_code: postal_code.to_string(),
    }
}

/// Render an address as the single line the ordering provider expects.
pub fn format_address_line(address: &Address) -> String {
    format!(
        "{}, {}, {} {}",
        address.street, address.city, address.region, address.postal_code
    )
}

/// Split a single-line address into `(street, remainder)` at the first comma.
///
/// The store locator takes the street and the city/region/postal part as
/// separate query parameters.
pub fn split_street(line: &str) -> (String, String) {
    match line.split_once(',') {
        Some((street, rest)) => (street.trim().to_string(), rest.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}
