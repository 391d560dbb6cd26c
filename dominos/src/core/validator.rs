//! Required-field checks for the configuration document.
//!
//! Runs on raw JSON so absent blocks, `null`s and wrong-typed values are all
//! visible. A value counts as present when it is not null, not `false`, not
//! zero and not an empty string.
//!
//! Check order is fixed: customer, payment, store, presets. A missing
//! `customer`, `payment` or `store` block ends validation at that point;
//! missing leaves within a block are all reported.

use serde_json::Value;

/// Validate a configuration document.
///
/// Returns human-readable defects in check order (empty on success).
pub fn validate_document(doc: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(customer) = block(doc, "customer") else {
        errors.push("Missing customer configuration".to_string());
        return errors;
    };
    require_fields(
        customer,
        "customer",
        &["firstName", "lastName", "email", "phone"],
        &mut errors,
    );
    match block(customer, "address") {
        None => errors.push("Missing customer.address".to_string()),
        Some(address) => require_fields(
            address,
            "customer.address",
            &["street", "city", "region", "postalCode"],
            &mut errors,
        ),
    }

    let Some(payment) = block(doc, "payment") else {
        errors.push("Missing payment configuration".to_string());
        return errors;
    };
    require_fields(
        payment,
        "payment",
        &["number", "expiration", "securityCode", "postalCode"],
        &mut errors,
    );

    let Some(store) = block(doc, "store") else {
        errors.push("Missing store configuration".to_string());
        return errors;
    };
    require_fields(store, "store", &["storeID"], &mut errors);

    if !matches!(doc.get("presets"), Some(Value::Object(_))) {
        errors.push("Missing or invalid presets configuration".to_string());
    }

    errors
}

fn block<'a>(parent: &'a Value, key: &str) -> Option<&'a Value> {
    parent.get(key).filter(|value| is_present(value))
}

fn require_fields(parent: &Value, prefix: &str, fields: &[&str], errors: &mut Vec<String>) {
    for field in fields {
        if !parent.get(*field).is_some_and(is_present) {
            errors.push(format!("Missing {prefix}.{field}"));
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
