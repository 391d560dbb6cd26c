//! Card-number masking for anything shown to the user.

use serde_json::Value;

/// Mask a card number to `****-****-****-<last4>`.
pub fn mask_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let start = chars.len().saturating_sub(4);
    let last4: String = chars[start..].iter().collect();
    format!("****-****-****-{last4}")
}

/// Copy of a raw document with `payment.number` masked, whether it was
/// stored as a string or as a bare JSON number.
///
/// Other fields are left exactly as stored so `config show` reflects the file.
pub fn masked_document(doc: &Value) -> Value {
    let mut masked = doc.clone();
    let replacement = match doc.pointer("/payment/number") {
        Some(Value::String(text)) if !text.is_empty() => Some(mask_card_number(text)),
        Some(Value::Number(number)) => Some(mask_card_number(&number.to_string())),
        _ => None,
    };
    if let (Some(replacement), Some(number)) = (replacement, masked.pointer_mut("/payment/number"))
    {
        *number = Value::String(replacement);
    }
    masked
}
