//! Webhook signature verification and payload sanitization

use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

/// Verify a gateway webhook signature header (HMAC-SHA256)
///
/// The header carries a timestamp and one or more `v1` signatures
/// (`t=...,v1=...,v1=...`); the signed payload is `"{t}.{body}"`. Any `v1`
/// candidate may match (key rotation sends two). Events older than
/// `tolerance_secs` are rejected to stop replays.
pub fn verify_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signatures: Vec<&str> = Vec::new();
    for part in sig_header.split(',') {
        if let Some(t) = part.trim().strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.trim().strip_prefix("v1=") {
            signatures.push(v);
        }
    }

    if timestamp.is_empty() || signatures.is_empty() {
        return Err("Invalid signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;

    // hmac's verify_slice is constant-time; try every candidate
    let verified = signatures.iter().any(|candidate| {
        let Ok(sig_bytes) = hex::decode(candidate) else {
            return false;
        };
        let mut mac = mac.clone();
        mac.update(signed_payload.as_bytes());
        mac.verify_slice(&sig_bytes).is_ok()
    });
    if !verified {
        return Err("Webhook signature mismatch");
    }

    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > tolerance_secs {
        return Err("Webhook timestamp outside tolerance");
    }

    Ok(())
}

/// Build the signature header for a payload (tests and local tooling)
#[cfg(test)]
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC key");
    mac.update(signed_payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

/// Reduce a gateway intent object to the fields worth persisting
///
/// Keeps the intent identity, money fields, capture/method info, a truncated
/// first-charge view and (for failures) the error triple. Customer data and
/// the full charge list never reach storage.
pub fn sanitize_intent_object(object: &Value, include_error: bool) -> Value {
    let mut sanitized = json!({
        "id": object.get("id").cloned().unwrap_or(Value::Null),
        "status": object.get("status").cloned().unwrap_or(Value::Null),
        "amount": object.get("amount").cloned().unwrap_or(Value::Null),
        "currency": object.get("currency").cloned().unwrap_or(Value::Null),
        "capture_method": object.get("capture_method").cloned().unwrap_or(Value::Null),
        "payment_method_types": object
            .get("payment_method_types")
            .cloned()
            .unwrap_or(Value::Null),
    });

    if let Some(charge) = first_charge(object) {
        sanitized["latest_charge"] = json!({
            "id": charge.get("id").cloned().unwrap_or(Value::Null),
            "status": charge.get("status").cloned().unwrap_or(Value::Null),
            "receipt_number": charge.get("receipt_number").cloned().unwrap_or(Value::Null),
        });
    } else if let Some(id) = object.get("latest_charge").and_then(Value::as_str) {
        sanitized["latest_charge"] = json!({ "id": id });
    }

    if include_error {
        if let Some(err) = object.get("last_payment_error") {
            sanitized["last_payment_error"] = json!({
                "message": err.get("message").cloned().unwrap_or(Value::Null),
                "code": err.get("code").cloned().unwrap_or(Value::Null),
                "type": err.get("type").cloned().unwrap_or(Value::Null),
            });
        }
    }

    sanitized
}

/// Receipt/charge reference for `transaction_id`: the first charge id when
/// the event carries one, else the `latest_charge` string.
pub fn charge_reference(object: &Value) -> Option<String> {
    first_charge(object)
        .and_then(|charge| charge.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| {
            object
                .get("latest_charge")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
}

fn first_charge(object: &Value) -> Option<&Value> {
    object
        .get("charges")
        .and_then(|charges| charges.get("data"))
        .and_then(Value::as_array)
        .and_then(|data| data.first())
}
