//! Webhook Event Processor
//!
//! Applies gateway webhook events to local payment state. Everything after a
//! valid signature acknowledges 2xx with marker fields so the gateway stops
//! retrying; only configuration and signature failures surface as errors.
//!
//! Dedup is durable: the gateway event id is the primary key of
//! `processed_webhook_events`, claimed with an atomic insert-if-absent. The
//! loser of a concurrent race re-reads and backs off once the winner has
//! finished; the state transitions themselves are idempotent single-row
//! updates, so a recovery pass over a half-processed event cannot
//! double-apply.

use serde::Serialize;
use serde_json::Value;
use shared::models::{PaymentStatus, CARD_PROVIDER};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::db::repository::{payment, payment_config, webhook_event};
use crate::security_log;
use crate::stripe::webhook::{charge_reference, sanitize_intent_object, verify_signature};

const EVENT_SUCCEEDED: &str = "payment_intent.succeeded";
const EVENT_FAILED: &str = "payment_intent.payment_failed";

/// Acknowledgement returned to the gateway
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_missing: Option<bool>,
}

impl WebhookAck {
    fn received() -> Self {
        Self {
            received: true,
            ignored: None,
            duplicate: None,
            payment_missing: None,
        }
    }

    fn ignored() -> Self {
        Self {
            ignored: Some(true),
            ..Self::received()
        }
    }

    fn duplicate() -> Self {
        Self {
            duplicate: Some(true),
            ..Self::received()
        }
    }

    fn payment_missing() -> Self {
        Self {
            payment_missing: Some(true),
            ..Self::received()
        }
    }
}

/// Verify, dedup and apply one gateway webhook delivery.
pub async fn process_event(
    pool: &SqlitePool,
    path_token: Option<&str>,
    signature_header: Option<&str>,
    body: &[u8],
    tolerance_secs: i64,
) -> Result<WebhookAck, AppError> {
    // 1. Webhooks are only supported for the card provider
    let config = payment_config::find_active(pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::WebhookNotSupported))?;
    if config.gateway_provider != CARD_PROVIDER {
        return Err(AppError::new(ErrorCode::WebhookNotSupported));
    }

    // 2. Nothing can be trusted without a signing secret
    let secret = config
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::WebhookSecretMissing))?;

    // 3. Optional extra path segment; a mismatch looks like any other 404
    if let Some(expected) = config.webhook_path_token.as_deref().filter(|t| !t.is_empty()) {
        if path_token != Some(expected) {
            security_log!(
                "WARN",
                "webhook_path_token_mismatch",
                provided = path_token.unwrap_or("").to_string()
            );
            return Err(AppError::new(ErrorCode::NotFound));
        }
    }

    // 4. Signature over "{timestamp}.{body}" with timestamp tolerance
    let sig = signature_header.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::WebhookSignatureInvalid,
            "Missing stripe-signature header",
        )
    })?;
    if let Err(reason) = verify_signature(body, sig, secret, tolerance_secs) {
        security_log!("WARN", "webhook_signature_rejected", reason = reason);
        return Err(AppError::with_message(
            ErrorCode::WebhookSignatureInvalid,
            reason,
        ));
    }

    let event: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::new(ErrorCode::WebhookPayloadInvalid))?;
    let event_id = match event["id"].as_str() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(AppError::with_message(
                ErrorCode::WebhookPayloadInvalid,
                "Event id missing",
            ))
        }
    };
    let event_type = event["type"].as_str().unwrap_or("");

    // 5. Only intent success/failure apply here; everything else is absorbed
    if event_type != EVENT_SUCCEEDED && event_type != EVENT_FAILED {
        tracing::debug!("Ignoring webhook event {} of type {}", event_id, event_type);
        return Ok(WebhookAck::ignored());
    }

    // 6. Durable dedup; an unprocessed row is a prior partial failure and
    //    falls through for recovery
    if let Some(existing) = webhook_event::find_by_event_id(pool, &event_id).await? {
        if existing.is_processed() {
            tracing::info!("Webhook event {} already processed", event_id);
            return Ok(WebhookAck::duplicate());
        }
    }

    let object = &event["data"]["object"];
    let intent_id = object["id"].as_str().unwrap_or("");
    let payload = sanitize_intent_object(object, event_type == EVENT_FAILED).to_string();

    // 7. Resolve the local payment; events for foreign or stale intents are
    //    recorded and absorbed, never errored
    let record = match intent_id {
        "" => None,
        id => payment::find_by_remote_intent(pool, id).await?,
    };
    let Some(record) = record else {
        webhook_event::claim(pool, &event_id, event_type, None, Some(&payload)).await?;
        webhook_event::mark_processed(pool, &event_id, None, None).await?;
        tracing::warn!(
            "Webhook event {} references unknown intent {:?}",
            event_id,
            intent_id
        );
        return Ok(WebhookAck::payment_missing());
    };

    // 8. Claim the event id, then apply the transition
    let claimed =
        webhook_event::claim(pool, &event_id, event_type, Some(record.id), Some(&payload)).await?;
    if !claimed {
        // Lost the race; back off if the winner finished, recover otherwise
        let finished = webhook_event::find_by_event_id(pool, &event_id)
            .await?
            .is_some_and(|row| row.is_processed());
        if finished {
            return Ok(WebhookAck::duplicate());
        }
    }

    let transition = match event_type {
        EVENT_SUCCEEDED => {
            if record.status == PaymentStatus::Completed {
                tracing::warn!(
                    "Payment {} already completed; webhook event {} refreshes the stored payload only",
                    record.id,
                    event_id
                );
            }
            let amount = object
                .get("amount")
                .and_then(Value::as_i64)
                .or_else(|| object.get("amount_received").and_then(Value::as_i64));
            let currency = object
                .get("currency")
                .and_then(Value::as_str)
                .map(str::to_uppercase);
            let receipt = charge_reference(object);
            payment::complete_from_event(
                pool,
                record.id,
                amount,
                currency.as_deref(),
                receipt.as_deref(),
                &payload,
            )
            .await
        }
        _ => {
            if record.status == PaymentStatus::Completed {
                tracing::warn!(
                    "Payment {} already completed; late failure event {} leaves it unchanged",
                    record.id,
                    event_id
                );
            }
            payment::fail_from_event(pool, record.id, &payload).await
        }
    };
    match transition {
        Ok(_) => tracing::info!(
            "Payment {} transitioned by webhook event {} ({})",
            record.id,
            event_id,
            event_type
        ),
        Err(e) => {
            tracing::error!(event_id = %event_id, error = %e, "Failed to apply webhook transition");
            return Err(e.into());
        }
    }

    // 9. Seal the dedup row; received_at stays from the first delivery
    webhook_event::mark_processed(pool, &event_id, Some(record.id), Some(&payload)).await?;

    // 10. Plain acknowledgement
    Ok(WebhookAck::received())
}
