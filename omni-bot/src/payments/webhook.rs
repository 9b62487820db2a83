//! Stripe webhook signature check (`Stripe-Signature: t=…,v1=…`) and event bookkeeping.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sha2::Sha256;
use storage::Database;
use tracing::{info, instrument};

use super::stripe::CHECKOUT_SOURCE;
use super::PaymentError;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age of a signed payload, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: JsonValue,
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Checks `header` against `payload` signed with `secret`. Any `v1` signature may match;
/// the timestamp must be within `tolerance_secs` of now.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<(), PaymentError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| PaymentError::Signature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(PaymentError::Signature("no v1 signature".to_string()));
    }
    let age = Utc::now().timestamp().abs_diff(timestamp);
    if age > tolerance_secs.max(0) as u64 {
        return Err(PaymentError::Signature("timestamp outside tolerance".to_string()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Signature(e.to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures
        .iter()
        .filter_map(|s| decode_hex(s))
        .any(|sig| mac.clone().verify_slice(&sig).is_ok());
    if matched {
        Ok(())
    } else {
        Err(PaymentError::Signature("signature mismatch".to_string()))
    }
}

/// Logs the event and records completed payments as `payments.completed` (count) and
/// `payments.revenue_usd`. Payment intents created by checkout are counted through their
/// session event only. Returns whether a payment was recorded.
#[instrument(skip(db, event), fields(event_id = %event.id, event_type = %event.event_type))]
pub async fn handle_event(db: &Database, event: &StripeEvent) -> Result<bool, PaymentError> {
    let object = &event.data.object;
    let object_id = object.get("id").and_then(JsonValue::as_str).unwrap_or("");

    let amount_cents = match event.event_type.as_str() {
        "checkout.session.completed" => {
            info!(session_id = %object_id, "Checkout completed");
            object.get("amount_total").and_then(JsonValue::as_i64)
        }
        "payment_intent.succeeded" => {
            info!(payment_intent = %object_id, "Payment succeeded");
            let from_checkout = object
                .pointer("/metadata/source")
                .and_then(JsonValue::as_str)
                == Some(CHECKOUT_SOURCE);
            if from_checkout {
                None
            } else {
                object
                    .get("amount_received")
                    .or_else(|| object.get("amount"))
                    .and_then(JsonValue::as_i64)
            }
        }
        other => {
            info!(event_type = %other, "Unhandled Stripe event");
            None
        }
    };

    let Some(cents) = amount_cents else {
        return Ok(false);
    };
    let samples = [
        ("payments.completed".to_string(), 1.0),
        ("payments.revenue_usd".to_string(), cents as f64 / 100.0),
    ];
    db.metrics().record_many(&samples).await?;
    info!(amount_usd = cents as f64 / 100.0, "Payment recorded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, t: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.", t).as_bytes());
        mac.update(payload);
        let hex: String = mac
            .finalize()
            .into_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        format!("t={},v1={}", t, hex)
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign(payload, "whsec_x", Utc::now().timestamp());
        assert!(verify_webhook_signature(payload, &header, "whsec_x", 300).is_ok());
    }

    #[test]
    fn test_second_v1_signature_may_match() {
        let payload = b"{}";
        let t = Utc::now().timestamp();
        let good = sign(payload, "whsec_x", t);
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", t, "00".repeat(32), good_sig);
        assert!(verify_webhook_signature(payload, &header, "whsec_x", 300).is_ok());
    }

    #[test]
    fn test_wrong_secret_tampered_payload_and_stale_timestamp_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = Utc::now().timestamp();
        let header = sign(payload, "whsec_x", now);
        assert!(verify_webhook_signature(payload, &header, "whsec_other", 300).is_err());
        assert!(verify_webhook_signature(b"{\"id\":\"evt_2\"}", &header, "whsec_x", 300).is_err());

        let stale = sign(payload, "whsec_x", now - 3600);
        assert!(verify_webhook_signature(payload, &stale, "whsec_x", 300).is_err());
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(verify_webhook_signature(b"{}", "", "s", 300).is_err());
        assert!(verify_webhook_signature(b"{}", "t=abc,v1=00", "s", 300).is_err());
        assert!(verify_webhook_signature(b"{}", "t=1", "s", i64::MAX).is_err());
        assert!(verify_webhook_signature(
            b"{}",
            "t=-9223372036854775808,v1=00",
            "whsec",
            300
        )
        .is_err());
        assert!(verify_webhook_signature(b"{}", "t=9223372036854775807,v1=00", "whsec", 300).is_err());
        assert_eq!(decode_hex("zz"), None);
        assert_eq!(decode_hex("0a1"), None);
    }

    #[tokio::test]
    async fn test_handle_event_records_revenue_once_per_checkout() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let session: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {"id": "cs_1", "amount_total": 29700}}
        }))
        .unwrap();
        let intent: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_2",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_1", "amount_received": 29700, "metadata": {"source": "checkout"}}}
        }))
        .unwrap();
        let other: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_3",
            "type": "customer.created",
            "data": {"object": {"id": "cus_1"}}
        }))
        .unwrap();

        assert!(handle_event(&db, &session).await.unwrap());
        assert!(!handle_event(&db, &intent).await.unwrap());
        assert!(!handle_event(&db, &other).await.unwrap());

        let since = Utc::now() - chrono::Duration::days(1);
        assert_eq!(db.metrics().count_since("payments.completed", since).await.unwrap(), 1);
        assert_eq!(
            db.metrics().sum_since("payments.revenue_usd", since).await.unwrap(),
            297.0
        );
    }

    #[tokio::test]
    async fn test_direct_payment_intent_is_recorded() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let intent: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_4",
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_2", "amount": 49700}}
        }))
        .unwrap();
        assert!(handle_event(&db, &intent).await.unwrap());
    }
}
