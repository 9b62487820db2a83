use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::{error, info, warn};

use super::{ApiError, AppState};
use crate::payments::{
    handle_event, verify_webhook_signature, StripeEvent, DEFAULT_TOLERANCE_SECS,
    SIGNATURE_HEADER,
};
use crate::telegram::parse_update;

pub const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Acknowledges at once; the chain runs in its own task.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    if let Some(ref secret) = state.telegram_webhook_secret {
        let given = headers
            .get(TELEGRAM_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(secret.as_str()) {
            warn!("Telegram webhook with missing or wrong secret token");
            return Err(ApiError::unauthorized());
        }
    }

    let Some(chain) = state.chain.clone() else {
        return Err(ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Bot is not configured",
        ));
    };

    let message = parse_update(&body).map_err(|e| {
        warn!(error = %e, "Malformed Telegram update");
        ApiError::bad_request("Invalid update")
    })?;
    let Some(message) = message else {
        return Ok("OK");
    };

    info!(
        user_id = message.user.id,
        chat_id = message.chat.id,
        message_content = %message.content,
        "Received webhook message"
    );
    tokio::spawn(async move {
        if let Err(e) = chain.handle(&message).await {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
        }
    });
    Ok("OK")
}

pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let Some(ref secret) = state.stripe_webhook_secret else {
        warn!("Stripe webhook received but STRIPE_WEBHOOK_SECRET is not set");
        return Err(ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Stripe webhook is not configured",
        ));
    };
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    verify_webhook_signature(&body, signature, secret, DEFAULT_TOLERANCE_SECS)?;
    let event: StripeEvent = serde_json::from_slice(&body).map_err(crate::payments::PaymentError::from)?;
    handle_event(&state.db, &event).await?;
    Ok("Success")
}
