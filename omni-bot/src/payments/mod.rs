//! # Payments
//!
//! Product catalog, Stripe Checkout sessions over the REST API, and Stripe webhook
//! verification and bookkeeping.

mod catalog;
mod stripe;
mod webhook;

pub use catalog::{find_product, Product, Testimonial, PRODUCTS};
pub use stripe::{CheckoutSession, StripeClient, DEFAULT_STRIPE_API_URL};
pub use webhook::{
    handle_event, verify_webhook_signature, StripeEvent, DEFAULT_TOLERANCE_SECS, SIGNATURE_HEADER,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Stripe is not configured")]
    NotConfigured,

    #[error("Stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid webhook signature: {0}")]
    Signature(String),

    #[error("Invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
