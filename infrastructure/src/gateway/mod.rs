//! Registration endpoint adapters.

mod webhook;

pub use webhook::{
    DEFAULT_REQUEST_TIMEOUT, WebhookError, WebhookGateway, capacity_signal, parse_count,
    parse_webhook_url,
};
