mod client;
mod config;
mod http;

pub use client::WebhookClient;
pub use config::{DEFAULT_WEBHOOK_URL, WebhookConfig};
pub use http::HttpWebhookClient;
