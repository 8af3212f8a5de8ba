//! Shared command context: app config, store, service, and identity.

use std::sync::Arc;

use daykeeper_core::platform::{ChatPort, UserId, UserRef};
use daykeeper_core::service::Daykeeper;
use daykeeper_core::store::{DocumentStore, SqliteStore};

use crate::app_config::AppConfig;
use crate::console::ConsolePort;
use crate::webhook::WebhookPoster;

pub struct Context {
    pub service: Daykeeper,
    pub user: UserRef,
}

/// Open the store and wire up the console adapter.
pub fn build() -> Result<Context, Box<dyn std::error::Error>> {
    let app = AppConfig::load()?;
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteStore::open()?);
    let webhook = app
        .journal_webhook_url
        .as_deref()
        .map(WebhookPoster::new);
    let port: Arc<dyn ChatPort> = Arc::new(ConsolePort::new(webhook));
    tracing::debug!(
        user_id = app.user_id,
        webhook = app.journal_webhook_url.is_some(),
        "context ready"
    );

    Ok(Context {
        service: Daykeeper::new(store, port),
        user: UserRef {
            id: UserId(app.user_id),
            name: app.user_name,
            avatar_url: None,
        },
    })
}

/// The calendar date all commands operate on.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
