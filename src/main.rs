mod appsettings;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tasker_dispatch::{LogDeliveryChannel, ReminderDispatcher};
use tasker_http::AppState;
use tasker_storage::sqlite::{self, SqliteReminderStorage, SqliteTaskStorage};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::load().context("Failed to load application settings")?;
    log::info!("Starting tasker with {:?}", settings);

    let pool = sqlite::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database.url))?;
    let tasks = Arc::new(SqliteTaskStorage::new(pool.clone()));
    let reminders = Arc::new(SqliteReminderStorage::new(pool));

    let cancellation_token = CancellationToken::new();
    let dispatcher = settings.dispatch.enabled.then(|| {
        ReminderDispatcher::new(
            reminders.clone(),
            Arc::new(LogDeliveryChannel),
            Duration::from_secs(settings.dispatch.interval_secs.max(1)),
        )
        .spawn(cancellation_token.clone())
    });
    if dispatcher.is_none() {
        log::warn!("Reminder dispatch is disabled");
    }

    let listener = TcpListener::bind(&settings.http.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.http.bind_address))?;

    tasker_http::serve(listener, AppState::new(tasks, reminders), async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl-C, shutting down");
    })
    .await?;

    cancellation_token.cancel();
    if let Some(handle) = dispatcher {
        handle.await.context("Reminder dispatcher panicked")?;
    }

    Ok(())
}
