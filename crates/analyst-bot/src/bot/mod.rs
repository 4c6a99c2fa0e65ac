//! Telegram polling host
//!
//! Long-polls for updates and hands each text message to its own pipeline
//! task. Requests share nothing mutable; the only host-level state is the
//! update offset and the set of in-flight tasks.

pub mod commands;

pub use commands::Command;

use crate::engine::{AnalysisPipeline, DeliveryState};
use crate::error::Result;
use crate::platforms::{TelegramClient, Update};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram bot: polling loop plus per-message dispatch
pub struct TelegramBot {
    client: Arc<TelegramClient>,
    pipeline: AnalysisPipeline,
    poll_timeout: Duration,
    retry_delay: Duration,
}

impl TelegramBot {
    pub fn new(client: Arc<TelegramClient>, pipeline: AnalysisPipeline) -> Self {
        Self {
            client,
            pipeline,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Long-poll wait per `getUpdates` call
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Pause after a failed `getUpdates` call
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Poll until `shutdown` completes; in-flight requests are abandoned
    ///
    /// Shutdown is honoured while a poll is outstanding and while waiting
    /// to retry a failed one. Finished request tasks are reaped between
    /// polls so a long poll is never interrupted by them.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);

        let mut offset = None;
        let mut tasks = JoinSet::new();
        info!("polling for messages");

        'poll: loop {
            let polled = tokio::select! {
                () = &mut shutdown => break 'poll,
                polled = self.client.get_updates(offset, self.poll_timeout) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        self.dispatch(update, &mut tasks);
                    }
                }
                Err(e) => {
                    warn!(error = %e, retry_in = ?self.retry_delay, "polling failed");
                    tokio::select! {
                        () = &mut shutdown => break 'poll,
                        () = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }

            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    error!(error = %e, "request task panicked");
                }
            }
        }

        info!(in_flight = tasks.len(), "shutting down");
        tasks.shutdown().await;
        Ok(())
    }

    fn dispatch(&self, update: Update, tasks: &mut JoinSet<()>) {
        let Some(message) = update.message else {
            debug!(update = update.update_id, "skipping non-message update");
            return;
        };
        let Some(text) = message.text else {
            debug!(update = update.update_id, "skipping non-text message");
            return;
        };
        let chat = message.chat.id;

        match Command::parse(&text) {
            Command::Start => {
                let first_name = message
                    .from
                    .map_or_else(|| "there".to_string(), |user| user.first_name);
                let pipeline = self.pipeline.clone();
                tasks.spawn(async move {
                    if let Err(e) = pipeline.greet(chat, &first_name).await {
                        error!(chat = %chat, error = %e, "failed to send welcome");
                    }
                });
            }
            Command::Unsupported { name } => {
                debug!(command = %name, "ignoring unsupported command");
            }
            Command::Ticker { text } => {
                let pipeline = self.pipeline.clone();
                tasks.spawn(async move {
                    match pipeline.handle(chat, &text).await {
                        Ok(DeliveryState::ErrorShown { .. }) => {
                            debug!(chat = %chat, "request ended with an error notice");
                        }
                        Ok(state) => debug!(chat = %chat, ?state, "request finished"),
                        Err(e) => error!(chat = %chat, error = %e, "request could not be completed"),
                    }
                });
            }
        }
    }
}
