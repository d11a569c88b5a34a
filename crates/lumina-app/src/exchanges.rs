//! Background exchanges started from the REPL.
//!
//! Exchanges run on their own tasks so the prompt stays responsive. The set
//! is drained before the binary exits so a reply already on its way is still
//! shown.

use std::future::Future;

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use lumina_chat::Exchange;

#[derive(Default)]
pub struct Exchanges {
    tasks: JoinSet<Exchange>,
}

impl Exchanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, exchange: F)
    where
        F: Future<Output = Exchange> + Send + 'static,
    {
        while let Some(finished) = self.tasks.try_join_next() {
            log_outcome(finished);
        }
        self.tasks.spawn(exchange);
    }

    /// Exchanges spawned and not yet collected.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every outstanding exchange. Returns how many were awaited.
    pub async fn drain(&mut self) -> usize {
        let mut awaited = 0;
        while let Some(finished) = self.tasks.join_next().await {
            log_outcome(finished);
            awaited += 1;
        }
        awaited
    }
}

fn log_outcome(finished: Result<Exchange, JoinError>) {
    match finished {
        Ok(outcome) => debug!(?outcome, "Exchange finished"),
        Err(e) => warn!(error = %e, "Exchange task failed"),
    }
}
