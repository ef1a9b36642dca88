//! Run context threaded through one execution of the run loop.
//!
//! Holds the run config plus the optional stream sender and selected modes.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode};

use super::RunnableConfig;

pub(crate) struct RunContext {
    pub(crate) config: RunnableConfig,
    /// Set only for `stream()` runs.
    pub(crate) stream_tx: Option<mpsc::Sender<StreamEvent>>,
    pub(crate) stream_mode: HashSet<StreamMode>,
}

impl RunContext {
    pub(crate) fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub(crate) fn streaming(
        config: RunnableConfig,
        tx: mpsc::Sender<StreamEvent>,
        stream_mode: HashSet<StreamMode>,
    ) -> Self {
        Self {
            config,
            stream_tx: Some(tx),
            stream_mode,
        }
    }

    pub(crate) fn wants(&self, mode: StreamMode) -> bool {
        self.stream_tx.is_some() && self.stream_mode.contains(&mode)
    }

    /// Sends an event; a dropped receiver is ignored so the run still completes.
    pub(crate) async fn emit(&self, event: StreamEvent) {
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }
}
