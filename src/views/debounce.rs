//! Input debouncing for interactive search
//!
//! Values submitted within `delay` of each other collapse into the last one.

use std::time::Duration;
use tokio::sync::mpsc;

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: mpsc::UnboundedReceiver<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task on the current runtime
    pub fn new(delay: Duration) -> Self {
        let (input, mut in_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, output) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut latest) = in_rx.recv().await {
                let closed = loop {
                    match tokio::time::timeout(delay, in_rx.recv()).await {
                        Ok(Some(next)) => latest = next,
                        Ok(None) => break true,
                        Err(_) => break false,
                    }
                };
                if out_tx.send(latest).is_err() || closed {
                    break;
                }
            }
        });

        Self { input, output }
    }

    /// Queue a value; ignored once the task has stopped
    pub fn submit(&self, value: T) {
        let _ = self.input.send(value);
    }

    /// Next settled value
    pub async fn next(&mut self) -> Option<T> {
        self.output.recv().await
    }

    /// Stop accepting input; the pending value, if any, is still delivered
    pub fn close(self) -> mpsc::UnboundedReceiver<T> {
        self.output
    }
}
