use std::io::Write;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::keepalive::pinger::run_pinger;

/// Owns a background thread running [`run_pinger`] over a writer.
pub struct KeepaliveWorker {
    token: CancelToken,
    reset_tx: Sender<Duration>,
    handle: Option<thread::JoinHandle<()>>,
}

impl KeepaliveWorker {
    /// Spawns the pinger over `writer`, starting at `interval`.
    #[must_use]
    pub fn spawn<W>(mut writer: W, interval: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let token = CancelToken::new();
        let (reset_tx, reset_rx) = mpsc::channel();
        let _ = reset_tx.send(interval);

        let worker_token = token.clone();
        let handle = thread::spawn(move || {
            let _ = run_pinger(&mut writer, &worker_token, &reset_rx);
        });

        Self {
            token,
            reset_tx,
            handle: Some(handle),
        }
    }

    /// Changes the emission interval from the next wait cycle on.
    pub fn set_interval(&self, interval: Duration) {
        let _ = self.reset_tx.send(interval);
    }

    /// Stops emitting and joins the worker thread.
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}
