use std::sync::mpsc;

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};

/// Lightweight, cloneable handle to the process logger.
///
/// A thin sink that enqueues `LogMsg` into a bounded `SyncSender`. Calls to
/// [`try_log`](Self::try_log) never block: when the queue is full the
/// message is dropped and an error returned. Obtain one from [`Logger`] and
/// clone it per module or thread.
///
/// [`Logger`]: crate::log::logger::Logger
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) tx: mpsc::SyncSender<LogMsg>,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

impl LoggerHandle {
    /// Attempts to enqueue a log message without blocking.
    ///
    /// # Errors
    /// - `TrySendError::Full` when the bounded queue is at capacity (the
    ///   message is dropped).
    /// - `TrySendError::Disconnected` when the logger worker has exited.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        self.tx.try_send(LogMsg::new(level, text, target))
    }
}
