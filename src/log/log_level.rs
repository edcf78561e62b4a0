/// Severity of a log message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Very fine-grained events, e.g. per-buffer relay traffic.
    Trace,
    /// Events useful while debugging a session.
    Debug,
    /// Coarse progress of the process.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Failures the process can survive.
    Error,
}
