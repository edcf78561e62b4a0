use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TrySendError};
use std::thread;

use crate::log::{log_level::LogLevel, log_msg::LogMsg, logger_handle::LoggerHandle};

/// Flush to disk often while debugging, sparingly otherwise.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

/// Bounded, non-blocking logger that writes to a per-process log file.
///
/// Producers call [`try_log`](Self::try_log) or go through a cloned
/// [`LoggerHandle`]; a background worker drains the bounded queue into a
/// buffered file writer, flushing every `FLUSH_BATCH_SIZE` lines. When the
/// queue is full messages are dropped rather than stalling a session thread.
pub struct Logger {
    handle: LoggerHandle,
    _thread: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Starts the logger in a `logs/` directory next to the executable,
    /// falling back to the working directory.
    #[must_use]
    pub fn start_default(app_name: &str, cap: usize) -> Self {
        let base = exe_dir_fallback_cwd().join("logs");
        Self::start_in_dir(base, app_name, cap)
    }

    /// Starts the logger in `dir`, creating it if missing.
    ///
    /// The file name is `{app_name}-{unix_secs}-pid{pid}.log`, so restarts
    /// and concurrent processes never collide.
    pub fn start_in_dir<D: AsRef<Path>>(dir: D, app_name: &str, cap: usize) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let fname = format!(
            "{}-{}-pid{}.log",
            app_name,
            crate::log::log_msg::now_millis() / 1000,
            std::process::id()
        );
        let file_path = dir.join(&fname);

        let (tx, rx) = mpsc::sync_channel::<LogMsg>(cap);
        let file_path_clone = file_path.clone();

        let _thread = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || {
                // Target file -> temp file -> sink; logging must never panic
                // the process it serves.
                let writer: Box<dyn Write + Send> = match open_append(&file_path_clone) {
                    Ok(f) => f,
                    Err(_) => {
                        let fallback = std::env::temp_dir().join("framelink-fallback.log");
                        match open_append(&fallback) {
                            Ok(f) => f,
                            Err(_) => Box::new(io::sink()),
                        }
                    }
                };
                let mut out = BufWriter::new(writer);

                let mut lines_written: u32 = 0;
                while let Ok(m) = rx.recv() {
                    let _ = writeln!(&mut out, "[{:?}] {} {} | {}", m.level, m.ts_ms, m.target, m.text);
                    lines_written = lines_written.wrapping_add(1);
                    if lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
                        let _ = out.flush();
                    }
                }
                let _ = out.flush();
            })
            .ok();

        Self {
            handle: LoggerHandle { tx },
            _thread,
            file_path,
        }
    }

    /// Attempts to enqueue a log message without blocking; a full queue
    /// drops the message and reports it.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_log(level, text, target)
    }

    /// Cloneable handle for passing the logging capability around.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// Path of the active log file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn open_append(path: &Path) -> io::Result<Box<dyn Write + Send>> {
    let f = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Box::new(f))
}

/// Directory of the running executable, or the working directory on error.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::time::Duration;

    #[test]
    fn logger_writes_lines_to_its_file() {
        let dir = std::env::temp_dir().join("framelink_logger_test");
        let logger = Logger::start_in_dir(&dir, "logger_test", 64);

        logger
            .try_log(LogLevel::Info, "session opened", module_path!())
            .unwrap();
        logger
            .try_log(LogLevel::Warn, "session dropped", module_path!())
            .unwrap();

        // Dropping the logger closes the queue; the worker then flushes and
        // exits on its own time, so poll briefly for the lines.
        let path = logger.file_path().to_path_buf();
        drop(logger);

        let mut content = String::new();
        for _ in 0..40 {
            content = fs::read_to_string(&path).unwrap_or_default();
            if content.contains("session dropped") {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(content.contains("session opened"));
        assert!(content.contains("session dropped"));
        let _ = fs::remove_file(&path);
    }
}
