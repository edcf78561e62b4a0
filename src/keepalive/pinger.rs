use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;

/// Marker written on every emission.
pub const PING_MARKER: &[u8] = b"ping\n";

/// Interval used when the caller never supplies one.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// Bound on how long a fired token can go unnoticed between emissions.
const CANCEL_POLL_SLICE: Duration = Duration::from_millis(25);

/// Periodically write the keepalive marker to `w` until `token` fires or a
/// write fails.
///
/// `reset` adjusts the interval at runtime: a positive duration replaces the
/// interval and re-arms the timer from now, discarding whatever remained of
/// the previous cycle so a stale expiry can never fire late; a zero duration
/// restarts the wait but leaves the interval unchanged. An override already
/// queued when the pinger starts replaces the default initial interval.
///
/// At most one marker is written per full interval, and an interval change
/// never retroactively shortens or lengthens a wait that already elapsed.
/// Cancellation ends the run with `Ok`; a write error ends it with that
/// error. Either way the pinger never writes again.
pub fn run_pinger<W: Write>(
    w: &mut W,
    token: &CancelToken,
    reset: &Receiver<Duration>,
) -> io::Result<()> {
    let mut interval = DEFAULT_PING_INTERVAL;
    let mut reset_open = true;

    // Idle: pick up an initial override if one is already queued.
    match reset.try_recv() {
        Ok(d) if !d.is_zero() => interval = d,
        Ok(_) => {}
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => reset_open = false,
    }

    let mut deadline = Instant::now() + interval;

    // Waiting: race cancellation, an interval override, and timer expiry.
    loop {
        if token.is_canceled() {
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            // Emitting.
            w.write_all(PING_MARKER)?;
            w.flush()?;
            deadline = Instant::now() + interval;
            continue;
        }

        let wait = deadline.duration_since(now).min(CANCEL_POLL_SLICE);
        if reset_open {
            match reset.recv_timeout(wait) {
                Ok(d) => {
                    if !d.is_zero() {
                        interval = d;
                    }
                    deadline = Instant::now() + interval;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => reset_open = false,
            }
        } else if token.wait_timeout(wait) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Writer that records the instant of every marker it receives.
    #[derive(Clone, Default)]
    struct MarkerLog {
        stamps: Arc<Mutex<Vec<Instant>>>,
    }

    impl MarkerLog {
        fn stamps(&self) -> Vec<Instant> {
            self.stamps.lock().unwrap().clone()
        }
    }

    impl Write for MarkerLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            assert_eq!(buf, PING_MARKER, "pinger wrote something else");
            self.stamps.lock().unwrap().push(Instant::now());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn spawn_pinger(
        log: MarkerLog,
        token: CancelToken,
        reset: mpsc::Receiver<Duration>,
    ) -> thread::JoinHandle<io::Result<()>> {
        thread::spawn(move || {
            let mut log = log;
            run_pinger(&mut log, &token, &reset)
        })
    }

    #[test]
    fn override_before_the_first_tick_sets_the_first_interval() {
        let log = MarkerLog::default();
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();

        // Initial interval is long; the queued override must win.
        tx.send(Duration::from_millis(500)).unwrap();
        let start = Instant::now();
        let handle = spawn_pinger(log.clone(), token.clone(), rx);

        tx.send(Duration::from_millis(100)).unwrap();
        thread::sleep(Duration::from_millis(250));
        token.cancel();
        handle.join().unwrap().unwrap();

        let stamps = log.stamps();
        assert!(!stamps.is_empty(), "no marker written");
        let first = stamps[0].duration_since(start);
        assert!(
            first >= Duration::from_millis(90) && first < Duration::from_millis(400),
            "first marker at {first:?}, wanted roughly the 100ms override"
        );
    }

    #[test]
    fn zero_override_leaves_the_interval_unchanged() {
        let log = MarkerLog::default();
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();

        tx.send(Duration::from_millis(80)).unwrap();
        let handle = spawn_pinger(log.clone(), token.clone(), rx);

        // A zero override restarts the wait but must not change the 80ms
        // interval, so markers keep their spacing afterwards.
        thread::sleep(Duration::from_millis(20));
        tx.send(Duration::ZERO).unwrap();
        thread::sleep(Duration::from_millis(300));
        token.cancel();
        handle.join().unwrap().unwrap();

        let stamps = log.stamps();
        assert!(stamps.len() >= 2, "expected at least two markers, got {}", stamps.len());
        let gap = stamps[1].duration_since(stamps[0]);
        assert!(
            gap >= Duration::from_millis(60) && gap < Duration::from_millis(200),
            "marker gap {gap:?} does not match the 80ms interval"
        );
    }

    #[test]
    fn cancellation_before_the_first_tick_writes_nothing() {
        let log = MarkerLog::default();
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        tx.send(Duration::from_millis(200)).unwrap();

        let handle = spawn_pinger(log.clone(), token.clone(), rx);
        thread::sleep(Duration::from_millis(30));
        token.cancel();
        handle.join().unwrap().unwrap();

        assert!(log.stamps().is_empty(), "marker written after cancel-only run");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_error_stops_the_pinger() {
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        tx.send(Duration::from_millis(5)).unwrap();

        let err = run_pinger(&mut FailingWriter, &token, &rx).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn closed_reset_channel_falls_back_to_the_default_interval() {
        let log = MarkerLog::default();
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel::<Duration>();
        drop(tx);

        let handle = spawn_pinger(log.clone(), token.clone(), rx);
        thread::sleep(Duration::from_millis(50));
        token.cancel();
        handle.join().unwrap().unwrap();

        // Default interval is 30s; nothing can have been written yet.
        assert!(log.stamps().is_empty());
    }
}
