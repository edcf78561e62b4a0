use std::io;
use std::net::TcpStream;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::dial::dial_error::DialError;

/// Bound on how long a fired token can go unnoticed while a connect attempt
/// is in flight.
pub(crate) const CANCEL_POLL_SLICE: Duration = Duration::from_millis(25);

/// Outbound TCP connector honoring a caller-owned [`CancelToken`].
///
/// An optional setup delay runs inside the attempt before the socket is
/// opened; tests use it to make cancellation-during-connect deterministic
/// instead of depending on real network timing.
#[derive(Clone, Debug, Default)]
pub struct Dialer {
    setup_delay: Option<Duration>,
}

impl Dialer {
    #[must_use]
    pub fn new() -> Self {
        Self { setup_delay: None }
    }

    /// A dialer whose every attempt sleeps for `delay` before connecting.
    #[must_use]
    pub fn with_setup_delay(delay: Duration) -> Self {
        Self {
            setup_delay: Some(delay),
        }
    }

    /// Connect to `addr`, giving up as soon as `token` fires.
    ///
    /// A token that fired before the call returns immediately without
    /// touching the network. A token firing mid-attempt abandons the
    /// attempt: the socket, if it ever finishes opening, is dropped by the
    /// abandoned worker and never reaches the caller. Connect failures are
    /// returned as-is and never retried.
    pub fn dial(&self, addr: &str, token: &CancelToken) -> Result<TcpStream, DialError> {
        if let Some(reason) = token.reason() {
            return Err(DialError::from_reason(reason));
        }

        let (tx, rx) = mpsc::channel::<io::Result<TcpStream>>();
        let addr = addr.to_owned();
        let delay = self.setup_delay;

        thread::spawn(move || {
            if let Some(d) = delay {
                thread::sleep(d);
            }
            // The receiver is gone if the dial was abandoned; the stream
            // closes with the failed send.
            let _ = tx.send(TcpStream::connect(addr.as_str()));
        });

        loop {
            match rx.recv_timeout(CANCEL_POLL_SLICE) {
                Ok(Ok(stream)) => {
                    // The token may have fired in the same slice the socket
                    // opened; a fired token never yields a stream.
                    if let Some(reason) = token.reason() {
                        return Err(DialError::from_reason(reason));
                    }
                    return Ok(stream);
                }
                Ok(Err(e)) => return Err(DialError::Io(e)),
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(reason) = token.reason() {
                        return Err(DialError::from_reason(reason));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(DialError::Io(io::Error::other("connect worker vanished")));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::cancel::CancelReason;
    use std::net::TcpListener;
    use std::time::Instant;

    #[test]
    fn dial_reaches_a_live_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let stream = Dialer::new().dial(&addr, &CancelToken::new()).unwrap();
        drop(stream);
    }

    #[test]
    fn fired_token_short_circuits_before_any_network() {
        let token = CancelToken::new();
        token.cancel();

        let start = Instant::now();
        // Port 1 on localhost: were the network touched, this would still be
        // a connect attempt; a pre-fired token must not get that far.
        match Dialer::new().dial("127.0.0.1:1", &token) {
            Err(DialError::Canceled) => {}
            other => panic!("expected Canceled, got {:?}", other),
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn deadline_elapsing_mid_connect_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let token = CancelToken::with_deadline(Duration::from_millis(50));
        let dialer = Dialer::with_setup_delay(Duration::from_millis(400));

        match dialer.dial(&addr, &token) {
            Err(DialError::TimedOut) => {}
            other => panic!("expected TimedOut, got {:?}", other),
        }
        assert_eq!(token.reason(), Some(CancelReason::DeadlineExceeded));
    }

    #[test]
    fn refused_connect_is_an_io_error() {
        // Bind, note the port, then free it so the connect is refused.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        match Dialer::new().dial(&addr, &CancelToken::new()) {
            Err(e @ DialError::Io(_)) => assert!(!e.is_canceled()),
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
