use std::io;
use std::net::TcpStream;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use crate::cancel::CancelToken;
use crate::dial::dial_error::DialError;
use crate::dial::dialer::{CANCEL_POLL_SLICE, Dialer};

/// Dial every address concurrently and keep the first stream that connects.
///
/// All attempts share a child token that is canceled as soon as a winner
/// settles the race (or the caller's `token` fires), so the losers abort on
/// their own; their outcomes are discarded. The call fails only when the
/// caller's token fires or every attempt has failed.
pub fn dial_race(
    dialer: &Dialer,
    addrs: &[&str],
    token: &CancelToken,
) -> Result<TcpStream, DialError> {
    if addrs.is_empty() {
        return Err(DialError::Io(io::Error::other("no addresses to dial")));
    }
    if let Some(reason) = token.reason() {
        return Err(DialError::from_reason(reason));
    }

    let race_token = CancelToken::new();
    let (tx, rx) = mpsc::channel::<Result<TcpStream, DialError>>();

    for addr in addrs {
        let tx = tx.clone();
        let addr = (*addr).to_owned();
        let dialer = dialer.clone();
        let race_token = race_token.clone();
        thread::spawn(move || {
            let _ = tx.send(dialer.dial(&addr, &race_token));
        });
    }
    drop(tx);

    let mut last_err: Option<DialError> = None;
    loop {
        match rx.recv_timeout(CANCEL_POLL_SLICE) {
            Ok(Ok(stream)) => {
                race_token.cancel();
                return Ok(stream);
            }
            Ok(Err(e)) => last_err = Some(e),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(reason) = token.reason() {
                    race_token.cancel();
                    return Err(DialError::from_reason(reason));
                }
            }
            // All attempts finished without a winner.
            Err(RecvTimeoutError::Disconnected) => {
                return Err(last_err
                    .unwrap_or_else(|| DialError::Io(io::Error::other("every attempt failed"))));
            }
        }
    }
}
