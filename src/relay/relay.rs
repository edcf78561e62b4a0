use std::io::{self, Read, Write};
use std::thread;

use crate::relay::split::SplitDuplex;

/// Copy buffer for one relay direction.
const COPY_BUF_LEN: usize = 16 * 1024;

/// Pump bytes from `from` into `to` until `from` reports end-of-data.
///
/// End-of-data is a normal outcome and yields `Ok` with the byte count; any
/// read or write failure is returned as-is. One call drives exactly one
/// direction; nothing here retries or resynchronizes.
pub fn relay<R, W>(from: &mut R, to: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; COPY_BUF_LEN];
    let mut total: u64 = 0;

    loop {
        let n = from.read(&mut buf)?;
        if n == 0 {
            return Ok(total);
        }
        to.write_all(&buf[..n])?;
        total += n as u64;
    }
}

/// Relay both directions between two full-duplex streams.
///
/// The reverse direction (`right` to `left`) runs on its own thread and is
/// not reported; its termination is visible to the peers only as stream
/// closure. The call blocks on the forward direction (`left` to `right`) and
/// returns that copy's outcome. Each session owns nothing but its two
/// streams, so concurrent sessions are fully independent.
pub fn relay_duplex<A, B>(left: A, right: B) -> io::Result<u64>
where
    A: SplitDuplex,
    B: SplitDuplex,
{
    let (mut left_read, mut left_write) = left.split()?;
    let (mut right_read, mut right_write) = right.split()?;

    thread::spawn(move || {
        let _ = relay(&mut right_read, &mut left_write);
    });

    relay(&mut left_read, &mut right_write)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::io::Cursor;

    #[test]
    fn relay_copies_everything_until_eof() {
        let data: Vec<u8> = (0..=255u8).cycle().take(3 * COPY_BUF_LEN + 17).collect();
        let mut from = Cursor::new(data.clone());
        let mut to = Vec::new();

        let n = relay(&mut from, &mut to).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(to, data);
    }

    #[test]
    fn empty_source_relays_zero_bytes() {
        let mut to = Vec::new();
        let n = relay(&mut Cursor::new(Vec::new()), &mut to).unwrap();
        assert_eq!(n, 0);
        assert!(to.is_empty());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_returned_to_the_caller() {
        let mut from = Cursor::new(vec![1u8, 2, 3]);
        let err = relay(&mut from, &mut BrokenPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
