use std::io::{self, Read, Write};
use std::net::TcpStream;

/// A stream whose read and write capabilities can be handed to two
/// independent threads.
///
/// Relaying both directions of a connection pair takes one thread per
/// direction, and each direction must own its half outright. Only types that
/// can produce both halves get full-duplex relaying; a one-way pipe simply
/// has no `SplitDuplex` impl.
pub trait SplitDuplex {
    type Reader: Read + Send + 'static;
    type Writer: Write + Send + 'static;

    fn split(self) -> io::Result<(Self::Reader, Self::Writer)>;
}

impl SplitDuplex for TcpStream {
    type Reader = TcpStream;
    type Writer = TcpStream;

    fn split(self) -> io::Result<(TcpStream, TcpStream)> {
        let reader = self.try_clone()?;
        Ok((reader, self))
    }
}
