use std::io::{ErrorKind, Write};

/// Where finished messages go.
///
/// `transmit` delivers the whole message or fails — partial sends are
/// the implementation's problem. The channel never retries.
pub trait Transport {
    fn transmit(&mut self, message: &[u8]) -> std::io::Result<()>;
}

/// [`Transport`] over any blocking `Write` stream.
///
/// Writes the full message and flushes, retrying interrupted and
/// would-block writes.
pub struct IoTransport<W> {
    inner: W,
}

impl<W: Write> IoTransport<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Transport for IoTransport<W> {
    fn transmit(&mut self, message: &[u8]) -> std::io::Result<()> {
        let mut offset = 0usize;
        while offset < message.len() {
            match self.inner.write(&message[offset..]) {
                Ok(0) => return Err(std::io::Error::from(ErrorKind::WriteZero)),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err),
            }
        }
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmits_whole_message() {
        let mut transport = IoTransport::new(Vec::new());
        transport.transmit(&[2, 0x2A, 0, 0, 0]).unwrap();
        assert_eq!(transport.into_inner(), [2, 0x2A, 0, 0, 0]);
    }

    #[test]
    fn retries_interrupted_writes() {
        struct InterruptedOnce {
            hit: bool,
            data: Vec<u8>,
        }

        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.hit {
                    self.hit = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut transport = IoTransport::new(InterruptedOnce {
            hit: false,
            data: Vec::new(),
        });
        transport.transmit(b"abc").unwrap();
        assert_eq!(transport.get_ref().data, b"abc");
    }

    #[test]
    fn zero_length_write_is_an_error() {
        struct ZeroWriter;

        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut transport = IoTransport::new(ZeroWriter);
        let err = transport.transmit(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
    }
}
