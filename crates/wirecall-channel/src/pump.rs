use std::io::{ErrorKind, Read};
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tracing::debug;
use wirecall_frame::FrameStatus;

use crate::channel::Channel;
use crate::error::DispatchError;
use crate::transport::Transport;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// The dedicated receive thread's loop.
///
/// Accumulates bytes from any `Read` stream and feeds them through
/// [`Channel::parse_reply`]. Partial reads are buffered; complete
/// messages are consumed one at a time, and each handoff blocks this
/// thread until the caller has taken its reply.
pub struct ReplyPump<S, T> {
    stream: S,
    channel: Arc<Channel<T>>,
    buf: BytesMut,
}

impl<S: Read, T: Transport> ReplyPump<S, T> {
    pub fn new(stream: S, channel: Arc<Channel<T>>) -> Self {
        Self {
            stream,
            channel,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Pump until the stream closes.
    ///
    /// Returns `Ok(())` on a clean close (no partial message left),
    /// `DispatchError::ConnectionClosed` if the peer hung up
    /// mid-message, and `DispatchError::UnknownCommand` when the
    /// stream desynchronizes — recovery is the transport owner's
    /// decision.
    pub fn run(mut self) -> std::result::Result<(), DispatchError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            // Drain every complete message already buffered.
            loop {
                match self.channel.parse_reply(&self.buf) {
                    FrameStatus::Complete { len } => self.buf.advance(len),
                    FrameStatus::Incomplete { .. } => break,
                    FrameStatus::UnknownCommand { id } => {
                        return Err(DispatchError::UnknownCommand { id })
                    }
                }
            }

            let read = match self.stream.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(DispatchError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    debug!("reply stream closed cleanly");
                    return Ok(());
                }
                return Err(DispatchError::ConnectionClosed);
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use wirecall_frame::CommandCatalog;

    use super::*;
    use crate::channel::CallConfig;
    use crate::error::CallError;

    const REPLIES: CommandCatalog = CommandCatalog::new(&[(3, 5)]);

    struct NullTransport;

    impl Transport for NullTransport {
        fn transmit(&mut self, _message: &[u8]) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Yields one byte per read call, like a slow serial link.
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn pump_reassembles_byte_by_byte_replies() {
        let channel = Arc::new(Channel::new(NullTransport, &REPLIES));
        let reader = ByteByByteReader {
            bytes: vec![3, 0x2A, 0, 0, 0],
            pos: 0,
        };
        let pump = ReplyPump::new(reader, Arc::clone(&channel));

        let caller = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                channel.call(2, 3, |w| w.put(&6i32), |r| r.take::<i32>())
            })
        };

        // The reply must find the caller already awaiting it, or it is
        // discarded as an orphan.
        thread::sleep(std::time::Duration::from_millis(50));
        pump.run().expect("pump should drain the stream");
        let value = caller
            .join()
            .expect("caller should finish")
            .expect("call should succeed");
        assert_eq!(value, 42);
    }

    #[test]
    fn orphan_messages_do_not_stop_the_pump() {
        let channel = Arc::new(Channel::new(NullTransport, &REPLIES));
        // Two complete replies, nobody waiting for either.
        let reader = ByteByByteReader {
            bytes: vec![3, 1, 0, 0, 0, 3, 2, 0, 0, 0],
            pos: 0,
        };
        ReplyPump::new(reader, channel)
            .run()
            .expect("orphans are discarded, not errors");
    }

    #[test]
    fn unknown_command_stops_the_pump() {
        let channel = Arc::new(Channel::new(NullTransport, &REPLIES));
        let reader = ByteByByteReader {
            bytes: vec![3, 1, 0, 0, 0, 250, 9, 9],
            pos: 0,
        };
        let err = ReplyPump::new(reader, channel)
            .run()
            .expect_err("identifier 250 is not in the catalog");
        assert!(matches!(err, DispatchError::UnknownCommand { id: 250 }));
    }

    #[test]
    fn eof_mid_message_is_connection_closed() {
        let channel = Arc::new(Channel::with_config(
            NullTransport,
            &REPLIES,
            CallConfig {
                reply_timeout: Some(std::time::Duration::from_millis(10)),
            },
        ));
        let reader = ByteByByteReader {
            bytes: vec![3, 0x2A],
            pos: 0,
        };
        let err = ReplyPump::new(reader, Arc::clone(&channel))
            .run()
            .expect_err("two bytes are not a message");
        assert!(matches!(err, DispatchError::ConnectionClosed));

        // A caller on the now-dead pump just times out.
        let err = channel
            .call(2, 3, |w| w.put(&1i32), |r| r.take::<i32>())
            .expect_err("no pump is running");
        assert!(matches!(err, CallError::Timeout(_)));
    }
}
