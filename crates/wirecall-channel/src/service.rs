use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::{debug, trace};
use wirecall_codec::{WireCursor, WireWriter};
use wirecall_frame::{frame_message, CommandCatalog, FrameStatus};

use crate::error::DispatchError;
use crate::transport::Transport;

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// The responder side of a channel: the procedures a peer exposes.
pub trait Service {
    /// Catalog of every request identifier this service accepts.
    fn requests(&self) -> &'static CommandCatalog;

    /// Handle one framed request.
    ///
    /// `args` covers the payload after the identifier byte. The reply
    /// — identifier byte included — is written through `reply`; an
    /// empty reply means the procedure answers nothing.
    fn dispatch(
        &mut self,
        request: u8,
        args: &mut WireCursor<'_>,
        reply: &mut WireWriter<'_>,
    ) -> wirecall_codec::Result<()>;
}

/// Frame requests from `stream`, dispatch them to `service`, and send
/// each reply through `transport`, until the stream closes.
///
/// This is the peer-side counterpart of the client's call loop; tests
/// and tooling use it to run a real remote end in-process or across a
/// socket.
pub fn serve_requests<S, T, Svc>(
    mut stream: S,
    mut transport: T,
    mut service: Svc,
) -> std::result::Result<(), DispatchError>
where
    S: Read,
    T: Transport,
    Svc: Service,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
    let mut out = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        loop {
            match frame_message(service.requests(), &buf) {
                FrameStatus::Complete { len } => {
                    let message = buf.split_to(len);
                    let request = message[0];
                    let mut args = WireCursor::new(&message[1..]);

                    out.clear();
                    let mut reply = WireWriter::new(&mut out);
                    service.dispatch(request, &mut args, &mut reply)?;

                    if !out.is_empty() {
                        transport.transmit(&out)?;
                    }
                    trace!(request, reply_len = out.len(), "request dispatched");
                }
                FrameStatus::Incomplete { .. } => break,
                FrameStatus::UnknownCommand { id } => {
                    return Err(DispatchError::UnknownCommand { id })
                }
            }
        }

        let read = match stream.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(DispatchError::Io(err)),
        };

        if read == 0 {
            if buf.is_empty() {
                debug!("request stream closed cleanly");
                return Ok(());
            }
            return Err(DispatchError::ConnectionClosed);
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::transport::IoTransport;

    const REQUESTS: CommandCatalog = CommandCatalog::new(&[(2, 5)]);

    struct SquareService;

    impl Service for SquareService {
        fn requests(&self) -> &'static CommandCatalog {
            &REQUESTS
        }

        fn dispatch(
            &mut self,
            request: u8,
            args: &mut WireCursor<'_>,
            reply: &mut WireWriter<'_>,
        ) -> wirecall_codec::Result<()> {
            assert_eq!(request, 2);
            let i: i32 = args.take()?;
            reply.put(&3u8);
            reply.put(&(i * i));
            Ok(())
        }
    }

    #[test]
    fn dispatches_requests_and_writes_replies() {
        // Two back-to-back square requests: 6 and -3.
        let wire = vec![2, 6, 0, 0, 0, 2, 0xFD, 0xFF, 0xFF, 0xFF];
        let written = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        struct SharedSink(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

        impl Transport for SharedSink {
            fn transmit(&mut self, message: &[u8]) -> std::io::Result<()> {
                self.0
                    .lock()
                    .expect("sink lock")
                    .extend_from_slice(message);
                Ok(())
            }
        }

        serve_requests(
            Cursor::new(wire),
            SharedSink(std::sync::Arc::clone(&written)),
            SquareService,
        )
        .expect("serve should drain the stream");

        assert_eq!(
            *written.lock().expect("sink lock"),
            vec![3, 36, 0, 0, 0, 3, 9, 0, 0, 0],
            "6*6 then (-3)*(-3), little-endian"
        );
    }

    #[test]
    fn unknown_request_identifier_stops_the_loop() {
        let wire = vec![9, 9, 9];
        let err = serve_requests(Cursor::new(wire), IoTransport::new(Vec::new()), SquareService)
            .expect_err("identifier 9 is unknown");
        assert!(matches!(err, DispatchError::UnknownCommand { id: 9 }));
    }

    #[test]
    fn eof_mid_request_is_connection_closed() {
        let wire = vec![2, 6, 0];
        let err = serve_requests(Cursor::new(wire), IoTransport::new(Vec::new()), SquareService)
            .expect_err("three bytes are not a request");
        assert!(matches!(err, DispatchError::ConnectionClosed));
    }
}
