use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use wirecall_channel::{CallConfig, Channel, DispatchError, IoTransport, ReplyPump};

use crate::exit::{dispatch_error, io_error, CliError, CliResult, INTERNAL};
use crate::testbench;

/// A connected testbench client: the channel plus its receive thread.
pub struct Client {
    pub channel: Arc<Channel<IoTransport<UnixStream>>>,
    socket: UnixStream,
    pump: thread::JoinHandle<Result<(), DispatchError>>,
}

impl Client {
    pub fn connect(path: &Path, timeout: Duration) -> CliResult<Self> {
        let socket = UnixStream::connect(path)
            .map_err(|err| io_error(&format!("connect to {} failed", path.display()), err))?;
        let writer = socket
            .try_clone()
            .map_err(|err| io_error("socket clone failed", err))?;
        let reader = socket
            .try_clone()
            .map_err(|err| io_error("socket clone failed", err))?;

        let channel = Arc::new(Channel::with_config(
            IoTransport::new(writer),
            &testbench::REPLIES,
            CallConfig {
                reply_timeout: Some(timeout),
            },
        ));
        let pump = ReplyPump::new(reader, Arc::clone(&channel));
        let pump = thread::spawn(move || pump.run());
        debug!(path = %path.display(), "connected");

        Ok(Self {
            channel,
            socket,
            pump,
        })
    }

    /// Close the socket and wait for the receive thread to drain.
    pub fn shutdown(self) -> CliResult<()> {
        self.socket
            .shutdown(Shutdown::Both)
            .map_err(|err| io_error("socket shutdown failed", err))?;
        match self.pump.join() {
            Ok(Ok(())) => Ok(()),
            // A shutdown mid-message is expected when we hang up first.
            Ok(Err(DispatchError::ConnectionClosed)) => Ok(()),
            Ok(Err(err)) => Err(dispatch_error("reply pump failed", err)),
            Err(_) => Err(CliError::new(INTERNAL, "reply pump panicked")),
        }
    }
}
