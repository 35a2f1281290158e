use std::io::ErrorKind;
use std::os::unix::net::UnixListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use wirecall_channel::{serve_requests, DispatchError, IoTransport};

use crate::cmd::ServeArgs;
use crate::exit::{dispatch_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::testbench::TestbenchService;

/// How often a quiet listener rechecks the stop flag. The listener is
/// nonblocking so ctrl-c works without waiting for one more client.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let listener = UnixListener::bind(&args.path)
        .map_err(|err| io_error(&format!("bind to {} failed", args.path.display()), err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;
    tracing::info!(path = %args.path.display(), "serving testbench procedures");

    let result = serve_loop(&listener, &running, args.once);
    let _ = std::fs::remove_file(&args.path);
    result
}

fn serve_loop(listener: &UnixListener, running: &AtomicBool, once: bool) -> CliResult<i32> {
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("listener setup failed", err))?;

    while running.load(Ordering::SeqCst) {
        let (stream, _) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
                continue;
            }
            Err(err) => return Err(io_error("accept failed", err)),
        };

        // The connection itself is served blocking.
        stream
            .set_nonblocking(false)
            .map_err(|err| io_error("stream setup failed", err))?;
        let reader = stream
            .try_clone()
            .map_err(|err| io_error("socket clone failed", err))?;
        match serve_requests(reader, IoTransport::new(stream), TestbenchService) {
            Ok(()) => tracing::info!("peer disconnected"),
            // One misbehaving client should not take the server down.
            Err(err @ DispatchError::ConnectionClosed)
            | Err(err @ DispatchError::UnknownCommand { .. }) => {
                tracing::warn!(error = %err, "connection abandoned");
            }
            Err(err) => return Err(dispatch_error("serve failed", err)),
        }

        if once {
            break;
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
