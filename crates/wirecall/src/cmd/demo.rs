use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use wirecall_channel::{serve_requests, Channel, IoTransport, ReplyPump};

use crate::cmd::DemoArgs;
use crate::exit::{call_error, io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_call, CallReport, OutputFormat};
use crate::testbench::{self, TestbenchService, REPLIES, TEST_ARRAY_LEN};

/// Everything in one process: a socket pair with the testbench service
/// on one end, the stubs plus reply pump on the other.
pub fn run(args: DemoArgs, format: OutputFormat) -> CliResult<i32> {
    let (client, server) = UnixStream::pair().map_err(|err| io_error("socketpair failed", err))?;

    let server_reader = server
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;
    let server_thread = thread::spawn(move || {
        serve_requests(server_reader, IoTransport::new(server), TestbenchService)
    });

    let writer = client
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;
    let reader = client
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;
    let channel = Arc::new(Channel::new(IoTransport::new(writer), &REPLIES));
    let pump = ReplyPump::new(reader, Arc::clone(&channel));
    let pump_thread = thread::spawn(move || pump.run());

    let started = Instant::now();
    let squared = testbench::square(&channel, args.value)
        .map_err(|err| call_error("square failed", err))?;
    print_call(&CallReport::new("square", squared, started.elapsed()), format);

    let mut data = [0u16; TEST_ARRAY_LEN];
    for (i, v) in data.iter_mut().enumerate() {
        *v = i as u16;
    }
    let started = Instant::now();
    let sum = testbench::test(&channel, &mut data).map_err(|err| call_error("test failed", err))?;
    print_call(
        &CallReport::new("test", sum, started.elapsed()).with_data(data.to_vec()),
        format,
    );

    client
        .shutdown(Shutdown::Write)
        .map_err(|err| io_error("socket shutdown failed", err))?;
    join_loop(server_thread, "service")?;
    join_loop(pump_thread, "reply pump")?;
    Ok(SUCCESS)
}

fn join_loop(
    handle: thread::JoinHandle<Result<(), wirecall_channel::DispatchError>>,
    name: &str,
) -> CliResult<()> {
    match handle.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(crate::exit::dispatch_error(name, err)),
        Err(_) => Err(CliError::new(INTERNAL, format!("{name} thread panicked"))),
    }
}
