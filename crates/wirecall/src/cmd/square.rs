use std::time::Instant;

use crate::client::Client;
use crate::cmd::{parse_duration, SquareArgs};
use crate::exit::{call_error, CliResult, SUCCESS};
use crate::output::{print_call, CallReport, OutputFormat};
use crate::testbench;

pub fn run(args: SquareArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let client = Client::connect(&args.path, timeout)?;

    let started = Instant::now();
    let value = testbench::square(&client.channel, args.value)
        .map_err(|err| call_error("square failed", err))?;
    let elapsed = started.elapsed();

    print_call(&CallReport::new("square", value, elapsed), format);
    client.shutdown()?;
    Ok(SUCCESS)
}
