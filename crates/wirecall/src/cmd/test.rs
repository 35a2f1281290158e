use std::time::Instant;

use crate::client::Client;
use crate::cmd::{parse_duration, TestArgs};
use crate::exit::{call_error, CliResult, SUCCESS};
use crate::output::{print_call, CallReport, OutputFormat};
use crate::testbench::{self, TEST_ARRAY_LEN};

pub fn run(args: TestArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let client = Client::connect(&args.path, timeout)?;

    let mut data = [args.fill; TEST_ARRAY_LEN];
    let started = Instant::now();
    let value = testbench::test(&client.channel, &mut data)
        .map_err(|err| call_error("test failed", err))?;
    let elapsed = started.elapsed();

    print_call(
        &CallReport::new("test", value, elapsed).with_data(data.to_vec()),
        format,
    );
    client.shutdown()?;
    Ok(SUCCESS)
}
