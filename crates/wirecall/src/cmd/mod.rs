use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod catalog;
pub mod demo;
pub mod serve;
pub mod square;
pub mod test;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Invoke the square procedure on a serving peer.
    Square(SquareArgs),
    /// Invoke the array-exchange test procedure on a serving peer.
    Test(TestArgs),
    /// Run the testbench service on a Unix socket.
    Serve(ServeArgs),
    /// Run client and service in-process and call every procedure.
    Demo(DemoArgs),
    /// Print the testbench command catalogs.
    Catalog(CatalogArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Square(args) => square::run(args, format),
        Command::Test(args) => test::run(args, format),
        Command::Serve(args) => serve::run(args),
        Command::Demo(args) => demo::run(args, format),
        Command::Catalog(args) => catalog::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SquareArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Value to square.
    pub value: i32,
    /// Maximum time to wait for the reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Value every array element is filled with before the call.
    #[arg(long, default_value = "7")]
    pub fill: u16,
    /// Maximum time to wait for the reply (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Exit after the first connection closes.
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Value passed to the square procedure.
    #[arg(long, default_value = "6")]
    pub value: i32,
}

#[derive(Args, Debug, Default)]
pub struct CatalogArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
