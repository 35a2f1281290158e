use crate::cmd::CatalogArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_catalog, OutputFormat};
use crate::testbench::{REPLIES, REQUESTS};

pub fn run(_args: CatalogArgs, format: OutputFormat) -> CliResult<i32> {
    print_catalog("requests", &REQUESTS, format);
    print_catalog("replies", &REPLIES, format);
    Ok(SUCCESS)
}
