use std::io::IsTerminal;
use std::time::Duration;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use wirecall_frame::CommandCatalog;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One completed remote call, ready to print.
#[derive(Serialize)]
pub struct CallReport<'a> {
    pub procedure: &'a str,
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u16>>,
    pub elapsed_ms: u128,
}

impl<'a> CallReport<'a> {
    pub fn new(procedure: &'a str, value: i32, elapsed: Duration) -> Self {
        Self {
            procedure,
            value,
            data: None,
            elapsed_ms: elapsed.as_millis(),
        }
    }

    pub fn with_data(mut self, data: Vec<u16>) -> Self {
        self.data = Some(data);
        self
    }
}

pub fn print_call(report: &CallReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PROCEDURE", "VALUE", "DATA", "ELAPSED"])
                .add_row(vec![
                    report.procedure.to_string(),
                    report.value.to_string(),
                    data_preview(report.data.as_deref()),
                    format!("{}ms", report.elapsed_ms),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} -> {} data={} elapsed={}ms",
                report.procedure,
                report.value,
                data_preview(report.data.as_deref()),
                report.elapsed_ms
            );
        }
    }
}

#[derive(Serialize)]
struct CatalogEntry {
    id: u8,
    wire_len: usize,
}

pub fn print_catalog(name: &str, catalog: &CommandCatalog, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let entries: Vec<CatalogEntry> = catalog
                .entries()
                .map(|(id, wire_len)| CatalogEntry { id, wire_len })
                .collect();
            let out = serde_json::json!({ "catalog": name, "entries": entries });
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CATALOG", "ID", "WIRE LENGTH"]);
            for (id, wire_len) in catalog.entries() {
                table.add_row(vec![name.to_string(), id.to_string(), wire_len.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (id, wire_len) in catalog.entries() {
                println!("{name}: id={id} wire_len={wire_len}");
            }
        }
    }
}

fn data_preview(data: Option<&[u16]>) -> String {
    match data {
        None => "-".to_string(),
        Some(data) if data.len() <= 8 => format!("{data:?}"),
        Some(data) => format!("[{}, {}, .. {} elements]", data[0], data[1], data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_data_prints_in_full() {
        assert_eq!(data_preview(Some(&[1, 2, 3])), "[1, 2, 3]");
        assert_eq!(data_preview(None), "-");
    }

    #[test]
    fn long_data_is_abbreviated() {
        let data: Vec<u16> = (0..42).collect();
        assert_eq!(data_preview(Some(&data)), "[0, 1, .. 42 elements]");
    }
}
