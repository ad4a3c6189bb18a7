use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use ts4_dbpf::entry::hex_u32;

use super::{open_package, print_json};

#[derive(Args)]
pub struct StatsArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl StatsArgs {
    pub fn handle(&self, json: bool) -> Result<()> {
        let package = open_package(&self.file)?;
        let stats = package.stats();

        if json {
            return print_json(&stats);
        }

        println!(
            "{} resources, {} of {} bytes in resource data",
            stats.total_resources, stats.data_size, stats.package_size
        );
        for (type_id, by_type) in &stats.by_type {
            println!(
                "  {} {:<12} {:>6} {:>12}",
                hex_u32(*type_id).dimmed(),
                by_type.name,
                by_type.count,
                by_type.bytes
            );
        }

        Ok(())
    }
}
