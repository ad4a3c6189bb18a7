use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use ts4_dbpf::entry::hex_u32;

use super::{open_package, print_json};

#[derive(Args)]
pub struct InfoArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self, json: bool) -> Result<()> {
        let package = open_package(&self.file)?;
        let info = package.info();

        if json {
            return print_json(&info);
        }

        println!("{}", self.file.display().bold());
        println!("  version:        {} (index {})", info.version, info.index_version);
        println!("  created:        {}", info.created);
        println!("  modified:       {}", info.modified);
        println!("  size:           {} bytes", info.package_size);
        println!("  resources:      {}", info.total_resources);
        println!("  named:          {}", info.name_map_count);
        println!("  cas parts:      {}", info.cas_part_count);
        println!("  compressed:     {}", if info.compressed { "yes" } else { "no" });

        if !info.by_type.is_empty() {
            println!("{}", "types".bold());
            for (type_id, stats) in &info.by_type {
                println!(
                    "  {} {:<12} {:>6}",
                    hex_u32(*type_id).dimmed(),
                    stats.name,
                    stats.count
                );
            }
        }

        Ok(())
    }
}
