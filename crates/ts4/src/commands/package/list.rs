use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use ts4_dbpf::package::ResourceInfo;

use super::{open_package, parse_type, print_json};

#[derive(Args)]
pub struct ListArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only list resources of this type, by name or hex id
    #[arg(short, long = "type", value_name = "TYPE", value_parser = parse_type)]
    type_id: Option<u32>,

    /// Stop after this many resources
    #[arg(short, long)]
    limit: Option<usize>,
}

impl ListArgs {
    pub fn handle(&self, json: bool) -> Result<()> {
        let package = open_package(&self.file)?;

        let resources = package
            .resources()
            .into_iter()
            .filter(|r| self.type_id.map_or(true, |type_id| r.key.type_id == type_id))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect::<Vec<_>>();

        if json {
            return print_json(&resources);
        }

        for ResourceInfo {
            key,
            type_name,
            size,
            decompressed_size,
            compressed,
            ..
        } in &resources
        {
            let marker = if *compressed { "z" } else { " " };
            println!(
                "{} {:<12} {:>10} {:>10} {}",
                key,
                type_name,
                size,
                decompressed_size,
                marker.yellow()
            );
        }
        println!(
            "{}",
            format!("{} of {} resources", resources.len(), package.len()).dimmed()
        );

        Ok(())
    }
}
