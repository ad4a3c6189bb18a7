use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use ts4_dbpf::{package::ResourceInfo, SearchFilter};

use super::{open_package, parse_group, parse_type, print_json};

#[derive(Args)]
pub struct SearchArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Resource type, by name or hex id
    #[arg(short, long = "type", value_name = "TYPE", value_parser = parse_type)]
    type_id: Option<u32>,

    /// Group in hex
    #[arg(short, long, value_name = "HEX", value_parser = parse_group)]
    group: Option<u32>,

    /// Regular expression matched against the instance in hex and decimal
    #[arg(short, long, value_name = "REGEX")]
    instance: Option<String>,

    /// Regular expression matched against the instance name
    #[arg(short, long, value_name = "REGEX")]
    name: Option<String>,
}

impl SearchArgs {
    pub fn handle(&self, json: bool) -> Result<()> {
        let package = open_package(&self.file)?;

        let filter = SearchFilter::builder()
            .maybe_type_id(self.type_id)
            .maybe_group(self.group)
            .maybe_instance_pattern(self.instance.clone())
            .maybe_name_pattern(self.name.clone())
            .build();

        let found = package
            .search(&filter)?
            .into_iter()
            .map(ResourceInfo::from)
            .collect::<Vec<_>>();

        if json {
            return print_json(&found);
        }

        let names = package.name_map();
        for resource in &found {
            let name = names.name(resource.key.instance).unwrap_or_default();
            println!("{} {:<12} {}", resource.key, resource.type_name, name.green());
        }
        println!("{}", format!("{} matches", found.len()).dimmed());

        Ok(())
    }
}
