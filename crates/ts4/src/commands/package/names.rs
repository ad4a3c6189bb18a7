use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use ts4_dbpf::entry::hex_u64;

use super::{open_package, print_json};

#[derive(Serialize)]
struct NamedInstance<'a> {
    instance: String,
    name: &'a str,
}

#[derive(Args)]
pub struct NamesArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only show names containing this text, ignoring case
    #[arg(short, long, value_name = "TEXT")]
    contains: Option<String>,

    /// Stop after this many names
    #[arg(short, long)]
    limit: Option<usize>,
}

impl NamesArgs {
    pub fn handle(&self, json: bool) -> Result<()> {
        let package = open_package(&self.file)?;
        let needle = self.contains.as_deref().map(str::to_lowercase);

        let names = package
            .name_map()
            .iter()
            .filter(|(_, name)| {
                needle
                    .as_deref()
                    .map_or(true, |needle| name.to_lowercase().contains(needle))
            })
            .sorted_by_key(|(instance, _)| **instance)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|(instance, name)| NamedInstance {
                instance: hex_u64(*instance),
                name,
            })
            .collect::<Vec<_>>();

        if json {
            return print_json(&names);
        }

        for NamedInstance { instance, name } in &names {
            println!("{} {}", instance.dimmed(), name);
        }

        Ok(())
    }
}
