pub mod extract;
pub mod info;
pub mod list;
pub mod names;
pub mod search;
pub mod stats;
pub mod validate;

use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;
use ts4_dbpf::{Package, ResourceType};

#[derive(clap::Subcommand)]
pub enum PackageCommands {
    /// Show the header and a summary of a package
    Info(info::InfoArgs),
    /// List the resources of a package
    List(list::ListArgs),
    /// Show the instance names of a package
    Names(names::NamesArgs),
    /// Find resources by type, group, instance or name
    Search(search::SearchArgs),
    /// Extract the resources of a package into a directory
    Extract(extract::ExtractArgs),
    /// Check one package or every package below a directory
    Validate(validate::ValidateArgs),
    /// Show resource counts and sizes per type
    Stats(stats::StatsArgs),
}

impl PackageCommands {
    pub fn handle(&self, json: bool) -> Result<()> {
        match self {
            PackageCommands::Info(info) => info.handle(json),
            PackageCommands::List(list) => list.handle(json),
            PackageCommands::Names(names) => names.handle(json),
            PackageCommands::Search(search) => search.handle(json),
            PackageCommands::Extract(extract) => extract.handle(),
            PackageCommands::Validate(validate) => validate.handle(json),
            PackageCommands::Stats(stats) => stats.handle(json),
        }
    }
}

pub(crate) fn open_package(path: &Path) -> Result<Package> {
    Package::open(path)
        .map_err(miette::Report::new)
        .context(format!("path: {}", path.display()))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{text}");
    Ok(())
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(digits, 16).map_err(|e| format!("{value:?} is not a hex number: {e}"))
}

/// Parse a group given in hex, with or without `0x`
pub(crate) fn parse_group(value: &str) -> Result<u32, String> {
    parse_hex(value)
}

/// Parse a resource type given by name (`Tuning`, `dds`, ...) or in hex
pub(crate) fn parse_type(value: &str) -> Result<u32, String> {
    ResourceType::from_name(value)
        .map(ResourceType::id)
        .map_or_else(|| parse_hex(value), Ok)
}
