use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use ts4_dbpf::{resource_type::type_name, ResourceEntry};

use super::{open_package, parse_type};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input package file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only extract resources of this type, by name or hex id
    #[arg(short, long = "type", value_name = "TYPE", value_parser = parse_type)]
    type_id: Option<u32>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// `DIR/<type name>/<type>_<group>_<instance>.bin`
fn target_path(directory: &Path, entry: &ResourceEntry) -> PathBuf {
    directory.join(type_name(entry.type_id())).join(format!(
        "{:08X}_{:08X}_{:016X}.bin",
        entry.type_id(),
        entry.group(),
        entry.instance()
    ))
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let package = open_package(&self.file)?;

        let mut written = 0usize;
        let mut skipped = 0usize;
        for entry in package
            .entries()
            .iter()
            .filter(|e| self.type_id.map_or(true, |type_id| e.type_id() == type_id))
        {
            let data = match package.get_bytes(entry) {
                Ok(data) => data,
                Err(error) => {
                    warn!(%entry, %error, "skipping resource");
                    skipped += 1;
                    continue;
                }
            };

            let p = target_path(&self.directory, entry);
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }
            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };

            out.write_all(&data).into_diagnostic()?;
            written += 1;

            // extracted data is not read again
            package.clear_cache();
        }

        info!(written, skipped, "extracted {}", self.file.display());
        Ok(())
    }
}
