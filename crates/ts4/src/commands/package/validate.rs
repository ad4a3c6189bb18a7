use clap::Args;
use miette::{miette, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use ts4_dbpf::{Package, ValidationReport};
use walkdir::WalkDir;

use super::print_json;

#[derive(Serialize)]
struct PackageOutcome {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl PackageOutcome {
    fn valid(&self) -> bool {
        self.report.as_ref().is_some_and(|r| r.valid)
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// A package file, or a directory searched for packages
    #[arg(short, long, value_name = "PATH")]
    path: PathBuf,
}

fn is_package(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("package"))
}

fn check(path: PathBuf) -> PackageOutcome {
    debug!("validating {}", path.display());
    match Package::open(&path) {
        Ok(package) => PackageOutcome {
            report: Some(package.validate()),
            error: None,
            path,
        },
        Err(error) => PackageOutcome {
            report: None,
            error: Some(error.to_string()),
            path,
        },
    }
}

impl ValidateArgs {
    fn packages(&self) -> Vec<PathBuf> {
        if self.path.is_file() {
            return vec![self.path.clone()];
        }

        WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_package(p))
            .collect()
    }

    pub fn handle(&self, json: bool) -> Result<()> {
        if !self.path.exists() {
            return Err(miette!("path does not exist: {}", self.path.display()));
        }

        let outcomes = self.packages().into_iter().map(check).collect::<Vec<_>>();
        let failed = outcomes.iter().filter(|o| !o.valid()).count();

        if json {
            print_json(&outcomes)?;
        } else {
            for outcome in &outcomes {
                match (&outcome.report, &outcome.error) {
                    (Some(report), _) if report.valid => {
                        println!("✅ {}", outcome.path.display().green());
                    }
                    (Some(report), _) => {
                        println!("❌ {}", outcome.path.display().red());
                        for issue in &report.issues {
                            println!("  * {issue}");
                        }
                    }
                    (None, error) => {
                        println!("❌ {}", outcome.path.display().red());
                        println!("  * {}", error.as_deref().unwrap_or("unreadable"));
                    }
                }
                if let Some(report) = &outcome.report {
                    for warning in &report.warnings {
                        println!("  ! {}", warning.yellow());
                    }
                }
            }
        }

        info!(checked = outcomes.len(), failed, "validation finished");
        if failed > 0 {
            return Err(miette!("{failed} of {} packages failed validation", outcomes.len()));
        }
        Ok(())
    }
}
