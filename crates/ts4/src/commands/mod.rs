pub mod package;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle DBPF package files
    Package {
        #[command(subcommand)]
        command: package::PackageCommands,
    },
}

impl Commands {
    pub fn handle(&self, json: bool) -> miette::Result<()> {
        match self {
            Commands::Package { command } => command.handle(json),
        }
    }
}
