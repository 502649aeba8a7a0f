//! `relink resolve` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// URLs to resolve.
    #[arg(required = true)]
    urls: Vec<String>,

    /// Path to configuration file (default: auto-discover relink.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Public document root (overrides config).
    #[arg(long, env = "RELINK_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Enable verbose output (log every resolution).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// Prints `<url> <internal link>` on stdout for every internal URL.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let resolver = super::load_resolver(self.config.as_deref(), self.public_dir)?;
        let mut stdout = std::io::stdout().lock();

        for url in &self.urls {
            match resolver.resolve(url) {
                Some(resolved) => writeln!(stdout, "{url} {}", resolved.descriptor)?,
                None => output.warning(&format!("{url}: not an internal link")),
            }
        }

        Ok(())
    }
}
