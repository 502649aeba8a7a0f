//! `relink rewrite` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use relink_core::{ContentTransformer, RteParser};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rewrite command.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// Document to rewrite (default: stdin).
    input: Option<PathBuf>,

    /// Write the result to this file (default: stdout).
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Write the result back to the input file.
    #[arg(short, long)]
    in_place: bool,

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

impl RewriteArgs {
    /// Execute the rewrite command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the document cannot be
    /// read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let target = self.target()?;

        let resolver = super::load_resolver(self.config.as_deref(), self.public_dir.clone())?;
        let transformer = ContentTransformer::new(resolver);

        let document = match &self.input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let report = transformer.transform_with_report(&document, &RteParser::new());

        match target {
            Some(path) => std::fs::write(path, &report.output)?,
            None => std::io::stdout().lock().write_all(report.output.as_bytes())?,
        }

        let summary = format!(
            "Rewrote {} of {} links",
            report.rewritten(),
            report.anchors
        );
        if report.rewritten() > 0 {
            output.success(&summary);
        } else {
            output.info(&summary);
        }

        Ok(())
    }

    /// Where the rewritten document goes. `None` means stdout.
    fn target(&self) -> Result<Option<&Path>, CliError> {
        if !self.in_place {
            return Ok(self.output.as_deref());
        }
        self.input
            .as_deref()
            .map(Some)
            .ok_or_else(|| CliError::Validation("--in-place requires an input file".to_owned()))
    }
}
