//! CLI command implementations.

pub(crate) mod resolve;
pub(crate) mod rewrite;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use relink_config::{CliSettings, Config};
use relink_core::UrlResolver;

use crate::error::CliError;
use crate::output::Output;
use crate::services::build_services;

pub(crate) use resolve::ResolveArgs;
pub(crate) use rewrite::RewriteArgs;

/// Load configuration and build a resolver that reports rewrites to the terminal.
fn load_resolver(
    config_path: Option<&Path>,
    public_dir: Option<PathBuf>,
) -> Result<UrlResolver, CliError> {
    let cli_settings = CliSettings { public_dir };
    let config = Config::load(config_path, Some(&cli_settings))?;
    let services = build_services(&config, Arc::new(Output::new()))?;
    Ok(UrlResolver::new(services))
}
