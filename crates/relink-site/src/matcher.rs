//! Site matching for synthetic requests.
//!
//! Decides whether a request belongs to one of the installation's sites and
//! which language it addresses.
//!
//! # Matching Rules
//!
//! - The request host must equal the site host (case-insensitive). The port
//!   only matters when the site base names one explicitly.
//! - The request path must start with the site base path, on a segment boundary.
//! - Among matching sites the one with the longest base path wins.
//! - The language is the one whose base is the longest prefix of the path
//!   below the site base. No matching language means no match.

use std::sync::Arc;

use crate::request::SyntheticRequest;
use crate::site::Site;

/// Error returned by site matching.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Site base URL cannot be used for matching.
    #[error("Invalid base URL \"{base}\" for site \"{identifier}\": {reason}")]
    InvalidBase {
        /// Site identifier.
        identifier: String,
        /// Configured base URL.
        base: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The site lookup backend failed.
    #[error("Site lookup unavailable: {0}")]
    Unavailable(String),
}

/// The site a request was matched to.
#[derive(Clone, Debug)]
pub enum SiteRef {
    /// No site of the installation serves the request.
    Null,
    /// A site of the installation without routing of its own.
    Placeholder(String),
    /// A routable site.
    Configured(Arc<Site>),
}

impl SiteRef {
    /// The routable site, if any.
    pub fn configured(&self) -> Option<&Arc<Site>> {
        match self {
            Self::Configured(site) => Some(site),
            Self::Null | Self::Placeholder(_) => None,
        }
    }
}

/// Outcome of matching a request against the configured sites.
#[derive(Clone, Debug)]
pub struct SiteRouteResult {
    site: SiteRef,
    language: u32,
    tail: String,
    query: String,
    fragment: String,
}

impl SiteRouteResult {
    /// Result for a request that belongs to no site.
    pub fn null(request: &SyntheticRequest) -> Self {
        Self::new(SiteRef::Null, 0, request.path(), request)
    }

    /// Build a result for `site`, with `tail` being the request path below
    /// the site and language base.
    pub fn new(site: SiteRef, language: u32, tail: &str, request: &SyntheticRequest) -> Self {
        Self {
            site,
            language,
            tail: tail.to_owned(),
            query: request.query().to_owned(),
            fragment: request.fragment().to_owned(),
        }
    }

    /// Matched site.
    pub fn site(&self) -> &SiteRef {
        &self.site
    }

    /// Resolved language id.
    pub fn language(&self) -> u32 {
        self.language
    }

    /// Request path below the site and language base, starting with `/`.
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Query string of the matched request (without `?`).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Fragment of the matched request (without `#`).
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// Matching of synthetic requests to sites.
pub trait SiteMatcher: Send + Sync {
    /// Match a request against the installation's sites.
    ///
    /// Requests that belong to no site yield a result with [`SiteRef::Null`],
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the site lookup itself fails.
    fn match_request(&self, request: &SyntheticRequest) -> Result<SiteRouteResult, SiteError>;
}

/// Site matcher over a fixed list of sites.
#[derive(Debug, Default)]
pub struct ConfiguredSiteMatcher {
    sites: Vec<Arc<Site>>,
}

impl ConfiguredSiteMatcher {
    /// Create a matcher over `sites`.
    #[must_use]
    pub fn new(sites: Vec<Site>) -> Self {
        Self {
            sites: sites.into_iter().map(Arc::new).collect(),
        }
    }

    /// Sites known to this matcher.
    pub fn sites(&self) -> &[Arc<Site>] {
        &self.sites
    }

    fn serves_host(site: &Site, request: &SyntheticRequest) -> bool {
        let base = site.base();
        let same_host = base
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(request.host()));
        let same_port = base.port().is_none() || base.port_or_known_default() == request.port();
        same_host && same_port
    }
}

impl SiteMatcher for ConfiguredSiteMatcher {
    fn match_request(&self, request: &SyntheticRequest) -> Result<SiteRouteResult, SiteError> {
        let best = self
            .sites
            .iter()
            .filter(|site| Self::serves_host(site, request))
            .filter_map(|site| {
                strip_base(request.path(), site.base().path()).map(|rest| (site, rest))
            })
            .max_by_key(|(site, _)| site.base().path().len());

        let Some((site, site_path)) = best else {
            return Ok(SiteRouteResult::null(request));
        };

        if site.is_placeholder() {
            return Ok(SiteRouteResult::new(
                SiteRef::Placeholder(site.identifier().to_owned()),
                0,
                site_path,
                request,
            ));
        }

        if site.languages().is_empty() {
            return Ok(SiteRouteResult::new(
                SiteRef::Configured(Arc::clone(site)),
                0,
                site_path,
                request,
            ));
        }

        let language = site
            .languages()
            .iter()
            .filter_map(|language| {
                strip_base(site_path, &language.base).map(|tail| (language, tail))
            })
            .max_by_key(|(language, _)| language.base.len());

        Ok(match language {
            Some((language, tail)) => SiteRouteResult::new(
                SiteRef::Configured(Arc::clone(site)),
                language.id,
                tail,
                request,
            ),
            None => {
                tracing::debug!(
                    site = site.identifier(),
                    path = request.path(),
                    "No site language serves the path"
                );
                SiteRouteResult::null(request)
            }
        })
    }
}

/// Strip a slash-terminated `base` from `path` on a segment boundary.
///
/// Returns the remainder starting with `/` (`/` when nothing remains).
fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(base.trim_end_matches('/'))?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
