//! Site matching and page routing for Relink.
//!
//! Turns an absolute URL into the question "which site, which language,
//! which page" the way the installation's frontend would answer it:
//!
//! - [`SyntheticRequest`]: a never-dispatched request built from an href
//! - [`SiteMatcher`]: finds the site and language serving the request
//! - [`PageRouter`]: finds the page (and routing arguments) below the site
//!
//! [`ConfiguredSiteMatcher`] and [`SitePageRouter`] implement both steps over
//! [`Site`] definitions built from configuration.
//!
//! # Example
//!
//! ```
//! use relink_site::{
//!     ConfiguredSiteMatcher, PageRouter, Route, RouteOutcome, Site, SiteMatcher,
//!     SitePageRouter, SyntheticRequest,
//! };
//!
//! let site = Site::new("main", "https://example.com/")
//!     .unwrap()
//!     .with_language(0, "/")
//!     .with_route(Route::new("/about", 12));
//! let matcher = ConfiguredSiteMatcher::new(vec![site]);
//!
//! let request = SyntheticRequest::new("https://example.com/about").unwrap();
//! let result = matcher.match_request(&request).unwrap();
//! let outcome = SitePageRouter::new().route(&request, &result).unwrap();
//!
//! assert!(matches!(outcome, RouteOutcome::Matched(page) if page.page_id == 12));
//! ```

mod arguments;
mod matcher;
mod request;
mod router;
mod site;

pub use arguments::{ArgumentValue, RouteArguments};
pub use matcher::{ConfiguredSiteMatcher, SiteError, SiteMatcher, SiteRef, SiteRouteResult};
pub use request::{RequestError, SyntheticRequest};
pub use router::{NoRouteFound, PageArguments, PageRouter, RouteError, RouteOutcome, SitePageRouter};
pub use site::{Language, Route, Site};
