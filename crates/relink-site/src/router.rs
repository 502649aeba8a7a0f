//! Page routing below a matched site.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use crate::arguments::RouteArguments;
use crate::matcher::{SiteRef, SiteRouteResult};
use crate::request::SyntheticRequest;
use crate::site::{Route, Segment, Site, split_segments};

/// A successfully routed page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageArguments {
    /// Target page id.
    pub page_id: u64,
    /// Page type selected by a page-type suffix, if any.
    pub page_type: Option<u32>,
    /// Extra routing arguments.
    pub arguments: RouteArguments,
}

/// No route of the site matched the path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("No route found for path \"{path}\"")]
pub struct NoRouteFound {
    /// The path that was routed (below the language base).
    pub path: String,
}

/// Expected outcome of routing a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The path resolves to a page.
    Matched(PageArguments),
    /// The path does not resolve to a page; it may still be a file.
    NoRoute(NoRouteFound),
}

/// Unexpected routing failure.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The routing result does not name a site this router can route.
    #[error("Site \"{0}\" cannot be routed")]
    UnknownSite(String),
    /// The routing backend failed.
    #[error("Routing unavailable: {0}")]
    Unavailable(String),
}

/// Routing of requests to pages within a matched site.
pub trait PageRouter: Send + Sync {
    /// Route a request that was matched to a site.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] for failures other than "no route".
    fn route(
        &self,
        request: &SyntheticRequest,
        result: &SiteRouteResult,
    ) -> Result<RouteOutcome, RouteError>;

    /// Title of a page of the matched site, for notices.
    fn page_title(&self, _result: &SiteRouteResult, _page_id: u64) -> Option<String> {
        None
    }
}

/// Router over the route tables carried by the matched [`Site`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SitePageRouter;

impl SitePageRouter {
    /// Create a router.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn route_site(site: &Site, tail: &str) -> RouteOutcome {
        let mut segments: Vec<&str> = split_segments(tail).collect();
        let page_type = segments
            .last()
            .and_then(|last| site.page_type_for(last));
        if page_type.is_some() {
            segments.pop();
        }
        let decoded: Vec<String> = segments
            .iter()
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();

        let literal = site
            .routes()
            .iter()
            .filter(|route| !route.has_placeholders());
        let placeholder = site
            .routes()
            .iter()
            .filter(|route| route.has_placeholders());

        for route in literal.chain(placeholder) {
            if let Some(captures) = capture(route, &decoded) {
                tracing::debug!(
                    site = site.identifier(),
                    route = route.path(),
                    page = route.page(),
                    "Route matched"
                );
                return RouteOutcome::Matched(PageArguments {
                    page_id: route.page(),
                    page_type,
                    arguments: build_arguments(route, &captures),
                });
            }
        }

        RouteOutcome::NoRoute(NoRouteFound {
            path: tail.to_owned(),
        })
    }
}

impl PageRouter for SitePageRouter {
    fn route(
        &self,
        _request: &SyntheticRequest,
        result: &SiteRouteResult,
    ) -> Result<RouteOutcome, RouteError> {
        match result.site() {
            SiteRef::Configured(site) => Ok(Self::route_site(site, result.tail())),
            SiteRef::Placeholder(identifier) => Err(RouteError::UnknownSite(identifier.clone())),
            SiteRef::Null => Err(RouteError::UnknownSite(String::new())),
        }
    }

    fn page_title(&self, result: &SiteRouteResult, page_id: u64) -> Option<String> {
        result
            .site()
            .configured()?
            .page_title(page_id)
            .map(ToOwned::to_owned)
    }
}

/// Match decoded path segments against a route, returning placeholder captures.
fn capture<'a>(route: &'a Route, segments: &'a [String]) -> Option<BTreeMap<&'a str, &'a str>> {
    if route.segments.len() != segments.len() {
        return None;
    }

    let mut captures = BTreeMap::new();
    for (expected, actual) in route.segments.iter().zip(segments) {
        match expected {
            Segment::Literal(literal) if literal == actual => {}
            Segment::Literal(_) => return None,
            Segment::Placeholder(name) => {
                captures.insert(name.as_str(), actual.as_str());
            }
        }
    }
    Some(captures)
}

fn build_arguments(route: &Route, captures: &BTreeMap<&str, &str>) -> RouteArguments {
    let mut arguments = RouteArguments::new();
    let mut referenced = Vec::new();

    for (name, template) in &route.arguments {
        let mut value = template.clone();
        for (placeholder, captured) in captures {
            let token = format!("{{{placeholder}}}");
            if value.contains(&token) {
                value = value.replace(&token, captured);
                referenced.push(*placeholder);
            }
        }
        arguments.insert(name, value);
    }

    for (placeholder, captured) in captures {
        if !referenced.contains(placeholder) {
            arguments.insert(placeholder, *captured);
        }
    }
    arguments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::matcher::{ConfiguredSiteMatcher, SiteMatcher};

    fn create_matcher() -> ConfiguredSiteMatcher {
        let site = Site::new("main", "https://example.com/")
            .unwrap()
            .with_language(0, "/")
            .with_language(1, "/de/")
            .with_page_type("feed.xml", 9818)
            .with_route(Route::new("/", 1).with_title("Home"))
            .with_route(Route::new("/about", 12).with_title("About us"))
            .with_route(
                Route::new("/news/{slug}", 30)
                    .with_argument("tx_news[action]", "detail")
                    .with_argument("tx_news[news]", "{slug}"),
            )
            .with_route(Route::new("/news/archive", 31))
            .with_route(Route::new("/tags/{tag}", 40))
            .with_route(Route::new("/über-uns", 13));
        ConfiguredSiteMatcher::new(vec![
            site,
            Site::new("legacy", "https://legacy.example.com/")
                .unwrap()
                .as_placeholder(),
        ])
    }

    fn route(href: &str) -> RouteOutcome {
        let matcher = create_matcher();
        let request = SyntheticRequest::new(href).unwrap();
        let result = matcher.match_request(&request).unwrap();
        SitePageRouter::new().route(&request, &result).unwrap()
    }

    fn matched(href: &str) -> PageArguments {
        match route(href) {
            RouteOutcome::Matched(page) => page,
            RouteOutcome::NoRoute(err) => panic!("expected a route for {href}: {err}"),
        }
    }

    #[test]
    fn test_literal_route() {
        let page = matched("https://example.com/about");

        assert_eq!(page.page_id, 12);
        assert_eq!(page.page_type, None);
        assert!(page.arguments.is_empty());
    }

    #[test]
    fn test_root_route() {
        assert_eq!(matched("https://example.com/").page_id, 1);
        assert_eq!(matched("https://example.com/de/").page_id, 1);
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(matched("https://example.com/about/").page_id, 12);
    }

    #[test]
    fn test_translated_route() {
        assert_eq!(matched("https://example.com/de/about").page_id, 12);
    }

    #[test]
    fn test_placeholder_route_arguments() {
        let page = matched("https://example.com/news/hello-world");

        assert_eq!(page.page_id, 30);
        assert_eq!(page.arguments.scalar("tx_news[action]"), Some("detail"));
        assert_eq!(page.arguments.scalar("tx_news[news]"), Some("hello-world"));
        assert_eq!(page.arguments.scalar("slug"), None);
    }

    #[test]
    fn test_unreferenced_placeholder_becomes_argument() {
        let page = matched("https://example.com/tags/rust");

        assert_eq!(page.page_id, 40);
        assert_eq!(page.arguments.to_query_string(), "tag=rust");
    }

    #[test]
    fn test_literal_route_wins_over_placeholder() {
        let page = matched("https://example.com/news/archive");

        assert_eq!(page.page_id, 31);
        assert!(page.arguments.is_empty());
    }

    #[test]
    fn test_page_type_suffix() {
        let page = matched("https://example.com/about/feed.xml");

        assert_eq!(page.page_id, 12);
        assert_eq!(page.page_type, Some(9818));
    }

    #[test]
    fn test_percent_encoded_segment() {
        assert_eq!(matched("https://example.com/%C3%BCber-uns").page_id, 13);
    }

    #[test]
    fn test_no_route() {
        let outcome = route("https://example.com/files/doc.pdf");

        assert_eq!(
            outcome,
            RouteOutcome::NoRoute(NoRouteFound {
                path: "/files/doc.pdf".to_owned()
            })
        );
    }

    #[test]
    fn test_no_route_message() {
        let err = NoRouteFound {
            path: "/missing".to_owned(),
        };

        assert_eq!(err.to_string(), "No route found for path \"/missing\"");
    }

    #[test]
    fn test_placeholder_site_is_unknown() {
        let matcher = create_matcher();
        let request = SyntheticRequest::new("https://legacy.example.com/old").unwrap();
        let result = matcher.match_request(&request).unwrap();

        let err = SitePageRouter::new().route(&request, &result).unwrap_err();

        assert!(matches!(err, RouteError::UnknownSite(id) if id == "legacy"));
    }

    #[test]
    fn test_page_title() {
        let matcher = create_matcher();
        let request = SyntheticRequest::new("https://example.com/about").unwrap();
        let result = matcher.match_request(&request).unwrap();
        let router = SitePageRouter::new();

        assert_eq!(router.page_title(&result, 12).as_deref(), Some("About us"));
        assert_eq!(router.page_title(&result, 30), None);
    }
}
