//! Resolution of absolute URLs to internal link descriptors.
//!
//! A URL is internal when one of the installation's sites serves it and it
//! either routes to a page or names a stored file below the public
//! directory. Everything else stays external. Resolution never fails: every
//! collaborator error ends in "no resolution", logged where it hints at a
//! broken link.

use std::sync::Arc;

use relink_site::{
    NoRouteFound, PageArguments, PageRouter, RouteOutcome, SiteMatcher, SiteRef, SiteRouteResult,
    SyntheticRequest,
};
use relink_storage::{FileResolver, PublicDir};

use crate::link::{FileLink, LinkDescriptor, PageLink, TargetKind};
use crate::notice::{LinkNotice, Notifier};

/// Collaborators used to resolve links.
#[derive(Clone)]
pub struct Services {
    /// Matches requests to sites and languages.
    pub site_matcher: Arc<dyn SiteMatcher>,
    /// Routes requests to pages.
    pub page_router: Arc<dyn PageRouter>,
    /// Resolves stored files from combined identifiers.
    pub files: Arc<dyn FileResolver>,
    /// Checks paths below the public document root.
    pub public_dir: Arc<dyn PublicDir>,
    /// Receives a notice for every rewritten link.
    pub notifier: Arc<dyn Notifier>,
}

/// A URL resolved to an internal target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
    /// The internal link.
    pub descriptor: LinkDescriptor,
    /// Notice sent for the rewrite.
    pub notice: LinkNotice,
}

/// Resolves absolute URLs to internal link descriptors.
pub struct UrlResolver {
    services: Services,
}

impl UrlResolver {
    /// Create a resolver over the given collaborators.
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Resolve `href` to an internal link.
    ///
    /// Returns `None` when the URL is external, broken or otherwise not
    /// resolvable. A successful resolution notifies the user.
    pub fn resolve(&self, href: &str) -> Option<ResolvedLink> {
        let request = match SyntheticRequest::new(href) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(href, %error, "Cannot build request for link");
                return None;
            }
        };

        let result = match self.services.site_matcher.match_request(&request) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(href, %error, "Site matching failed");
                return None;
            }
        };

        match result.site() {
            SiteRef::Configured(_) => {}
            SiteRef::Null => {
                tracing::debug!(href, "Link is external");
                return None;
            }
            SiteRef::Placeholder(site) => {
                tracing::debug!(href, site, "Link points to a placeholder site");
                return None;
            }
        }

        let resolved = match self.services.page_router.route(&request, &result) {
            Ok(RouteOutcome::Matched(page)) => self.page_link(href, &result, page),
            Ok(RouteOutcome::NoRoute(no_route)) => self.file_link(href, &request, &no_route)?,
            Err(error) => {
                tracing::warn!(href, %error, "Routing failed");
                return None;
            }
        };

        tracing::info!(href, link = %resolved.descriptor, "Rewrote external link");
        self.services.notifier.notify(&resolved.notice);
        Some(resolved)
    }

    fn page_link(&self, href: &str, result: &SiteRouteResult, page: PageArguments) -> ResolvedLink {
        let title = self.services.page_router.page_title(result, page.page_id);
        let descriptor = LinkDescriptor::Page(PageLink {
            page_id: page.page_id,
            language: result.language(),
            query: result.query().to_owned(),
            arguments: page.arguments,
            fragment: result.fragment().to_owned(),
            page_type: page.page_type,
        });

        ResolvedLink {
            notice: LinkNotice {
                url: href.to_owned(),
                kind: TargetKind::Page,
                title,
                id: page.page_id,
            },
            descriptor,
        }
    }

    /// Fall back to a stored file at the request path.
    ///
    /// A path missing from the public directory is reported with the routing
    /// failure; a present path that is not a stored file with the storage error.
    fn file_link(
        &self,
        href: &str,
        request: &SyntheticRequest,
        no_route: &NoRouteFound,
    ) -> Option<ResolvedLink> {
        let path = request.decoded_path();

        if !self.services.public_dir.exists(&path) {
            tracing::warn!(href, path = %path, error = %no_route, "Link target does not exist");
            return None;
        }

        let file = match self.services.files.file_from_combined_identifier(&path) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!(href, path = %path, %error, "Link target is not a stored file");
                return None;
            }
        };

        Some(ResolvedLink {
            descriptor: LinkDescriptor::File(FileLink { file_id: file.uid }),
            notice: LinkNotice {
                url: href.to_owned(),
                kind: TargetKind::File,
                title: Some(file.display_title().to_owned()),
                id: file.uid,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use relink_site::{RouteError, SiteError};
    use relink_storage::StorageErrorKind;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::testing::{capture_warnings, fixture};

    assert_impl_all!(UrlResolver: Send, Sync);

    struct FailingMatcher;

    impl SiteMatcher for FailingMatcher {
        fn match_request(&self, _request: &SyntheticRequest) -> Result<SiteRouteResult, SiteError> {
            Err(SiteError::Unavailable("site configuration not loaded".to_owned()))
        }
    }

    struct FailingRouter;

    impl PageRouter for FailingRouter {
        fn route(
            &self,
            _request: &SyntheticRequest,
            _result: &SiteRouteResult,
        ) -> Result<RouteOutcome, RouteError> {
            Err(RouteError::Unavailable("route cache corrupted".to_owned()))
        }
    }

    fn resolve(href: &str) -> (Option<ResolvedLink>, Vec<String>) {
        let resolver = UrlResolver::new(fixture().services);
        capture_warnings(|| resolver.resolve(href))
    }

    #[test]
    fn test_resolve_page() {
        let fixture = fixture();
        let resolver = UrlResolver::new(fixture.services);

        let resolved = resolver.resolve("https://example.com/about").unwrap();

        assert_eq!(resolved.descriptor.to_string(), "t3://page?uid=12");
        assert_eq!(
            resolved.notice,
            LinkNotice {
                url: "https://example.com/about".to_owned(),
                kind: TargetKind::Page,
                title: Some("About us".to_owned()),
                id: 12,
            }
        );
        assert_eq!(fixture.notifier.notices(), vec![resolved.notice]);
    }

    #[test]
    fn test_resolve_translated_page_with_query_and_fragment() {
        let (resolved, warnings) = resolve("https://example.com/de/about?x=1#team");

        assert_eq!(
            resolved.unwrap().descriptor.to_string(),
            "t3://page?uid=12&L=1&x=1#team"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resolve_page_with_arguments() {
        let (resolved, _) = resolve("https://example.com/de/news/hello");

        assert_eq!(
            resolved.unwrap().descriptor.to_string(),
            "t3://page?uid=30&L=1&tx_news%5Baction%5D=detail&tx_news%5Bnews%5D=hello"
        );
    }

    #[test]
    fn test_resolve_page_type() {
        let (resolved, _) = resolve("https://example.com/feed.xml");

        assert_eq!(
            resolved.unwrap().descriptor.to_string(),
            "t3://page?uid=1&type=9818"
        );
    }

    #[test]
    fn test_resolve_file() {
        let fixture = fixture();
        let resolver = UrlResolver::new(fixture.services);

        let resolved = resolver
            .resolve("https://example.com/files/doc.pdf")
            .unwrap();

        assert_eq!(resolved.descriptor, LinkDescriptor::File(FileLink { file_id: 7 }));
        assert_eq!(resolved.notice.kind, TargetKind::File);
        assert_eq!(resolved.notice.title.as_deref(), Some("Annual report"));
        assert_eq!(fixture.files.lookups(), vec!["/files/doc.pdf".to_owned()]);
    }

    #[test]
    fn test_missing_file_warns_with_routing_failure() {
        let fixture = fixture();
        let resolver = UrlResolver::new(fixture.services);

        let (resolved, warnings) =
            capture_warnings(|| resolver.resolve("https://example.com/files/missing.pdf"));

        assert!(resolved.is_none());
        assert_eq!(warnings, vec!["Link target does not exist".to_owned()]);
        assert!(fixture.files.lookups().is_empty());
        assert!(fixture.notifier.notices().is_empty());
    }

    #[test]
    fn test_unindexed_file_warns_with_storage_error() {
        let (resolved, warnings) = resolve("https://example.com/files/orphan.txt");

        assert!(resolved.is_none());
        assert_eq!(warnings, vec!["Link target is not a stored file".to_owned()]);
    }

    #[test]
    fn test_file_lookup_uses_decoded_path() {
        let fixture = fixture();
        let resolver = UrlResolver::new(fixture.services);

        let _ = capture_warnings(|| resolver.resolve("https://example.com/files/annual%20report.pdf"));

        assert_eq!(
            fixture.files.lookups(),
            vec!["/files/annual report.pdf".to_owned()]
        );
    }

    #[test]
    fn test_storage_failure_warns() {
        let mut fixture = fixture();
        let files = Arc::new(
            relink_storage::MockFileResolver::new()
                .with_failure("/files/doc.pdf", StorageErrorKind::Unavailable),
        );
        fixture.services.files = files;
        let resolver = UrlResolver::new(fixture.services);

        let (resolved, warnings) =
            capture_warnings(|| resolver.resolve("https://example.com/files/doc.pdf"));

        assert!(resolved.is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unrelated_host_is_silent() {
        let (resolved, warnings) = resolve("https://unrelated.example/x");

        assert!(resolved.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_placeholder_site_is_silent() {
        let (resolved, warnings) = resolve("https://legacy.example.com/about");

        assert!(resolved.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unsupported_scheme_warns() {
        let (resolved, warnings) = resolve("ftp://example.com/file.txt");

        assert!(resolved.is_none());
        assert_eq!(warnings, vec!["Cannot build request for link".to_owned()]);
    }

    #[test]
    fn test_site_matcher_error_warns() {
        let mut fixture = fixture();
        fixture.services.site_matcher = Arc::new(FailingMatcher);
        let resolver = UrlResolver::new(fixture.services);

        let (resolved, warnings) =
            capture_warnings(|| resolver.resolve("https://example.com/about"));

        assert!(resolved.is_none());
        assert_eq!(warnings, vec!["Site matching failed".to_owned()]);
    }

    #[test]
    fn test_router_error_warns_without_file_fallback() {
        let mut fixture = fixture();
        fixture.services.page_router = Arc::new(FailingRouter);
        let resolver = UrlResolver::new(fixture.services);

        let (resolved, warnings) =
            capture_warnings(|| resolver.resolve("https://example.com/files/doc.pdf"));

        assert!(resolved.is_none());
        assert_eq!(warnings, vec!["Routing failed".to_owned()]);
        assert!(fixture.files.lookups().is_empty());
    }
}
