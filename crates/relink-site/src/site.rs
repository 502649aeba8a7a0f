//! Site model: base URL, languages, page types and routes.
//!
//! A [`Site`] is built once from configuration and shared through `Arc`
//! between the site matcher and the page router.

use std::collections::BTreeMap;

use url::Url;

use crate::matcher::SiteError;

/// A site language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    /// Language id (0 is the default language).
    pub id: u32,
    /// Path prefix below the site base, slash-terminated (e.g., "/de/").
    pub base: String,
}

/// One segment of a route path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A page route.
#[derive(Clone, Debug)]
pub struct Route {
    path: String,
    pub(crate) segments: Vec<Segment>,
    page: u64,
    title: Option<String>,
    pub(crate) arguments: BTreeMap<String, String>,
}

impl Route {
    /// Create a route from `path` (e.g., "/about", "/news/{slug}") to `page`.
    #[must_use]
    pub fn new(path: impl Into<String>, page: u64) -> Self {
        let path = path.into();
        let segments = split_segments(&path)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Some(name) if !name.is_empty() => Segment::Placeholder(name.to_owned()),
                    _ => Segment::Literal(segment.to_owned()),
                }
            })
            .collect();

        Self {
            path,
            segments,
            page,
            title: None,
            arguments: BTreeMap::new(),
        }
    }

    /// Set the page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an extra argument. `value` may reference placeholders (`{slug}`).
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Route path as configured.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Target page id.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Page title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
    }
}

/// A site served by the installation.
#[derive(Clone, Debug)]
pub struct Site {
    identifier: String,
    base: Url,
    placeholder: bool,
    languages: Vec<Language>,
    page_types: BTreeMap<String, u32>,
    routes: Vec<Route>,
}

impl Site {
    /// Create a site with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidBase`] if `base` is not an absolute
    /// `http`/`https` URL with a host.
    pub fn new(identifier: impl Into<String>, base: &str) -> Result<Self, SiteError> {
        let identifier = identifier.into();
        let invalid = |reason: String| SiteError::InvalidBase {
            identifier: identifier.clone(),
            base: base.to_owned(),
            reason,
        };

        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid("expected an http(s) URL with a host".to_owned()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            identifier,
            base: url,
            placeholder: false,
            languages: Vec::new(),
            page_types: BTreeMap::new(),
            routes: Vec::new(),
        })
    }

    /// Mark the site as a placeholder: it belongs to the installation but
    /// has no routing of its own.
    #[must_use]
    pub fn as_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// Add a language whose pages live below `base` (e.g., "/de/").
    #[must_use]
    pub fn with_language(mut self, id: u32, base: &str) -> Self {
        let trimmed = base.trim_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_owned()
        } else {
            format!("/{trimmed}/")
        };
        self.languages.push(Language { id, base });
        self
    }

    /// Map a last path segment (e.g., "feed.xml") to a page type.
    #[must_use]
    pub fn with_page_type(mut self, suffix: impl Into<String>, page_type: u32) -> Self {
        self.page_types.insert(suffix.into(), page_type);
        self
    }

    /// Add a page route.
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Site identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Base URL, path always slash-terminated.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Whether this is a placeholder site.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Configured languages. Empty means a single default language on "/".
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Configured page routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Page type selected by a last path segment.
    pub(crate) fn page_type_for(&self, segment: &str) -> Option<u32> {
        self.page_types.get(segment).copied()
    }

    /// Title of the first route pointing at `page`.
    pub fn page_title(&self, page: u64) -> Option<&str> {
        self.routes
            .iter()
            .filter(|r| r.page == page)
            .find_map(Route::title)
    }
}

/// Non-empty segments of a URL path.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
