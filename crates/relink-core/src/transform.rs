//! Rewriting of anchor tags in rich-text content.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::HtmlParser;
use crate::notice::LinkNotice;
use crate::resolver::UrlResolver;

/// Scheme-qualified URL (`https://...`). Links without one are never rewritten.
static PROTOCOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+://").unwrap());

/// Result of transforming one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// The rewritten document.
    pub output: String,
    /// Number of anchors inspected.
    pub anchors: usize,
    /// One notice per rewritten anchor, in document order.
    pub notices: Vec<LinkNotice>,
}

impl TransformReport {
    /// Number of rewritten anchors.
    pub fn rewritten(&self) -> usize {
        self.notices.len()
    }
}

/// Rewrites absolute links that point into the installation.
pub struct ContentTransformer {
    resolver: UrlResolver,
}

impl ContentTransformer {
    /// Create a transformer resolving links with `resolver`.
    #[must_use]
    pub fn new(resolver: UrlResolver) -> Self {
        Self { resolver }
    }

    /// Rewrite all resolvable anchors of `value`.
    ///
    /// Anchors that cannot be resolved are kept byte for byte. This never
    /// fails; in the worst case the input is returned unchanged.
    pub fn transform(&self, value: &str, parser: &dyn HtmlParser) -> String {
        self.transform_with_report(value, parser).output
    }

    /// Like [`transform`](Self::transform), also reporting what was rewritten.
    pub fn transform_with_report(&self, value: &str, parser: &dyn HtmlParser) -> TransformReport {
        let mut blocks = parser.split_into_block("a", value);
        let mut report = TransformReport::default();

        for block in blocks.iter_mut().skip(1).step_by(2) {
            report.anchors += 1;

            let attributes = parser.tag_attributes(&parser.first_tag(block));
            let Some(href) = attributes.get("href") else {
                continue;
            };
            if !PROTOCOL_RE.is_match(href) {
                tracing::debug!(href, "Skipping link without protocol");
                continue;
            }
            let Some(resolved) = self.resolver.resolve(href) else {
                continue;
            };

            let attributes = attributes.with_href(&resolved.descriptor.to_string());
            let content = parser.rewrite_links(&parser.remove_first_and_last_tag(block));
            *block = format!("<a {}>{content}</a>", attributes.implode());
            report.notices.push(resolved.notice);
        }

        report.output = blocks.concat();
        report
    }
}
