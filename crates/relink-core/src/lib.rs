//! Link rewriting for rich-text content.
//!
//! Absolute links (`https://example.com/about`) that point into the
//! installation are replaced by portable internal links (`t3://page?uid=12`,
//! `t3://file?uid=7`) so they survive domain and path changes.
//!
//! # Architecture
//!
//! - [`ContentTransformer`] splits content into anchor blocks and rewrites
//!   every anchor whose `href` resolves
//! - [`UrlResolver`] decides whether a URL is internal, using the
//!   collaborators bundled in [`Services`]: site matching and page routing
//!   from `relink-site`, file lookups from `relink-storage`, and a
//!   [`Notifier`] for user-facing notices
//! - [`HtmlParser`] abstracts the few parsing operations needed;
//!   [`RteParser`] is the default implementation
//!
//! # Example
//!
//! ```ignore
//! use relink_core::{ContentTransformer, RteParser, UrlResolver};
//!
//! let transformer = ContentTransformer::new(UrlResolver::new(services));
//! let output = transformer.transform(r#"<a href="https://example.com/about">About</a>"#, &RteParser::new());
//! assert_eq!(output, r#"<a href="t3://page?uid=12">About</a>"#);
//! ```

mod html;
mod link;
mod notice;
mod resolver;
#[cfg(test)]
mod testing;
mod transform;

pub use html::{HtmlParser, RteParser, TagAttributes};
pub use link::{FileLink, LinkDescriptor, PageLink, TargetKind};
pub use notice::{CollectingNotifier, LinkNotice, Notifier};
pub use resolver::{ResolvedLink, Services, UrlResolver};
pub use transform::{ContentTransformer, TransformReport};
