//! Minimal rich-text HTML handling.
//!
//! Only what link rewriting needs: splitting content into anchor blocks,
//! reading the attributes of an opening tag and re-serializing them. Content
//! between tags is never parsed.

use std::sync::LazyLock;

use regex::Regex;

/// Opening or closing tag. Quoted attribute values may contain `>`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(/)?([a-z][a-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

/// A comment or an opening/closing tag. Tags inside comments are not matched.
static SCAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<!--.*?-->|<(/)?([a-z][a-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .unwrap()
});

/// One attribute: name, then an optional double-quoted, single-quoted or bare value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// Parser operations used by the content transformer.
pub trait HtmlParser: Send + Sync {
    /// Split `content` into alternating text and `tag` blocks.
    ///
    /// Blocks sit at odd indices, text at even indices (possibly empty).
    /// Concatenating the result yields `content` again.
    fn split_into_block(&self, tag: &str, content: &str) -> Vec<String>;

    /// The opening tag of a block (e.g., `<a href="...">`).
    fn first_tag(&self, block: &str) -> String;

    /// Attributes of an opening tag, entity-decoded.
    fn tag_attributes(&self, tag: &str) -> TagAttributes;

    /// Content between the opening and the closing tag of a block.
    fn remove_first_and_last_tag(&self, block: &str) -> String;

    /// Rewrite links inside anchor content before it is emitted again.
    fn rewrite_links(&self, content: &str) -> String {
        content.to_owned()
    }
}

/// Attributes of one tag, in authored order.
///
/// Names are unique (case-insensitive); the first occurrence wins. A
/// valueless attribute (`download`) has no value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttributes {
    entries: Vec<(String, Option<String>)>,
}

impl TagAttributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute unless one with the same name exists.
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push((name, value));
        }
    }

    /// Whether an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Value of an attribute. Valueless attributes yield `""`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or_default())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new attribute set with `href` first, followed by all other
    /// attributes of `self` in authored order.
    #[must_use]
    pub fn with_href(&self, href: &str) -> Self {
        let mut attributes = Self::new();
        attributes.push("href", Some(href.to_owned()));
        for (name, value) in &self.entries {
            attributes.push(name.clone(), value.clone());
        }
        attributes
    }

    /// Serialize as `name="value"` pairs separated by spaces.
    ///
    /// Names are lower-cased, values HTML-escaped. Valueless attributes are
    /// written with an empty value, as XHTML requires.
    pub fn implode(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| {
                let value = value.as_deref().unwrap_or_default();
                format!(
                    "{}=\"{}\"",
                    name.to_ascii_lowercase(),
                    html_escape::encode_double_quoted_attribute(value)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for TagAttributes {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.push(name, value);
        }
        attributes
    }
}

/// Regex-based parser for rich-text editor content.
///
/// Nested blocks of the same tag are kept inside their outer block. An
/// unclosed block is left as text.
#[derive(Clone, Copy, Debug, Default)]
pub struct RteParser;

impl RteParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HtmlParser for RteParser {
    fn split_into_block(&self, tag: &str, content: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut text_start = 0;
        let mut block_start = 0;
        let mut depth = 0usize;

        for caps in SCAN_RE.captures_iter(content) {
            let Some(name) = caps.get(2) else {
                continue;
            };
            if !name.as_str().eq_ignore_ascii_case(tag) {
                continue;
            }
            let Some(matched) = caps.get(0) else {
                continue;
            };

            if caps.get(1).is_none() {
                if depth == 0 {
                    block_start = matched.start();
                }
                depth += 1;
            } else if depth > 0 {
                depth -= 1;
                if depth == 0 {
                    blocks.push(content[text_start..block_start].to_owned());
                    blocks.push(content[block_start..matched.end()].to_owned());
                    text_start = matched.end();
                }
            }
        }

        blocks.push(content[text_start..].to_owned());
        blocks
    }

    fn first_tag(&self, block: &str) -> String {
        TAG_RE
            .find(block)
            .filter(|m| m.start() == 0)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default()
    }

    fn tag_attributes(&self, tag: &str) -> TagAttributes {
        let Some(caps) = TAG_RE.captures(tag) else {
            return TagAttributes::new();
        };
        let Some(raw) = caps.get(3) else {
            return TagAttributes::new();
        };

        ATTR_RE
            .captures_iter(raw.as_str())
            .map(|attr| {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map(|v| html_escape::decode_html_entities(v.as_str()).into_owned());
                (attr[1].to_owned(), value)
            })
            .collect()
    }

    fn remove_first_and_last_tag(&self, block: &str) -> String {
        let inner_start = TAG_RE
            .find(block)
            .filter(|m| m.start() == 0)
            .map_or(0, |m| m.end());
        let rest = &block[inner_start..];

        let inner_end = rest
            .rfind("</")
            .filter(|&pos| is_closing_tag(&rest[pos..]))
            .unwrap_or(rest.len());
        rest[..inner_end].to_owned()
    }
}

/// Whether `s` consists of exactly one closing tag.
fn is_closing_tag(s: &str) -> bool {
    TAG_RE
        .captures(s)
        .is_some_and(|caps| caps.get(1).is_some() && caps[0].len() == s.len())
}
