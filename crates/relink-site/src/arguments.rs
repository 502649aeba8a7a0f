//! Extra routing arguments and their query string encoding.

use std::collections::BTreeMap;
use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left alone by form encoding: A-Z a-z 0-9 - . _
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Value of a routing argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Plain value.
    Scalar(String),
    /// Nested arguments (`outer[inner]=value`).
    Nested(RouteArguments),
}

/// Extra arguments produced by page routing.
///
/// Keys are kept sorted, so encoding is deterministic regardless of
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteArguments(BTreeMap<String, ArgumentValue>);

impl RouteArguments {
    /// Create empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no argument is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a top-level argument.
    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.0.get(name)
    }

    /// Look up a scalar by bracket notation (`tx_news[news]`).
    pub fn scalar(&self, name: &str) -> Option<&str> {
        let path = split_brackets(name);
        let (last, parents) = path.split_last()?;
        let mut level = self;
        for key in parents {
            match level.0.get(*key)? {
                ArgumentValue::Nested(inner) => level = inner,
                ArgumentValue::Scalar(_) => return None,
            }
        }
        match level.0.get(*last)? {
            ArgumentValue::Scalar(value) => Some(value.as_str()),
            ArgumentValue::Nested(_) => None,
        }
    }

    /// Set an argument. `name` may use bracket notation (`tx_news[action]`)
    /// to address nested arguments; scalars on the way are replaced.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let path = split_brackets(name);
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut level = self;
        for key in parents {
            let entry = level
                .0
                .entry((*key).to_owned())
                .or_insert_with(|| ArgumentValue::Nested(Self::new()));
            if let ArgumentValue::Scalar(_) = entry {
                *entry = ArgumentValue::Nested(Self::new());
            }
            match entry {
                ArgumentValue::Nested(inner) => level = inner,
                ArgumentValue::Scalar(_) => return,
            }
        }
        level
            .0
            .insert((*last).to_owned(), ArgumentValue::Scalar(value.into()));
    }

    /// Encode as a form query string, nesting as `outer[inner]=value`.
    ///
    /// Names and values are percent-encoded (brackets included), spaces
    /// become `+`, pairs are joined by `&`.
    ///
    /// # Examples
    ///
    /// ```
    /// use relink_site::RouteArguments;
    ///
    /// let mut arguments = RouteArguments::new();
    /// arguments.insert("tx_news[news]", "hello world");
    /// arguments.insert("page", "2");
    /// assert_eq!(arguments.to_query_string(), "page=2&tx_news%5Bnews%5D=hello+world");
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        self.flatten(None, &mut pairs);

        let mut out = String::new();
        for (name, value) in pairs {
            if !out.is_empty() {
                out.push('&');
            }
            let _ = write!(out, "{}={}", form_encode(&name), form_encode(value));
        }
        out
    }

    fn flatten<'a>(&'a self, prefix: Option<&str>, pairs: &mut Vec<(String, &'a str)>) {
        for (key, value) in &self.0 {
            let name = match prefix {
                Some(prefix) => format!("{prefix}[{key}]"),
                None => key.clone(),
            };
            match value {
                ArgumentValue::Scalar(scalar) => pairs.push((name, scalar.as_str())),
                ArgumentValue::Nested(inner) => inner.flatten(Some(&name), pairs),
            }
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RouteArguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        for (name, value) in iter {
            arguments.insert(name.as_ref(), value);
        }
        arguments
    }
}

/// Split `a[b][c]` into `["a", "b", "c"]`.
///
/// Names that are not well-formed bracket notation are kept whole.
fn split_brackets(name: &str) -> Vec<&str> {
    let Some(open) = name.find('[') else {
        return vec![name];
    };
    if open == 0 {
        return vec![name];
    }

    let mut parts = vec![&name[..open]];
    let mut rest = &name[open..];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return vec![name];
        };
        let Some(close) = inner.find(']') else {
            return vec![name];
        };
        parts.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    parts
}

fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_brackets() {
        assert_eq!(split_brackets("page"), vec!["page"]);
        assert_eq!(split_brackets("tx_news[news]"), vec!["tx_news", "news"]);
        assert_eq!(split_brackets("a[b][c]"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_brackets_malformed() {
        assert_eq!(split_brackets("a[b"), vec!["a[b"]);
        assert_eq!(split_brackets("a[b]c"), vec!["a[b]c"]);
        assert_eq!(split_brackets("[b]"), vec!["[b]"]);
    }

    #[test]
    fn test_empty_arguments() {
        let arguments = RouteArguments::new();

        assert!(arguments.is_empty());
        assert_eq!(arguments.to_query_string(), "");
    }

    #[test]
    fn test_scalar_arguments_sorted() {
        let arguments: RouteArguments = [("b", "2"), ("a", "1")].into_iter().collect();

        assert_eq!(arguments.to_query_string(), "a=1&b=2");
    }

    #[test]
    fn test_nested_arguments() {
        let arguments: RouteArguments = [
            ("tx_news[news]", "12"),
            ("tx_news[action]", "detail"),
            ("cHash", "abc"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            arguments.to_query_string(),
            "cHash=abc&tx_news%5Baction%5D=detail&tx_news%5Bnews%5D=12"
        );
        assert_eq!(arguments.scalar("tx_news[action]"), Some("detail"));
        assert_eq!(arguments.scalar("tx_news"), None);
        assert!(matches!(
            arguments.get("tx_news"),
            Some(ArgumentValue::Nested(_))
        ));
    }

    #[test]
    fn test_deeply_nested_arguments() {
        let mut arguments = RouteArguments::new();
        arguments.insert("a[b][c]", "d");

        assert_eq!(arguments.to_query_string(), "a%5Bb%5D%5Bc%5D=d");
        assert_eq!(arguments.scalar("a[b][c]"), Some("d"));
    }

    #[test]
    fn test_nested_replaces_scalar() {
        let mut arguments = RouteArguments::new();
        arguments.insert("a", "1");
        arguments.insert("a[b]", "2");

        assert_eq!(arguments.scalar("a"), None);
        assert_eq!(arguments.scalar("a[b]"), Some("2"));
    }

    #[test]
    fn test_form_encoding() {
        let arguments: RouteArguments = [("q", "a b+c/ä~"), ("safe", "A-z.0_9")]
            .into_iter()
            .collect();

        assert_eq!(
            arguments.to_query_string(),
            "q=a+b%2Bc%2F%C3%A4%7E&safe=A-z.0_9"
        );
    }
}
