//! Internal link descriptors and their `t3://` string form.

use std::fmt;

use relink_site::RouteArguments;

/// Link to a page of the installation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLink {
    /// Target page id.
    pub page_id: u64,
    /// Language id; 0 is the default language.
    pub language: u32,
    /// Query string of the original URL (without `?`).
    pub query: String,
    /// Extra routing arguments.
    pub arguments: RouteArguments,
    /// Fragment of the original URL (without `#`).
    pub fragment: String,
    /// Page type, when the URL selected one.
    pub page_type: Option<u32>,
}

impl PageLink {
    /// Parameter string: `L=<language>`, the query pairs and the encoded
    /// arguments, joined by `&`. Empty pairs are dropped.
    pub fn parameters(&self) -> String {
        let language = if self.language == 0 {
            String::new()
        } else {
            format!("L={}", self.language)
        };
        let arguments = self.arguments.to_query_string();

        std::iter::once(language.as_str())
            .chain(self.query.split('&'))
            .chain(std::iter::once(arguments.as_str()))
            .filter(|pair| !pair.is_empty())
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Link to a stored file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileLink {
    /// Stored file id.
    pub file_id: u64,
}

/// Portable reference to a page or file of the installation.
///
/// # Examples
///
/// ```
/// use relink_core::{FileLink, LinkDescriptor};
///
/// let link = LinkDescriptor::File(FileLink { file_id: 7 });
/// assert_eq!(link.to_string(), "t3://file?uid=7");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkDescriptor {
    /// A page.
    Page(PageLink),
    /// A stored file.
    File(FileLink),
}

impl LinkDescriptor {
    /// Kind of target.
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Page(_) => TargetKind::Page,
            Self::File(_) => TargetKind::File,
        }
    }

    /// Page or file id.
    pub fn id(&self) -> u64 {
        match self {
            Self::Page(page) => page.page_id,
            Self::File(file) => file.file_id,
        }
    }
}

impl fmt::Display for LinkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => {
                write!(f, "t3://page?uid={}", page.page_id)?;
                if let Some(page_type) = page.page_type.filter(|&t| t != 0) {
                    write!(f, "&type={page_type}")?;
                }
                let parameters = page.parameters();
                let parameters = parameters.trim_start_matches(['?', '&']);
                if !parameters.is_empty() {
                    write!(f, "&{parameters}")?;
                }
                if !page.fragment.is_empty() {
                    write!(f, "#{}", page.fragment)?;
                }
                Ok(())
            }
            Self::File(file) => write!(f, "t3://file?uid={}", file.file_id),
        }
    }
}

/// Kind of link target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// A page.
    Page,
    /// A stored file.
    File,
}

impl TargetKind {
    /// Lower-case name used in link strings and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::File => "file",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
