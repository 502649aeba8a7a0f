//! User-facing notices about rewritten links.

use std::fmt;
use std::sync::Mutex;

use crate::link::TargetKind;

/// Notice that an external link was turned into an internal one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkNotice {
    /// The URL as authored.
    pub url: String,
    /// Kind of the new target.
    pub kind: TargetKind,
    /// Human-readable title of the target, if known.
    pub title: Option<String>,
    /// Page or file id.
    pub id: u64,
}

impl fmt::Display for LinkNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "External link \"{}\" was changed to internal {} link",
            self.url, self.kind
        )?;
        if let Some(title) = &self.title {
            write!(f, " \"{title}\"")?;
        }
        write!(f, " [{}]", self.id)
    }
}

/// Receiver of link notices. Fire-and-forget.
pub trait Notifier: Send + Sync {
    /// Deliver one notice.
    fn notify(&self, notice: &LinkNotice);
}

/// Notifier that keeps notices in memory.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<LinkNotice>>,
}

impl CollectingNotifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn notices(&self) -> Vec<LinkNotice> {
        self.notices.lock().unwrap().clone()
    }

    /// Remove and return all notices received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn take(&self) -> Vec<LinkNotice> {
        std::mem::take(&mut *self.notices.lock().unwrap())
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: &LinkNotice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_notice_display() {
        let notice = LinkNotice {
            url: "https://example.com/about".to_owned(),
            kind: TargetKind::Page,
            title: Some("About us".to_owned()),
            id: 12,
        };

        assert_eq!(
            notice.to_string(),
            r#"External link "https://example.com/about" was changed to internal page link "About us" [12]"#
        );
    }

    #[test]
    fn test_notice_display_without_title() {
        let notice = LinkNotice {
            url: "https://example.com/files/doc.pdf".to_owned(),
            kind: TargetKind::File,
            title: None,
            id: 7,
        };

        assert_eq!(
            notice.to_string(),
            r#"External link "https://example.com/files/doc.pdf" was changed to internal file link [7]"#
        );
    }

    #[test]
    fn test_collecting_notifier() {
        let notifier = CollectingNotifier::new();
        let notice = LinkNotice {
            url: "https://example.com/".to_owned(),
            kind: TargetKind::Page,
            title: None,
            id: 1,
        };

        notifier.notify(&notice);
        notifier.notify(&notice);

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.take(), vec![notice.clone(), notice]);
        assert!(notifier.notices().is_empty());
    }
}
