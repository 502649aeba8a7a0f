//! Shared fixtures for unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use relink_site::{ConfiguredSiteMatcher, Route, Site, SitePageRouter};
use relink_storage::{FileResolver, MockFileResolver, MockPublicDir};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::notice::{CollectingNotifier, Notifier};
use crate::resolver::Services;

/// Collaborators wired the way the tests expect, with handles to the fakes.
pub(crate) struct Fixture {
    pub services: Services,
    pub files: Arc<MockFileResolver>,
    pub notifier: Arc<CollectingNotifier>,
}

/// `example.com` (languages 0 and 1 on `/de/`), a placeholder site
/// `legacy.example.com`, and files below `/files/`.
pub(crate) fn fixture() -> Fixture {
    let main = Site::new("main", "https://example.com/")
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
        );
    let legacy = Site::new("legacy", "https://legacy.example.com/")
        .unwrap()
        .as_placeholder();

    let files = Arc::new(MockFileResolver::new().with_file("/files/doc.pdf", 7, "Annual report"));
    let public_dir = MockPublicDir::new()
        .with_path("/files/doc.pdf")
        .with_path("/files/orphan.txt")
        .with_path("/files/annual report.pdf");
    let notifier = Arc::new(CollectingNotifier::new());

    let services = Services {
        site_matcher: Arc::new(ConfiguredSiteMatcher::new(vec![main, legacy])),
        page_router: Arc::new(SitePageRouter::new()),
        files: Arc::clone(&files) as Arc<dyn FileResolver>,
        public_dir: Arc::new(public_dir),
        notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
    };

    Fixture {
        services,
        files,
        notifier,
    }
}

/// Run `f` and return its result with the messages of all warnings emitted.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let layer = WarningCapture::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = layer.0.lock().unwrap().clone();
    (result, warnings)
}

#[derive(Clone, Default)]
struct WarningCapture(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
