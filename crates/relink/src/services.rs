//! Wiring of resolver collaborators from configuration.

use std::sync::Arc;

use relink_config::{Config, SiteConfig};
use relink_core::{Notifier, Services};
use relink_site::{ConfiguredSiteMatcher, Route, Site, SiteError, SitePageRouter};
use relink_storage::{FileIndex, FsPublicDir, IndexedFile};

/// Build the resolver collaborators described by `config`.
pub(crate) fn build_services(
    config: &Config,
    notifier: Arc<dyn Notifier>,
) -> Result<Services, SiteError> {
    let sites = config
        .sites
        .iter()
        .map(site_from_config)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        sites = sites.len(),
        storages = config.storages.len(),
        public_dir = %config.public_dir.display(),
        "Loaded link configuration"
    );

    Ok(Services {
        site_matcher: Arc::new(ConfiguredSiteMatcher::new(sites)),
        page_router: Arc::new(SitePageRouter::new()),
        files: Arc::new(file_index_from_config(config)),
        public_dir: Arc::new(FsPublicDir::new(config.public_dir.clone())),
        notifier,
    })
}

fn site_from_config(config: &SiteConfig) -> Result<Site, SiteError> {
    let mut site = Site::new(&config.identifier, &config.base)?;
    if config.placeholder {
        site = site.as_placeholder();
    }
    for language in &config.languages {
        site = site.with_language(language.id, &language.base);
    }
    for (suffix, page_type) in &config.page_types {
        site = site.with_page_type(suffix, *page_type);
    }
    for route_config in &config.routes {
        let mut route = Route::new(&route_config.path, route_config.page);
        if let Some(title) = &route_config.title {
            route = route.with_title(title);
        }
        for (name, value) in &route_config.arguments {
            route = route.with_argument(name, value);
        }
        site = site.with_route(route);
    }
    Ok(site)
}

fn file_index_from_config(config: &Config) -> FileIndex {
    let mut index = FileIndex::new();
    for storage in &config.storages {
        index = index.with_storage(storage.uid, &storage.base_path);
    }
    for storage in &config.storages {
        for file in &storage.files {
            index = index.with_file(
                storage.uid,
                IndexedFile {
                    uid: file.uid,
                    identifier: file.identifier.clone(),
                    title: file.title.clone(),
                },
            );
        }
    }
    index
}
