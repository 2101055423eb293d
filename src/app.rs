//! Application shell.
//!
//! [`App`] owns the router, one controller per page and the container of the
//! page currently mounted. Navigation is strictly sequential: the previous
//! page's token is cancelled and its container torn down before the next
//! page's container exists, so nothing the old page still has in flight can
//! write into the new one.

use crate::api::{ApiError, Catalog};
use crate::carousel::CarouselInput;
use crate::config::AppConfig;
use crate::layout;
use crate::pages::{DetailPage, HomePage, ListingPage, NotFoundPage, PageController, PageEvent};
use crate::router::{self, PageId, RouteMatch, Router};
use crate::types::SpeciesKind;
use crate::view::Container;
use maud::{Markup, html};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct App {
    router: Router,
    pages: HashMap<PageId, Arc<dyn PageController>>,
    container: Container,
    cancel: CancellationToken,
    active: Option<RouteMatch>,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("active", &self.active)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

fn registry(config: &AppConfig, catalog: &Catalog) -> HashMap<PageId, Arc<dyn PageController>> {
    let transition = config.carousel.transition();
    let max_pages = config.listing.max_pages;
    let pages: Vec<Arc<dyn PageController>> = vec![
        Arc::new(HomePage::new(catalog.clone(), config)),
        Arc::new(ListingPage::new(SpeciesKind::Fauna, catalog.clone(), max_pages)),
        Arc::new(ListingPage::new(SpeciesKind::Flora, catalog.clone(), max_pages)),
        Arc::new(DetailPage::new(SpeciesKind::Fauna, catalog.clone(), transition)),
        Arc::new(DetailPage::new(SpeciesKind::Flora, catalog.clone(), transition)),
        Arc::new(NotFoundPage),
    ];
    pages.into_iter().map(|p| (p.page(), p)).collect()
}

impl App {
    pub fn new(config: &AppConfig, catalog: Catalog) -> Self {
        Self {
            router: Router::standard(),
            pages: registry(config, &catalog),
            container: Container::new(),
            cancel: CancellationToken::new(),
            active: None,
            tasks: Vec::new(),
        }
    }

    /// App talking to the configured API over HTTP.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config, Catalog::from_config(&config.api)?))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The mounted route. Unmatched paths mount [`PageId::NotFound`].
    pub fn active(&self) -> Option<&RouteMatch> {
        self.active.as_ref()
    }

    fn controller(&self, page: PageId) -> Option<Arc<dyn PageController>> {
        self.pages
            .get(&page)
            .or_else(|| self.pages.get(&PageId::NotFound))
            .cloned()
    }

    /// Unmount the current page and start mounting the one `hash` resolves
    /// to. Loads run on spawned tasks; see [`App::idle`].
    pub fn navigate(&mut self, hash: &str) -> PageId {
        self.cancel.cancel();
        self.container.teardown();
        self.tasks.clear();

        self.cancel = CancellationToken::new();
        self.container = Container::new();

        let route = self.router.resolve(hash).cloned().unwrap_or_else(|| RouteMatch {
            page: PageId::NotFound,
            path: router::normalize(hash),
            params: BTreeMap::new(),
        });
        info!(path = %route.path, page = ?route.page, "navigating");
        self.active = Some(route.clone());

        let Some(controller) = self.controller(route.page) else {
            warn!(page = ?route.page, "no controller registered");
            return route.page;
        };
        let container = self.container.clone();
        let cancel = self.cancel.clone();
        let page = route.page;
        self.tasks.push(tokio::spawn(async move {
            controller.mount(&container, &route, &cancel).await;
            debug!(page = ?route.page, "mount settled");
        }));
        page
    }

    /// Wait until every load started for the current page has settled.
    pub async fn idle(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                warn!(error = %err, "page task failed");
            }
        }
    }

    /// Re-run the load behind a region showing an error. Returns false when
    /// the region is not in the error state.
    pub fn retry(&mut self, region: &str) -> bool {
        if !self.container.state(region).is_some_and(|s| s.is_error()) {
            debug!(region, "retry ignored");
            return false;
        }
        let Some(route) = self.active.clone() else {
            return false;
        };
        let Some(controller) = self.controller(route.page) else {
            return false;
        };
        info!(region, path = %route.path, "retrying region");
        let container = self.container.clone();
        let cancel = self.cancel.clone();
        let region = region.to_string();
        self.tasks.push(tokio::spawn(async move {
            controller.reload(&container, &region, &route, &cancel).await;
        }));
        true
    }

    /// Route a synchronous event to the mounted page.
    pub fn dispatch(&self, event: &PageEvent) -> bool {
        let Some(route) = &self.active else {
            return false;
        };
        self.controller(route.page)
            .is_some_and(|page| page.handle(&self.container, event))
    }

    /// Forward input to the carousel in `region`. Returns false when the
    /// region holds no running carousel.
    pub async fn carousel_input(&self, region: &str, input: CarouselInput) -> bool {
        let Some(live) = self.container.carousel(region) else {
            return false;
        };
        live.input().send(input).await.is_ok()
    }

    pub fn title(&self) -> String {
        self.active
            .as_ref()
            .and_then(|route| Some(self.controller(route.page)?.title(route)))
            .unwrap_or_else(|| layout::SITE_TITLE.to_string())
    }

    /// Whole document for the current state.
    pub fn render(&self) -> Markup {
        layout::base_document(
            &self.title(),
            html! {
                (layout::site_header(&self.router))
                main #app {
                    (self.container.render())
                }
                (layout::site_footer())
            },
        )
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.container.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;
    use std::time::Duration;

    fn app(fake: &Arc<FakeTransport>) -> App {
        App::new(&AppConfig::default(), Catalog::new(fake.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_path_mounts_not_found() {
        let fake = FakeTransport::new();
        let mut app = app(&fake);
        assert_eq!(app.navigate("#/plantas"), PageId::NotFound);
        app.idle().await;
        let html = app.render().into_string();
        assert!(html.contains("Página no encontrada"));
        assert!(!html.contains(r#"class="nav-link active""#));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_tears_down_previous_page() {
        let fake = FakeTransport::new();
        fake.respond("fauna/7/", Ok(animal_json(7, "Jaguar", "Vulnerable (VU)")));
        fake.respond("fauna/7/fotos/", Ok(json!([{"id_foto": 1, "url_foto": "a.jpg"}])));
        let mut app = app(&fake);
        app.navigate("#/fauna/7");
        app.idle().await;
        let old = app.container().clone();
        let carousel = old.carousel("photos").unwrap();

        app.navigate("#/");
        assert!(old.is_torn_down());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(carousel.input().send(CarouselInput::Next).await.is_err());
        assert_eq!(app.title(), "EcoAlbum Panamá");
    }

    #[tokio::test(start_paused = true)]
    async fn late_responses_never_reach_the_next_page() {
        let fake = FakeTransport::new();
        fake.respond("fauna/?page=1", Ok(page_json(vec![animal_json(1, "Jaguar", "")])));
        fake.delay(Duration::from_secs(5));
        let mut app = app(&fake);
        app.navigate("#/fauna");
        tokio::time::sleep(Duration::from_secs(1)).await;
        let old = app.container().clone();

        app.navigate("#/flora/1");
        tokio::time::sleep(Duration::from_secs(10)).await;
        app.idle().await;
        assert!(old.region_ids().is_empty());
        assert!(!app.render().into_string().contains("Jaguar"));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_only_applies_to_failed_regions() {
        let fake = FakeTransport::new();
        let mut app = app(&fake);
        app.navigate("#/flora");
        app.idle().await;
        assert!(app.container().state("gallery").unwrap().is_error());
        assert!(!app.retry("filters"));

        fake.respond("flora/flora/?page=1", Ok(page_json(vec![json!({"id": 5, "nombre_comun": "Ceiba"})])));
        assert!(app.retry("gallery"));
        app.idle().await;
        assert_eq!(fake.count("flora/flora/?page=1"), 2);
        assert!(app.render().into_string().contains("Ceiba"));
        assert_eq!(app.title(), "Flora | EcoAlbum Panamá");
    }
}
