use super::{LOADING, PageController, PageEvent};
use crate::api::{Catalog, SpeciesQuery};
use crate::cards::SpeciesCard;
use crate::carousel::{CarouselBuilder, GallerySlides, NewsSlides, SlideItem, driver};
use crate::config::{AppConfig, CarouselConfig, HomeConfig};
use crate::flipcard::FlipStates;
use crate::router::{PageId, RouteMatch};
use crate::types::{Species, SpeciesKind, Stats};
use crate::view::{Container, Content, RegionHandle, RegionState};
use async_trait::async_trait;
use maud::{Markup, html};
use tokio_util::sync::CancellationToken;

const FEATURED: &str = "featured";
const NEWS: &str = "news";
const GALLERY: &str = "gallery";
const STATS: &str = "stats";

#[derive(Debug, Default)]
struct HomeState {
    featured: Vec<Species>,
    flips: FlipStates,
}

/// Landing page: hero plus four regions loaded concurrently.
#[derive(Debug, Clone)]
pub struct HomePage {
    catalog: Catalog,
    home: HomeConfig,
    carousel: CarouselConfig,
}

impl HomePage {
    pub fn new(catalog: Catalog, config: &AppConfig) -> Self {
        Self {
            catalog,
            home: config.home.clone(),
            carousel: config.carousel.clone(),
        }
    }

    async fn load_featured(&self, region: RegionHandle) {
        region.loading(LOADING);
        let page = self
            .catalog
            .species_page(SpeciesKind::Fauna, &SpeciesQuery::page(1), region.cancel_token())
            .await;
        match page {
            Ok(page) => {
                let featured: Vec<Species> = page
                    .results
                    .into_iter()
                    .take(self.home.featured_species)
                    .collect();
                if featured.is_empty() {
                    region.empty("No hay especies destacadas disponibles");
                    return;
                }
                let markup = render_featured(&featured, &FlipStates::default());
                region.container().with_page_state(|s: &mut HomeState| {
                    s.featured = featured;
                    s.flips = FlipStates::default();
                });
                region.populate(markup);
            }
            Err(err) => {
                region.error(&err);
            }
        }
    }

    async fn load_news(&self, region: RegionHandle) {
        region.loading("Cargando noticias…");
        let cancel = region.cancel_token();
        match self.catalog.featured(self.home.news_limit, None, cancel).await {
            Ok(photos) => {
                let carousel = CarouselBuilder::new(photos.iter().map(SlideItem::news).collect())
                    .renderer(NewsSlides)
                    .autoplay(self.carousel.news_interval())
                    .glass(true)
                    .label("Noticias destacadas")
                    .build();
                match carousel {
                    Some(c) => {
                        region.populate_carousel(driver::spawn(c, self.carousel.transition(), cancel));
                    }
                    None => {
                        region.empty("No hay noticias destacadas disponibles");
                    }
                }
            }
            Err(err) => {
                region.error(&err);
            }
        }
    }

    async fn load_gallery(&self, region: RegionHandle) {
        region.loading("Cargando galería…");
        let cancel = region.cancel_token();
        match self.catalog.random(self.home.gallery_limit, None, cancel).await {
            Ok(photos) => {
                let carousel = CarouselBuilder::new(photos.iter().map(SlideItem::gallery).collect())
                    .renderer(GallerySlides)
                    .label("Galería")
                    .build();
                match carousel {
                    Some(c) => {
                        region.populate_carousel(driver::spawn(c, self.carousel.transition(), cancel));
                    }
                    None => {
                        region.empty("No hay fotos disponibles");
                    }
                }
            }
            Err(err) => {
                region.error(&err);
            }
        }
    }

    async fn load_stats(&self, region: RegionHandle) {
        region.loading(LOADING);
        match self.catalog.stats(region.cancel_token()).await {
            Ok(stats) => region.populate(render_stats(&stats)),
            Err(err) => region.error(&err),
        };
    }
}

fn hero() -> Markup {
    html! {
        div.hero.card.card--glass.elev-2 {
            h1.hero__title { "🌿 EcoAlbum Panamá" }
            p.hero__subtitle { "Catálogo de fauna y flora protegida de Panamá" }
            nav.home-nav {
                a.btn.btn-primary href="#/fauna" { "🦁 Explorar Fauna" }
                a.btn.btn-secondary href="#/flora" { "🌺 Explorar Flora" }
            }
        }
    }
}

fn render_featured(species: &[Species], flips: &FlipStates) -> Markup {
    html! {
        div.grid.grid-3 {
            @for s in species {
                @let card = SpeciesCard::from_species(s, SpeciesKind::Fauna);
                (card.render(flips.is_flipped(&card.card_id())))
            }
        }
    }
}

fn render_stats(stats: &Stats) -> Markup {
    let items = [
        ("🦁", stats.total_animales, "Especies de fauna"),
        ("🌿", stats.total_plantas, "Especies de flora"),
        ("📸", stats.total_fotos, "Fotografías"),
        ("🌎", stats.total_especies, "Especies registradas"),
    ];
    html! {
        div.stats-grid {
            @for (icon, value, label) in items {
                div.stat-card {
                    span.stat-icon aria-hidden="true" { (icon) }
                    span.stat-value { (value) }
                    span.stat-label { (label) }
                }
            }
        }
    }
}

#[async_trait]
impl PageController for HomePage {
    fn page(&self) -> PageId {
        PageId::Home
    }

    async fn mount(&self, container: &Container, _route: &RouteMatch, cancel: &CancellationToken) {
        container.set_page_state(HomeState::default());
        container.add_region("hero", None, "");
        container.replace("hero", RegionState::Populated(Content::Static(hero())));
        container.add_region(FEATURED, Some("Especies Destacadas"), LOADING);
        container.add_region(NEWS, Some("📰 Noticias Destacadas"), "Cargando noticias…");
        container.add_region(GALLERY, Some("📸 Galería"), "Cargando galería…");
        container.add_region(STATS, Some("📊 Estadísticas"), LOADING);

        futures::join!(
            self.load_featured(container.region(FEATURED, cancel)),
            self.load_news(container.region(NEWS, cancel)),
            self.load_gallery(container.region(GALLERY, cancel)),
            self.load_stats(container.region(STATS, cancel)),
        );
    }

    async fn reload(
        &self,
        container: &Container,
        region: &str,
        _route: &RouteMatch,
        cancel: &CancellationToken,
    ) -> bool {
        let handle = container.region(region, cancel);
        match region {
            FEATURED => self.load_featured(handle).await,
            NEWS => self.load_news(handle).await,
            GALLERY => self.load_gallery(handle).await,
            STATS => self.load_stats(handle).await,
            _ => return false,
        }
        true
    }

    fn handle(&self, container: &Container, event: &PageEvent) -> bool {
        let PageEvent::Card { card_id, event } = event else {
            return false;
        };
        let markup = container.with_page_state(|s: &mut HomeState| {
            s.flips
                .handle(card_id, *event)
                .then(|| render_featured(&s.featured, &s.flips))
        });
        match markup.flatten() {
            Some(markup) => {
                container.replace(FEATURED, RegionState::Populated(Content::Static(markup)))
            }
            None => false,
        }
    }
}
