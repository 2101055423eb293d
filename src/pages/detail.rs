use super::{LOADING, PageController, page_title};
use crate::api::{ApiError, Catalog};
use crate::cards::status_badge;
use crate::carousel::{CarouselBuilder, PhotoSlides, SlideItem, driver};
use crate::conservation;
use crate::router::{PageId, RouteMatch};
use crate::types::{Photo, ProtectionAction, Species, SpeciesKind, Threat};
use crate::view::{Container, RegionHandle, RegionState};
use async_trait::async_trait;
use maud::{Markup, html};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const SHEET: &str = "sheet";
const PHOTOS: &str = "photos";

const NOT_FOUND: &str = "Especie no encontrada";
const NO_PHOTOS: &str = "No hay fotos disponibles";

/// Common name of the loaded species, used for photo alt text.
#[derive(Debug, Default)]
struct DetailState {
    name: Option<String>,
}

/// Species detail: the fact sheet and a photo carousel.
#[derive(Debug, Clone)]
pub struct DetailPage {
    kind: SpeciesKind,
    catalog: Catalog,
    transition: Duration,
}

impl DetailPage {
    pub fn new(kind: SpeciesKind, catalog: Catalog, transition: Duration) -> Self {
        Self {
            kind,
            catalog,
            transition,
        }
    }

    /// Secondary lists are optional: a failure is logged and the section left out.
    fn optional<T>(what: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
        match result {
            Ok(items) => items,
            Err(err) => {
                if !err.is_cancelled() {
                    warn!(error = %err, "{what} unavailable");
                }
                Vec::new()
            }
        }
    }

    async fn load_sheet(&self, region: RegionHandle, id: u64) {
        region.loading(LOADING);
        let cancel = region.cancel_token();
        let (species, threats, actions) = match self.kind {
            SpeciesKind::Fauna => {
                let (species, threats, actions) = futures::join!(
                    self.catalog.species(self.kind, id, cancel),
                    self.catalog.threats(id, cancel),
                    self.catalog.protection_actions(id, cancel),
                );
                (
                    species,
                    Self::optional("threats", threats),
                    Self::optional("protection actions", actions),
                )
            }
            SpeciesKind::Flora => (
                self.catalog.species(self.kind, id, cancel).await,
                Vec::new(),
                Vec::new(),
            ),
        };
        match species {
            Ok(species) => {
                let name = Some(species.common_name.trim())
                    .filter(|n| !n.is_empty())
                    .map(String::from);
                region
                    .container()
                    .with_page_state(|s: &mut DetailState| s.name = name);
                region.populate(render_sheet(self.kind, &species, &threats, &actions));
            }
            Err(err) if err.is_not_found() => {
                region.empty(NOT_FOUND);
            }
            Err(err) => {
                region.error(&err);
            }
        }
    }

    async fn load_photos(&self, region: RegionHandle, id: u64) {
        region.loading("Cargando fotos…");
        let photos = self.catalog.photos(self.kind, id, region.cancel_token()).await;
        self.show_photos(&region, photos);
    }

    /// Photo slides are titled with the species name once the sheet has it.
    fn show_photos(&self, region: &RegionHandle, photos: Result<Vec<Photo>, ApiError>) {
        let photos = match photos {
            Ok(photos) => photos,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                region.error(&err);
                return;
            }
        };
        let name = region
            .container()
            .with_page_state(|s: &mut DetailState| s.name.clone())
            .flatten()
            .unwrap_or_default();
        let carousel = CarouselBuilder::new(photos.iter().map(|p| SlideItem::photo(p, &name)).collect())
            .renderer(PhotoSlides)
            .label("Fotos de la especie")
            .build();
        match carousel {
            Some(c) => {
                region.populate_carousel(driver::spawn(c, self.transition, region.cancel_token()));
            }
            None => {
                region.empty(NO_PHOTOS);
            }
        }
    }
}

fn render_sheet(
    kind: SpeciesKind,
    species: &Species,
    threats: &[Threat],
    actions: &[ProtectionAction],
) -> Markup {
    let name = Some(species.common_name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or("Sin nombre");
    let code = species
        .status
        .as_deref()
        .and_then(conservation::status_code);
    let back_label = match kind {
        SpeciesKind::Fauna => "← Volver a fauna",
        SpeciesKind::Flora => "← Volver a flora",
    };
    let facts = [
        ("Hábitat", species.habitat.as_deref()),
        ("Distribución", species.distribution.as_deref()),
        ("Familia", species.family.as_deref()),
        ("Estado de conservación", species.status.as_deref()),
    ];

    html! {
        article.species-sheet.card.card--glass {
            header.sheet-header {
                a.back-link href={ "#/" (kind) } { (back_label) }
                h1.sheet-title { (name) }
                @if !species.scientific_name.is_empty() {
                    p.sheet-scientific { em { (species.scientific_name) } }
                }
                @if let Some(code) = &code {
                    (status_badge(code))
                }
            }
            @if let Some(cover) = species.cover_url() {
                img.sheet-image src=(cover) alt={ "Imagen de " (name) };
            }
            dl.sheet-facts {
                @for (label, value) in facts {
                    @if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                        dt { (label) }
                        dd { (value) }
                    }
                }
            }
            @if let Some(description) = &species.description {
                section.sheet-section {
                    h2 { "Descripción" }
                    p { (description) }
                }
            }
            @if let Some(importance) = &species.ecological_importance {
                section.sheet-section {
                    h2 { "Importancia ecológica" }
                    p { (importance) }
                }
            }
            @if !threats.is_empty() {
                section.sheet-section.sheet-threats {
                    h2 { "Amenazas" }
                    ul {
                        @for threat in threats {
                            li {
                                strong { (threat.name) }
                                @if let Some(d) = &threat.description { ": " (d) }
                            }
                        }
                    }
                }
            }
            @if !actions.is_empty() {
                section.sheet-section.sheet-actions {
                    h2 { "Acciones de protección" }
                    ul {
                        @for action in actions {
                            li {
                                strong { (action.name) }
                                @if let Some(d) = &action.description { ": " (d) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[async_trait]
impl PageController for DetailPage {
    fn page(&self) -> PageId {
        match self.kind {
            SpeciesKind::Fauna => PageId::FaunaDetail,
            SpeciesKind::Flora => PageId::FloraDetail,
        }
    }

    fn title(&self, _route: &RouteMatch) -> String {
        page_title(match self.kind {
            SpeciesKind::Fauna => "Fauna",
            SpeciesKind::Flora => "Flora",
        })
    }

    async fn mount(&self, container: &Container, route: &RouteMatch, cancel: &CancellationToken) {
        container.add_region(SHEET, None, LOADING);
        let Some(id) = route.id() else {
            container.replace(SHEET, RegionState::Empty(NOT_FOUND.to_string()));
            return;
        };
        container.add_region(PHOTOS, Some("📸 Fotografías"), "Cargando fotos…");
        container.set_page_state(DetailState::default());

        // Photos are fetched alongside the sheet but shown once it settles.
        let (_, photos) = futures::join!(
            self.load_sheet(container.region(SHEET, cancel), id),
            self.catalog.photos(self.kind, id, cancel),
        );
        self.show_photos(&container.region(PHOTOS, cancel), photos);
    }

    async fn reload(
        &self,
        container: &Container,
        region: &str,
        route: &RouteMatch,
        cancel: &CancellationToken,
    ) -> bool {
        let Some(id) = route.id() else {
            return false;
        };
        let handle = container.region(region, cancel);
        match region {
            SHEET => self.load_sheet(handle, id).await,
            PHOTOS => self.load_photos(handle, id).await,
            _ => return false,
        }
        true
    }
}
