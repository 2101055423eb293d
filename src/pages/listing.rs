use super::{LOADING, PageController, PageEvent, page_title};
use crate::api::Catalog;
use crate::cards;
use crate::filter::{self, FilterBar, FilterOption};
use crate::flipcard::FlipStates;
use crate::router::{PageId, RouteMatch};
use crate::types::{Species, SpeciesKind};
use crate::view::{Container, Content, RegionHandle, RegionState};
use async_trait::async_trait;
use maud::{Markup, html};
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const FILTERS: &str = "filters";
const GALLERY: &str = "gallery";

#[derive(Debug, Default)]
struct ListingState {
    bar: FilterBar,
    /// `None` until the species list has loaded.
    records: Option<Vec<Species>>,
    flips: FlipStates,
}

impl ListingState {
    fn render_gallery(&self, kind: SpeciesKind) -> Option<Markup> {
        let records = self.records.as_ref()?;
        let visible = filter::apply(records, self.bar.filters());
        Some(html! {
            p.results-count aria-live="polite" {
                (visible.len()) " de " (records.len()) " especies"
            }
            (cards::render_gallery(visible, kind, |id| self.flips.is_flipped(id)))
        })
    }
}

/// Fauna or flora listing: a filter bar over every species of one kind.
#[derive(Debug, Clone)]
pub struct ListingPage {
    kind: SpeciesKind,
    catalog: Catalog,
    max_pages: u32,
}

impl ListingPage {
    pub fn new(kind: SpeciesKind, catalog: Catalog, max_pages: u32) -> Self {
        Self {
            kind,
            catalog,
            max_pages,
        }
    }

    pub fn kind(&self) -> SpeciesKind {
        self.kind
    }

    fn section(&self) -> &'static str {
        match self.kind {
            SpeciesKind::Fauna => "Fauna",
            SpeciesKind::Flora => "Flora",
        }
    }

    /// Fauna categories come from their own endpoint. A failure leaves the
    /// select with only "all".
    async fn load_categories(&self, region: RegionHandle) {
        if self.kind != SpeciesKind::Fauna {
            return;
        }
        match self.catalog.categories(region.cancel_token()).await {
            Ok(categories) => {
                let options = categories
                    .into_iter()
                    .map(|c| FilterOption::new(c.id.to_string(), c.name))
                    .collect();
                let markup = region.container().with_page_state(|s: &mut ListingState| {
                    s.bar.set_categories(options);
                    s.bar.render()
                });
                if let Some(markup) = markup {
                    region.populate(markup);
                }
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(error = %err, "categories unavailable, filtering without them"),
        }
    }

    async fn load_records(&self, region: RegionHandle) {
        region.loading(&format!("Cargando {}…", self.kind.plural_noun()));
        let records = match self
            .catalog
            .all_species(self.kind, self.max_pages, region.cancel_token())
            .await
        {
            Ok(records) => records,
            Err(err) => {
                region.error(&err);
                return;
            }
        };
        debug!(kind = %self.kind, count = records.len(), "species loaded");

        let kind = self.kind;
        let rendered = region.container().with_page_state(|s: &mut ListingState| {
            let bar = (kind == SpeciesKind::Flora).then(|| {
                s.bar.set_categories(families(&records));
                s.bar.render()
            });
            s.records = Some(records);
            (bar, s.render_gallery(kind))
        });
        let Some((bar, gallery)) = rendered else {
            return;
        };
        if let Some(bar) = bar {
            region.container().region(FILTERS, region.cancel_token()).populate(bar);
        }
        if let Some(gallery) = gallery {
            region.populate(gallery);
        }
    }

    fn rerender(&self, container: &Container, filters: bool) -> bool {
        let kind = self.kind;
        let rendered = container.with_page_state(|s: &mut ListingState| {
            (filters.then(|| s.bar.render()), s.render_gallery(kind))
        });
        let Some((bar, gallery)) = rendered else {
            return false;
        };
        let mut changed = false;
        if let Some(bar) = bar {
            changed |= container.replace(FILTERS, RegionState::Populated(Content::Static(bar)));
        }
        if let Some(gallery) = gallery {
            changed |= container.replace(GALLERY, RegionState::Populated(Content::Static(gallery)));
        }
        changed
    }
}

/// Distinct flora families, sorted, as select options.
fn families(records: &[Species]) -> Vec<FilterOption> {
    records
        .iter()
        .filter_map(|s| s.family.as_deref())
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|f| FilterOption::new(f, f))
        .collect()
}

#[async_trait]
impl PageController for ListingPage {
    fn page(&self) -> PageId {
        match self.kind {
            SpeciesKind::Fauna => PageId::FaunaList,
            SpeciesKind::Flora => PageId::FloraList,
        }
    }

    fn title(&self, _route: &RouteMatch) -> String {
        page_title(self.section())
    }

    async fn mount(&self, container: &Container, _route: &RouteMatch, cancel: &CancellationToken) {
        let state = ListingState::default();
        let bar = state.bar.render();
        container.set_page_state(state);
        container.add_region(FILTERS, None, LOADING);
        container.replace(FILTERS, RegionState::Populated(Content::Static(bar)));
        let title = match self.kind {
            SpeciesKind::Fauna => "🦁 Fauna de Panamá",
            SpeciesKind::Flora => "🌿 Flora de Panamá",
        };
        container.add_region(GALLERY, Some(title), LOADING);

        futures::join!(
            self.load_categories(container.region(FILTERS, cancel)),
            self.load_records(container.region(GALLERY, cancel)),
        );
    }

    async fn reload(
        &self,
        container: &Container,
        region: &str,
        _route: &RouteMatch,
        cancel: &CancellationToken,
    ) -> bool {
        if region != GALLERY {
            return false;
        }
        self.load_records(container.region(GALLERY, cancel)).await;
        true
    }

    fn handle(&self, container: &Container, event: &PageEvent) -> bool {
        match event {
            PageEvent::Filter(event) => {
                // A filter change rebuilds the grid with every card face up.
                let applied = container.with_page_state(|s: &mut ListingState| {
                    s.bar.apply(event.clone());
                    s.flips = FlipStates::default();
                });
                applied.is_some() && self.rerender(container, true)
            }
            PageEvent::Card { card_id, event } => {
                let flipped = container
                    .with_page_state(|s: &mut ListingState| s.flips.handle(card_id, *event))
                    .unwrap_or(false);
                flipped && self.rerender(container, false)
            }
        }
    }
}
