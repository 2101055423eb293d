//! Page controllers.
//!
//! Every page implements [`PageController`]. `mount` declares the page's
//! regions and runs their loads concurrently; `reload` re-runs one region's
//! load with the same request (the retry button); `handle` applies
//! synchronous page events such as filter changes and card flips.
//!
//! | Page | Regions |
//! |------|---------|
//! | [`HomePage`] | `hero`, `featured`, `news`, `gallery`, `stats` |
//! | [`ListingPage`] | `filters`, `gallery` |
//! | [`DetailPage`] | `sheet`, `photos` |
//! | [`NotFoundPage`] | `main` |

mod detail;
mod home;
mod listing;
mod not_found;

pub use detail::DetailPage;
pub use home::HomePage;
pub use listing::ListingPage;
pub use not_found::NotFoundPage;

use crate::filter::FilterEvent;
use crate::flipcard::FlipEvent;
use crate::layout::SITE_TITLE;
use crate::router::{PageId, RouteMatch};
use crate::view::Container;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Synchronous input routed to the active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Filter(FilterEvent),
    /// Interaction with the card whose `data-card-id` is `card_id`.
    Card { card_id: String, event: FlipEvent },
}

pub const LOADING: &str = "Cargando...";

#[async_trait]
pub trait PageController: Send + Sync {
    fn page(&self) -> PageId;

    fn title(&self, _route: &RouteMatch) -> String {
        SITE_TITLE.to_string()
    }

    /// Declare regions and load them. Returns when every region has settled
    /// or the token is cancelled.
    async fn mount(&self, container: &Container, route: &RouteMatch, cancel: &CancellationToken);

    /// Re-run the load behind `region`. Returns false for regions that have
    /// nothing to reload.
    async fn reload(
        &self,
        _container: &Container,
        _region: &str,
        _route: &RouteMatch,
        _cancel: &CancellationToken,
    ) -> bool {
        false
    }

    /// Apply a page event. Returns true when something changed.
    fn handle(&self, _container: &Container, _event: &PageEvent) -> bool {
        false
    }
}

fn page_title(section: &str) -> String {
    format!("{section} | {SITE_TITLE}")
}
