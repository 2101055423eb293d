use super::{PageController, page_title};
use crate::layout;
use crate::router::{PageId, RouteMatch};
use crate::view::{Container, Content, RegionState};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Static 404 view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundPage;

#[async_trait]
impl PageController for NotFoundPage {
    fn page(&self) -> PageId {
        PageId::NotFound
    }

    fn title(&self, _route: &RouteMatch) -> String {
        page_title("Página no encontrada")
    }

    async fn mount(&self, container: &Container, _route: &RouteMatch, _cancel: &CancellationToken) {
        container.add_region("main", None, "");
        container.replace("main", RegionState::Populated(Content::Static(layout::not_found())));
    }
}
