//! Regions: independently updated parts of the mounted page.
//!
//! A [`Container`] holds an ordered list of named regions, the page's private
//! state and the disposers to run on teardown. Each region is in exactly one
//! [`RegionState`]. Asynchronous loaders write through a [`RegionHandle`]
//! bound to the page's cancellation token; once the token is cancelled every
//! write is dropped, so a late response can never land on the next page.
//!
//! The container is cheap to clone; clones share the same regions.

use crate::api::ApiError;
use crate::carousel::{CarouselHandle, CarouselInput, CarouselSnapshot};
use crate::layout;
use maud::{Markup, PreEscaped, html};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs once on teardown.
pub type Disposer = Box<dyn FnOnce() + Send>;

/// A carousel living in a region: its latest snapshot and its input channel.
#[derive(Debug, Clone)]
pub struct LiveCarousel {
    snapshot: watch::Receiver<CarouselSnapshot>,
    input: mpsc::Sender<CarouselInput>,
}

impl LiveCarousel {
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn input(&self) -> mpsc::Sender<CarouselInput> {
        self.input.clone()
    }
}

#[derive(Debug, Clone)]
pub enum Content {
    Static(Markup),
    Carousel(LiveCarousel),
}

#[derive(Debug, Clone)]
pub enum RegionState {
    /// Placeholder text shown until the load settles.
    Loading(String),
    Populated(Content),
    /// Load succeeded with nothing to show.
    Empty(String),
    Error {
        message: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        retry: bool,
    },
}

impl RegionState {
    /// Short name used in `data-state`.
    pub fn kind(&self) -> &'static str {
        match self {
            RegionState::Loading(_) => "loading",
            RegionState::Populated(_) => "populated",
            RegionState::Empty(_) => "empty",
            RegionState::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RegionState::Error { .. })
    }
}

#[derive(Debug)]
struct Region {
    id: String,
    title: Option<String>,
    state: RegionState,
}

#[derive(Default)]
struct Inner {
    regions: Vec<Region>,
    state: Option<Box<dyn Any + Send>>,
    disposers: Vec<Disposer>,
    torn_down: bool,
}

#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("regions", &self.region_ids())
            .finish_non_exhaustive()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a region in the loading state, or reset an existing one.
    pub fn add_region(&self, id: &str, title: Option<&str>, loading: &str) {
        let mut inner = self.lock();
        let state = RegionState::Loading(loading.to_string());
        match inner.regions.iter_mut().find(|r| r.id == id) {
            Some(region) => region.state = state,
            None => inner.regions.push(Region {
                id: id.to_string(),
                title: title.map(String::from),
                state,
            }),
        }
    }

    /// Writer for `id` that goes quiet once `cancel` fires.
    pub fn region(&self, id: &str, cancel: &CancellationToken) -> RegionHandle {
        RegionHandle {
            container: self.clone(),
            id: id.to_string(),
            cancel: cancel.clone(),
        }
    }

    /// Set a region's state directly. Used for synchronous re-renders on the
    /// active page. Returns false for unknown regions.
    pub fn replace(&self, id: &str, state: RegionState) -> bool {
        let mut inner = self.lock();
        if inner.torn_down {
            return false;
        }
        match inner.regions.iter_mut().find(|r| r.id == id) {
            Some(region) => {
                region.state = state;
                true
            }
            None => false,
        }
    }

    pub fn state(&self, id: &str) -> Option<RegionState> {
        self.lock()
            .regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.state.clone())
    }

    pub fn region_ids(&self) -> Vec<String> {
        self.lock().regions.iter().map(|r| r.id.clone()).collect()
    }

    /// Input channel of the carousel in region `id`, if it holds one.
    pub fn carousel(&self, id: &str) -> Option<LiveCarousel> {
        match self.state(id)? {
            RegionState::Populated(Content::Carousel(live)) => Some(live),
            _ => None,
        }
    }

    /// Replace the page's private state.
    pub fn set_page_state<T: Any + Send>(&self, state: T) {
        self.lock().state = Some(Box::new(state));
    }

    /// Run `f` on the page state if it is a `T`.
    pub fn with_page_state<T: Any + Send, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut inner = self.lock();
        inner.state.as_mut()?.downcast_mut::<T>().map(f)
    }

    /// Register a disposer. On a container that is already torn down it runs
    /// immediately.
    pub fn own(&self, disposer: impl FnOnce() + Send + 'static) {
        let mut inner = self.lock();
        if inner.torn_down {
            drop(inner);
            disposer();
        } else {
            inner.disposers.push(Box::new(disposer));
        }
    }

    /// Run every disposer and drop regions and page state.
    pub fn teardown(&self) {
        let disposers = {
            let mut inner = self.lock();
            inner.torn_down = true;
            inner.regions.clear();
            inner.state = None;
            std::mem::take(&mut inner.disposers)
        };
        debug!(count = disposers.len(), "running disposers");
        for dispose in disposers {
            dispose();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.lock().torn_down
    }

    pub fn render(&self) -> Markup {
        let inner = self.lock();
        html! {
            @for region in &inner.regions {
                section.region id={ "region-" (region.id) } data-region=(region.id)
                    data-state=(region.state.kind()) aria-busy=(layout::bool_attr(matches!(region.state, RegionState::Loading(_)))) {
                    @if let Some(title) = &region.title {
                        h2.section-title { (title) }
                    }
                    (render_state(&region.id, &region.state))
                }
            }
        }
    }
}

fn render_state(id: &str, state: &RegionState) -> Markup {
    match state {
        RegionState::Loading(message) => layout::loading(message),
        RegionState::Populated(Content::Static(markup)) => markup.clone(),
        RegionState::Populated(Content::Carousel(live)) => {
            PreEscaped(live.snapshot.borrow().html.clone())
        }
        RegionState::Empty(message) => layout::empty_state(message),
        RegionState::Error {
            message,
            status,
            retry,
        } => layout::error_message(message, *status, retry.then_some(id)),
    }
}

/// Writes into one region on behalf of one mounted page.
#[derive(Debug, Clone)]
pub struct RegionHandle {
    container: Container,
    id: String,
    cancel: CancellationToken,
}

impl RegionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Apply `state` unless the page was cancelled. Returns whether it landed.
    pub fn set(&self, state: RegionState) -> bool {
        if self.cancel.is_cancelled() {
            debug!(region = %self.id, state = state.kind(), "dropping write after cancellation");
            return false;
        }
        self.container.replace(&self.id, state)
    }

    pub fn loading(&self, message: &str) -> bool {
        self.set(RegionState::Loading(message.to_string()))
    }

    pub fn populate(&self, markup: Markup) -> bool {
        self.set(RegionState::Populated(Content::Static(markup)))
    }

    /// Show a running carousel. The container takes ownership of the driver
    /// and disposes it on teardown. A cancelled page disposes it at once.
    pub fn populate_carousel(&self, handle: CarouselHandle) -> bool {
        let live = LiveCarousel {
            snapshot: handle.subscribe(),
            input: handle.sender(),
        };
        if self.cancel.is_cancelled() {
            handle.dispose();
            debug!(region = %self.id, "dropping carousel after cancellation");
            return false;
        }
        self.container.own(move || handle.dispose());
        self.set(RegionState::Populated(Content::Carousel(live)))
    }

    pub fn empty(&self, message: &str) -> bool {
        self.set(RegionState::Empty(message.to_string()))
    }

    /// Show `err` with a retry control. Cancellation is silent.
    pub fn error(&self, err: &ApiError) -> bool {
        if err.is_cancelled() {
            return false;
        }
        let status = Some(err.status()).filter(|s| *s != 0);
        self.set(RegionState::Error {
            message: err.to_string(),
            status,
            retry: true,
        })
    }
}
