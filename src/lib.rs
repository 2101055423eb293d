//! # EcoAlbum
//!
//! Client for a catalog of protected fauna and flora. It talks to the
//! species REST API, filters what comes back, and renders the browsing UI
//! as HTML: flip cards, an infinitely looping carousel and the pages that
//! compose them.
//!
//! # Architecture: Pages, Regions, Drivers
//!
//! ```text
//! Router   "#/fauna/7"  →  RouteMatch    (hash path → page + params)
//! App      RouteMatch   →  Container     (mount controller, own regions)
//! Page     Catalog      →  RegionState   (concurrent loads, one region each)
//! ```
//!
//! Each page declares named regions and loads them independently. A region
//! is always in exactly one of loading, populated, empty or error, and an
//! error keeps a retry control that re-issues the identical request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | Endpoint builders, the `Transport` seam, cancellable typed fetches |
//! | [`app`] | Application shell: navigation, retry, event dispatch, document rendering |
//! | [`pages`] | Home, listing, detail and not-found controllers |
//! | [`view`] | Region container with cancellation-aware writers and disposers |
//! | [`carousel`] | Looping carousel engine, gestures, autoplay and its tokio driver |
//! | [`flipcard`] | Two-faced card markup and flip state |
//! | [`cards`] | Species records mapped onto flip cards, gallery grid |
//! | [`filter`] | Client-side filter predicates and the filter bar |
//! | [`conservation`] | IUCN status labels and codes |
//! | [`router`] | Hash route table with an explicit active match |
//! | [`layout`] | Document shell, header, footer and shared fragments |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`types`] | API record types |
//! | [`input`] | Keyboard and pointer vocabulary shared by widgets |
//!
//! # Design Decisions
//!
//! ## Cancellation Over Guards
//!
//! Every fetch takes a `CancellationToken`. Navigation cancels the previous
//! page's token before the next container exists, and region writers check
//! the token before every write. A response that arrives after navigation is
//! dropped; there is no per-request generation counter to keep in sync.
//!
//! ## Carousels As Tasks
//!
//! The carousel engine is a plain state machine with no clock of its own.
//! [`carousel::driver`] wraps it in a tokio task that owns the autoplay
//! interval and the transition timer, accepts input over a channel and
//! publishes snapshots over a watch channel. The container disposes the task
//! on teardown, so a carousel never outlives its page.
//!
//! ## Maud For Markup
//!
//! All HTML is produced with [Maud](https://maud.lambda.xyz/). Interpolation
//! is escaped, templates are checked at compile time, and every fragment is
//! an ordinary function that tests can call directly.

pub mod api;
pub mod app;
pub mod cards;
pub mod carousel;
pub mod config;
pub mod conservation;
pub mod filter;
pub mod flipcard;
pub mod input;
pub mod layout;
pub mod pages;
pub mod router;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
