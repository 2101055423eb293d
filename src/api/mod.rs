//! Data fetch layer for the species REST API.
//!
//! [`Catalog`] exposes one typed method per endpoint. Requests are built by
//! the pure functions in [`endpoints`] and sent through a [`Transport`]; the
//! production transport is [`ReqwestTransport`]. Every call takes a
//! `CancellationToken` and every failure is normalized into [`ApiError`].

mod catalog;
pub mod endpoints;
mod error;
mod request;
mod transport;

pub use catalog::Catalog;
pub use endpoints::SpeciesQuery;
pub use error::{ApiError, CONNECTION_ERROR};
pub use request::Request;
pub use transport::{ReqwestTransport, Transport};
