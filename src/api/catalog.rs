use super::endpoints::{self, SpeciesQuery};
use super::error::ApiError;
use super::request::Request;
use super::transport::{ReqwestTransport, Transport};
use crate::config::ApiConfig;
use crate::types::{
    Category, GalleryPhoto, Paginated, Photo, ProtectionAction, Species, SpeciesKind, Stats,
    Threat,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Collection endpoints answer either with a bare array or a paginated
/// envelope, depending on the server version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page(Paginated<T>),
    List(Vec<T>),
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Page(page) => page.results,
            ListBody::List(items) => items,
        }
    }
}

/// Typed, cancellable access to the species API.
#[derive(Clone)]
pub struct Catalog {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Catalog over HTTP using the configured base URL and timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config.base_url, config.timeout())?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Send `request` and decode the body as `T`.
    ///
    /// Returns [`ApiError::Cancelled`] as soon as `cancel` fires, whether
    /// before sending or while waiting; the in-flight request is dropped.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%request, "request cancelled");
                return Err(ApiError::Cancelled);
            }
            body = self.transport.get(request) => body?,
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ApiError> {
        Ok(self.execute::<ListBody<T>>(request, cancel).await?.into_vec())
    }

    pub async fn species_page(
        &self,
        kind: SpeciesKind,
        query: &SpeciesQuery,
        cancel: &CancellationToken,
    ) -> Result<Paginated<Species>, ApiError> {
        self.execute(&endpoints::species_list(kind, query), cancel)
            .await
    }

    /// Every species of `kind`, following pages until the last one or until
    /// `max_pages` have been read.
    pub async fn all_species(
        &self,
        kind: SpeciesKind,
        max_pages: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Species>, ApiError> {
        let mut all = Vec::new();
        for page in 1..=max_pages.max(1) {
            let body = self
                .species_page(kind, &SpeciesQuery::page(page), cancel)
                .await?;
            all.extend(body.results);
            if body.next.is_none() {
                break;
            }
        }
        Ok(all)
    }

    pub async fn species(
        &self,
        kind: SpeciesKind,
        id: u64,
        cancel: &CancellationToken,
    ) -> Result<Species, ApiError> {
        self.execute(&endpoints::species(kind, id), cancel).await
    }

    pub async fn photos(
        &self,
        kind: SpeciesKind,
        id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Photo>, ApiError> {
        self.list(&endpoints::photos(kind, id), cancel).await
    }

    pub async fn threats(
        &self,
        animal_id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Threat>, ApiError> {
        self.list(&endpoints::threats(animal_id), cancel).await
    }

    pub async fn protection_actions(
        &self,
        animal_id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProtectionAction>, ApiError> {
        self.list(&endpoints::protection_actions(animal_id), cancel)
            .await
    }

    pub async fn categories(&self, cancel: &CancellationToken) -> Result<Vec<Category>, ApiError> {
        self.list(&endpoints::categories(), cancel).await
    }

    pub async fn featured(
        &self,
        limit: u32,
        kind: Option<SpeciesKind>,
        cancel: &CancellationToken,
    ) -> Result<Vec<GalleryPhoto>, ApiError> {
        self.list(&endpoints::featured(limit, kind), cancel).await
    }

    pub async fn random(
        &self,
        limit: u32,
        kind: Option<SpeciesKind>,
        cancel: &CancellationToken,
    ) -> Result<Vec<GalleryPhoto>, ApiError> {
        self.list(&endpoints::random(limit, kind), cancel).await
    }

    pub async fn stats(&self, cancel: &CancellationToken) -> Result<Stats, ApiError> {
        self.execute(&endpoints::stats(), cancel).await
    }
}
