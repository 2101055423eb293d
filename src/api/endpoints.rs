//! Request builders for every catalog endpoint.
//!
//! Pure functions: the same arguments always give an equal [`Request`], which
//! is what makes region retries re-issue the identical call.

use super::request::Request;
use crate::config::MAX_GALLERY_LIMIT;
use crate::types::SpeciesKind;

/// Server-side filters for species list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesQuery {
    pub query: Option<String>,
    /// Category id (fauna) or family name (flora).
    pub category: Option<String>,
    pub status: Option<String>,
    pub letter: Option<char>,
    pub page: Option<u32>,
}

impl SpeciesQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }
}

fn species_root(kind: SpeciesKind) -> &'static str {
    match kind {
        SpeciesKind::Fauna => "fauna/",
        SpeciesKind::Flora => "flora/flora/",
    }
}

/// `fauna/` or `flora/flora/` with `q`, `categoria`/`familia`, `estado`,
/// `letra` and `page`.
pub fn species_list(kind: SpeciesKind, query: &SpeciesQuery) -> Request {
    let category_key = match kind {
        SpeciesKind::Fauna => "categoria",
        SpeciesKind::Flora => "familia",
    };
    let letter = query.letter.map(|c| c.to_string());
    let req = Request::get(species_root(kind))
        .param_opt("q", query.query.as_deref())
        .param_opt(category_key, query.category.as_deref())
        .param_opt("estado", query.status.as_deref())
        .param_opt("letra", letter.as_deref());
    match query.page {
        Some(page) => req.param("page", page),
        None => req,
    }
}

pub fn species(kind: SpeciesKind, id: u64) -> Request {
    Request::get(format!("{}{id}/", species_root(kind)))
}

pub fn photos(kind: SpeciesKind, id: u64) -> Request {
    Request::get(format!("{}{id}/fotos/", species_root(kind)))
}

pub fn threats(animal_id: u64) -> Request {
    Request::get(format!("fauna/{animal_id}/amenazas/"))
}

pub fn protection_actions(animal_id: u64) -> Request {
    Request::get(format!("fauna/{animal_id}/acciones/"))
}

pub fn categories() -> Request {
    Request::get("fauna/categorias/")
}

/// Clamp a gallery limit into `1..=MAX_GALLERY_LIMIT`.
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_GALLERY_LIMIT)
}

fn gallery(path: &str, limit: u32, kind: Option<SpeciesKind>) -> Request {
    let req = Request::get(path).param("limit", clamp_limit(limit));
    match kind {
        Some(kind) => req.param("tipo", kind),
        None => req,
    }
}

pub fn featured(limit: u32, kind: Option<SpeciesKind>) -> Request {
    gallery("galeria/destacados/", limit, kind)
}

pub fn random(limit: u32, kind: Option<SpeciesKind>) -> Request {
    gallery("galeria/aleatorios/", limit, kind)
}

pub fn stats() -> Request {
    Request::get("galeria/estadisticas/")
}
