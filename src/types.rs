//! Records returned by the species API.
//!
//! Field names on the wire are Spanish (`nombre_comun`, `estado`, ...); the
//! Rust names are English and serde maps between them. Fauna and flora
//! records share one [`Species`] type: the id arrives as `id_animal`,
//! `id_planta` or plain `id`, and only one of `id_categoria` (fauna) or
//! `familia` (flora) is present.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the catalog a record or route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesKind {
    Fauna,
    Flora,
}

impl SpeciesKind {
    /// Route and `tipo` query value: `"fauna"` / `"flora"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesKind::Fauna => "fauna",
            SpeciesKind::Flora => "flora",
        }
    }

    /// Plural noun used in headings and empty states.
    pub fn plural_noun(&self) -> &'static str {
        match self {
            SpeciesKind::Fauna => "animales",
            SpeciesKind::Flora => "plantas",
        }
    }

    /// Hash route of a record's detail page.
    pub fn detail_href(&self, id: u64) -> String {
        format!("#/{}/{}", self.as_str(), id)
    }
}

impl fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paginated list envelope: `{ count, next, previous, results }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Primary photo reference: either a bare URL or a photo object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhotoRef {
    Url(String),
    Photo { url_foto: String },
}

impl PhotoRef {
    pub fn url(&self) -> &str {
        match self {
            PhotoRef::Url(url) => url,
            PhotoRef::Photo { url_foto } => url_foto,
        }
    }
}

/// An animal or plant.
///
/// Decoded through [`SpeciesRecord`] because payloads may carry several id
/// keys at once (`id_animal` and `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpeciesRecord")]
pub struct Species {
    pub id: u64,
    #[serde(rename = "nombre_comun", default)]
    pub common_name: String,
    #[serde(rename = "nombre_cientifico", default)]
    pub scientific_name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(rename = "distribucion", default)]
    pub distribution: Option<String>,
    #[serde(rename = "importancia_ecologica", default)]
    pub ecological_importance: Option<String>,
    /// Status label with bracketed code, e.g. `"Vulnerable (VU)"`.
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    /// Fauna only.
    #[serde(rename = "id_categoria", default)]
    pub category_id: Option<u64>,
    /// Flora only.
    #[serde(rename = "familia", default)]
    pub family: Option<String>,
    #[serde(rename = "url_imagen", default)]
    pub image_url: Option<String>,
    #[serde(rename = "foto_principal", default)]
    pub main_photo: Option<PhotoRef>,
    #[serde(rename = "fotos", default)]
    pub photos: Vec<Photo>,
}

/// Wire form of [`Species`] with every id key kept apart.
#[derive(Deserialize)]
struct SpeciesRecord {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    id_animal: Option<u64>,
    #[serde(default)]
    id_planta: Option<u64>,
    #[serde(default)]
    nombre_comun: String,
    #[serde(default)]
    nombre_cientifico: String,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    habitat: Option<String>,
    #[serde(default)]
    distribucion: Option<String>,
    #[serde(default)]
    importancia_ecologica: Option<String>,
    #[serde(default)]
    estado: Option<String>,
    #[serde(default)]
    id_categoria: Option<u64>,
    #[serde(default)]
    familia: Option<String>,
    #[serde(default)]
    url_imagen: Option<String>,
    #[serde(default)]
    foto_principal: Option<PhotoRef>,
    #[serde(default)]
    fotos: Vec<Photo>,
}

impl TryFrom<SpeciesRecord> for Species {
    type Error = String;

    /// The kind-specific id wins over the generic `id`.
    fn try_from(r: SpeciesRecord) -> Result<Self, Self::Error> {
        let id = r
            .id_animal
            .or(r.id_planta)
            .or(r.id)
            .ok_or_else(|| "missing field `id`".to_string())?;
        Ok(Species {
            id,
            common_name: r.nombre_comun,
            scientific_name: r.nombre_cientifico,
            description: r.descripcion,
            habitat: r.habitat,
            distribution: r.distribucion,
            ecological_importance: r.importancia_ecologica,
            status: r.estado,
            category_id: r.id_categoria,
            family: r.familia,
            image_url: r.url_imagen,
            main_photo: r.foto_principal,
            photos: r.fotos,
        })
    }
}

impl Species {
    /// Best available cover image.
    pub fn cover_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.main_photo.as_ref().map(PhotoRef::url))
            .or_else(|| self.photos.first().map(|p| p.url.as_str()))
    }

    /// Key compared by the category filter: the fauna category id, or the
    /// flora family name.
    pub fn category_key(&self) -> Option<String> {
        self.category_id
            .map(|id| id.to_string())
            .or_else(|| self.family.clone())
    }
}

/// A species photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "id_foto", default)]
    pub id: u64,
    #[serde(rename = "url_foto")]
    pub url: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Fauna category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Threat affecting an animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    #[serde(rename = "id_amenaza", default)]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Protection action for an animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionAction {
    #[serde(rename = "id_accion", default)]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Photo from the featured/random gallery endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryPhoto {
    pub id: u64,
    #[serde(rename = "tipo")]
    pub kind: SpeciesKind,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "url_foto")]
    pub url: String,
    #[serde(rename = "descripcion_foto", default)]
    pub description: Option<String>,
    #[serde(rename = "especie_id")]
    pub species_id: u64,
    #[serde(rename = "nombre_cientifico", default)]
    pub scientific_name: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

impl GalleryPhoto {
    /// Detail route of the pictured species.
    pub fn detail_href(&self) -> String {
        self.kind.detail_href(self.species_id)
    }
}

/// Catalog totals from `galeria/estadisticas/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_animales: u64,
    pub total_plantas: u64,
    pub total_fotos_fauna: u64,
    pub total_fotos_flora: u64,
    pub total_especies: u64,
    pub total_fotos: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animal_deserializes_with_spanish_names() {
        let json = r#"{
            "id_animal": 7,
            "nombre_comun": "Jaguar",
            "nombre_cientifico": "Panthera onca",
            "habitat": "Selva tropical",
            "estado": "Casi amenazada (NT)",
            "id_categoria": 2,
            "foto_principal": {"url_foto": "https://img.example/jaguar.jpg"}
        }"#;
        let s: Species = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.common_name, "Jaguar");
        assert_eq!(s.category_key().as_deref(), Some("2"));
        assert_eq!(s.cover_url(), Some("https://img.example/jaguar.jpg"));
    }

    #[test]
    fn plant_uses_family_as_category_key() {
        let json = r#"{
            "id_planta": 3,
            "nombre_comun": "Guayacán",
            "nombre_cientifico": "Tabebuia guayacan",
            "familia": "Bignoniaceae",
            "foto_principal": "https://img.example/guayacan.jpg"
        }"#;
        let s: Species = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, 3);
        assert_eq!(s.category_key().as_deref(), Some("Bignoniaceae"));
        assert_eq!(s.cover_url(), Some("https://img.example/guayacan.jpg"));
    }

    #[test]
    fn record_with_generic_and_kind_ids() {
        let s: Species =
            serde_json::from_str(r#"{"id": 7, "id_animal": 7, "nombre_comun": "Jaguar"}"#).unwrap();
        assert_eq!(s.id, 7);
        let s: Species = serde_json::from_str(r#"{"id": 40, "id_planta": 4}"#).unwrap();
        assert_eq!(s.id, 4);
    }

    #[test]
    fn record_without_any_id_is_rejected() {
        let err = serde_json::from_str::<Species>(r#"{"nombre_comun": "Jaguar"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn page_with_dual_id_records_decodes() {
        let json = r#"{"count": 2, "next": null, "previous": null, "results": [
            {"id": 1, "id_animal": 1, "nombre_comun": "Tapir"},
            {"id_animal": 2, "nombre_comun": "Manatí"}
        ]}"#;
        let page: Paginated<Species> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn image_url_preferred_over_photos() {
        let json = r#"{
            "id": 1,
            "nombre_comun": "Perezoso",
            "url_imagen": "https://img.example/a.jpg",
            "fotos": [{"id_foto": 1, "url_foto": "https://img.example/b.jpg"}]
        }"#;
        let s: Species = serde_json::from_str(json).unwrap();
        assert_eq!(s.cover_url(), Some("https://img.example/a.jpg"));
    }

    #[test]
    fn no_image_at_all() {
        let s: Species = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(s.cover_url(), None);
        assert_eq!(s.common_name, "");
    }

    #[test]
    fn gallery_photo_detail_href() {
        let json = r#"{
            "id": 11, "tipo": "flora", "nombre": "Orquídea",
            "url_foto": "https://img.example/o.jpg", "especie_id": 4
        }"#;
        let p: GalleryPhoto = serde_json::from_str(json).unwrap();
        assert_eq!(p.detail_href(), "#/flora/4");
    }

    #[test]
    fn paginated_envelope() {
        let json = r#"{"count": 1, "next": null, "previous": null,
            "results": [{"id_foto": 2, "url_foto": "u"}]}"#;
        let page: Paginated<Photo> = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 1);
        assert!(page.next.is_none());
        assert_eq!(page.results[0].url, "u");
    }
}
