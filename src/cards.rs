//! Species cards and the gallery grid.
//!
//! Maps API records onto flip-card fields, filling gaps with display
//! defaults, and lays cards out in a grid with an empty state.

use crate::conservation;
use crate::flipcard::{self, Action, Back, FlipCardOptions, Front};
use crate::types::{Species, SpeciesKind};
use maud::{Markup, html};

const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";
const DEFAULT_STATUS_CODE: &str = "lc";

/// Display fields for one species card.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCard {
    pub id: u64,
    pub kind: SpeciesKind,
    pub name: String,
    pub scientific_name: String,
    pub image: String,
    /// Lowercase IUCN code; `"lc"` when the record has none.
    pub status_code: String,
    pub habitat: String,
    pub region: String,
    pub summary: Option<String>,
    pub href: String,
}

impl SpeciesCard {
    pub fn from_species(species: &Species, kind: SpeciesKind) -> Self {
        let text = |v: &Option<String>, default: &str| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        let name = species.common_name.trim();
        Self {
            id: species.id,
            kind,
            name: if name.is_empty() { "Sin nombre".into() } else { name.into() },
            scientific_name: species.scientific_name.trim().to_string(),
            image: species.cover_url().unwrap_or(PLACEHOLDER_IMAGE).to_string(),
            status_code: species
                .status
                .as_deref()
                .and_then(conservation::status_code)
                .unwrap_or_else(|| DEFAULT_STATUS_CODE.to_string()),
            habitat: text(&species.habitat, "Desconocido"),
            region: text(&species.distribution, "Panamá"),
            summary: species
                .description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            href: kind.detail_href(species.id),
        }
    }

    /// Key used for `data-card-id` and flip state: `"fauna-7"`.
    pub fn card_id(&self) -> String {
        format!("{}-{}", self.kind, self.id)
    }

    fn title(&self) -> String {
        if self.scientific_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.scientific_name)
        }
    }

    pub fn render(&self, flipped: bool) -> Markup {
        let kind_label = match self.kind {
            SpeciesKind::Fauna => "Fauna",
            SpeciesKind::Flora => "Planta",
        };
        let front = flipcard::build_front(&Front {
            image: Some(self.image.clone()),
            title: self.title(),
            subtitle: Some(format!("{kind_label} | {}", self.habitat)),
            badge: Some(status_badge(&self.status_code)),
        });
        let back = flipcard::build_back(&Back {
            paragraphs: self.summary.iter().cloned().collect(),
            habitat: Some(self.habitat.clone()),
            region: Some(self.region.clone()),
            actions: vec![Action::link(&self.href, "Ver ficha")],
        });
        let options = FlipCardOptions {
            id: Some(self.card_id()),
            title: Some(self.name.clone()),
            ..Default::default()
        };
        flipcard::render_flip_card(front, back, &options, flipped)
    }
}

/// Conservation badge: `badge badge-{code}` with a dot and short label.
pub fn status_badge(code: &str) -> Markup {
    html! {
        div class=(format!("badge badge-{code}")) {
            span.badge-dot {}
            (conservation::badge_label(code))
        }
    }
}

/// Grid of species cards, or the empty state when there are none.
/// `is_flipped` receives each card's [`SpeciesCard::card_id`].
pub fn render_gallery<'a>(
    records: impl IntoIterator<Item = &'a Species>,
    kind: SpeciesKind,
    is_flipped: impl Fn(&str) -> bool,
) -> Markup {
    let cards: Vec<SpeciesCard> = records
        .into_iter()
        .map(|s| SpeciesCard::from_species(s, kind))
        .collect();
    html! {
        div.gallery-grid {
            @if cards.is_empty() {
                div.gallery-empty {
                    p { "No hay " (kind.plural_noun()) " disponibles" }
                }
            } @else {
                div.grid.grid-3 {
                    @for card in &cards {
                        (card.render(is_flipped(&card.card_id())))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(json: &str) -> Species {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_api_record() {
        let s = species(
            r#"{"id_animal": 7, "nombre_comun": "Jaguar", "nombre_cientifico": "Panthera onca",
                "estado": "Casi amenazada (NT)", "habitat": "Selva", "distribucion": "Darién",
                "descripcion": "Felino grande.", "url_imagen": "j.jpg"}"#,
        );
        let card = SpeciesCard::from_species(&s, SpeciesKind::Fauna);
        assert_eq!(card.status_code, "nt");
        assert_eq!(card.href, "#/fauna/7");
        assert_eq!(card.card_id(), "fauna-7");
        assert_eq!(card.title(), "Jaguar (Panthera onca)");
        assert_eq!(card.region, "Darién");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let card = SpeciesCard::from_species(&species(r#"{"id": 2}"#), SpeciesKind::Flora);
        assert_eq!(card.name, "Sin nombre");
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert_eq!(card.status_code, "lc");
        assert_eq!(card.habitat, "Desconocido");
        assert_eq!(card.region, "Panamá");
        assert_eq!(card.summary, None);
    }

    #[test]
    fn badge_markup() {
        let html = status_badge("vu").into_string();
        assert_eq!(
            html,
            r#"<div class="badge badge-vu"><span class="badge-dot"></span>Vulnerable</div>"#
        );
    }

    #[test]
    fn gallery_empty_state_names_the_kind() {
        let html = render_gallery(std::iter::empty(), SpeciesKind::Flora, |_| false).into_string();
        assert!(html.contains("No hay plantas disponibles"));
    }

    #[test]
    fn gallery_renders_cards_with_flip_state() {
        let records = vec![
            species(r#"{"id": 1, "nombre_comun": "Tucán"}"#),
            species(r#"{"id": 2, "nombre_comun": "Perezoso"}"#),
        ];
        let html = render_gallery(&records, SpeciesKind::Fauna, |id| id == "fauna-2").into_string();
        assert_eq!(html.matches("flip-card-inner").count(), 2);
        assert_eq!(html.matches("is-flipped").count(), 1);
        assert!(html.contains("Ver ficha"));
    }
}
