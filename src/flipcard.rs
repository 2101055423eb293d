//! Two-faced cards that flip on click, Enter or Space.
//!
//! The faces are built separately ([`build_front`], [`build_back`]) from
//! plain field structs and composed by [`render_flip_card`]. Flip state lives
//! in a [`FlipCard`] value owned by whoever renders the card; re-rendering
//! from scratch starts unflipped.

use crate::input::Key;
use maud::{Markup, html};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Front {
    pub image: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub badge: Option<Markup>,
}

#[derive(Debug, Clone, Default)]
pub struct Back {
    pub paragraphs: Vec<String>,
    pub habitat: Option<String>,
    pub region: Option<String>,
    pub actions: Vec<Action>,
}

/// Link on the back face. Never flips the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub href: String,
    pub label: String,
    pub variant: Option<String>,
}

impl Action {
    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            variant: None,
        }
    }
}

pub fn build_front(front: &Front) -> Markup {
    let alt = if front.title.is_empty() {
        "Imagen".to_string()
    } else {
        format!("Imagen de {}", front.title)
    };
    html! {
        div.flip-face-content {
            @if let Some(image) = &front.image {
                img.flip-cover src=(image) alt=(alt) loading="lazy";
            }
            div.flip-body {
                h3.flip-title { (front.title) }
                @if let Some(subtitle) = &front.subtitle {
                    p.flip-subtitle { (subtitle) }
                }
                div.flip-meta {
                    @if let Some(badge) = &front.badge {
                        (badge)
                    }
                    button.btn.btn-outline.btn-sm.flip-toggle type="button" aria-label="Ver reverso" { "Ver más" }
                }
            }
        }
    }
}

pub fn build_back(back: &Back) -> Markup {
    let meta = match (back.habitat.as_deref(), back.region.as_deref()) {
        (Some(h), Some(r)) => Some(format!("Hábitat: {h} · Región: {r}")),
        (Some(h), None) => Some(format!("Hábitat: {h}")),
        (None, Some(r)) => Some(format!("Región: {r}")),
        (None, None) => None,
    };
    html! {
        div.flip-body {
            @for p in &back.paragraphs {
                p { (p) }
            }
            @if let Some(meta) = meta {
                p.flip-subtitle { (meta) }
            }
            @if !back.actions.is_empty() {
                div.flip-actions {
                    @for action in &back.actions {
                        a href=(action.href)
                            class=(format!("btn {}", action.variant.as_deref().unwrap_or("")).trim_end())
                            data-no-flip="true" { (action.label) }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl CardSize {
    fn class(&self) -> &'static str {
        match self {
            CardSize::Sm => "flip-sm",
            CardSize::Md => "flip-md",
            CardSize::Lg => "flip-lg",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlipCardOptions {
    /// Identifies the card in page events (`data-card-id`).
    pub id: Option<String>,
    pub size: CardSize,
    pub glass: bool,
    /// Accessible name.
    pub title: Option<String>,
}

/// Compose the two faces into a focusable card.
pub fn render_flip_card(front: Markup, back: Markup, options: &FlipCardOptions, flipped: bool) -> Markup {
    let mut class = format!("flip-card {}", options.size.class());
    if options.glass {
        class.push_str(" glass");
    }
    if flipped {
        class.push_str(" is-flipped");
    }
    html! {
        article class=(class) tabindex="0" aria-label=[options.title.as_deref()] data-card-id=[options.id.as_deref()] {
            div.flip-card-inner aria-live="polite" {
                div.flip-card-front { (front) }
                div.flip-card-back { (back) }
            }
        }
    }
}

/// Interaction reaching a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipEvent {
    /// Click or tap. `no_flip` is set when the target sits inside an element
    /// marked `data-no-flip="true"`.
    Click { no_flip: bool },
    Key(Key),
}

/// Flip state of one rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipCard {
    flipped: bool,
}

impl FlipCard {
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Apply an event. Returns true when the face changed.
    pub fn handle(&mut self, event: FlipEvent) -> bool {
        let before = self.flipped;
        match event {
            FlipEvent::Click { no_flip: true } => {}
            FlipEvent::Click { no_flip: false } | FlipEvent::Key(Key::Enter | Key::Space) => {
                self.flipped = !self.flipped;
            }
            FlipEvent::Key(Key::Escape) => self.flipped = false,
            FlipEvent::Key(_) => {}
        }
        self.flipped != before
    }
}

/// Flip state of every card on a page, keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct FlipStates {
    cards: HashMap<String, FlipCard>,
}

impl FlipStates {
    pub fn is_flipped(&self, id: &str) -> bool {
        self.cards.get(id).is_some_and(FlipCard::is_flipped)
    }

    /// Route `event` to card `id`. Returns true when its face changed.
    pub fn handle(&mut self, id: &str, event: FlipEvent) -> bool {
        self.cards.entry(id.to_string()).or_default().handle(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_enter_and_space_toggle() {
        let mut card = FlipCard::default();
        assert!(card.handle(FlipEvent::Click { no_flip: false }));
        assert!(card.is_flipped());
        assert!(card.handle(FlipEvent::Key(Key::Enter)));
        assert!(!card.is_flipped());
        assert!(card.handle(FlipEvent::Key(Key::Space)));
        assert!(card.is_flipped());
    }

    #[test]
    fn no_flip_clicks_are_ignored() {
        let mut card = FlipCard::default();
        assert!(!card.handle(FlipEvent::Click { no_flip: true }));
        assert!(!card.is_flipped());
    }

    #[test]
    fn escape_only_unflips() {
        let mut card = FlipCard::default();
        assert!(!card.handle(FlipEvent::Key(Key::Escape)));
        card.handle(FlipEvent::Click { no_flip: false });
        assert!(card.handle(FlipEvent::Key(Key::Escape)));
        assert!(!card.is_flipped());
        assert!(!card.handle(FlipEvent::Key(Key::ArrowLeft)));
    }

    #[test]
    fn back_meta_joins_habitat_and_region() {
        let back = Back {
            paragraphs: vec!["Felino grande.".into()],
            habitat: Some("Selva".into()),
            region: Some("Darién".into()),
            actions: vec![Action::link("#/fauna/1", "Ver ficha")],
        };
        let html = build_back(&back).into_string();
        assert!(html.contains("Hábitat: Selva · Región: Darién"));
        assert!(html.contains(r##"<a href="#/fauna/1" class="btn" data-no-flip="true">Ver ficha</a>"##));
    }

    #[test]
    fn back_without_meta_or_actions() {
        let html = build_back(&Back::default()).into_string();
        assert!(!html.contains("flip-subtitle"));
        assert!(!html.contains("flip-actions"));
    }

    #[test]
    fn card_classes_follow_state() {
        let opts = FlipCardOptions {
            id: Some("fauna-7".into()),
            glass: true,
            title: Some("Jaguar".into()),
            ..Default::default()
        };
        let front = build_front(&Front {
            title: "Jaguar".into(),
            image: Some("j.jpg".into()),
            ..Default::default()
        });
        let html = render_flip_card(front.clone(), html! {}, &opts, false).into_string();
        assert!(html.contains(r#"class="flip-card flip-md glass""#));
        assert!(html.contains(r#"data-card-id="fauna-7""#));
        assert!(html.contains(r#"alt="Imagen de Jaguar""#));

        let flipped = render_flip_card(front, html! {}, &opts, true).into_string();
        assert!(flipped.contains("is-flipped"));
    }

    #[test]
    fn flip_states_track_cards_independently() {
        let mut states = FlipStates::default();
        assert!(states.handle("fauna-1", FlipEvent::Click { no_flip: false }));
        assert!(states.is_flipped("fauna-1"));
        assert!(!states.is_flipped("fauna-2"));
    }

    #[test]
    fn title_is_escaped() {
        let html = build_front(&Front {
            title: "<b>x</b>".into(),
            ..Default::default()
        })
        .into_string();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }
}
