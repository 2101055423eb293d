//! Looping carousel state machine.
//!
//! A carousel over `count` items renders `count + 2` slots: a clone of the
//! last item, the originals, and a clone of the first. `index` is the real
//! item shown (`0..count`); `position` is the slot under the viewport
//! (`0..=count + 1`). At rest `position == index + 1`. An animated
//! [`Carousel::advance`] may land on a clone slot; [`Carousel::on_transition_end`]
//! then jumps, unanimated, to the matching original so the loop never shows
//! a seam.
//!
//! While a transition is in flight, `advance` and `go_to` are rejected, not
//! queued. Nothing here reads a clock: the async driver (or a test) calls
//! `on_transition_end` and feeds time through `tick`.

use super::autoplay::Autoplay;
use super::gesture::{self, DragEffect, DragState, PointerEvent, SwipeIntent};
use crate::input::Key;
use crate::layout::bool_attr;
use maud::{Markup, html};
use std::time::Duration;
use tracing::{debug, warn};

/// Renders one item into a slide. Clones are rendered by the same call.
pub trait SlideRenderer<T>: Send + Sync {
    fn render_slide(&self, item: &T, index: usize, count: usize) -> Markup;

    fn dot_label(&self, index: usize) -> String {
        format!("Slide {}", index + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Presentation and timing options.
#[derive(Debug, Clone, Default)]
pub struct CarouselOptions {
    /// Autoplay period; `None` disables autoplay.
    pub autoplay: Option<Duration>,
    /// Adds the `glass` class for the translucent variant.
    pub glass: bool,
    /// Accessible name of the carousel region.
    pub label: Option<String>,
}

pub struct CarouselBuilder<T> {
    items: Vec<T>,
    renderer: Option<Box<dyn SlideRenderer<T>>>,
    options: CarouselOptions,
}

impl<T> CarouselBuilder<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            renderer: None,
            options: CarouselOptions::default(),
        }
    }

    pub fn renderer(mut self, renderer: impl SlideRenderer<T> + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn options(mut self, options: CarouselOptions) -> Self {
        self.options = options;
        self
    }

    pub fn autoplay(mut self, interval: Duration) -> Self {
        self.options.autoplay = Some(interval);
        self
    }

    pub fn glass(mut self, glass: bool) -> Self {
        self.options.glass = glass;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Build the carousel. Returns `None`, with a warning, when there are no
    /// items or no renderer.
    pub fn build(self) -> Option<Carousel<T>> {
        let Some(renderer) = self.renderer else {
            warn!("carousel not built: no slide renderer supplied");
            return None;
        };
        if self.items.is_empty() {
            warn!("carousel not built: no items");
            return None;
        }
        let autoplay = match self.options.autoplay {
            Some(interval) => Autoplay::every(interval),
            None => Autoplay::disabled(),
        };
        Some(Carousel {
            items: self.items,
            renderer,
            glass: self.options.glass,
            label: self.options.label,
            index: 0,
            position: 1,
            animate: false,
            transitioning: false,
            drag: DragState::Idle,
            drag_offset_pct: 0.0,
            autoplay,
        })
    }
}

pub struct Carousel<T> {
    items: Vec<T>,
    renderer: Box<dyn SlideRenderer<T>>,
    glass: bool,
    label: Option<String>,
    index: usize,
    position: usize,
    animate: bool,
    transitioning: bool,
    drag: DragState,
    drag_offset_pct: f64,
    autoplay: Autoplay,
}

impl<T> std::fmt::Debug for Carousel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("count", &self.items.len())
            .field("index", &self.index)
            .field("position", &self.position)
            .field("transitioning", &self.transitioning)
            .field("autoplay", &self.autoplay)
            .finish_non_exhaustive()
    }
}

impl<T> Carousel<T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Real index of the current item.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Slot under the viewport, counting the leading clone as 0.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Whether the last position change should animate.
    pub fn is_animated(&self) -> bool {
        self.animate
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    /// Horizontal translation of the slide track, in percent of one slide.
    pub fn offset_percent(&self) -> f64 {
        -100.0 * self.position as f64 + self.drag_offset_pct
    }

    /// Start an animated move by one slot. Rejected while transitioning.
    pub fn advance(&mut self, direction: Direction) -> bool {
        if self.transitioning {
            debug!(?direction, "carousel busy, advance dropped");
            return false;
        }
        self.position = match direction {
            Direction::Previous => self.position - 1,
            Direction::Next => self.position + 1,
        };
        self.animate = true;
        self.transitioning = true;
        self.drag_offset_pct = 0.0;
        true
    }

    /// Finish the in-flight transition, unwrapping clone slots.
    pub fn on_transition_end(&mut self) {
        if !self.transitioning {
            return;
        }
        self.transitioning = false;
        let count = self.count();
        if self.position == 0 {
            self.settle(count - 1);
        } else if self.position == count + 1 {
            self.settle(0);
        } else {
            self.index = self.position - 1;
        }
    }

    fn settle(&mut self, index: usize) {
        self.index = index;
        self.position = index + 1;
        self.animate = false;
    }

    /// Jump to `target mod count`. Negative targets wrap from the end.
    /// Rejected while transitioning.
    pub fn go_to(&mut self, target: isize, animate: bool) -> bool {
        if self.transitioning {
            debug!(target, "carousel busy, go_to dropped");
            return false;
        }
        let count = self.count() as isize;
        self.index = target.rem_euclid(count) as usize;
        self.position = self.index + 1;
        self.animate = animate;
        self.drag_offset_pct = 0.0;
        true
    }

    /// Feed elapsed time to the autoplay clock. Returns the number of slides
    /// actually advanced; firings during a transition are dropped.
    pub fn tick(&mut self, dt: Duration) -> usize {
        let fired = self.autoplay.tick(dt);
        (0..fired).filter(|_| self.advance(Direction::Next)).count()
    }

    /// Apply a pointer event. `width` is the carousel's current pixel width.
    pub fn pointer(&mut self, event: PointerEvent, width: f64) {
        let (drag, effect) = gesture::step(self.drag, event, width);
        self.drag = drag;
        match effect {
            DragEffect::None => {}
            DragEffect::Preview { offset_px } => {
                self.animate = false;
                self.drag_offset_pct = if width > 0.0 {
                    offset_px / width * 100.0
                } else {
                    0.0
                };
            }
            DragEffect::Release(intent) => {
                self.drag_offset_pct = 0.0;
                match intent {
                    SwipeIntent::Previous => {
                        self.advance(Direction::Previous);
                    }
                    SwipeIntent::Next => {
                        self.advance(Direction::Next);
                    }
                    SwipeIntent::SnapBack => {
                        self.go_to(self.index as isize, true);
                    }
                }
            }
        }
    }

    /// Arrow keys navigate when the carousel or a descendant has focus.
    /// Returns true when the key was consumed.
    pub fn key(&mut self, key: Key, focused: bool) -> bool {
        if !focused {
            return false;
        }
        match key {
            Key::ArrowLeft => self.advance(Direction::Previous),
            Key::ArrowRight => self.advance(Direction::Next),
            _ => false,
        }
    }

    pub fn hover_enter(&mut self) {
        self.autoplay.hover_enter();
    }

    pub fn hover_leave(&mut self) {
        self.autoplay.hover_leave();
    }

    /// Toggle the explicit pause. Returns true when now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.autoplay.toggle_pause()
    }

    /// Stop autoplay for good.
    pub fn dispose(&mut self) {
        self.autoplay.dispose();
    }

    pub fn render(&self) -> Markup {
        let count = self.count();
        let slots = std::iter::once((count - 1, true))
            .chain((0..count).map(|i| (i, false)))
            .chain(std::iter::once((0, true)));
        let style = format!("--x: {}%", self.offset_percent());

        html! {
            section.carousel.glass[self.glass] role="region" aria-roledescription="carrusel"
                aria-label=[self.label.as_deref()] tabindex="0"
                data-index=(self.index) data-dragging=(bool_attr(self.is_dragging())) style=(style) {
                div.carousel-inner {
                    div.carousel-viewport.is-animating[self.animate] aria-live="polite" {
                        @for (i, clone) in slots {
                            div.carousel-slot.carousel-clone[clone]
                                aria-hidden=[clone.then_some("true")] inert[clone] {
                                (self.renderer.render_slide(&self.items[i], i, count))
                            }
                        }
                    }
                    div.carousel-nav {
                        button.carousel-btn.carousel-btn-prev type="button" aria-label="Anterior" data-action="prev" { "‹" }
                        button.carousel-btn.carousel-btn-next type="button" aria-label="Siguiente" data-action="next" { "›" }
                    }
                }
                div.carousel-dots role="tablist" aria-label="Paginación" {
                    @for i in 0..count {
                        @let current = bool_attr(i == self.index);
                        button.carousel-dot type="button" role="tab"
                            aria-label=(self.renderer.dot_label(i))
                            aria-current=(current) aria-selected=(current) data-goto=(i) {}
                    }
                }
                @if self.autoplay.is_enabled() {
                    button.carousel-pause.btn.btn-outline type="button" data-pause="true" data-no-flip="true"
                        aria-pressed=(bool_attr(self.autoplay.is_user_paused())) {
                        (self.autoplay.pause_label())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;

    struct Plain;

    impl SlideRenderer<&'static str> for Plain {
        fn render_slide(&self, item: &&'static str, index: usize, count: usize) -> Markup {
            html! { article.slide aria-label=(format!("{} de {}", index + 1, count)) { (item) } }
        }
    }

    fn carousel(n: usize) -> Carousel<&'static str> {
        const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];
        CarouselBuilder::new(NAMES[..n].to_vec())
            .renderer(Plain)
            .build()
            .unwrap()
    }

    fn step(c: &mut Carousel<&'static str>, dir: Direction) {
        assert!(c.advance(dir));
        c.on_transition_end();
    }

    #[test]
    fn starts_on_first_original_unanimated() {
        let c = carousel(3);
        assert_eq!((c.index(), c.position()), (0, 1));
        assert!(!c.is_animated());
        assert_eq!(c.offset_percent(), -100.0);
    }

    #[test]
    fn empty_items_or_missing_renderer_build_nothing() {
        assert!(
            CarouselBuilder::<&str>::new(vec![])
                .renderer(Plain)
                .build()
                .is_none()
        );
        assert!(CarouselBuilder::new(vec!["a"]).build().is_none());
    }

    #[test]
    fn advance_rejected_while_transitioning() {
        let mut c = carousel(3);
        assert!(c.advance(Direction::Next));
        assert!(!c.advance(Direction::Next));
        assert!(!c.go_to(2, false));
        c.on_transition_end();
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn previous_from_first_unwraps_to_last() {
        let mut c = carousel(4);
        assert!(c.advance(Direction::Previous));
        assert_eq!(c.position(), 0);
        c.on_transition_end();
        assert_eq!((c.index(), c.position()), (3, 4));
        assert!(!c.is_animated());
    }

    #[test]
    fn next_from_last_unwraps_to_first() {
        let mut c = carousel(4);
        assert!(c.go_to(3, false));
        step(&mut c, Direction::Next);
        assert_eq!((c.index(), c.position()), (0, 1));
        assert!(!c.is_animated());
    }

    #[test]
    fn count_advances_return_to_start() {
        for n in 1..=6 {
            let mut c = carousel(n);
            for _ in 0..n {
                step(&mut c, Direction::Next);
                assert!(c.index() < n);
            }
            assert_eq!(c.index(), 0, "n={n}");
            for _ in 0..n {
                step(&mut c, Direction::Previous);
                assert!(c.index() < n);
            }
            assert_eq!(c.index(), 0, "n={n}");
        }
    }

    #[test]
    fn single_slide_loops() {
        let mut c = carousel(1);
        step(&mut c, Direction::Next);
        assert_eq!((c.index(), c.position()), (0, 1));
        step(&mut c, Direction::Previous);
        assert_eq!((c.index(), c.position()), (0, 1));
    }

    #[test]
    fn go_to_wraps_modulo_count() {
        let mut c = carousel(5);
        assert!(c.go_to(7, true));
        assert_eq!(c.index(), 2);
        assert!(c.go_to(-1, false));
        assert_eq!(c.index(), 4);
        assert_eq!(c.position(), 5);
    }

    #[test]
    fn autoplay_three_ticks_on_five_slides() {
        let mut c = CarouselBuilder::new(vec!["a", "b", "c", "d", "e"])
            .renderer(Plain)
            .autoplay(Duration::from_millis(5000))
            .build()
            .unwrap();
        for _ in 0..3 {
            assert_eq!(c.tick(Duration::from_millis(5000)), 1);
            c.on_transition_end();
        }
        assert_eq!(c.index(), 3);
    }

    #[test]
    fn autoplay_firing_during_transition_is_dropped() {
        let mut c = CarouselBuilder::new(vec!["a", "b", "c"])
            .renderer(Plain)
            .autoplay(Duration::from_secs(1))
            .build()
            .unwrap();
        c.advance(Direction::Next);
        assert_eq!(c.tick(Duration::from_secs(1)), 0);
        c.on_transition_end();
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn hover_pauses_autoplay() {
        let mut c = CarouselBuilder::new(vec!["a", "b"])
            .renderer(Plain)
            .autoplay(Duration::from_secs(1))
            .build()
            .unwrap();
        c.hover_enter();
        assert_eq!(c.tick(Duration::from_secs(3)), 0);
        c.hover_leave();
        assert_eq!(c.tick(Duration::from_secs(1)), 1);
    }

    fn drag(c: &mut Carousel<&'static str>, dx: f64, width: f64) {
        c.pointer(
            PointerEvent::Down {
                x: 200.0,
                kind: PointerKind::Touch,
            },
            width,
        );
        c.pointer(PointerEvent::Move { x: 200.0 + dx }, width);
        c.pointer(PointerEvent::Up, width);
    }

    #[test]
    fn short_drag_keeps_index() {
        let mut c = carousel(3);
        c.go_to(1, false);
        drag(&mut c, -50.0, 400.0);
        assert!(!c.is_transitioning());
        assert_eq!(c.index(), 1);
        assert!(c.is_animated());
        assert_eq!(c.offset_percent(), -200.0);
    }

    #[test]
    fn long_drag_moves_one_slide() {
        let mut c = carousel(3);
        c.go_to(1, false);
        drag(&mut c, -100.0, 400.0);
        c.on_transition_end();
        assert_eq!(c.index(), 2);

        drag(&mut c, 100.0, 400.0);
        c.on_transition_end();
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn drag_preview_offsets_track() {
        let mut c = carousel(3);
        c.pointer(
            PointerEvent::Down {
                x: 100.0,
                kind: PointerKind::Mouse,
            },
            400.0,
        );
        c.pointer(PointerEvent::Move { x: 200.0 }, 400.0);
        assert!(c.is_dragging());
        assert_eq!(c.offset_percent(), -75.0);
    }

    #[test]
    fn arrow_keys_need_focus() {
        let mut c = carousel(3);
        assert!(!c.key(Key::ArrowRight, false));
        assert!(!c.key(Key::Escape, true));
        assert!(c.key(Key::ArrowRight, true));
        c.on_transition_end();
        assert_eq!(c.index(), 1);
        assert!(c.key(Key::ArrowLeft, true));
        c.on_transition_end();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn renders_clones_and_dots() {
        let mut c = carousel(3);
        c.go_to(1, false);
        let html = c.render().into_string();
        assert_eq!(html.matches("carousel-slot").count(), 5);
        assert_eq!(html.matches(r#"aria-hidden="true" inert"#).count(), 2);
        assert_eq!(html.matches(r#"role="tab""#).count(), 3);
        assert!(html.contains(r#"aria-label="Slide 2" aria-current="true""#));
        assert!(html.contains(r#"aria-label="Anterior""#));
        assert!(!html.contains("data-pause"));
    }

    #[test]
    fn pause_control_reflects_state() {
        let mut c = CarouselBuilder::new(vec!["a", "b"])
            .renderer(Plain)
            .autoplay(Duration::from_secs(5))
            .glass(true)
            .label("Noticias")
            .build()
            .unwrap();
        assert!(c.render().into_string().contains(">Pausar</button>"));
        assert!(c.toggle_pause());
        let html = c.render().into_string();
        assert!(html.contains(">Reanudar</button>"));
        assert!(html.contains(r#"class="carousel glass""#));
        assert!(html.contains(r#"aria-label="Noticias""#));
    }
}
