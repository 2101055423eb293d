//! Slide items and the stock renderers for news, gallery and photo carousels.

use super::engine::SlideRenderer;
use crate::types::{GalleryPhoto, Photo, SpeciesKind};
use maud::{Markup, html};

/// What a slide shows. The engine never looks inside; renderers do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideItem {
    pub cover: String,
    pub title: String,
    pub caption: Option<String>,
    pub excerpt: Option<String>,
    pub href: String,
    pub tag: Option<String>,
    /// Preformatted publication date.
    pub date: Option<String>,
}

impl SlideItem {
    /// News slide for a featured photo.
    pub fn news(photo: &GalleryPhoto) -> Self {
        let tag = match photo.kind {
            SpeciesKind::Fauna => "🦁 Fauna",
            SpeciesKind::Flora => "🌿 Flora",
        };
        Self {
            cover: photo.url.clone(),
            title: photo.name.clone(),
            excerpt: Some(
                non_empty(photo.description.as_deref())
                    .unwrap_or("Especie destacada")
                    .to_string(),
            ),
            href: photo.detail_href(),
            tag: Some(tag.to_string()),
            ..Default::default()
        }
    }

    /// Gallery slide for a random photo.
    pub fn gallery(photo: &GalleryPhoto) -> Self {
        Self {
            cover: photo.url.clone(),
            title: photo.name.clone(),
            caption: non_empty(photo.description.as_deref())
                .or(non_empty(photo.scientific_name.as_deref()))
                .map(String::from),
            href: photo.detail_href(),
            ..Default::default()
        }
    }

    /// Photo slide on a species detail page.
    pub fn photo(photo: &Photo, species_name: &str) -> Self {
        Self {
            cover: photo.url.clone(),
            title: species_name.to_string(),
            caption: non_empty(photo.description.as_deref()).map(String::from),
            href: photo.url.clone(),
            ..Default::default()
        }
    }

    fn alt(&self) -> String {
        if self.title.is_empty() {
            "Imagen".to_string()
        } else {
            format!("Imagen: {}", self.title)
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn position_label(index: usize, count: usize) -> String {
    format!("{} de {}", index + 1, count)
}

/// Featured news: tag badge, date, excerpt and a "Leer más" link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsSlides;

impl SlideRenderer<SlideItem> for NewsSlides {
    fn render_slide(&self, item: &SlideItem, index: usize, count: usize) -> Markup {
        html! {
            article.carousel-slide role="group" aria-label=(position_label(index, count)) {
                img.carousel-cover src=(item.cover) alt=(item.alt()) loading="lazy";
                div.carousel-body {
                    @if let Some(tag) = &item.tag {
                        span.badge { span.badge-dot {} (tag) }
                    }
                    h3.carousel-title { (item.title) }
                    @if let Some(date) = &item.date {
                        p.carousel-subtitle { (date) }
                    }
                    @if let Some(excerpt) = &item.excerpt {
                        p { (excerpt) }
                    }
                    div.carousel-actions {
                        a.btn href=(item.href) { "Leer más" }
                    }
                }
            }
        }
    }

    fn dot_label(&self, index: usize) -> String {
        format!("Noticia {}", index + 1)
    }
}

/// Photo gallery: linked cover with "Abrir" and "Descargar" actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct GallerySlides;

impl SlideRenderer<SlideItem> for GallerySlides {
    fn render_slide(&self, item: &SlideItem, index: usize, count: usize) -> Markup {
        html! {
            article.carousel-slide role="group" aria-label=(position_label(index, count)) {
                a.media-link href=(item.href) {
                    img.carousel-cover src=(item.cover) alt=(item.alt()) loading="lazy";
                }
                div.carousel-body {
                    h3.carousel-title { (item.title) }
                    @if let Some(caption) = &item.caption {
                        p.carousel-subtitle { (caption) }
                    }
                    div.carousel-actions {
                        a.btn href=(item.href) data-no-flip="true" { "Abrir" }
                        a.btn.btn-outline href=(item.cover) download data-no-flip="true" { "Descargar" }
                    }
                }
            }
        }
    }

    fn dot_label(&self, index: usize) -> String {
        format!("Imagen {}", index + 1)
    }
}

/// Species photos on a detail page: image and optional caption only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoSlides;

impl SlideRenderer<SlideItem> for PhotoSlides {
    fn render_slide(&self, item: &SlideItem, index: usize, count: usize) -> Markup {
        html! {
            figure.carousel-slide.photo-slide role="group" aria-label=(position_label(index, count)) {
                img.carousel-cover src=(item.cover) alt=(item.alt()) loading="lazy";
                @if let Some(caption) = &item.caption {
                    figcaption.carousel-subtitle { (caption) }
                }
            }
        }
    }

    fn dot_label(&self, index: usize) -> String {
        format!("Foto {}", index + 1)
    }
}
