//! Page chrome and shared fragments: document shell, header, footer,
//! loading, error and not-found blocks.

use crate::router::Router;
use maud::{DOCTYPE, Markup, html};

pub const SITE_TITLE: &str = "EcoAlbum Panamá";

const NAV_ITEMS: [(&str, &str, &str); 3] = [
    ("/", "Inicio", "🏠"),
    ("/fauna", "Fauna", "🦁"),
    ("/flora", "Flora", "🌿"),
];

/// `"true"` / `"false"` for ARIA and data attributes.
pub fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Full HTML document around `content`.
pub fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

/// Logo and section navigation, with the active section marked.
pub fn site_header(router: &Router) -> Markup {
    html! {
        header.header {
            div.header-container {
                a.header-logo href="#/" {
                    div.logo-icon { "🌿" }
                    div.logo-text {
                        p.logo-title { "EcoAlbum" }
                        p.logo-subtitle { "Panamá" }
                    }
                }
                nav.header-nav aria-label="Principal" {
                    ul.nav-list {
                        @for (path, label, icon) in NAV_ITEMS {
                            li.nav-item {
                                (router.link(path, &format!("{icon} {label}"), "nav-link"))
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn site_footer() -> Markup {
    html! {
        footer.footer {
            div.footer-content {
                p.footer-title { (SITE_TITLE) }
                p.footer-tagline { "Conservando nuestra biodiversidad" }
                ul.footer-links {
                    @for (path, label, _) in NAV_ITEMS {
                        li.footer-link-item {
                            a.footer-link href={ "#" (path) } { (label) }
                        }
                    }
                }
            }
        }
    }
}

pub fn loading(message: &str) -> Markup {
    html! {
        div.loader role="status" aria-live="polite" {
            span.loader-spinner {}
            p.loader-text { (message) }
        }
    }
}

/// Inline error with an optional retry button carrying `data-retry`.
pub fn error_message(message: &str, status: Option<u16>, retry: Option<&str>) -> Markup {
    html! {
        div.error-message.error-default role="alert" {
            div.error-content {
                h3.error-title { "Error" }
                p.error-message-text { (message) }
                @if let Some(status) = status {
                    p.error-status { "Código " (status) }
                }
            }
            @if let Some(region) = retry {
                button.error-retry-button type="button" aria-label="Reintentar" data-retry=(region) {
                    "Reintentar"
                }
            }
        }
    }
}

pub fn empty_state(message: &str) -> Markup {
    html! {
        div.empty-state {
            p { (message) }
        }
    }
}

pub fn not_found() -> Markup {
    html! {
        div.not-found {
            h1 { "404" }
            p { "Página no encontrada" }
            a href="#/" { "Volver al inicio" }
        }
    }
}
