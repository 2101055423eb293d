//! Hash router.
//!
//! A [`Router`] holds an ordered route table and the currently active match.
//! Patterns are `/`-separated literals with `:name` parameter segments:
//!
//! - `"#/fauna/7"` → `/fauna/:id` with `id = "7"`
//! - `"#/fauna/"` → `/fauna` (trailing slash ignored)
//! - `""` or `"#"` → `/`
//! - `"#/plantas"` → no match

use maud::{Markup, html};
use std::collections::BTreeMap;

/// Pages the application can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageId {
    Home,
    FaunaList,
    FaunaDetail,
    FloraList,
    FloraDetail,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    segments: Vec<Segment>,
    page: PageId,
}

/// A resolved path: the page to mount and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: PageId,
    /// Normalized path, e.g. `/fauna/7`.
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The `:id` parameter as a number.
    pub fn id(&self) -> Option<u64> {
        self.param("id")?.parse().ok()
    }
}

/// Strip the leading `#`, ensure a leading `/`, drop trailing slashes.
pub fn normalize(hash: &str) -> String {
    let path = hash.trim().trim_start_matches('#');
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    active: Option<RouteMatch>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's route table.
    pub fn standard() -> Self {
        Self::new()
            .route("/", PageId::Home)
            .route("/fauna", PageId::FaunaList)
            .route("/fauna/:id", PageId::FaunaDetail)
            .route("/flora", PageId::FloraList)
            .route("/flora/:id", PageId::FloraDetail)
    }

    /// Append a route. Earlier routes win.
    pub fn route(mut self, pattern: &str, page: PageId) -> Self {
        let segments = split(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        self.routes.push(Route { segments, page });
        self
    }

    /// Match `hash` against the table without changing the active route.
    pub fn matches(&self, hash: &str) -> Option<RouteMatch> {
        let path = normalize(hash);
        let parts: Vec<&str> = split(&path).collect();
        self.routes.iter().find_map(|route| {
            if route.segments.len() != parts.len() {
                return None;
            }
            let mut params = BTreeMap::new();
            for (segment, part) in route.segments.iter().zip(&parts) {
                match segment {
                    Segment::Literal(lit) if lit == part => {}
                    Segment::Literal(_) => return None,
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*part).to_string());
                    }
                }
            }
            Some(RouteMatch {
                page: route.page,
                path: path.clone(),
                params,
            })
        })
    }

    /// Match `hash` and make the result the active route. An unmatched path
    /// clears the active route.
    pub fn resolve(&mut self, hash: &str) -> Option<&RouteMatch> {
        self.active = self.matches(hash);
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&RouteMatch> {
        self.active.as_ref()
    }

    /// Whether a link to `path` should be marked active. `/` only matches
    /// itself; other paths also match their sub-paths.
    pub fn is_active(&self, path: &str) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let target = normalize(path);
        active.path == target
            || (target != "/" && active.path.starts_with(&format!("{target}/")))
    }

    /// Hash link with `active` appended to `class` when it points at the
    /// active route.
    pub fn link(&self, path: &str, label: &str, class: &str) -> Markup {
        let mut classes = class.to_string();
        if self.is_active(path) {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str("active");
        }
        html! {
            a href={ "#" (normalize(path)) } class=[(!classes.is_empty()).then_some(classes)]
                aria-current=[self.is_active(path).then_some("page")] { (label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_hashes() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("#"), "/");
        assert_eq!(normalize("#/"), "/");
        assert_eq!(normalize("#/fauna/"), "/fauna");
        assert_eq!(normalize("flora"), "/flora");
    }

    #[test]
    fn resolves_standard_routes() {
        let mut router = Router::standard();
        assert_eq!(router.resolve("").map(|m| m.page), Some(PageId::Home));
        assert_eq!(router.resolve("#/fauna/").map(|m| m.page), Some(PageId::FaunaList));

        let m = router.resolve("#/flora/12").cloned().unwrap();
        assert_eq!(m.page, PageId::FloraDetail);
        assert_eq!(m.id(), Some(12));
        assert_eq!(router.active(), Some(&m));
    }

    #[test]
    fn unmatched_clears_active() {
        let mut router = Router::standard();
        router.resolve("#/fauna");
        assert!(router.resolve("#/fauna/1/fotos").is_none());
        assert!(router.active().is_none());
    }

    #[test]
    fn non_numeric_id_matches_but_has_no_id() {
        let router = Router::standard();
        let m = router.matches("#/fauna/jaguar").unwrap();
        assert_eq!(m.param("id"), Some("jaguar"));
        assert_eq!(m.id(), None);
    }

    #[test]
    fn links_mark_active_section() {
        let mut router = Router::standard();
        router.resolve("#/fauna/3");
        let fauna = router.link("/fauna", "Fauna", "nav-link").into_string();
        assert_eq!(
            fauna,
            r##"<a href="#/fauna" class="nav-link active" aria-current="page">Fauna</a>"##
        );
        let home = router.link("/", "Inicio", "").into_string();
        assert_eq!(home, r##"<a href="#/">Inicio</a>"##);
    }
}
