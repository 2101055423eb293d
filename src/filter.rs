//! Client-side filtering of species lists.
//!
//! [`apply`] is a pure function: it keeps every record matching all supplied
//! predicates and preserves input order. Absent (or blank) fields match
//! everything, so an empty [`FilterSet`] returns the input unchanged. It is
//! re-run on every filter change; there is no incremental diffing.
//!
//! | Field | Predicate |
//! |-------|-----------|
//! | `query` | case-insensitive substring of common or scientific name |
//! | `category` | exact match against [`Filterable::category_key`] |
//! | `status` | bare codes (`"vu"`) match the bracketed `(VU)`; anything else is a case-insensitive substring |
//! | `letter` | first letter of the common name, case-insensitive |
//!
//! [`FilterBar`] holds the filter set behind the listing pages' search box,
//! selects and letter buttons.

use crate::conservation;
use crate::layout::bool_attr;
use crate::types::Species;
use maud::{Markup, html};

/// Fields the filter predicates read.
pub trait Filterable {
    fn common_name(&self) -> &str;

    fn scientific_name(&self) -> &str {
        ""
    }

    fn category_key(&self) -> Option<String> {
        None
    }

    fn status(&self) -> Option<&str> {
        None
    }
}

impl Filterable for Species {
    fn common_name(&self) -> &str {
        &self.common_name
    }

    fn scientific_name(&self) -> &str {
        &self.scientific_name
    }

    fn category_key(&self) -> Option<String> {
        Species::category_key(self)
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Active filters. `None` and blank strings are pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub query: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub letter: Option<char>,
}

impl FilterSet {
    /// True when no predicate would reject anything.
    pub fn is_empty(&self) -> bool {
        non_blank(&self.query).is_none()
            && non_blank(&self.category).is_none()
            && non_blank(&self.status).is_none()
            && self.letter.is_none()
    }

    /// Whether `record` satisfies every supplied predicate.
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        matches_query(record, non_blank(&self.query))
            && matches_category(record, non_blank(&self.category))
            && matches_status(record, non_blank(&self.status))
            && matches_letter(record, self.letter)
    }
}

/// Keep the records matching every predicate in `filters`, in input order.
pub fn apply<'a, T: Filterable>(records: &'a [T], filters: &FilterSet) -> Vec<&'a T> {
    records.iter().filter(|r| filters.matches(*r)).collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn matches_query<T: Filterable + ?Sized>(record: &T, query: Option<&str>) -> bool {
    let Some(query) = query else { return true };
    let needle = query.to_lowercase();
    record.common_name().to_lowercase().contains(&needle)
        || record.scientific_name().to_lowercase().contains(&needle)
}

fn matches_category<T: Filterable + ?Sized>(record: &T, category: Option<&str>) -> bool {
    let Some(category) = category else { return true };
    record.category_key().as_deref() == Some(category)
}

fn matches_status<T: Filterable + ?Sized>(record: &T, status: Option<&str>) -> bool {
    let Some(status) = status else { return true };
    let Some(record_status) = record.status() else {
        return false;
    };
    let needle = if conservation::is_bare_code(status) {
        format!("({})", status.to_lowercase())
    } else {
        status.to_lowercase()
    };
    record_status.to_lowercase().contains(&needle)
}

fn matches_letter<T: Filterable + ?Sized>(record: &T, letter: Option<char>) -> bool {
    let Some(letter) = letter else { return true };
    record
        .common_name()
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| first.to_lowercase().eq(letter.to_lowercase()))
}

// ============================================================================
// Filter bar
// ============================================================================

/// One `<option>` of a filter select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// User input on the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Search box text.
    Query(String),
    /// Category select value; empty selects "all".
    Category(String),
    /// Status select value; empty selects "all".
    Status(String),
    /// Letter button; `None` is "Todas".
    Letter(Option<char>),
    /// "Limpiar filtros".
    Reset,
}

/// State behind a listing page's filter bar.
#[derive(Debug, Clone)]
pub struct FilterBar {
    filters: FilterSet,
    categories: Vec<FilterOption>,
    statuses: Vec<FilterOption>,
}

impl Default for FilterBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBar {
    /// A bar with the known conservation statuses and no categories yet.
    /// Status options carry the bare code as their value (`"vu"`), so the
    /// selection matches whatever wording the API uses for the label.
    pub fn new() -> Self {
        Self {
            filters: FilterSet::default(),
            categories: Vec::new(),
            statuses: conservation::STATUSES
                .iter()
                .map(|s| {
                    let value = conservation::status_code(s).unwrap_or_else(|| s.to_string());
                    FilterOption::new(value, *s)
                })
                .collect(),
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn categories(&self) -> &[FilterOption] {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Vec<FilterOption>) {
        self.categories = categories;
    }

    /// Apply one input event and return the resulting filter set.
    pub fn apply(&mut self, event: FilterEvent) -> &FilterSet {
        let to_option = |s: String| Some(s).filter(|v| !v.trim().is_empty());
        match event {
            FilterEvent::Query(q) => self.filters.query = to_option(q),
            FilterEvent::Category(c) => self.filters.category = to_option(c),
            FilterEvent::Status(s) => self.filters.status = to_option(s),
            FilterEvent::Letter(l) => self.filters.letter = l.map(|c| c.to_ascii_uppercase()),
            FilterEvent::Reset => self.filters = FilterSet::default(),
        }
        &self.filters
    }

    /// Renders search input, category and status selects, letter buttons and
    /// the reset button.
    pub fn render(&self) -> Markup {
        let query = self.filters.query.as_deref().unwrap_or("");
        let category = self.filters.category.as_deref().unwrap_or("");
        let status = self.filters.status.as_deref().unwrap_or("");
        let letter = self.filters.letter;

        html! {
            div.filter-bar {
                div.filter-bar-content {
                    div.filter-group.filter-search {
                        input.filter-input #search-input type="search"
                            placeholder="Buscar especie..." aria-label="Buscar" value=(query);
                    }
                    div.filter-group.filter-category {
                        select.filter-select #category-filter aria-label="Filtrar por categoría" {
                            option value="" selected[category.is_empty()] { "Todas las categorías" }
                            @for opt in &self.categories {
                                option value=(opt.value) selected[opt.value == category] { (opt.label) }
                            }
                        }
                    }
                    div.filter-group.filter-status {
                        select.filter-select #status-filter aria-label="Filtrar por estado" {
                            option value="" selected[status.is_empty()] { "Todos los estados" }
                            @for opt in &self.statuses {
                                option value=(opt.value) selected[opt.value == status] { (opt.label) }
                            }
                        }
                    }
                    div.filter-group.filter-letters role="tablist" aria-label="Filtrar por letra" {
                        button.filter-letter.active[letter.is_none()] type="button" data-letter=""
                            aria-pressed=(bool_attr(letter.is_none())) { "Todas" }
                        @for l in 'A'..='Z' {
                            @let active = letter == Some(l);
                            button.filter-letter.active[active] type="button" data-letter=(l)
                                aria-pressed=(bool_attr(active)) { (l) }
                        }
                    }
                    button.filter-reset #reset-filters type="button" { "Limpiar filtros" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Rec {
        name: &'static str,
        sci: &'static str,
        cat: Option<&'static str>,
        status: Option<&'static str>,
    }

    impl Filterable for Rec {
        fn common_name(&self) -> &str {
            self.name
        }
        fn scientific_name(&self) -> &str {
            self.sci
        }
        fn category_key(&self) -> Option<String> {
            self.cat.map(String::from)
        }
        fn status(&self) -> Option<&str> {
            self.status
        }
    }

    fn rec(name: &'static str, sci: &'static str, cat: &'static str, status: &'static str) -> Rec {
        Rec {
            name,
            sci,
            cat: Some(cat),
            status: Some(status),
        }
    }

    fn sample() -> Vec<Rec> {
        vec![
            rec("Jaguar", "Panthera onca", "2", "Casi amenazada (NT)"),
            rec("Tucán pico iris", "Ramphastos sulfuratus", "1", "Preocupación menor (LC)"),
            rec("Perezoso", "Bradypus variegatus", "2", "Preocupación menor (LC)"),
            rec("Tortuga carey", "Eretmochelys imbricata", "3", "En peligro crítico (CR)"),
            rec("Águila harpía", "Harpia harpyja", "1", "Vulnerable (VU)"),
        ]
    }

    fn names(result: &[&Rec]) -> Vec<&'static str> {
        result.iter().map(|r| r.name).collect()
    }

    #[test]
    fn status_code_matches_bracketed_code_only() {
        let records = vec![
            Rec {
                name: "a",
                sci: "",
                cat: None,
                status: Some("Vulnerable (VU)"),
            },
            Rec {
                name: "b",
                sci: "",
                cat: None,
                status: Some("En peligro (EN)"),
            },
        ];
        let filters = FilterSet {
            status: Some("vu".into()),
            ..Default::default()
        };
        let result = apply(&records, &filters);
        assert_eq!(result, vec![&records[0]]);
    }

    #[test]
    fn code_does_not_match_label_text() {
        // "amenazada" contains "en" but the code is NT.
        let records = sample();
        let filters = FilterSet {
            status: Some("EN".into()),
            ..Default::default()
        };
        assert!(apply(&records, &filters).is_empty());
    }

    #[test]
    fn full_status_label_matches() {
        let records = sample();
        let filters = FilterSet {
            status: Some("preocupación menor (lc)".into()),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &filters)), vec!["Tucán pico iris", "Perezoso"]);
    }

    #[test]
    fn record_without_status_fails_status_filter() {
        let records = vec![Rec {
            name: "x",
            sci: "",
            cat: None,
            status: None,
        }];
        let filters = FilterSet {
            status: Some("lc".into()),
            ..Default::default()
        };
        assert!(apply(&records, &filters).is_empty());
    }

    #[test]
    fn empty_filter_set_is_identity() {
        let records = sample();
        let filters = FilterSet {
            query: Some("   ".into()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        let result = apply(&records, &filters);
        assert_eq!(result.len(), records.len());
        for (kept, original) in result.iter().zip(&records) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn query_matches_common_or_scientific_name_case_insensitively() {
        let records = sample();
        let by_common = FilterSet {
            query: Some("JAGU".into()),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &by_common)), vec!["Jaguar"]);

        let by_scientific = FilterSet {
            query: Some("harpyja".into()),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &by_scientific)), vec!["Águila harpía"]);
    }

    #[test]
    fn category_is_exact() {
        let records = sample();
        let filters = FilterSet {
            category: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &filters)), vec!["Jaguar", "Perezoso"]);

        let partial = FilterSet {
            category: Some("".into()),
            ..Default::default()
        };
        assert_eq!(apply(&records, &partial).len(), 5);
    }

    #[test]
    fn letter_is_case_insensitive_first_letter() {
        let records = sample();
        let filters = FilterSet {
            letter: Some('t'),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &filters)), vec!["Tucán pico iris", "Tortuga carey"]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = sample();
        let filters = FilterSet {
            category: Some("1".into()),
            status: Some("vu".into()),
            ..Default::default()
        };
        assert_eq!(names(&apply(&records, &filters)), vec!["Águila harpía"]);
    }

    #[test]
    fn result_is_ordered_subset_for_every_single_predicate() {
        let records = sample();
        let sets = [
            FilterSet {
                query: Some("a".into()),
                ..Default::default()
            },
            FilterSet {
                category: Some("1".into()),
                ..Default::default()
            },
            FilterSet {
                status: Some("lc".into()),
                ..Default::default()
            },
            FilterSet {
                letter: Some('P'),
                ..Default::default()
            },
        ];
        for filters in &sets {
            let result = apply(&records, filters);
            let mut cursor = 0;
            for kept in result {
                let pos = records[cursor..]
                    .iter()
                    .position(|r| std::ptr::eq(r, kept))
                    .expect("result must be a subsequence of the input");
                cursor += pos + 1;
            }
        }
    }

    #[test]
    fn bar_events_update_filters() {
        let mut bar = FilterBar::new();
        bar.apply(FilterEvent::Query("tuc".into()));
        bar.apply(FilterEvent::Status("Vulnerable (VU)".into()));
        bar.apply(FilterEvent::Letter(Some('t')));
        assert_eq!(bar.filters().query.as_deref(), Some("tuc"));
        assert_eq!(bar.filters().letter, Some('T'));

        bar.apply(FilterEvent::Status(String::new()));
        assert_eq!(bar.filters().status, None);

        let after_reset = bar.apply(FilterEvent::Reset).clone();
        assert!(after_reset.is_empty());
    }

    #[test]
    fn bar_renders_selected_state() {
        let mut bar = FilterBar::new();
        bar.set_categories(vec![
            FilterOption::new("1", "Aves"),
            FilterOption::new("2", "Mamíferos"),
        ]);
        bar.apply(FilterEvent::Category("2".into()));
        bar.apply(FilterEvent::Letter(Some('J')));
        let html = bar.render().into_string();

        assert!(html.contains(r#"<option value="2" selected>Mamíferos</option>"#));
        assert!(html.contains(r#"data-letter="J" aria-pressed="true""#));
        assert!(html.contains("Limpiar filtros"));
        assert!(html.contains("Vulnerable (VU)"));
    }

    #[test]
    fn status_options_select_by_code() {
        let mut bar = FilterBar::new();
        let html = bar.render().into_string();
        assert!(html.contains(r#"<option value="nt">Casi amenazada (NT)</option>"#));

        bar.apply(FilterEvent::Status("nt".into()));
        let records = vec![
            rec("Rana", "Agalychnis callidryas", "4", "Casi amenazado (NT)"),
            rec("Tapir", "Tapirus bairdii", "2", "En peligro (EN)"),
        ];
        assert_eq!(names(&apply(&records, bar.filters())), vec!["Rana"]);
        assert!(bar
            .render()
            .into_string()
            .contains(r#"<option value="nt" selected>Casi amenazada (NT)</option>"#));
    }

    #[test]
    fn bar_escapes_query_text() {
        let mut bar = FilterBar::new();
        bar.apply(FilterEvent::Query(r#""><script>"#.into()));
        let html = bar.render().into_string();
        assert!(!html.contains("<script>"));
    }
}
