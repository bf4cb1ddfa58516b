//! Category filter: option derivation, visible-subset projection and
//! selection consistency.
//!
//! Everything here is a pure function of the loaded articles and the selected
//! category. Nothing is cached; callers recompute on every read.

use crate::feed::Article;
use std::collections::BTreeSet;

/// Filter value meaning "no filtering".
pub const ALL_CATEGORIES: &str = "Todos";

/// Category list used by the fixed-category mode when the config does not
/// provide one.
pub const DEFAULT_FIXED_CATEGORIES: &[&str] = &[
    "Grãos",
    "Pecuária",
    "Tecnologia",
    "Mercado",
    "Sustentabilidade",
    "Clima",
];

/// Where the category options come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryMode {
    /// Distinct categories of the loaded articles, sorted.
    #[default]
    Derived,
    /// A fixed list, independent of the loaded data.
    Fixed(Vec<String>),
}

impl CategoryMode {
    /// The fixed mode with [`DEFAULT_FIXED_CATEGORIES`].
    pub fn default_fixed() -> Self {
        CategoryMode::Fixed(DEFAULT_FIXED_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }

    /// Category options for the filter bar, always starting with
    /// [`ALL_CATEGORIES`].
    pub fn options<'a>(&self, articles: impl IntoIterator<Item = &'a Article>) -> Vec<String> {
        match self {
            CategoryMode::Derived => derive_categories(articles),
            CategoryMode::Fixed(list) => fixed_categories(list),
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, CategoryMode::Derived)
    }
}

/// `"Todos"` followed by the distinct categories present, sorted.
pub fn derive_categories<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Vec<String> {
    let distinct: BTreeSet<&str> = articles
        .into_iter()
        .map(|a| a.category.as_str())
        .filter(|c| *c != ALL_CATEGORIES)
        .collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/// `"Todos"` followed by `list` in its given order, duplicates and blanks
/// dropped.
pub fn fixed_categories(list: &[String]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for c in list {
        let c = c.trim();
        if !c.is_empty() && !out.iter().any(|o| o == c) {
            out.push(c.to_string());
        }
    }
    out
}

/// Articles visible under `selected`, in load order.
///
/// [`ALL_CATEGORIES`] returns every article; any other value returns the
/// articles whose category is exactly equal to it.
pub fn project<'a>(articles: &'a [Article], selected: &str) -> Vec<&'a Article> {
    if selected == ALL_CATEGORIES {
        articles.iter().collect()
    } else {
        articles.iter().filter(|a| a.category == selected).collect()
    }
}

/// Whether a single article passes the filter.
pub fn matches(article: &Article, selected: &str) -> bool {
    selected == ALL_CATEGORIES || article.category == selected
}

/// Reset `selected` to [`ALL_CATEGORIES`] when it is not among `options`.
///
/// Returns `true` when the selection changed.
pub fn reconcile_selection(selected: &mut String, options: &[String]) -> bool {
    if selected.as_str() == ALL_CATEGORIES || options.iter().any(|o| o == selected.as_str()) {
        return false;
    }
    *selected = ALL_CATEGORIES.to_string();
    true
}

/// The option after `selected`, wrapping around. Unknown selections move to
/// the first option.
pub fn next_option(options: &[String], selected: &str) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = match options.iter().position(|o| o == selected) {
        Some(i) => (i + 1) % options.len(),
        None => 0,
    };
    Some(options[next].clone())
}

/// The option before `selected`, wrapping around. Unknown selections move to
/// the first option.
pub fn prev_option(options: &[String], selected: &str) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let prev = match options.iter().position(|o| o == selected) {
        Some(0) => options.len() - 1,
        Some(i) => i - 1,
        None => 0,
    };
    Some(options[prev].clone())
}
