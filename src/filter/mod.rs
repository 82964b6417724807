//! Text-level filters that run on raw markup before any parsing.
//!
//! Clipboard markup is frequently not well formed, so these stages work on
//! the string itself and degrade gracefully where a strict parser would give
//! up. Filters implement the [`TextFilter`] trait and are composed into a
//! [`TextFilterChain`] that runs them sequentially.
//!
//! Built-in filters:
//!
//! - [`CruftFilter`] -- regex removal of vendor markup noise.
//! - [`CharNormalizer`] -- typographic punctuation to ASCII/Latin-1.

mod chars;
mod cruft;

pub use chars::CharNormalizer;
pub use cruft::{CruftFilter, FilterRule};

/// A string-to-string pass over captured clipboard markup.
///
/// Filters run before the markup is parsed, so they may see unbalanced tags,
/// unterminated comments or stray `<`. They must never fail; input they do
/// not recognise is returned as is. Hosts add their own passes (for example
/// dropping an in-house widget's markers) through
/// [`PasteSanitizer::with_text_filter`](crate::PasteSanitizer::with_text_filter).
pub trait TextFilter: Send + Sync {
    /// Return the cleaned markup.
    fn filter(&self, markup: &str) -> String;
}

/// The text-level half of paste sanitization.
///
/// Filters see the markup in the order they were added. The same chain is
/// applied again when a pending paste is committed.
pub struct TextFilterChain {
    filters: Vec<Box<dyn TextFilter>>,
}

impl TextFilterChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The built-in chain: [`CruftFilter`] followed by [`CharNormalizer`].
    pub fn standard() -> Self {
        let mut chain = Self::new();
        chain.add(CruftFilter::default());
        chain.add(CharNormalizer);
        chain
    }

    /// Append a filter to the end of the chain.
    pub fn add(&mut self, filter: impl TextFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Pass `markup` through every filter in turn.
    pub fn filter(&self, markup: &str) -> String {
        self.filters
            .iter()
            .fold(markup.to_string(), |acc, f| f.filter(&acc))
    }

    /// Number of filters in the chain.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain leaves markup untouched.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for TextFilterChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl TextFilter for Upper {
        fn filter(&self, markup: &str) -> String {
            markup.to_uppercase()
        }
    }

    #[test]
    fn chain_empty_is_empty() {
        assert!(TextFilterChain::new().is_empty());
    }

    #[test]
    fn chain_default_is_standard() {
        assert_eq!(TextFilterChain::default().len(), 2);
    }

    #[test]
    fn chain_with_no_filters_returns_original() {
        let chain = TextFilterChain::new();
        assert_eq!(chain.filter("<p>original</p>"), "<p>original</p>");
    }

    #[test]
    fn standard_chain_strips_cruft_then_normalizes() {
        let chain = TextFilterChain::standard();
        let markup = "<!-- note --><p class=\"MsoNormal\">\u{201C}Hi\u{201D} \u{2014} there</p>";
        assert_eq!(chain.filter(markup), "<p >\"Hi\" - there</p>");
    }

    #[test]
    fn chain_runs_filters_in_order() {
        let mut chain = TextFilterChain::standard();
        chain.add(Upper);
        let result = chain.filter("<script>x()</script><p>\u{2018}a\u{2019}</p>");
        assert_eq!(result, "<P>'A'</P>");
    }
}
