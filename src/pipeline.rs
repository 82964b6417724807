//! The paste sanitization pipeline and its three output variants.

use crate::config::WhitelistConfig;
use crate::filter::{TextFilter, TextFilterChain};
use crate::tree::{self, MarkupTree};

/// One of the three renditions produced for a paste.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PasteVariant {
    /// Text content only, exactly as captured.
    Plain,
    /// Sanitized markup.
    Rich,
    /// The captured markup, untouched.
    Source,
}

/// The result of a pipeline run, handed to the host for the user to choose
/// from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasteVariants {
    pub plain: String,
    pub rich: String,
    pub source: String,
}

impl PasteVariants {
    /// Borrow the chosen variant.
    pub fn get(&self, variant: PasteVariant) -> &str {
        match variant {
            PasteVariant::Plain => &self.plain,
            PasteVariant::Rich => &self.rich,
            PasteVariant::Source => &self.source,
        }
    }

    /// Take the chosen variant, dropping the other two.
    pub fn into_variant(self, variant: PasteVariant) -> String {
        match variant {
            PasteVariant::Plain => self.plain,
            PasteVariant::Rich => self.rich,
            PasteVariant::Source => self.source,
        }
    }

    /// `true` for the result of an empty capture.
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.rich.is_empty() && self.source.is_empty()
    }
}

/// Sanitizes captured clipboard markup.
///
/// The `rich` variant is produced by, in order:
///
/// 1. [`CruftFilter`](crate::CruftFilter) and
///    [`CharNormalizer`](crate::CharNormalizer) on the raw text, followed by
///    any filters added with [`with_text_filter`](Self::with_text_filter)
/// 2. parsing into a [`MarkupTree`] (text nodes are normalized once more,
///    for characters that arrived as entities)
/// 3. [`prune_empty`](crate::prune_empty)
/// 4. [`strip_attributes`](crate::strip_attributes), which also drops
///    `javascript:` URLs the text filters missed
/// 5. [`unwrap_spans`](crate::unwrap_spans)
/// 6. [`restrict_tags`](crate::restrict_tags)
/// 7. serialization
///
/// The order is load-bearing: normalized punctuation must be visible to the
/// emptiness test, and attributes must be stripped before spans are judged.
///
/// # Example
///
/// ```
/// use paste_sanitizer::{PasteSanitizer, WhitelistConfig};
///
/// let sanitizer = PasteSanitizer::new(WhitelistConfig::default());
/// let variants = sanitizer.run(r#"<p class="MsoNormal">Hello&nbsp;<span style="mso-bookmark:x">World</span></p>"#);
/// assert_eq!(variants.rich, "<p>Hello World</p>");
/// assert_eq!(variants.plain, "Hello\u{a0}World");
/// ```
pub struct PasteSanitizer {
    config: WhitelistConfig,
    filters: TextFilterChain,
}

impl PasteSanitizer {
    /// A sanitizer with the standard text filters and the given whitelists.
    pub fn new(config: WhitelistConfig) -> Self {
        Self {
            config,
            filters: TextFilterChain::standard(),
        }
    }

    /// Append a text-level filter; it runs after the built-in ones and
    /// before parsing.
    pub fn with_text_filter(mut self, filter: impl TextFilter + 'static) -> Self {
        self.filters.add(filter);
        self
    }

    /// Whitelists driving the tree stages.
    pub fn config(&self) -> &WhitelistConfig {
        &self.config
    }

    /// Produce all three variants. `None` and `""` yield three empty strings.
    pub fn run<'a>(&self, raw: impl Into<Option<&'a str>>) -> PasteVariants {
        let raw = raw.into().unwrap_or_default();
        if raw.is_empty() {
            return PasteVariants::default();
        }
        PasteVariants {
            plain: tree::extract_text(raw),
            rich: self.sanitize(raw),
            source: raw.to_string(),
        }
    }

    /// Produce only the sanitized rich markup.
    pub fn sanitize(&self, raw: &str) -> String {
        let filtered = self.filter_text(raw);
        let mut tree = MarkupTree::parse(&filtered);
        tree.normalize_text();

        let pruned = tree::prune_empty(&mut tree, &self.config);
        let stripped = tree::strip_attributes(&mut tree, &self.config);
        let spans = tree::unwrap_spans(&mut tree);
        let restricted = tree::restrict_tags(&mut tree, &self.config);

        let rich = tree.serialize();
        tracing::debug!(
            "Sanitized paste: {} bytes in, {} bytes out ({pruned} pruned, {stripped} attributes, {spans} spans, {restricted} unwrapped)",
            raw.len(),
            rich.len(),
        );
        rich
    }

    /// Run only the text-level filters.
    pub fn filter_text(&self, markup: &str) -> String {
        self.filters.filter(markup)
    }
}

impl Default for PasteSanitizer {
    fn default() -> Self {
        Self::new(WhitelistConfig::default())
    }
}

/// Run the pipeline once with `config`.
///
/// Convenience for hosts that do not keep a [`PasteSanitizer`] around.
pub fn sanitize_paste<'a>(
    raw: impl Into<Option<&'a str>>,
    config: &WhitelistConfig,
) -> PasteVariants {
    PasteSanitizer::new(config.clone()).run(raw)
}
