//! # paste_sanitizer
//!
//! Cleans markup captured from a clipboard paste (word processors, web pages,
//! office-suite HTML exports) down to a small, predictable subset suitable
//! for insertion into a managed document.
//!
//! ## Overview
//!
//! A [`PasteSanitizer`] turns one captured markup string into three
//! [`PasteVariants`]:
//!
//! - `plain` -- the text content, exactly as captured
//! - `rich` -- sanitized markup
//! - `source` -- the captured markup, untouched
//!
//! The `rich` variant goes through text-level filters ([`CruftFilter`],
//! [`CharNormalizer`]) before parsing, then through tree stages
//! ([`prune_empty`], [`strip_attributes`], [`unwrap_spans`],
//! [`restrict_tags`]) driven by a [`WhitelistConfig`]. Nothing in the
//! pipeline fails: malformed markup is parsed best-effort, and unknown tags
//! and attributes are dropped silently.
//!
//! [`PasteSession`] holds the state a host keeps between the paste event and
//! the user's choice, and hands the chosen markup to a [`PasteSink`].
//!
//! ## Quick start
//!
//! ```rust
//! use paste_sanitizer::{WhitelistConfig, sanitize_paste};
//!
//! let config = WhitelistConfig::default();
//! let variants = sanitize_paste(
//!     r#"<meta charset="utf-8"><p class="MsoNormal">Hello&nbsp;<span style="mso-bookmark:x">World</span></p>"#,
//!     &config,
//! );
//!
//! assert_eq!(variants.rich, "<p>Hello World</p>");
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod session;
pub mod tree;

pub use config::WhitelistConfig;
pub use error::{PasteError, Result};
pub use filter::{CharNormalizer, CruftFilter, FilterRule, TextFilter, TextFilterChain};
pub use pipeline::{PasteSanitizer, PasteVariant, PasteVariants, sanitize_paste};
pub use session::{CaptureOutcome, PasteSession, PasteSink};
pub use tree::{
    ElementData, MarkupNode, MarkupTree, prune_empty, restrict_tags, strip_attributes,
    unwrap_spans,
};
