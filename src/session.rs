//! Host integration state around a single paste.
//!
//! The capture mechanism, dialog and cursor handling belong to the host; this
//! module only keeps the state those pieces share: whether a capture is in
//! progress, whether the bypass modifier is held, and the variants waiting
//! for the user's choice.

use crate::error::{PasteError, Result};
use crate::filter::CharNormalizer;
use crate::pipeline::{PasteSanitizer, PasteVariant, PasteVariants};
use crate::tree;

/// Destination for the markup the user finally chose.
///
/// # Implementing a custom sink
///
/// ```
/// use paste_sanitizer::{PasteSink, Result};
///
/// struct Document { body: Vec<String> }
///
/// impl PasteSink for Document {
///     fn insert(&mut self, html: &str) -> Result<()> {
///         self.body.push(html.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait PasteSink {
    /// Merge `html` into the document at the host's recorded cursor.
    fn insert(&mut self, html: &str) -> Result<()>;
}

impl PasteSink for String {
    fn insert(&mut self, html: &str) -> Result<()> {
        self.push_str(html);
        Ok(())
    }
}

/// What the host should do with a paste event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Capture started; collect the markup and call
    /// [`PasteSession::complete_capture`].
    Started,
    /// The bypass modifier is held; let the platform paste natively.
    Bypass,
    /// Another capture is still open; swallow the event.
    AlreadyInProgress,
}

/// Paste state owned by the host integration layer.
///
/// # Example
///
/// ```
/// use paste_sanitizer::{CaptureOutcome, PasteSanitizer, PasteSession, PasteVariant};
///
/// let mut session = PasteSession::new(PasteSanitizer::default());
/// assert_eq!(session.begin_capture(), CaptureOutcome::Started);
///
/// let variants = session.complete_capture("<div><b>Hi</b></div>").unwrap();
/// assert_eq!(variants.rich, "Hi");
///
/// let mut document = String::new();
/// session.commit(PasteVariant::Rich, &mut document).unwrap();
/// assert_eq!(document, "Hi");
/// assert!(!session.is_capturing());
/// ```
pub struct PasteSession {
    sanitizer: PasteSanitizer,
    shift_down: bool,
    capturing: bool,
    pending: Option<PasteVariants>,
}

impl PasteSession {
    /// An idle session: no modifier held, nothing captured.
    pub fn new(sanitizer: PasteSanitizer) -> Self {
        Self {
            sanitizer,
            shift_down: false,
            capturing: false,
            pending: None,
        }
    }

    /// Record the bypass modifier state from the host's key events.
    pub fn set_shift_down(&mut self, down: bool) {
        self.shift_down = down;
    }

    /// Whether a capture has begun and has been neither committed nor
    /// cancelled.
    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Variants awaiting a choice, if a capture has completed.
    pub fn pending(&self) -> Option<&PasteVariants> {
        self.pending.as_ref()
    }

    /// Decide whether to intercept a paste event.
    pub fn begin_capture(&mut self) -> CaptureOutcome {
        if self.shift_down {
            tracing::debug!("Paste bypassed by modifier");
            return CaptureOutcome::Bypass;
        }
        if self.capturing {
            tracing::debug!("Paste ignored, capture already in progress");
            return CaptureOutcome::AlreadyInProgress;
        }
        self.capturing = true;
        self.pending = None;
        CaptureOutcome::Started
    }

    /// Run the pipeline on the captured markup and keep the variants until
    /// [`commit`](Self::commit) or [`cancel`](Self::cancel).
    pub fn complete_capture<'a>(
        &mut self,
        raw: impl Into<Option<&'a str>>,
    ) -> Result<&PasteVariants> {
        if !self.capturing {
            return Err(PasteError::NotCapturing);
        }
        let variants = self.sanitizer.run(raw);
        Ok(&*self.pending.insert(variants))
    }

    /// Hand the chosen variant to `sink` and end the capture.
    ///
    /// Markup variants go through the text-level filters once more before
    /// insertion. The plain variant is normalized and escaped so it is
    /// inserted as text. The capture ends even if the sink fails.
    pub fn commit(&mut self, choice: PasteVariant, sink: &mut impl PasteSink) -> Result<()> {
        let Some(variants) = self.pending.take() else {
            return Err(PasteError::NotCapturing);
        };
        self.capturing = false;

        let html = match choice {
            PasteVariant::Plain => tree::escape_text(&CharNormalizer::normalize(&variants.plain)),
            PasteVariant::Rich | PasteVariant::Source => {
                self.sanitizer.filter_text(variants.get(choice))
            }
        };
        sink.insert(&html)
    }

    /// Like [`commit`](Self::commit), but logs the error via `tracing`
    /// instead of returning it.
    pub fn commit_or_log(&mut self, choice: PasteVariant, sink: &mut impl PasteSink) {
        if let Err(e) = self.commit(choice, sink) {
            tracing::error!("Failed to commit paste: {e}");
        }
    }

    /// Abandon the capture and drop any pending variants.
    pub fn cancel(&mut self) {
        self.capturing = false;
        self.pending = None;
    }
}
