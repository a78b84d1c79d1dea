//! Context-window overflow detection.
//!
//! Model backends report an over-long prompt with different error types and
//! wording. The only portable signal is the error text, so detection is a
//! case-insensitive substring match against a table of known phrases.

use std::fmt::Display;

/// Lower-cased phrases that identify a context-window overflow.
///
/// Covers OpenAI ("maximum context length", "context_length_exceeded"),
/// Anthropic ("prompt is too long"), Bedrock ("input is too long"), and
/// LiteLLM's `ContextWindowExceededError` wording.
pub const CONTEXT_WINDOW_MARKERS: &[&str] = &[
    "context window",
    "contextwindowexceeded",
    "context_length_exceeded",
    "context length exceeded",
    "maximum context length",
    "too long for the model",
    "prompt is too long",
    "input is too long",
];

/// Whether `error` reports a context-window overflow, using the built-in
/// marker table.
pub fn is_context_window_error<E: Display + ?Sized>(error: &E) -> bool {
    let message = error.to_string().to_lowercase();
    CONTEXT_WINDOW_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Marker-table classifier extended with deployment-specific phrases.
#[derive(Debug, Clone, Default)]
pub struct ContextWindowClassifier {
    extra_markers: Vec<String>,
}

impl ContextWindowClassifier {
    /// Build a classifier that also matches `extra_markers`.
    ///
    /// Markers are lower-cased; blank entries are dropped so an empty string
    /// in configuration cannot match every error.
    pub fn new<I, S>(extra_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra_markers = extra_markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { extra_markers }
    }

    pub fn is_context_window_error<E: Display + ?Sized>(&self, error: &E) -> bool {
        let message = error.to_string().to_lowercase();
        CONTEXT_WINDOW_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
            || self
                .extra_markers
                .iter()
                .any(|marker| message.contains(marker.as_str()))
    }
}
